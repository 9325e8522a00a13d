/// Helper macro to avoid retyping the base domain-like name of the garden system when creating
/// further string constants from it. When given no parameters, this returns the base domain-like
/// name. When given a string literal parameter it adds `:parameter` to the end, which is the
/// convention for garden-owned RBAC object names.
macro_rules! garden {
    () => {
        "garden.sapcloud.io"
    };
    ($s:literal) => {
        concat!(garden!(), ":", $s)
    };
}

// System identifiers
pub const GARDEN: &str = garden!();
pub const GARDEN_NAMESPACE: &str = "garden";

// Component names
pub const TERMINAL_CLEANUP: &str = "dashboard-terminal-cleanup";
pub const TERMINAL_KUBE_APISERVER: &str = "dashboard-terminal-kube-apiserver";
pub const SERVICE_ACCOUNT_CLEANUP: &str = TERMINAL_CLEANUP;
pub const CRONJOB_CLEANUP: &str = TERMINAL_CLEANUP;
pub const CLUSTER_ROLE_CLEANUP: &str = garden!("dashboard-terminal-cleanup");
pub const CLUSTER_ROLE_BINDING_CLEANUP: &str = CLUSTER_ROLE_CLEANUP;
pub const CLUSTER_ROLE_ATTACH: &str = garden!("dashboard-terminal-attach");

// Label and annotation keys
pub const LABEL_ROLE: &str = concat!(garden!(), "/role");
pub const ROLE_SOIL: &str = "soil";
pub const ANNOTATION_BOOTSTRAP_DISABLED: &str =
    concat!("dashboard.", garden!(), "/terminal-bootstrap-resources-disabled");

// The kube-apiserver service every shoot control plane exposes in its technical namespace.
pub const APISERVER_SERVICE: &str = "kube-apiserver";
pub const APISERVER_PORT: i32 = 443;

// The host label prepended to an ingress domain when exposing a cluster's API server.
pub const INGRESS_HOST_PREFIX: &str = "api";

// Environment variables
pub const ENV_NO_HEARTBEAT_DELETE_SECONDS: &str = "NO_HEARTBEAT_DELETE_SECONDS";

// Key of the kubeconfig entry in a seed's secret
pub const SECRET_KEY_KUBECONFIG: &str = "kubeconfig";

#[test]
fn garden_constants_macro_test() {
    assert_eq!("garden.sapcloud.io", garden!());
    assert_eq!("garden.sapcloud.io:foo", garden!("foo"));
    assert_eq!("garden.sapcloud.io/role", LABEL_ROLE);
    assert_eq!(
        "dashboard.garden.sapcloud.io/terminal-bootstrap-resources-disabled",
        ANNOTATION_BOOTSTRAP_DISABLED
    );
}
