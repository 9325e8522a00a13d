/// Encapsulates the terminal-related K8S object definitions
mod apiserver;
mod attach;
mod cleanup;

pub use apiserver::{apiserver_endpoints, apiserver_ingress, apiserver_service};
pub use attach::attach_cluster_role;
pub use cleanup::{
    cleanup_cluster_role, cleanup_cluster_role_binding, cleanup_cron_job, cleanup_service_account,
};
