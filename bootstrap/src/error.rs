use snafu::Snafu;

/// The `Result` type returned by this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a single bootstrap run. All variants are caught at the task boundary and logged
/// with the seed's identity; none of them escalate to the host process. The context selectors are
/// public so that host-provided [`Garden`](crate::Garden) implementations can produce them.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{}", source))]
    Clients {
        source: terminal_model::clients::Error,
    },

    #[snafu(display("Unable to derive owner references: {}", source))]
    OwnerIdentity { source: terminal_model::Error },

    #[snafu(display("Kubernetes client error trying to {} {}: {}", method, what, source))]
    GardenApiCall {
        method: String,
        what: String,
        source: kube::Error,
    },

    #[snafu(display("Unable to read the kubeconfig secret for seed '{}': {}", seed, source))]
    CredentialsRead { seed: String, source: kube::Error },

    #[snafu(display("No usable kubeconfig found for seed '{}'", seed))]
    CredentialsUnavailable { seed: String },

    #[snafu(display(
        "Timed out after {}s waiting for the credentials of seed '{}'",
        seconds,
        seed
    ))]
    CredentialsTimeout { seed: String, seconds: u64 },

    #[snafu(display("Unable to parse the kubeconfig of seed '{}': {}", seed, source))]
    KubeconfigParse {
        seed: String,
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to build a cluster client for seed '{}': {}", seed, source))]
    ClusterClient { seed: String, source: kube::Error },

    #[snafu(display("The kubeconfig of seed '{}' names no API server host", seed))]
    ApiServerHost { seed: String },

    #[snafu(display("The shoot record of seed '{}' names no hosting soil", seed))]
    MissingSoil { seed: String },

    #[snafu(display(
        "The shoot record of seed '{}' carries no technical namespace on its soil",
        seed
    ))]
    MissingTechnicalNamespace { seed: String },

    #[snafu(display("No cleanup container image is configured"))]
    MissingCleanupImage,

    #[snafu(display("Error initializing the garden cluster client: {}", source))]
    Initialization { source: kube::Error },
}
