use crate::error::{self, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Config, ResourceExt};
use log::debug;
use snafu::{OptionExt, ResultExt};
use std::time::Duration;
use terminal_model::clients::{ClusterClientSet, HttpStatusCode};
use terminal_model::constants::{GARDEN_NAMESPACE, SECRET_KEY_KUBECONFIG};
use terminal_model::{Seed, Shoot};

/// How long to sleep between polls while waiting for a seed's kubeconfig secret to appear.
const SECRET_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Whether credential resolution blocks until the seed's kubeconfig becomes available. The
/// blocking mode has no bound of its own; callers impose one via the configured timeout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CredentialWait {
    NoWait,
    WaitUntilAvailable,
}

/// Credentials resolved for one target cluster: the per-kind clients plus the hostname (or
/// literal address) of its API server endpoint.
pub struct SeedConnection {
    pub clients: ClusterClientSet,
    pub api_server_host: String,
}

/// What the bootstrap pipeline consumes from the garden cluster: seed and shoot records,
/// per-cluster credentials, and ingress-domain derivation. [`GardenClient`] is the kube-backed
/// implementation; tests and embedders with their own domain scheme provide their own.
#[async_trait]
pub trait Garden: Send + Sync {
    async fn get_seed(&self, name: &str) -> Result<Seed>;

    /// Reads the shoot record backing the named seed from the garden namespace.
    async fn get_shoot(&self, name: &str) -> Result<Shoot>;

    /// Resolves `seed`'s credentials and builds a client set whose namespaced clients are scoped
    /// to `namespace`.
    async fn connect(
        &self,
        seed: &Seed,
        wait: CredentialWait,
        namespace: &str,
    ) -> Result<SeedConnection>;

    /// Builds a client set for the garden cluster itself.
    async fn connect_garden(&self, namespace: &str) -> Result<ClusterClientSet>;

    /// The ingress domain a soil exposes for its own API server.
    async fn soil_ingress_domain(&self, soil: &Seed) -> Result<String>;

    /// The ingress domain computed for an ordinary seed's API server on its hosting soil.
    async fn seed_ingress_domain(&self, shoot: &Shoot, soil: &Seed) -> Result<String>;
}

/// Kube-backed [`Garden`] implementation. Seed kubeconfigs live in secrets referenced by the seed
/// records; ingress domains derive from the seed's configured ingress domain.
pub struct GardenClient {
    k8s_client: kube::Client,
    seeds: Api<Seed>,
    shoots: Api<Shoot>,
}

impl GardenClient {
    pub fn new(k8s_client: kube::Client) -> Self {
        let seeds = Api::all(k8s_client.clone());
        let shoots = Api::namespaced(k8s_client.clone(), GARDEN_NAMESPACE);
        Self {
            k8s_client,
            seeds,
            shoots,
        }
    }

    /// Initializes the garden client from in-cluster variables or `KUBECONFIG`.
    pub async fn try_default() -> Result<Self> {
        let k8s_client = kube::Client::try_default()
            .await
            .context(error::InitializationSnafu)?;
        Ok(Self::new(k8s_client))
    }

    async fn seed_kube_config(&self, seed: &Seed, wait: CredentialWait) -> Result<Config> {
        let seed_name = seed.name_any();
        let secret_ref = &seed.spec.secret_ref;
        let secrets: Api<Secret> =
            Api::namespaced(self.k8s_client.clone(), &secret_ref.namespace);

        let secret = match wait {
            CredentialWait::NoWait => secrets
                .get(&secret_ref.name)
                .await
                .context(error::CredentialsReadSnafu { seed: &seed_name })?,
            CredentialWait::WaitUntilAvailable => loop {
                match secrets.get(&secret_ref.name).await {
                    Ok(secret) => break secret,
                    Err(err) if err.is_not_found() => {
                        debug!(
                            "kubeconfig secret for seed '{}' not yet available, retrying",
                            seed_name
                        );
                        tokio::time::sleep(SECRET_POLL_INTERVAL).await;
                    }
                    Err(err) => {
                        return Err(err).context(error::CredentialsReadSnafu { seed: &seed_name });
                    }
                }
            },
        };

        let data = secret.data.unwrap_or_default();
        let bytes = data
            .get(SECRET_KEY_KUBECONFIG)
            .context(error::CredentialsUnavailableSnafu { seed: &seed_name })?;
        let yaml = std::str::from_utf8(&bytes.0)
            .ok()
            .context(error::CredentialsUnavailableSnafu { seed: &seed_name })?;
        let kubeconfig =
            Kubeconfig::from_yaml(yaml).context(error::KubeconfigParseSnafu { seed: &seed_name })?;
        Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context(error::KubeconfigParseSnafu { seed: &seed_name })
    }
}

#[async_trait]
impl Garden for GardenClient {
    async fn get_seed(&self, name: &str) -> Result<Seed> {
        self.seeds.get(name).await.context(error::GardenApiCallSnafu {
            method: "get",
            what: format!("seed '{}'", name),
        })
    }

    async fn get_shoot(&self, name: &str) -> Result<Shoot> {
        self.shoots
            .get(name)
            .await
            .context(error::GardenApiCallSnafu {
                method: "get",
                what: format!("shoot '{}'", name),
            })
    }

    async fn connect(
        &self,
        seed: &Seed,
        wait: CredentialWait,
        namespace: &str,
    ) -> Result<SeedConnection> {
        let seed_name = seed.name_any();
        let config = self.seed_kube_config(seed, wait).await?;
        let api_server_host = config
            .cluster_url
            .host()
            .map(str::to_string)
            .context(error::ApiServerHostSnafu { seed: &seed_name })?;
        let client = kube::Client::try_from(config)
            .context(error::ClusterClientSnafu { seed: &seed_name })?;
        Ok(SeedConnection {
            clients: ClusterClientSet::new(client, namespace),
            api_server_host,
        })
    }

    async fn connect_garden(&self, namespace: &str) -> Result<ClusterClientSet> {
        Ok(ClusterClientSet::new(self.k8s_client.clone(), namespace))
    }

    async fn soil_ingress_domain(&self, soil: &Seed) -> Result<String> {
        Ok(soil.spec.ingress_domain.clone())
    }

    async fn seed_ingress_domain(&self, shoot: &Shoot, soil: &Seed) -> Result<String> {
        Ok(format!("{}.{}", shoot.name_any(), soil.spec.ingress_domain))
    }
}
