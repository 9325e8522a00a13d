use crate::config::TerminalBootstrapConfig;
use crate::error::{self, Result};
use crate::garden::{CredentialWait, Garden, SeedConnection};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::ResourceExt;
use log::debug;
use snafu::{OptionExt, ResultExt};
use std::net::IpAddr;
use std::time::Duration;
use terminal_model::clients::{upsert, ClusterClientSet};
use terminal_model::constants::{
    APISERVER_SERVICE, CLUSTER_ROLE_ATTACH, CLUSTER_ROLE_BINDING_CLEANUP, CLUSTER_ROLE_CLEANUP,
    CRONJOB_CLEANUP, GARDEN_NAMESPACE, INGRESS_HOST_PREFIX, SERVICE_ACCOUNT_CLEANUP,
    TERMINAL_KUBE_APISERVER,
};
use terminal_model::system::{
    apiserver_endpoints, apiserver_ingress, apiserver_service, attach_cluster_role,
    cleanup_cluster_role, cleanup_cluster_role_binding, cleanup_cron_job, cleanup_service_account,
};
use terminal_model::{owner_references_for_service_account, Seed};

/// Creates or updates the terminal resource bundle on one seed cluster: the cleanup group, the
/// attach role, and the kube-apiserver exposure, branching on whether the seed is a soil. Failure
/// at any step aborts the remaining steps for this seed; already-applied objects are left in
/// place and converge on the next run.
pub async fn bootstrap_seed(
    garden: &dyn Garden,
    config: &TerminalBootstrapConfig,
    seed: &Seed,
) -> Result<()> {
    let seed_name = seed.name_any();
    debug!("creating / updating resources on seed '{}' for webterminals", seed_name);

    let connection = connect_with_wait(garden, config, seed).await?;
    let owner_references = bootstrap_cleanup_resources(&connection.clients, config).await?;
    bootstrap_attach_resources(&connection.clients, &owner_references).await?;

    // Expose the kube-apiserver with a browser-trusted certificate.
    if seed.is_soil() {
        bootstrap_soil_exposure(garden, config, seed, &connection).await
    } else {
        bootstrap_seed_exposure(garden, config, &seed_name).await
    }
}

/// Runs the cleanup and attach steps against the garden cluster itself. Executed once at process
/// startup; a failure is reported to the composition root for logging and must not abort startup.
pub async fn bootstrap_garden(
    garden: &dyn Garden,
    config: &TerminalBootstrapConfig,
) -> Result<()> {
    debug!("bootstrapping garden cluster");

    let clients = garden.connect_garden(GARDEN_NAMESPACE).await?;
    let owner_references = bootstrap_cleanup_resources(&clients, config).await?;
    bootstrap_attach_resources(&clients, &owner_references).await
}

/// Resolves the seed's credentials in blocking-wait mode, bounded by the configured timeout.
async fn connect_with_wait(
    garden: &dyn Garden,
    config: &TerminalBootstrapConfig,
    seed: &Seed,
) -> Result<SeedConnection> {
    let seconds = config.credential_wait_timeout_seconds;
    tokio::time::timeout(
        Duration::from_secs(seconds),
        garden.connect(seed, CredentialWait::WaitUntilAvailable, GARDEN_NAMESPACE),
    )
    .await
    .ok()
    .context(error::CredentialsTimeoutSnafu {
        seed: seed.name_any(),
        seconds,
    })?
}

/// Upserts the cleanup group: service account first, then role, binding and cron job chained to
/// the service account's server-assigned identity so that deleting it cascades to the group.
async fn bootstrap_cleanup_resources(
    clients: &ClusterClientSet,
    config: &TerminalBootstrapConfig,
) -> Result<Vec<OwnerReference>> {
    let image = config
        .cleanup_image
        .as_deref()
        .context(error::MissingCleanupImageSnafu)?;

    let service_account = upsert(
        clients.service_accounts.as_ref(),
        SERVICE_ACCOUNT_CLEANUP,
        &cleanup_service_account(),
        "cleanup service account",
    )
    .await
    .context(error::ClientsSnafu)?;

    let owner_references = owner_references_for_service_account(&service_account)
        .context(error::OwnerIdentitySnafu)?;

    upsert(
        clients.cluster_roles.as_ref(),
        CLUSTER_ROLE_CLEANUP,
        &cleanup_cluster_role(owner_references.clone()),
        "cleanup cluster role",
    )
    .await
    .context(error::ClientsSnafu)?;

    upsert(
        clients.cluster_role_bindings.as_ref(),
        CLUSTER_ROLE_BINDING_CLEANUP,
        &cleanup_cluster_role_binding(owner_references.clone()),
        "cleanup cluster role binding",
    )
    .await
    .context(error::ClientsSnafu)?;

    upsert(
        clients.cron_jobs.as_ref(),
        CRONJOB_CLEANUP,
        &cleanup_cron_job(
            image,
            &config.cleanup_schedule,
            config.no_heartbeat_delete_seconds,
            owner_references.clone(),
        ),
        "cleanup cron job",
    )
    .await
    .context(error::ClientsSnafu)?;

    Ok(owner_references)
}

async fn bootstrap_attach_resources(
    clients: &ClusterClientSet,
    owner_references: &[OwnerReference],
) -> Result<()> {
    upsert(
        clients.cluster_roles.as_ref(),
        CLUSTER_ROLE_ATTACH,
        &attach_cluster_role(owner_references.to_vec()),
        "attach cluster role",
    )
    .await
    .context(error::ClientsSnafu)?;
    Ok(())
}

/// A soil exposes its own API server: a headless service (backed by an Endpoints object when the
/// endpoint is a literal address, aliased via ExternalName when it is a DNS name) fronted by an
/// ingress at `api.<soil ingress domain>`.
async fn bootstrap_soil_exposure(
    garden: &dyn Garden,
    config: &TerminalBootstrapConfig,
    soil: &Seed,
    connection: &SeedConnection,
) -> Result<()> {
    let clients = &connection.clients;
    let apiserver_host = &connection.api_server_host;

    let service = if apiserver_host.parse::<IpAddr>().is_ok() {
        upsert(
            clients.endpoints.as_ref(),
            TERMINAL_KUBE_APISERVER,
            &apiserver_endpoints(apiserver_host),
            "API server endpoints",
        )
        .await
        .context(error::ClientsSnafu)?;

        upsert(
            clients.services.as_ref(),
            TERMINAL_KUBE_APISERVER,
            &apiserver_service(None),
            "API server service",
        )
        .await
        .context(error::ClientsSnafu)?
    } else {
        upsert(
            clients.services.as_ref(),
            TERMINAL_KUBE_APISERVER,
            &apiserver_service(Some(apiserver_host)),
            "API server service",
        )
        .await
        .context(error::ClientsSnafu)?
    };
    let service_name = service
        .metadata
        .name
        .unwrap_or_else(|| TERMINAL_KUBE_APISERVER.to_string());

    let domain = garden.soil_ingress_domain(soil).await?;
    let ingress_host = format!("{}.{}", INGRESS_HOST_PREFIX, domain);

    upsert(
        clients.ingresses.as_ref(),
        TERMINAL_KUBE_APISERVER,
        &apiserver_ingress(&ingress_host, &service_name, &config.apiserver_ingress_annotations),
        "API server ingress",
    )
    .await
    .context(error::ClientsSnafu)?;
    Ok(())
}

/// An ordinary seed's API server already runs behind a service in its technical namespace on the
/// hosting soil; only an ingress at `api.<seed ingress domain on that soil>` is added there.
async fn bootstrap_seed_exposure(
    garden: &dyn Garden,
    config: &TerminalBootstrapConfig,
    seed_name: &str,
) -> Result<()> {
    let shoot = garden.get_shoot(seed_name).await?;
    let soil_name = shoot
        .soil_name()
        .context(error::MissingSoilSnafu { seed: seed_name })?
        .to_string();
    let technical_namespace = shoot
        .technical_namespace()
        .context(error::MissingTechnicalNamespaceSnafu { seed: seed_name })?
        .to_string();
    let soil = garden.get_seed(&soil_name).await?;
    let domain = garden.seed_ingress_domain(&shoot, &soil).await?;

    let soil_connection = garden
        .connect(&soil, CredentialWait::NoWait, &technical_namespace)
        .await?;
    let ingress_host = format!("{}.{}", INGRESS_HOST_PREFIX, domain);

    upsert(
        soil_connection.clients.ingresses.as_ref(),
        TERMINAL_KUBE_APISERVER,
        &apiserver_ingress(&ingress_host, APISERVER_SERVICE, &config.apiserver_ingress_annotations),
        "API server ingress",
    )
    .await
    .context(error::ClientsSnafu)?;
    Ok(())
}
