use super::error::{self, Result};
use super::ObjectOps;
use k8s_openapi::api::batch::v1::CronJob;
use k8s_openapi::api::core::v1::{Endpoints, Service, ServiceAccount};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use kube::Api;
use snafu::ResultExt;

/// The per-kind clients this subsystem uses against one target cluster (the garden cluster, a
/// seed, or a soil). Namespaced kinds are scoped to `namespace`; RBAC cluster roles and bindings
/// are cluster-scoped. A client set is owned by the single bootstrap invocation that created it.
pub struct ClusterClientSet {
    pub service_accounts: Box<dyn ObjectOps<ServiceAccount>>,
    pub cluster_roles: Box<dyn ObjectOps<ClusterRole>>,
    pub cluster_role_bindings: Box<dyn ObjectOps<ClusterRoleBinding>>,
    pub cron_jobs: Box<dyn ObjectOps<CronJob>>,
    pub services: Box<dyn ObjectOps<Service>>,
    pub endpoints: Box<dyn ObjectOps<Endpoints>>,
    pub ingresses: Box<dyn ObjectOps<Ingress>>,
}

impl ClusterClientSet {
    pub fn new(k8s_client: kube::Client, namespace: &str) -> Self {
        Self {
            service_accounts: Box::new(Api::<ServiceAccount>::namespaced(
                k8s_client.clone(),
                namespace,
            )),
            cluster_roles: Box::new(Api::<ClusterRole>::all(k8s_client.clone())),
            cluster_role_bindings: Box::new(Api::<ClusterRoleBinding>::all(k8s_client.clone())),
            cron_jobs: Box::new(Api::<CronJob>::namespaced(k8s_client.clone(), namespace)),
            services: Box::new(Api::<Service>::namespaced(k8s_client.clone(), namespace)),
            endpoints: Box::new(Api::<Endpoints>::namespaced(k8s_client.clone(), namespace)),
            ingresses: Box::new(Api::<Ingress>::namespaced(k8s_client, namespace)),
        }
    }

    /// Builds a client set for the cluster the process itself runs in, from in-cluster variables
    /// or `KUBECONFIG`.
    pub async fn try_default(namespace: &str) -> Result<Self> {
        let k8s_client = kube::Client::try_default()
            .await
            .context(error::InitializationSnafu)?;
        Ok(Self::new(k8s_client, namespace))
    }
}
