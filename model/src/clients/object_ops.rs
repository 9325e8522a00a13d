use super::error::{self, Result};
use super::HttpStatusCode;
use async_trait::async_trait;
use core::fmt::Debug;
use kube::api::{Patch, PatchParams, PostParams};
use kube::Api;
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::ResultExt;

/// The read/create/merge-update surface this subsystem needs from a cluster, scoped to one object
/// kind and namespace. `kube::Api` provides the production implementation; tests substitute an
/// in-memory double.
#[async_trait]
pub trait ObjectOps<T>: Send + Sync
where
    T: Send + Sync,
{
    async fn get(&self, name: &str) -> kube::Result<T>;
    async fn create(&self, body: &T) -> kube::Result<T>;
    async fn merge_patch(&self, name: &str, body: &T) -> kube::Result<T>;
}

#[async_trait]
impl<T> ObjectOps<T> for Api<T>
where
    T: Clone + Debug + DeserializeOwned + Serialize + Send + Sync,
{
    async fn get(&self, name: &str) -> kube::Result<T> {
        Api::get(self, name).await
    }

    async fn create(&self, body: &T) -> kube::Result<T> {
        Api::create(self, &PostParams::default(), body).await
    }

    async fn merge_patch(&self, name: &str, body: &T) -> kube::Result<T> {
        Api::patch(self, name, &PatchParams::default(), &Patch::Merge(body)).await
    }
}

/// Ensures the live object `name` matches the desired `body`. An existing object is merge-patched
/// so that fields absent from `body` are left untouched; a missing object is created. Any failure
/// other than NotFound on the read propagates unchanged.
///
/// This is a two-step check-then-act sequence. A create/update race between two concurrent passes
/// over the same object is benign: a subsequent pass converges.
pub async fn upsert<T>(client: &dyn ObjectOps<T>, name: &str, body: &T, what: &str) -> Result<T>
where
    T: Send + Sync,
{
    match client.get(name).await {
        Ok(_) => {
            trace!("updating existing {} '{}'", what, name);
            Ok(client
                .merge_patch(name, body)
                .await
                .context(error::KubeApiCallSnafu {
                    method: "merge patch",
                    what,
                })?)
        }
        Err(err) if err.is_not_found() => {
            trace!("creating {} '{}'", what, name);
            Ok(client
                .create(body)
                .await
                .context(error::KubeApiCallSnafu {
                    method: "create",
                    what,
                })?)
        }
        Err(err) => Ok(Err(err).context(error::KubeApiCallSnafu {
            method: "get",
            what,
        })?),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::ServiceAccount;
    use kube::api::ObjectMeta;
    use kube::core::ErrorResponse;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Records the operations applied to it and keeps objects in memory. A `fail_reads` code
    /// simulates a cluster that rejects reads outright.
    #[derive(Default)]
    struct MemApi {
        objects: Mutex<BTreeMap<String, ServiceAccount>>,
        calls: Mutex<Vec<&'static str>>,
        fail_reads: Option<u16>,
    }

    fn api_error(code: u16, message: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: message.to_string(),
            reason: String::new(),
            code,
        })
    }

    #[async_trait]
    impl ObjectOps<ServiceAccount> for MemApi {
        async fn get(&self, name: &str) -> kube::Result<ServiceAccount> {
            self.calls.lock().unwrap().push("get");
            if let Some(code) = self.fail_reads {
                return Err(api_error(code, "read rejected"));
            }
            self.objects
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .ok_or_else(|| api_error(404, "not found"))
        }

        async fn create(&self, body: &ServiceAccount) -> kube::Result<ServiceAccount> {
            self.calls.lock().unwrap().push("create");
            let name = body.metadata.name.clone().unwrap_or_default();
            self.objects.lock().unwrap().insert(name, body.clone());
            Ok(body.clone())
        }

        async fn merge_patch(
            &self,
            name: &str,
            body: &ServiceAccount,
        ) -> kube::Result<ServiceAccount> {
            self.calls.lock().unwrap().push("merge_patch");
            let mut objects = self.objects.lock().unwrap();
            if !objects.contains_key(name) {
                return Err(api_error(404, "not found"));
            }
            objects.insert(name.to_string(), body.clone());
            Ok(body.clone())
        }
    }

    fn service_account(name: &str) -> ServiceAccount {
        ServiceAccount {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_object_is_created() {
        let api = MemApi::default();
        let body = service_account("sa");
        upsert(&api, "sa", &body, "service account").await.unwrap();
        assert_eq!(*api.calls.lock().unwrap(), vec!["get", "create"]);
    }

    #[tokio::test]
    async fn existing_object_is_merge_patched() {
        let api = MemApi::default();
        let body = service_account("sa");
        api.objects
            .lock()
            .unwrap()
            .insert("sa".to_string(), body.clone());
        upsert(&api, "sa", &body, "service account").await.unwrap();
        assert_eq!(*api.calls.lock().unwrap(), vec!["get", "merge_patch"]);
    }

    #[tokio::test]
    async fn two_successive_upserts_converge() {
        let api = MemApi::default();
        let body = service_account("sa");
        upsert(&api, "sa", &body, "service account").await.unwrap();
        let after_first = api.objects.lock().unwrap().get("sa").cloned();
        upsert(&api, "sa", &body, "service account").await.unwrap();
        let after_second = api.objects.lock().unwrap().get("sa").cloned();
        assert_eq!(after_first, after_second);
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec!["get", "create", "get", "merge_patch"]
        );
    }

    #[tokio::test]
    async fn non_not_found_read_error_propagates_without_create() {
        let api = MemApi {
            fail_reads: Some(503),
            ..Default::default()
        };
        let body = service_account("sa");
        let result = upsert(&api, "sa", &body, "service account").await;
        assert!(result.is_err());
        assert_eq!(*api.calls.lock().unwrap(), vec!["get"]);
        assert!(api.objects.lock().unwrap().is_empty());
    }
}
