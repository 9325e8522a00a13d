use crate::constants::CLUSTER_ROLE_ATTACH;
use k8s_openapi::api::rbac::v1::{ClusterRole, PolicyRule};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::ObjectMeta;

/// Defines the cluster role granting the single verb needed to attach to a running terminal pod.
pub fn attach_cluster_role(owner_references: Vec<OwnerReference>) -> ClusterRole {
    ClusterRole {
        metadata: ObjectMeta {
            name: Some(CLUSTER_ROLE_ATTACH.to_string()),
            owner_references: Some(owner_references),
            ..Default::default()
        },
        rules: Some(vec![PolicyRule {
            api_groups: Some(vec!["".to_string()]),
            resources: Some(vec!["pods/attach".to_string()]),
            verbs: vec!["get".to_string()],
            ..Default::default()
        }]),
        ..Default::default()
    }
}
