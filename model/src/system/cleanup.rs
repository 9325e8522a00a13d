use crate::constants::{
    CLUSTER_ROLE_BINDING_CLEANUP, CLUSTER_ROLE_CLEANUP, CRONJOB_CLEANUP,
    ENV_NO_HEARTBEAT_DELETE_SECONDS, GARDEN_NAMESPACE, SERVICE_ACCOUNT_CLEANUP, TERMINAL_CLEANUP,
};
use k8s_openapi::api::batch::v1::{CronJob, CronJobSpec, JobSpec, JobTemplateSpec};
use k8s_openapi::api::core::v1::{
    Container, EnvVar, PodSecurityContext, PodSpec, PodTemplateSpec, SecurityContext,
    ServiceAccount,
};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, PolicyRule, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::ObjectMeta;

/// Defines the service account the terminal cleanup job runs under. Its server-assigned identity
/// also anchors the owner-reference chain for the rest of the cleanup group.
pub fn cleanup_service_account() -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMeta {
            name: Some(SERVICE_ACCOUNT_CLEANUP.to_string()),
            namespace: Some(GARDEN_NAMESPACE.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Defines the cluster role allowing the cleanup job to remove stale terminal service accounts.
pub fn cleanup_cluster_role(owner_references: Vec<OwnerReference>) -> ClusterRole {
    ClusterRole {
        metadata: ObjectMeta {
            name: Some(CLUSTER_ROLE_CLEANUP.to_string()),
            owner_references: Some(owner_references),
            ..Default::default()
        },
        rules: Some(vec![PolicyRule {
            api_groups: Some(vec!["".to_string()]),
            resources: Some(vec!["serviceaccounts".to_string()]),
            verbs: vec!["list", "delete"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

/// Binds the cleanup cluster role to the cleanup service account.
pub fn cleanup_cluster_role_binding(owner_references: Vec<OwnerReference>) -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: ObjectMeta {
            name: Some(CLUSTER_ROLE_BINDING_CLEANUP.to_string()),
            owner_references: Some(owner_references),
            ..Default::default()
        },
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "ClusterRole".to_string(),
            name: CLUSTER_ROLE_CLEANUP.to_string(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: SERVICE_ACCOUNT_CLEANUP.to_string(),
            namespace: Some(GARDEN_NAMESPACE.to_string()),
            ..Default::default()
        }]),
    }
}

/// Defines the scheduled job that deletes terminal session objects whose heartbeat went stale.
/// Overlapping runs are forbidden and the pod runs with a restricted security profile.
pub fn cleanup_cron_job(
    image: &str,
    schedule: &str,
    no_heartbeat_delete_seconds: u64,
    owner_references: Vec<OwnerReference>,
) -> CronJob {
    CronJob {
        metadata: ObjectMeta {
            name: Some(CRONJOB_CLEANUP.to_string()),
            namespace: Some(GARDEN_NAMESPACE.to_string()),
            owner_references: Some(owner_references),
            ..Default::default()
        },
        spec: Some(CronJobSpec {
            concurrency_policy: Some("Forbid".to_string()),
            schedule: schedule.to_string(),
            job_template: JobTemplateSpec {
                spec: Some(JobSpec {
                    template: PodTemplateSpec {
                        spec: Some(PodSpec {
                            containers: vec![Container {
                                name: TERMINAL_CLEANUP.to_string(),
                                image: Some(image.to_string()),
                                image_pull_policy: Some("IfNotPresent".to_string()),
                                env: Some(vec![EnvVar {
                                    name: ENV_NO_HEARTBEAT_DELETE_SECONDS.to_string(),
                                    value: Some(no_heartbeat_delete_seconds.to_string()),
                                    value_from: None,
                                }]),
                                security_context: Some(SecurityContext {
                                    read_only_root_filesystem: Some(true),
                                    ..Default::default()
                                }),
                                ..Default::default()
                            }],
                            security_context: Some(PodSecurityContext {
                                run_as_user: Some(1000),
                                run_as_non_root: Some(true),
                                ..Default::default()
                            }),
                            restart_policy: Some("OnFailure".to_string()),
                            service_account_name: Some(SERVICE_ACCOUNT_CLEANUP.to_string()),
                            ..Default::default()
                        }),
                        metadata: None,
                    },
                    ..Default::default()
                }),
                metadata: None,
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn binding_wires_role_to_service_account() {
        let binding = cleanup_cluster_role_binding(Vec::new());
        assert_eq!(binding.role_ref.name, CLUSTER_ROLE_CLEANUP);
        assert_eq!(binding.role_ref.kind, "ClusterRole");
        let subjects = binding.subjects.unwrap();
        assert_eq!(subjects[0].kind, "ServiceAccount");
        assert_eq!(subjects[0].name, SERVICE_ACCOUNT_CLEANUP);
        assert_eq!(subjects[0].namespace.as_deref(), Some(GARDEN_NAMESPACE));
    }

    #[test]
    fn cleanup_role_lists_and_deletes_service_accounts() {
        let role = cleanup_cluster_role(Vec::new());
        let rules = role.rules.unwrap();
        assert_eq!(rules[0].resources, Some(vec!["serviceaccounts".to_string()]));
        assert_eq!(rules[0].verbs, vec!["list", "delete"]);
    }

    #[test]
    fn cron_job_is_restricted_and_forbids_overlap() {
        let cron_job = cleanup_cron_job("registry.example/cleanup:v1", "*/5 * * * *", 300, Vec::new());
        let spec = cron_job.spec.unwrap();
        assert_eq!(spec.concurrency_policy.as_deref(), Some("Forbid"));
        assert_eq!(spec.schedule, "*/5 * * * *");
        let pod_spec = spec.job_template.spec.unwrap().template.spec.unwrap();
        assert_eq!(pod_spec.restart_policy.as_deref(), Some("OnFailure"));
        assert_eq!(
            pod_spec.service_account_name.as_deref(),
            Some(SERVICE_ACCOUNT_CLEANUP)
        );
        let pod_security = pod_spec.security_context.as_ref().unwrap();
        assert_eq!(pod_security.run_as_user, Some(1000));
        assert_eq!(pod_security.run_as_non_root, Some(true));
        let container = &pod_spec.containers[0];
        assert_eq!(container.image_pull_policy.as_deref(), Some("IfNotPresent"));
        assert_eq!(
            container.security_context.as_ref().unwrap().read_only_root_filesystem,
            Some(true)
        );
        let env = container.env.as_ref().unwrap();
        assert_eq!(env[0].name, ENV_NO_HEARTBEAT_DELETE_SECONDS);
        assert_eq!(env[0].value.as_deref(), Some("300"));
    }
}
