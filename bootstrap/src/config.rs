use log::{debug, error};
use serde::Deserialize;
use std::collections::BTreeMap;

const DEFAULT_CLEANUP_SCHEDULE: &str = "*/5 * * * *";

/// Configuration for the terminal bootstrap subsystem. Resolved once by the host process and
/// passed by reference to every component requiring it; [`TerminalBootstrapConfig::admission`]
/// validates it once at startup.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TerminalBootstrapConfig {
    /// Whether terminal resources are bootstrapped at all.
    pub enabled: bool,
    /// Annotations placed on the API server ingresses, matching the operator's ingress
    /// controller. Required when enabled.
    pub apiserver_ingress_annotations: BTreeMap<String, String>,
    /// Container image reference for the cleanup cron job. Required when enabled.
    pub cleanup_image: Option<String>,
    /// Cron expression for the cleanup job.
    pub cleanup_schedule: String,
    /// Terminal session objects whose heartbeat is older than this are deleted by the cleanup job.
    pub no_heartbeat_delete_seconds: u64,
    /// Number of queue workers draining bootstrap tasks. Widths above 1 give up ordering across
    /// seeds; intra-seed calls stay ordered either way.
    pub queue_width: usize,
    /// Upper bound on the blocking wait for a seed's credentials.
    pub credential_wait_timeout_seconds: u64,
}

impl Default for TerminalBootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            apiserver_ingress_annotations: BTreeMap::new(),
            cleanup_image: None,
            cleanup_schedule: DEFAULT_CLEANUP_SCHEDULE.to_string(),
            no_heartbeat_delete_seconds: 300,
            queue_width: 1,
            credential_wait_timeout_seconds: 600,
        }
    }
}

/// The subsystem-wide admission state, computed once from configuration at startup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Admission {
    Enabled,
    /// Bootstrapping is switched off; submissions are silently skipped.
    Disabled,
    /// Bootstrapping is enabled but required configuration was absent at process start. The named
    /// keys are missing; submissions are skipped until the process restarts with them set.
    MissingConfiguration(Vec<&'static str>),
}

impl TerminalBootstrapConfig {
    pub fn admission(&self) -> Admission {
        if !self.enabled {
            debug!("terminal bootstrap disabled by config");
            return Admission::Disabled;
        }

        let mut missing = Vec::new();
        if self.apiserver_ingress_annotations.is_empty() {
            error!("no apiserverIngressAnnotations config found");
            missing.push("apiserverIngressAnnotations");
        }
        if self.cleanup_image.as_deref().map_or(true, str::is_empty) {
            error!("no cleanupImage config found");
            missing.push("cleanupImage");
        }

        if missing.is_empty() {
            Admission::Enabled
        } else {
            Admission::MissingConfiguration(missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;

    fn complete() -> TerminalBootstrapConfig {
        TerminalBootstrapConfig {
            enabled: true,
            apiserver_ingress_annotations: btreemap! {
                "kubernetes.io/ingress.class".to_string() => "nginx".to_string(),
            },
            cleanup_image: Some("registry.example/cleanup:v1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_disabled_with_sane_cleanup_settings() {
        let config: TerminalBootstrapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TerminalBootstrapConfig::default());
        assert!(!config.enabled);
        assert_eq!(config.cleanup_schedule, "*/5 * * * *");
        assert_eq!(config.no_heartbeat_delete_seconds, 300);
        assert_eq!(config.queue_width, 1);
    }

    #[test]
    fn complete_config_is_admitted() {
        assert_eq!(complete().admission(), Admission::Enabled);
    }

    #[test]
    fn disabled_wins_over_missing_keys() {
        let config = TerminalBootstrapConfig::default();
        assert_eq!(config.admission(), Admission::Disabled);
    }

    #[test]
    fn missing_keys_are_reported() {
        let mut config = complete();
        config.cleanup_image = None;
        config.apiserver_ingress_annotations.clear();
        assert_eq!(
            config.admission(),
            Admission::MissingConfiguration(vec!["apiserverIngressAnnotations", "cleanupImage"])
        );
    }
}
