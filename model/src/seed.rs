use crate::constants::{ANNOTATION_BOOTSTRAP_DISABLED, LABEL_ROLE, ROLE_SOIL};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A cluster managed by the garden control plane. The `CustomResource` derive also produces a
/// struct named `Seed` which represents a seed CRD object in the k8s API. Seeds are created and
/// updated by the control plane; this library treats them as read-only.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "garden.sapcloud.io",
    kind = "Seed",
    plural = "seeds",
    singular = "seed",
    version = "v1beta1"
)]
#[serde(rename_all = "camelCase")]
pub struct SeedSpec {
    /// Reference to the secret holding this seed cluster's kubeconfig.
    pub secret_ref: SeedSecretRef,
    /// The DNS domain under which ingress resources on this seed are exposed.
    pub ingress_domain: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedSecretRef {
    pub name: String,
    pub namespace: String,
}

impl Seed {
    /// A soil is a seed that was bootstrapped directly and hosts other seeds' control planes.
    pub fn is_soil(&self) -> bool {
        self.metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(LABEL_ROLE))
            .map(|role| role == ROLE_SOIL)
            .unwrap_or(false)
    }

    /// Whether this seed opted out of terminal bootstrapping via annotation.
    pub fn bootstrap_disabled(&self) -> bool {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(ANNOTATION_BOOTSTRAP_DISABLED))
            .map(|value| value == "true")
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;

    fn seed() -> Seed {
        Seed::new(
            "aws-eu1",
            SeedSpec {
                secret_ref: SeedSecretRef {
                    name: "seed-aws-eu1".to_string(),
                    namespace: "garden".to_string(),
                },
                ingress_domain: "ingress.aws-eu1.example.com".to_string(),
            },
        )
    }

    #[test]
    fn plain_seed_is_not_a_soil() {
        assert!(!seed().is_soil());
    }

    #[test]
    fn role_label_marks_a_soil() {
        let mut soil = seed();
        soil.metadata.labels =
            Some(btreemap! { LABEL_ROLE.to_string() => ROLE_SOIL.to_string() });
        assert!(soil.is_soil());
    }

    #[test]
    fn opt_out_annotation_disables_bootstrap() {
        let mut seed = seed();
        assert!(!seed.bootstrap_disabled());
        seed.metadata.annotations =
            Some(btreemap! { ANNOTATION_BOOTSTRAP_DISABLED.to_string() => "true".to_string() });
        assert!(seed.bootstrap_disabled());
    }
}
