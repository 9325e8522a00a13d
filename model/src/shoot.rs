use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The workload record backing a seed cluster. An ordinary seed is itself run as a shoot on a
/// soil; its shoot record names the hosting soil and, once the control plane has been rolled out,
/// carries the technical namespace on that soil in its status.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "garden.sapcloud.io",
    kind = "Shoot",
    namespaced,
    plural = "shoots",
    singular = "shoot",
    status = "ShootStatus",
    version = "v1beta1"
)]
#[serde(rename_all = "camelCase")]
pub struct ShootSpec {
    pub cloud: ShootCloud,
}

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShootCloud {
    /// Name of the seed this shoot's control plane is scheduled onto.
    pub seed: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
pub struct ShootStatus {
    /// The namespace on the hosting seed holding this shoot's control-plane components.
    #[serde(rename = "technicalID")]
    pub technical_id: Option<String>,
}

impl Shoot {
    pub fn soil_name(&self) -> Option<&str> {
        self.spec.cloud.seed.as_deref()
    }

    pub fn technical_namespace(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|status| status.technical_id.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn technical_id_uses_the_wire_name() {
        let status: ShootStatus =
            serde_json::from_value(serde_json::json!({ "technicalID": "shoot--garden--aws-eu1" }))
                .unwrap();
        assert_eq!(status.technical_id.as_deref(), Some("shoot--garden--aws-eu1"));
    }

    #[test]
    fn accessors_read_spec_and_status() {
        let mut shoot = Shoot::new(
            "aws-eu1",
            ShootSpec {
                cloud: ShootCloud {
                    seed: Some("soil-aws".to_string()),
                },
            },
        );
        assert_eq!(shoot.soil_name(), Some("soil-aws"));
        assert_eq!(shoot.technical_namespace(), None);
        shoot.status = Some(ShootStatus {
            technical_id: Some("shoot--garden--aws-eu1".to_string()),
        });
        assert_eq!(shoot.technical_namespace(), Some("shoot--garden--aws-eu1"));
    }
}
