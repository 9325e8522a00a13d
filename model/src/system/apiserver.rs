use crate::constants::{APISERVER_PORT, TERMINAL_KUBE_APISERVER};
use k8s_openapi::api::core::v1::{
    EndpointAddress, EndpointPort, EndpointSubset, Endpoints, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// Defines the service fronting a cluster's own kube-apiserver. When the API endpoint is a DNS
/// name the service aliases it via `ExternalName`; when it is a literal address the service is
/// left without an external name and a matching `Endpoints` object supplies the address.
pub fn apiserver_service(external_name: Option<&str>) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(TERMINAL_KUBE_APISERVER.to_string()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            ports: Some(vec![ServicePort {
                port: APISERVER_PORT,
                protocol: Some("TCP".to_string()),
                target_port: Some(IntOrString::Int(APISERVER_PORT)),
                ..Default::default()
            }]),
            type_: external_name.map(|_| "ExternalName".to_string()),
            external_name: external_name.map(str::to_string),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Defines the endpoints object pointing the apiserver service at a literal network address.
pub fn apiserver_endpoints(ip: &str) -> Endpoints {
    Endpoints {
        metadata: ObjectMeta {
            name: Some(TERMINAL_KUBE_APISERVER.to_string()),
            ..Default::default()
        },
        subsets: Some(vec![EndpointSubset {
            addresses: Some(vec![EndpointAddress {
                ip: ip.to_string(),
                ..Default::default()
            }]),
            ports: Some(vec![EndpointPort {
                port: APISERVER_PORT,
                protocol: Some("TCP".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }]),
    }
}

/// Defines the ingress exposing a kube-apiserver service at `host` with TLS termination. The
/// annotation set comes from configuration so operators can match their ingress controller.
pub fn apiserver_ingress(
    host: &str,
    service_name: &str,
    annotations: &BTreeMap<String, String>,
) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            name: Some(TERMINAL_KUBE_APISERVER.to_string()),
            annotations: Some(annotations.clone()),
            ..Default::default()
        },
        spec: Some(IngressSpec {
            rules: Some(vec![IngressRule {
                host: Some(host.to_string()),
                http: Some(HTTPIngressRuleValue {
                    paths: vec![HTTPIngressPath {
                        backend: IngressBackend {
                            service: Some(IngressServiceBackend {
                                name: service_name.to_string(),
                                port: Some(ServiceBackendPort {
                                    number: Some(APISERVER_PORT),
                                    ..Default::default()
                                }),
                            }),
                            ..Default::default()
                        },
                        path: Some("/".to_string()),
                        path_type: "Prefix".to_string(),
                    }],
                }),
            }]),
            tls: Some(vec![IngressTLS {
                hosts: Some(vec![host.to_string()]),
                secret_name: Some(format!("{}-tls", TERMINAL_KUBE_APISERVER)),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}
