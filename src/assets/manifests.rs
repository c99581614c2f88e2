//! Common cluster manifests handed to bootkube

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::entities::File;
use crate::domain::ports::{GenerationError, WritableAsset};
use crate::domain::value_objects::InstallConfig;

pub const MANIFEST_DIR: &str = "manifests";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigMap {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata,
    data: BTreeMap<&'static str, String>,
}

#[derive(Serialize)]
struct Metadata {
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NetworkConfig {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata,
    spec: NetworkSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NetworkSpec {
    service_network: String,
    cluster_networks: Vec<String>,
    default_network: DefaultNetwork,
}

#[derive(Serialize)]
struct DefaultNetwork {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Default)]
pub struct Manifests {
    files: Vec<File>,
}

impl Manifests {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn generate(&mut self, install: &InstallConfig) -> Result<(), GenerationError> {
        let serialize = |e: serde_yaml_ng::Error| GenerationError::Serialize(e.to_string());

        let cluster_config = ConfigMap {
            api_version: "v1",
            kind: "ConfigMap",
            metadata: Metadata {
                name: "cluster-config-v1",
                namespace: Some("kube-system"),
            },
            data: BTreeMap::from([(
                "install-config",
                serde_yaml_ng::to_string(install).map_err(serialize)?,
            )]),
        };

        let network = NetworkConfig {
            api_version: "networkoperator.openshift.io/v1",
            kind: "NetworkConfig",
            metadata: Metadata {
                name: "default",
                namespace: None,
            },
            spec: NetworkSpec {
                service_network: install.networking.service_cidr.clone(),
                cluster_networks: install.networking.cluster_networks.clone(),
                default_network: DefaultNetwork {
                    kind: install.networking.network_type.clone(),
                },
            },
        };

        self.files = vec![
            File::with_default_mode(
                format!("{MANIFEST_DIR}/cluster-config.yaml"),
                serde_yaml_ng::to_string(&cluster_config).map_err(serialize)?,
            ),
            File::with_default_mode(
                format!("{MANIFEST_DIR}/cluster-network-02-config.yml"),
                serde_yaml_ng::to_string(&network).map_err(serialize)?,
            ),
        ];
        Ok(())
    }
}

impl WritableAsset for Manifests {
    fn files(&self) -> &[File] {
        &self.files
    }
}
