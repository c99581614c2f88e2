//! Bootstrap ignition asset
//!
//! Aggregates the install config, both kubeconfigs and the common manifests
//! into the ignition payload of the bootstrap machine.

mod content;

use serde::Deserialize;
use tracing::debug;

use super::ignition::{
    file_from_bytes, file_from_string, files_from_asset, to_file, IgnitionBuilder, IgnitionConfig,
    Unit, IGNITION_VERSION,
};
use super::ClusterAsset;
use crate::domain::entities::File;
use crate::domain::ports::{fetch_optional, FileFetcher, GenerationError, LoadError, WritableAsset};
use crate::domain::services::Parents;
use crate::domain::value_objects::{InstallConfig, SessionContext};

pub const BOOTSTRAP_IGN_FILENAME: &str = "bootstrap.ign";

/// Release payload used when the session carries no override
pub const DEFAULT_RELEASE_IMAGE: &str = "registry.svc.ci.openshift.org/openshift/origin-release:v4.0";

/// Directory on the bootstrap machine that receives the generated assets
const ROOT_DIR: &str = "/opt/kindling";

const BOOTKUBE_IMAGE: &str = "quay.io/coreos/bootkube:v0.14.0";
const ETCD_CERT_SIGNER_IMAGE: &str = "quay.io/coreos/kube-etcd-signer-server:678cc8e6841e2121ebfdb6e2db568fce290b67d6";
const ETCDCTL_IMAGE: &str = "quay.io/coreos/etcd:v3.2.14";

/// Values substituted into the bootstrap scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateData {
    pub bootkube_image: String,
    pub cluster_dns_ip: String,
    pub etcd_cert_signer_image: String,
    /// Comma separated client URLs of every etcd member
    pub etcd_cluster: String,
    pub etcdctl_image: String,
    pub release_image: String,
}

impl TemplateData {
    pub fn new(install: &InstallConfig, context: &SessionContext) -> Result<Self, GenerationError> {
        let cluster_dns_ip = install
            .cluster_dns_ip()
            .map_err(|e| GenerationError::InvalidInput(e.to_string()))?;

        Ok(Self {
            bootkube_image: BOOTKUBE_IMAGE.to_string(),
            cluster_dns_ip: cluster_dns_ip.to_string(),
            etcd_cert_signer_image: ETCD_CERT_SIGNER_IMAGE.to_string(),
            etcd_cluster: etcd_endpoints(install).join(","),
            etcdctl_image: ETCDCTL_IMAGE.to_string(),
            release_image: context
                .release_image_override()
                .unwrap_or(DEFAULT_RELEASE_IMAGE)
                .to_string(),
        })
    }
}

/// Client URL of each etcd member, one per primary replica
pub fn etcd_endpoints(install: &InstallConfig) -> Vec<String> {
    (0..install.primary_replicas())
        .map(|i| format!("https://{}-etcd-{}.{}:2379", install.name, i, install.base_domain))
        .collect()
}

#[derive(Deserialize)]
struct VersionProbe {
    ignition: ProbeIgnition,
}

#[derive(Deserialize)]
struct ProbeIgnition {
    version: String,
}

#[derive(Debug, Default)]
pub struct BootstrapIgnition {
    config: Option<IgnitionConfig>,
    files: Vec<File>,
}

impl BootstrapIgnition {
    pub fn new() -> Self {
        Self::default()
    }

    /// The assembled payload
    pub fn config(&self) -> Option<&IgnitionConfig> {
        self.config.as_ref()
    }

    pub(crate) fn generate(
        &mut self,
        parents: &Parents<ClusterAsset>,
        context: &SessionContext,
    ) -> Result<(), GenerationError> {
        let install = parents.install_config()?.config()?;
        let kubelet = parents.kubelet_kubeconfig()?;
        let admin = parents.admin_kubeconfig()?;
        let manifests = parents.manifests()?;

        let data = TemplateData::new(install, context)?;
        debug!(
            release_image = %data.release_image,
            etcd_cluster = %data.etcd_cluster,
            "Rendering bootstrap payload"
        );

        let mut builder = IgnitionBuilder::new();
        builder
            .file(file_from_bytes(
                "/etc/kubernetes/kubeconfig",
                0o600,
                kubelet.file()?.content(),
            ))
            .file(file_from_string(
                "/usr/local/bin/report-progress.sh",
                0o555,
                content::REPORT_PROGRESS_SH,
            ))
            .file(file_from_string(
                "/usr/local/bin/bootkube.sh",
                0o555,
                &content::bootkube_script(&data),
            ))
            .file(file_from_string(
                format!("{ROOT_DIR}/kube-dns-operator-bootstrap/kube-dns-svc.yaml"),
                0o644,
                &content::kube_dns_service(&data),
            ))
            .files(files_from_asset(ROOT_DIR, 0o600, admin))
            .files(files_from_asset(ROOT_DIR, 0o644, manifests))
            .unit(Unit::new("bootkube.service", content::BOOTKUBE_UNIT))
            .unit(Unit::new("progress.service", content::PROGRESS_UNIT).enabled())
            .unit(Unit::new("kubelet.service", content::KUBELET_UNIT).enabled())
            .user("core", install.admin.ssh_key.iter().cloned().collect());

        if context.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let config = builder.build();
        let file = to_file(&config, BOOTSTRAP_IGN_FILENAME, 0o600)
            .map_err(|e| GenerationError::Serialize(e.to_string()))?;

        self.files = vec![file];
        self.config = Some(config);
        Ok(())
    }
}

impl WritableAsset for BootstrapIgnition {
    fn files(&self) -> &[File] {
        &self.files
    }

    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool, LoadError> {
        let Some(file) = fetch_optional(fetcher, BOOTSTRAP_IGN_FILENAME)? else {
            return Ok(false);
        };

        let parse_error = |e: serde_json::Error| LoadError::Parse {
            name: BOOTSTRAP_IGN_FILENAME.to_string(),
            message: e.to_string(),
        };

        let probe: VersionProbe = serde_json::from_slice(file.content()).map_err(parse_error)?;
        if probe.ignition.version != IGNITION_VERSION {
            return Err(LoadError::VersionMismatch {
                name: BOOTSTRAP_IGN_FILENAME.to_string(),
                found: probe.ignition.version,
                expected: IGNITION_VERSION.to_string(),
            });
        }

        let config: IgnitionConfig = serde_json::from_slice(file.content()).map_err(parse_error)?;
        self.config = Some(config);
        self.files = vec![file];
        Ok(true)
    }
}
