//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    Admin, InstallConfig, MachinePool, Networking, Platform, SessionContext,
};
use crate::error::KindlingResult;

use super::loader::{self, ConfigWarning};

/// Cluster parameters the install config is generated from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub base_domain: String,

    #[serde(default)]
    pub cluster_id: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub ssh_key: Option<String>,

    #[serde(default)]
    pub pull_secret: String,

    #[serde(default)]
    pub service_cidr: Option<String>,

    #[serde(default)]
    pub network_type: Option<String>,

    #[serde(default)]
    pub pools: Vec<PoolConfig>,

    #[serde(default)]
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub name: String,

    #[serde(default)]
    pub replicas: Option<u32>,
}

/// Release payload selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Overrides the built-in release image
    #[serde(default)]
    pub image: Option<String>,
}

/// Where and how generated assets are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Write every resolved asset, not only the requested one
    #[serde(default)]
    pub include_subtree: bool,

    /// Resolve independent assets concurrently
    #[serde(default)]
    pub parallel: bool,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            include_subtree: false,
            parallel: false,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> KindlingResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> KindlingResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: Option<&Path>) -> KindlingResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (KINDLING_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Install configuration described by `[cluster]`, if any
    pub fn install_config(&self) -> Option<InstallConfig> {
        let cluster = &self.cluster;
        if cluster.name.is_empty() && cluster.base_domain.is_empty() {
            return None;
        }

        let mut networking = Networking::default();
        if let Some(cidr) = &cluster.service_cidr {
            networking.service_cidr = cidr.clone();
        }
        if let Some(network_type) = &cluster.network_type {
            networking.network_type = network_type.clone();
        }

        Some(InstallConfig {
            name: cluster.name.clone(),
            cluster_id: cluster.cluster_id.clone(),
            base_domain: cluster.base_domain.clone(),
            admin: Admin {
                email: cluster.email.clone(),
                ssh_key: cluster.ssh_key.clone(),
            },
            networking,
            machines: cluster
                .pools
                .iter()
                .map(|pool| MachinePool::new(pool.name.clone(), pool.replicas))
                .collect(),
            platform: cluster.platform.clone(),
            pull_secret: cluster.pull_secret.clone(),
        })
    }

    /// Session parameters handed to the resolver
    pub fn to_context(&self) -> SessionContext {
        let mut context = SessionContext::new();
        if let Some(cluster) = self.install_config() {
            context = context.with_cluster(cluster);
        }
        if let Some(image) = &self.release.image {
            context = context.with_release_image_override(image.clone());
        }
        context
    }
}
