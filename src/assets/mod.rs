//! Cluster asset catalog
//!
//! The closed set of assets needed to bootstrap a cluster. Each variant of
//! [`ClusterAsset`] wraps one concrete asset, and [`AssetKind`] is the
//! descriptor the resolver memoizes on. Typed access to resolved
//! dependencies goes through the accessors on `Parents<ClusterAsset>`.

pub mod bootstrap;
pub mod ignition;
pub mod install_config;
pub mod kubeconfig;
pub mod manifests;

use std::fmt;
use std::str::FromStr;

use crate::domain::ports::{Asset, AssetCatalog, GenerationError, WritableAsset};
use crate::domain::services::Parents;
use crate::domain::value_objects::SessionContext;

pub use bootstrap::{BootstrapIgnition, TemplateData, BOOTSTRAP_IGN_FILENAME, DEFAULT_RELEASE_IMAGE};
pub use ignition::IgnitionConfig;
pub use install_config::{InstallConfigAsset, INSTALL_CONFIG_FILENAME, INSTALL_CONFIG_VERSION};
pub use kubeconfig::{Kubeconfig, KubeconfigRole};
pub use manifests::Manifests;

/// Identity of a cluster asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    InstallConfig,
    AdminKubeconfig,
    KubeletKubeconfig,
    Manifests,
    BootstrapIgnition,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::InstallConfig,
        AssetKind::AdminKubeconfig,
        AssetKind::KubeletKubeconfig,
        AssetKind::Manifests,
        AssetKind::BootstrapIgnition,
    ];

    /// Declared dependencies, in resolution order
    pub fn dependencies(self) -> Vec<AssetKind> {
        match self {
            AssetKind::InstallConfig => vec![],
            AssetKind::AdminKubeconfig
            | AssetKind::KubeletKubeconfig
            | AssetKind::Manifests => vec![AssetKind::InstallConfig],
            AssetKind::BootstrapIgnition => vec![
                AssetKind::InstallConfig,
                AssetKind::KubeletKubeconfig,
                AssetKind::AdminKubeconfig,
                AssetKind::Manifests,
            ],
        }
    }

    /// Name used on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::InstallConfig => "install-config",
            AssetKind::AdminKubeconfig => "admin-kubeconfig",
            AssetKind::KubeletKubeconfig => "kubelet-kubeconfig",
            AssetKind::Manifests => "manifests",
            AssetKind::BootstrapIgnition => "bootstrap-ignition",
        }
    }

    /// Human-readable name used in diagnostics
    pub fn display_name(self) -> &'static str {
        match self {
            AssetKind::InstallConfig => "Install Config",
            AssetKind::AdminKubeconfig => "Admin Kubeconfig",
            AssetKind::KubeletKubeconfig => "Kubelet Kubeconfig",
            AssetKind::Manifests => "Common Manifests",
            AssetKind::BootstrapIgnition => "Bootstrap Ignition Config",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = AssetKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown asset '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[derive(Debug)]
pub enum ClusterAsset {
    InstallConfig(InstallConfigAsset),
    AdminKubeconfig(Kubeconfig),
    KubeletKubeconfig(Kubeconfig),
    Manifests(Manifests),
    BootstrapIgnition(BootstrapIgnition),
}

impl ClusterAsset {
    /// A fresh, unresolved instance
    pub fn new(kind: AssetKind) -> Self {
        match kind {
            AssetKind::InstallConfig => ClusterAsset::InstallConfig(InstallConfigAsset::new()),
            AssetKind::AdminKubeconfig => {
                ClusterAsset::AdminKubeconfig(Kubeconfig::new(KubeconfigRole::Admin))
            }
            AssetKind::KubeletKubeconfig => {
                ClusterAsset::KubeletKubeconfig(Kubeconfig::new(KubeconfigRole::Kubelet))
            }
            AssetKind::Manifests => ClusterAsset::Manifests(Manifests::new()),
            AssetKind::BootstrapIgnition => ClusterAsset::BootstrapIgnition(BootstrapIgnition::new()),
        }
    }

    fn writable(&self) -> &dyn WritableAsset {
        match self {
            ClusterAsset::InstallConfig(asset) => asset,
            ClusterAsset::AdminKubeconfig(asset) | ClusterAsset::KubeletKubeconfig(asset) => asset,
            ClusterAsset::Manifests(asset) => asset,
            ClusterAsset::BootstrapIgnition(asset) => asset,
        }
    }

    fn writable_mut(&mut self) -> &mut dyn WritableAsset {
        match self {
            ClusterAsset::InstallConfig(asset) => asset,
            ClusterAsset::AdminKubeconfig(asset) | ClusterAsset::KubeletKubeconfig(asset) => asset,
            ClusterAsset::Manifests(asset) => asset,
            ClusterAsset::BootstrapIgnition(asset) => asset,
        }
    }
}

impl Asset for ClusterAsset {
    type Descriptor = AssetKind;

    fn descriptor(&self) -> AssetKind {
        match self {
            ClusterAsset::InstallConfig(_) => AssetKind::InstallConfig,
            ClusterAsset::AdminKubeconfig(_) => AssetKind::AdminKubeconfig,
            ClusterAsset::KubeletKubeconfig(_) => AssetKind::KubeletKubeconfig,
            ClusterAsset::Manifests(_) => AssetKind::Manifests,
            ClusterAsset::BootstrapIgnition(_) => AssetKind::BootstrapIgnition,
        }
    }

    fn name(&self) -> &str {
        self.descriptor().display_name()
    }

    fn dependencies(&self) -> Vec<AssetKind> {
        self.descriptor().dependencies()
    }

    fn generate(
        &mut self,
        parents: &Parents<Self>,
        context: &SessionContext,
    ) -> Result<(), GenerationError> {
        match self {
            ClusterAsset::InstallConfig(asset) => asset.generate(context),
            ClusterAsset::AdminKubeconfig(asset) | ClusterAsset::KubeletKubeconfig(asset) => {
                asset.generate(parents.install_config()?.config()?)
            }
            ClusterAsset::Manifests(asset) => asset.generate(parents.install_config()?.config()?),
            ClusterAsset::BootstrapIgnition(asset) => asset.generate(parents, context),
        }
    }

    fn as_writable(&self) -> Option<&dyn WritableAsset> {
        Some(self.writable())
    }

    fn as_writable_mut(&mut self) -> Option<&mut dyn WritableAsset> {
        Some(self.writable_mut())
    }
}

/// Instantiates cluster assets for the resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterCatalog;

impl AssetCatalog<ClusterAsset> for ClusterCatalog {
    fn instantiate(&self, kind: AssetKind) -> ClusterAsset {
        ClusterAsset::new(kind)
    }
}

fn unexpected_variant(kind: AssetKind) -> GenerationError {
    GenerationError::InvalidInput(format!("resolved instance for '{kind}' has the wrong type"))
}

impl Parents<ClusterAsset> {
    pub fn install_config(&self) -> Result<&InstallConfigAsset, GenerationError> {
        match self.get(AssetKind::InstallConfig)? {
            ClusterAsset::InstallConfig(asset) => Ok(asset),
            _ => Err(unexpected_variant(AssetKind::InstallConfig)),
        }
    }

    pub fn admin_kubeconfig(&self) -> Result<&Kubeconfig, GenerationError> {
        match self.get(AssetKind::AdminKubeconfig)? {
            ClusterAsset::AdminKubeconfig(asset) => Ok(asset),
            _ => Err(unexpected_variant(AssetKind::AdminKubeconfig)),
        }
    }

    pub fn kubelet_kubeconfig(&self) -> Result<&Kubeconfig, GenerationError> {
        match self.get(AssetKind::KubeletKubeconfig)? {
            ClusterAsset::KubeletKubeconfig(asset) => Ok(asset),
            _ => Err(unexpected_variant(AssetKind::KubeletKubeconfig)),
        }
    }

    pub fn manifests(&self) -> Result<&Manifests, GenerationError> {
        match self.get(AssetKind::Manifests)? {
            ClusterAsset::Manifests(asset) => Ok(asset),
            _ => Err(unexpected_variant(AssetKind::Manifests)),
        }
    }
}
