//! Kubeconfig assets for the admin user and the bootstrap kubelet

use serde::Serialize;

use crate::domain::entities::File;
use crate::domain::ports::{GenerationError, WritableAsset};
use crate::domain::value_objects::InstallConfig;

/// Who the kubeconfig authenticates as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KubeconfigRole {
    Admin,
    Kubelet,
}

impl KubeconfigRole {
    pub fn filename(self) -> &'static str {
        match self {
            KubeconfigRole::Admin => "auth/kubeconfig",
            KubeconfigRole::Kubelet => "auth/kubeconfig-kubelet",
        }
    }

    pub fn user(self) -> &'static str {
        match self {
            KubeconfigRole::Admin => "admin",
            KubeconfigRole::Kubelet => "kubelet",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct KubeconfigDocument {
    api_version: &'static str,
    kind: &'static str,
    clusters: Vec<Named<ClusterEntry>>,
    users: Vec<Named<UserEntry>>,
    contexts: Vec<Named<ContextEntry>>,
    current_context: String,
    preferences: Preferences,
}

#[derive(Serialize)]
struct Named<T> {
    name: String,
    #[serde(flatten)]
    entry: T,
}

#[derive(Serialize)]
struct ClusterEntry {
    cluster: Server,
}

#[derive(Serialize)]
struct Server {
    server: String,
}

#[derive(Serialize)]
struct UserEntry {
    user: Preferences,
}

#[derive(Serialize)]
struct ContextEntry {
    context: ContextRef,
}

#[derive(Serialize)]
struct ContextRef {
    cluster: String,
    user: String,
}

#[derive(Serialize)]
struct Preferences {}

#[derive(Debug)]
pub struct Kubeconfig {
    role: KubeconfigRole,
    files: Vec<File>,
}

impl Kubeconfig {
    pub fn new(role: KubeconfigRole) -> Self {
        Self {
            role,
            files: Vec::new(),
        }
    }

    /// The generated kubeconfig file
    pub fn file(&self) -> Result<&File, GenerationError> {
        self.files.first().ok_or_else(|| {
            GenerationError::InvalidInput(format!("{} was not generated", self.role.filename()))
        })
    }

    pub(crate) fn generate(&mut self, install: &InstallConfig) -> Result<(), GenerationError> {
        let user = self.role.user();
        let document = KubeconfigDocument {
            api_version: "v1",
            kind: "Config",
            clusters: vec![Named {
                name: install.name.clone(),
                entry: ClusterEntry {
                    cluster: Server {
                        server: api_url(install),
                    },
                },
            }],
            users: vec![Named {
                name: user.to_string(),
                entry: UserEntry {
                    user: Preferences {},
                },
            }],
            contexts: vec![Named {
                name: user.to_string(),
                entry: ContextEntry {
                    context: ContextRef {
                        cluster: install.name.clone(),
                        user: user.to_string(),
                    },
                },
            }],
            current_context: user.to_string(),
            preferences: Preferences {},
        };

        let yaml = serde_yaml_ng::to_string(&document)
            .map_err(|e| GenerationError::Serialize(e.to_string()))?;
        self.files = vec![File::new(self.role.filename(), 0o600, yaml)];
        Ok(())
    }
}

impl WritableAsset for Kubeconfig {
    fn files(&self) -> &[File] {
        &self.files
    }
}

/// API endpoint of the cluster
pub fn api_url(install: &InstallConfig) -> String {
    format!("https://{}-api.{}:6443", install.name, install.base_domain)
}
