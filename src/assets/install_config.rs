//! Install config asset
//!
//! Generated from the cluster parameters of the session context, or loaded
//! from a previously written `install-config.toml`. The persisted document
//! carries a format version and is rejected if the version differs.

use serde::{Deserialize, Serialize};

use crate::domain::entities::File;
use crate::domain::ports::{fetch_optional, FileFetcher, GenerationError, LoadError, WritableAsset};
use crate::domain::value_objects::{InstallConfig, SessionContext};

pub const INSTALL_CONFIG_FILENAME: &str = "install-config.toml";

/// Format version of the persisted document
pub const INSTALL_CONFIG_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct PersistedInstallConfig {
    version: u32,
    cluster: InstallConfig,
}

/// Reads only the version so that newer documents are rejected cleanly
#[derive(Deserialize)]
struct VersionProbe {
    version: Option<u32>,
}

#[derive(Debug, Default)]
pub struct InstallConfigAsset {
    config: Option<InstallConfig>,
    files: Vec<File>,
}

impl InstallConfigAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved configuration
    pub fn config(&self) -> Result<&InstallConfig, GenerationError> {
        self.config
            .as_ref()
            .ok_or_else(|| GenerationError::InvalidInput("install config was not resolved".into()))
    }

    pub(crate) fn generate(&mut self, context: &SessionContext) -> Result<(), GenerationError> {
        let cluster = context.cluster().cloned().ok_or_else(|| {
            GenerationError::InvalidInput("no cluster parameters in the session context".into())
        })?;
        cluster.validate().map_err(GenerationError::InvalidInput)?;

        let document = toml::to_string_pretty(&PersistedInstallConfig {
            version: INSTALL_CONFIG_VERSION,
            cluster: cluster.clone(),
        })
        .map_err(|e| GenerationError::Serialize(e.to_string()))?;

        self.files = vec![File::new(INSTALL_CONFIG_FILENAME, 0o600, document)];
        self.config = Some(cluster);
        Ok(())
    }
}

impl WritableAsset for InstallConfigAsset {
    fn files(&self) -> &[File] {
        &self.files
    }

    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool, LoadError> {
        let Some(file) = fetch_optional(fetcher, INSTALL_CONFIG_FILENAME)? else {
            return Ok(false);
        };

        let parse_error = |message: String| LoadError::Parse {
            name: INSTALL_CONFIG_FILENAME.to_string(),
            message,
        };
        let text = file
            .content_str()
            .ok_or_else(|| parse_error("not valid UTF-8".to_string()))?;

        let probe: VersionProbe = toml::from_str(text).map_err(|e| parse_error(e.to_string()))?;
        if probe.version != Some(INSTALL_CONFIG_VERSION) {
            return Err(LoadError::VersionMismatch {
                name: INSTALL_CONFIG_FILENAME.to_string(),
                found: probe
                    .version
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                expected: INSTALL_CONFIG_VERSION.to_string(),
            });
        }

        let persisted: PersistedInstallConfig =
            toml::from_str(text).map_err(|e| parse_error(e.to_string()))?;
        persisted.cluster.validate().map_err(parse_error)?;

        self.config = Some(persisted.cluster);
        self.files = vec![file];
        Ok(true)
    }
}
