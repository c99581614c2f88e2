//! Ignition payload model and helpers
//!
//! Machine-provisioning payloads are built with [`IgnitionBuilder`], an
//! append-only builder local to one `generate` call, and returned as an
//! immutable [`IgnitionConfig`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::domain::entities::File;
use crate::domain::ports::WritableAsset;

/// Ignition spec version written into (and required from) every payload
pub const IGNITION_VERSION: &str = "2.2.0";

const DATA_URL_PREFIX: &str = "data:text/plain;charset=utf-8;base64,";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnitionConfig {
    pub ignition: Ignition,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub systemd: Systemd,
    #[serde(default)]
    pub passwd: Passwd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ignition {
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<IgnitionFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnitionFile {
    pub filesystem: String,
    pub path: String,
    pub contents: FileContents,
    pub mode: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContents {
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Systemd {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub contents: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passwd {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<PasswdUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswdUser {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_authorized_keys: Vec<String>,
}

impl IgnitionFile {
    /// Decode the embedded data URL
    pub fn decoded_contents(&self) -> Option<Vec<u8>> {
        let encoded = self.contents.source.strip_prefix(DATA_URL_PREFIX)?;
        STANDARD.decode(encoded).ok()
    }
}

impl Unit {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
            enabled: None,
        }
    }

    pub fn enabled(mut self) -> Self {
        self.enabled = Some(true);
        self
    }
}

impl IgnitionConfig {
    pub fn file(&self, path: &str) -> Option<&IgnitionFile> {
        self.storage.files.iter().find(|f| f.path == path)
    }

    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.systemd.units.iter().find(|u| u.name == name)
    }
}

/// Embed raw bytes as an ignition file on the root filesystem
pub fn file_from_bytes(path: impl Into<String>, mode: u32, data: &[u8]) -> IgnitionFile {
    IgnitionFile {
        filesystem: "root".to_string(),
        path: path.into(),
        contents: FileContents {
            source: format!("{DATA_URL_PREFIX}{}", STANDARD.encode(data)),
        },
        mode,
    }
}

pub fn file_from_string(path: impl Into<String>, mode: u32, data: &str) -> IgnitionFile {
    file_from_bytes(path, mode, data.as_bytes())
}

/// Embed every file of `asset` under `root_dir`
pub fn files_from_asset(root_dir: &str, mode: u32, asset: &dyn WritableAsset) -> Vec<IgnitionFile> {
    asset
        .files()
        .iter()
        .map(|file| file_from_bytes(join(root_dir, file.path()), mode, file.content()))
        .collect()
}

fn join(root_dir: &str, path: &str) -> String {
    format!("{}/{}", root_dir.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Append-only builder for one payload
#[derive(Debug, Default)]
pub struct IgnitionBuilder {
    files: Vec<IgnitionFile>,
    units: Vec<Unit>,
    users: Vec<PasswdUser>,
}

impl IgnitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&mut self, file: IgnitionFile) -> &mut Self {
        self.files.push(file);
        self
    }

    pub fn files(&mut self, files: impl IntoIterator<Item = IgnitionFile>) -> &mut Self {
        self.files.extend(files);
        self
    }

    pub fn unit(&mut self, unit: Unit) -> &mut Self {
        self.units.push(unit);
        self
    }

    pub fn user(&mut self, name: impl Into<String>, ssh_keys: Vec<String>) -> &mut Self {
        self.users.push(PasswdUser {
            name: name.into(),
            ssh_authorized_keys: ssh_keys,
        });
        self
    }

    pub fn build(self) -> IgnitionConfig {
        IgnitionConfig {
            ignition: Ignition {
                version: IGNITION_VERSION.to_string(),
            },
            storage: Storage { files: self.files },
            systemd: Systemd { units: self.units },
            passwd: Passwd { users: self.users },
        }
    }
}

/// Encode a payload as the file that carries it
pub fn to_file(config: &IgnitionConfig, path: &str, mode: u32) -> Result<File, serde_json::Error> {
    let data = serde_json::to_vec(config)?;
    Ok(File::new(path, mode, data))
}
