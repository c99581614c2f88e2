//! Fetchers for previously persisted artifacts

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::entities::{File, DEFAULT_MODE};
use crate::domain::ports::{FetchError, FetchResult, FileFetcher};

/// Reads persisted artifacts from an asset directory
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileFetcher for DirectoryFetcher {
    fn fetch_by_name(&self, name: &str) -> FetchResult<File> {
        let path = super::confined_path(&self.root, name)
            .ok_or_else(|| FetchError::InvalidName(name.to_string()))?;

        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(name.to_string()))
            }
            Err(source) => {
                return Err(FetchError::Io {
                    name: name.to_string(),
                    source,
                })
            }
        };

        Ok(File::new(name, file_mode(&path), content))
    }
}

#[cfg(unix)]
fn file_mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o777)
        .unwrap_or(DEFAULT_MODE)
}

#[cfg(not(unix))]
fn file_mode(_path: &Path) -> u32 {
    DEFAULT_MODE
}

/// In-memory fetcher
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: BTreeMap<String, File>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: File) -> Self {
        self.insert(file);
        self
    }

    pub fn with_files(mut self, files: impl IntoIterator<Item = File>) -> Self {
        for file in files {
            self.insert(file);
        }
        self
    }

    pub fn insert(&mut self, file: File) {
        self.files.insert(file.path().to_string(), file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileFetcher for MemoryFetcher {
    fn fetch_by_name(&self, name: &str) -> FetchResult<File> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(name.to_string()))
    }
}
