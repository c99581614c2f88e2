//! File entity - a materializable artifact produced by an asset
//!
//! Files are the unit the materializer persists. Paths are relative to the
//! destination the materializer writes into.

use sha2::{Digest, Sha256};

/// Default permission bits for generated files
pub const DEFAULT_MODE: u32 = 0o644;

/// A generated file ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Destination-relative path, always `/`-separated
    path: String,
    /// Unix permission bits
    mode: u32,
    /// Raw content
    content: Vec<u8>,
}

impl File {
    /// Create a new File
    pub fn new(path: impl Into<String>, mode: u32, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            mode,
            content: content.into(),
        }
    }

    /// Create a File with [`DEFAULT_MODE`]
    pub fn with_default_mode(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::new(path, DEFAULT_MODE, content)
    }

    /// Get the destination-relative path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the permission bits
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Get the raw content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content as UTF-8, if it is valid text
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// SHA-256 digest of the content, `sha256:`-prefixed
    pub fn digest(&self) -> String {
        format!("sha256:{:x}", Sha256::digest(&self.content))
    }

    /// Get content length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
