//! Materializer port - persists the files of a resolved asset tree
//!
//! The engine only guarantees that each asset contributes a stable set of
//! files. Global path uniqueness is enforced here, before anything is written.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::domain::entities::File;

/// Materialization errors
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// Two files in the set share a path
    #[error("duplicate output path '{0}'")]
    DuplicatePath(String),

    /// Path is absolute or climbs out of the destination
    #[error("path '{path}' escapes destination '{root}'")]
    PathEscape { path: String, root: PathBuf },

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a materialization run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub written: Vec<String>,
}

impl MaterializeReport {
    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

/// Persists a file set to a destination medium
pub trait Materializer {
    fn materialize(&self, files: &[File]) -> Result<MaterializeReport, MaterializeError>;
}

/// Reject file sets in which two files share a path
pub fn ensure_unique_paths(files: &[File]) -> Result<(), MaterializeError> {
    let mut seen = BTreeSet::new();
    for file in files {
        if !seen.insert(file.path()) {
            return Err(MaterializeError::DuplicatePath(file.path().to_string()));
        }
    }
    Ok(())
}
