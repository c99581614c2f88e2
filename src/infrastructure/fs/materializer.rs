//! Directory materializer
//!
//! Writes a file set below a destination directory. The whole set is
//! validated before the first write; each file is written to a temporary
//! sibling and renamed into place.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::domain::entities::File;
use crate::domain::ports::{ensure_unique_paths, MaterializeError, MaterializeReport, Materializer};

#[derive(Debug, Clone)]
pub struct DirectoryMaterializer {
    root: PathBuf,
}

impl DirectoryMaterializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn target(&self, file: &File) -> Result<PathBuf, MaterializeError> {
        super::confined_path(&self.root, file.path()).ok_or_else(|| MaterializeError::PathEscape {
            path: file.path().to_string(),
            root: self.root.clone(),
        })
    }

    fn write(&self, target: &Path, file: &File) -> Result<(), MaterializeError> {
        let io_error = |source: std::io::Error| MaterializeError::Io {
            path: target.to_path_buf(),
            source,
        };

        let parent = target.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(parent).map_err(io_error)?;

        let mut temp = NamedTempFile::new_in(parent).map_err(io_error)?;
        temp.write_all(file.content()).map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;
        set_mode(temp.path(), file.mode()).map_err(io_error)?;
        temp.persist(target).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

impl Materializer for DirectoryMaterializer {
    fn materialize(&self, files: &[File]) -> Result<MaterializeReport, MaterializeError> {
        ensure_unique_paths(files)?;
        let targets = files
            .iter()
            .map(|file| self.target(file))
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = MaterializeReport::default();
        for (file, target) in files.iter().zip(&targets) {
            self.write(target, file)?;
            debug!(path = %file.path(), mode = %format!("{:o}", file.mode()), "wrote file");
            report.written.push(file.path().to_string());
        }

        info!(files = report.len(), root = %self.root.display(), "materialized assets");
        Ok(report)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
