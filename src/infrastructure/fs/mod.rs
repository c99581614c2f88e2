//! File System Implementations
//!
//! Concrete implementations of the `FileFetcher` and `Materializer` ports.

mod fetcher;
mod materializer;

use std::path::{Component, Path, PathBuf};

pub use fetcher::{DirectoryFetcher, MemoryFetcher};
pub use materializer::DirectoryMaterializer;

/// Resolve a destination-relative name below `root`
///
/// Returns `None` for empty, absolute or parent-climbing names.
pub(crate) fn confined_path(root: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    let mut normal = 0;
    for component in relative.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (normal > 0).then(|| root.join(relative))
}
