//! Session Options

use crate::config::OutputConfig;

/// Options for one resolution session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Collect the files of every resolved asset, not only the root's
    pub include_subtree: bool,
    /// Resolve independent assets concurrently
    pub parallel: bool,
    /// Cap on concurrently resolved assets (parallel mode only)
    pub max_threads: Option<usize>,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subtree(mut self, include_subtree: bool) -> Self {
        self.include_subtree = include_subtree;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = Some(max_threads);
        self
    }
}

impl From<&OutputConfig> for SessionOptions {
    fn from(output: &OutputConfig) -> Self {
        Self::new()
            .with_subtree(output.include_subtree)
            .with_parallel(output.parallel)
    }
}
