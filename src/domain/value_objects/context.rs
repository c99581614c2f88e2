//! Session context - every external parameter a resolution session may need
//!
//! Assets never read the process environment. The entry point builds one
//! `SessionContext` and threads it through the whole session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::InstallConfig;

/// Cooperative cancellation flag shared between a session and its caller
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; in-flight nodes observe it at their next check
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Explicit configuration for one resolution session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    cluster: Option<InstallConfig>,
    release_image_override: Option<String>,
    cancellation: CancellationToken,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cluster parameters the install configuration is generated from
    pub fn with_cluster(mut self, cluster: InstallConfig) -> Self {
        self.cluster = Some(cluster);
        self
    }

    /// Replace the default release image (empty values are ignored)
    pub fn with_release_image_override(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.release_image_override = if image.trim().is_empty() {
            None
        } else {
            Some(image)
        };
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cluster(&self) -> Option<&InstallConfig> {
        self.cluster.as_ref()
    }

    pub fn release_image_override(&self) -> Option<&str> {
        self.release_image_override.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
