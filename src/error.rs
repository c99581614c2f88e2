//! Error types for Kindling
//!
//! Library errors use `thiserror`; the binary wraps them with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::MaterializeError;
use crate::domain::services::ResolveError;

/// Result type alias for Kindling operations
pub type KindlingResult<T> = Result<T, KindlingError>;

/// Main error type for Kindling operations
#[derive(Error, Debug)]
pub enum KindlingError {
    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resolution of the asset graph failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Output could not be written
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}
