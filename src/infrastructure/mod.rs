//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Fetchers for persisted state and the directory materializer

pub mod fs;

pub use fs::{DirectoryFetcher, DirectoryMaterializer, MemoryFetcher};
