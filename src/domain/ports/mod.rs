//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Concrete assets and infrastructure provide the implementations.

pub mod asset;
pub mod file_fetcher;
pub mod materializer;

pub use asset::{fetch_optional, Asset, AssetCatalog, GenerationError, LoadError, WritableAsset};
pub use file_fetcher::{FetchError, FetchResult, FileFetcher, MissingFetcher};
pub use materializer::{ensure_unique_paths, MaterializeError, MaterializeReport, Materializer};
