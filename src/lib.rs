//! Kindling - asset dependency-resolution and generation engine
//!
//! Kindling builds deployment-time configuration artifacts (provisioning
//! payloads, credential files, manifests) by resolving a declared dependency
//! graph of assets. Each asset is loaded from persisted output or generated
//! from its resolved dependencies exactly once per session.

pub mod application;
pub mod assets;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{Session, SessionOptions, SessionOutput};
pub use assets::{AssetKind, ClusterAsset, ClusterCatalog};
pub use config::Config;
pub use domain::entities::{File, NodeState, Origin};
pub use domain::ports::{
    Asset, AssetCatalog, FetchError, FileFetcher, GenerationError, LoadError, Materializer,
    WritableAsset,
};
pub use domain::services::{AssetGraph, ParallelAssetGraph, Parents, ResolveError, ResolvedGraph};
pub use domain::value_objects::{CancellationToken, InstallConfig, SessionContext};
pub use error::{KindlingError, KindlingResult};
