//! Domain Services
//!
//! The asset graph engine. Services are generic over the asset set and
//! perform no I/O of their own: persisted state is reached only through the
//! `FileFetcher` handed to writable assets.

mod parallel;
mod parents;
mod plan;
mod resolver;

pub use parallel::ParallelAssetGraph;
pub use parents::Parents;
pub use resolver::{AssetGraph, ResolveError, ResolvedGraph};
