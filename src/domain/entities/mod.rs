//! Domain Entities
//!
//! - `File` - A materializable artifact produced by an asset
//! - `AssetNode` - A vertex of the asset graph with its resolution state

mod file;
mod node;

pub use file::{File, DEFAULT_MODE};
pub use node::{AssetNode, NodeState, Origin};
