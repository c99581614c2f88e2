//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (resolvers, ports)
//! - Does NOT contain resolution rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `Session` - Resolve a root asset, collect its files, materialize them

pub mod session;

pub use session::{Session, SessionOptions, SessionOutput};
