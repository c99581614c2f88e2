//! Domain Layer
//!
//! The asset graph engine - pure resolution logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Core entities (File, AssetNode)
//! - `value_objects/` - Immutable inputs (SessionContext, InstallConfig)
//! - `services/` - The resolvers and the resolved-dependency view
//! - `ports/` - Asset contracts and interfaces for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - Persisted state is only reached through `FileFetcher`
//! 2. **Explicit inputs** - Assets see their declared dependencies and the session context, nothing else
//! 3. **Ports & Adapters** - Storage and output go through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
