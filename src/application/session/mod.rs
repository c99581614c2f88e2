//! Session Module
//!
//! Resolves one root asset and hands its files to a materializer.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`SessionOptions`)
//! - `result` - Result types (`SessionOutput`)
//! - `use_case` - Core use case logic (`Session`)
//!
//! ## Usage
//!
//! ```ignore
//! use kindling::application::session::{Session, SessionOptions};
//!
//! let session = Session::new(ClusterCatalog, &context, &fetcher);
//! let (output, report) = session.create(AssetKind::BootstrapIgnition, &materializer)?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::SessionOptions;
pub use result::SessionOutput;
pub use use_case::Session;
