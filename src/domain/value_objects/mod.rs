//! Domain Value Objects
//!
//! Immutable value types passed into a resolution session.

mod context;
mod install_config;

pub use context::{CancellationToken, SessionContext};
pub use install_config::{
    Admin, InstallConfig, MachinePool, NetworkError, Networking, Platform, PRIMARY_POOL,
};
