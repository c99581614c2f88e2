//! Common test utilities for Kindling contract and property tests.
//!
//! This module provides:
//! - `SpyCatalog`: a thread-safe asset set over `u32` descriptors that counts
//!   every `load` and `generate` call
//! - Fixtures: cluster contexts and graph shapes reused across tests

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;
pub use spy::*;
