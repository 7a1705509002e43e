//! Test infrastructure for the persistence layer.
//!
//! This module provides reusable entities, seeding helpers and a stalled
//! store for deadline tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

// Re-export commonly used items
pub use fixtures::*;
pub use harness::*;
