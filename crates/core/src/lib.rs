//! Shared types, error taxonomy, and configuration for StudioReach.

pub mod config;
pub mod error;
pub mod types;

pub use error::{ReachError, ReachResult};
