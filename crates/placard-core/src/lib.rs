//! Placard Core: shared error taxonomy and configuration.
//!
//! This crate has no internal Placard dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: The [`ConfigManager`] trait
//! - [`config`]: The concrete [`PlacardConfig`]

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod traits;

// Re-export key types at crate root for convenience
pub use config::PlacardConfig;
pub use error::{Error, Result};
pub use traits::ConfigManager;
