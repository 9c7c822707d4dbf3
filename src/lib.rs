//! Release-aligned manifest bundler library
//!
//! This library composes an ordered bundle of release assets for a target
//! release of a package, merging in assets from the dependency releases
//! aligned with it:
//! - [`release`] - the pure alignment, windowing, and ordering core
//! - [`config`] - package definitions and per-source accept rules
//! - [`provider`] - release metadata from GitHub or a JSON snapshot
//! - [`fetch`] - downloading assets and publishing bundles atomically
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod provider;
pub mod release;

// Re-export commonly used types
pub use error::{BundlerError, CliError, ConfigError, Result};
