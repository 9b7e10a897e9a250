//! Configuration and snapshot loading for the `nova-build-index` binary.
//!
//! The binary itself (`src/main.rs`) only wires these pieces to the command line and prints
//! what the index crate renders.

pub mod config;
pub mod snapshot;

pub use crate::{
    config::{init_tracing, ConfigError, LoggingConfig, ToolConfig},
    snapshot::{BuildSnapshot, NamedLocation},
};
