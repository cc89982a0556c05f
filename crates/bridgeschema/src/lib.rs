//! Command-line front end for bridgeschema: spec file discovery, configuration
//! and the `combine` / `parse` commands.

pub mod commands;
pub mod config;
pub mod discover;

pub use config::{BridgeschemaConfig, CombineConfig, TargetPlatform};
pub use discover::{SpecFilter, discover_spec_files};
