//! Core types for patterning-admin
//!
//! Domain types shared across all other crates: the raw store join shape,
//! the flattened `PatternRecord`, the access gate and runtime configuration.

mod config;
mod constants;
mod env_config;
mod error;
mod gate;
mod pattern;
mod viewer;

pub use config::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use gate::*;
pub use pattern::*;
pub use viewer::*;
