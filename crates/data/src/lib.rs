//! Catalog loading and application configuration.

pub mod config;
pub mod load;

pub use config::*;
pub use load::*;
