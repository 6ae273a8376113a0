//! Public configuration and error API.

mod config;
mod error;

pub use config::WalkConfig;
pub use error::{ConfigError, ExhaustionError, WalkError};
