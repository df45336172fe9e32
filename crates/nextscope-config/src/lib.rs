//! # nextscope config
//!
//! TOML configuration for the nextscope server, browser and analyzer, with
//! `${VAR}` and `~` expansion and validation.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
