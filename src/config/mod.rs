//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, DispatchConfig, LoggingConfig, TypeDecl)
//! - [`validation`]: Startup checks that report every problem at once

mod types;
mod validation;

pub use types::{
    Config, ConfigError, DispatchConfig, ExcessArguments, IntervalDecl, LoggingConfig, NamedPredicate, TypeDecl,
};
pub use validation::{ConfigValidationError, validate};
