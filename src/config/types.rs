//! Core configuration types and loading.

use super::validation::{ConfigValidationError, validate};
use crate::domain::{ClosedInterval, Domain};
use crate::error::RegistrationError;
use crate::value::Value;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join(.0))]
    Invalid(Vec<ConfigValidationError>),
    #[error("failed to register configured type: {0}")]
    Registration(#[from] RegistrationError),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl ConfigError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "config_io",
            Self::Parse(_) => "config_parse",
            Self::Invalid(_) => "config_invalid",
            Self::Registration(e) => e.error_code(),
            Self::Logging(_) => "logging_init",
        }
    }
}

fn join(errors: &[ConfigValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Call-time dispatch policy.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Parameter types registered after the built-ins.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// What to do with arguments beyond the declared parameter list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExcessArguments {
    /// Fail the call with a validation error.
    #[default]
    Reject,
    /// Drop them before calling the body.
    Ignore,
    /// Append them, unvalidated, after the declared parameters.
    PassThrough,
}

/// Call-time dispatch policy, captured by each entry point when declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub excess_arguments: ExcessArguments,
    /// Log a warning whenever a deprecated command is called (default: true).
    #[serde(default = "default_true")]
    pub deprecation_warnings: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            excess_arguments: ExcessArguments::default(),
            deprecation_warnings: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

// ============================================================================
// Configured parameter types
// ============================================================================

/// A parameter type declared in configuration.
///
/// Exactly one of `interval`, `set` or `predicate` must be given.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// Human description; defaults to the name.
    #[serde(default)]
    pub description: String,
    pub interval: Option<IntervalDecl>,
    pub set: Option<Vec<toml::Value>>,
    pub predicate: Option<NamedPredicate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntervalDecl {
    pub min: toml::Value,
    pub max: toml::Value,
}

/// Predicates that can be referenced by name from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedPredicate {
    Any,
    Integer,
    NonNegativeInteger,
    PositiveInteger,
    Number,
    NonNegativeNumber,
    Text,
    Symbol,
    List,
}

impl NamedPredicate {
    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "any value",
            Self::Integer => "integer",
            Self::NonNegativeInteger => "integer >= 0",
            Self::PositiveInteger => "integer >= 1",
            Self::Number => "number",
            Self::NonNegativeNumber => "number >= 0",
            Self::Text => "string",
            Self::Symbol => "symbol",
            Self::List => "list",
        }
    }

    pub fn test(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Integer => value.as_int().is_some(),
            Self::NonNegativeInteger => value.as_int().is_some_and(|i| i >= 0),
            Self::PositiveInteger => value.as_int().is_some_and(|i| i >= 1),
            Self::Number => value.as_float().is_some(),
            Self::NonNegativeNumber => value.as_float().is_some_and(|f| f >= 0.0),
            Self::Text => matches!(value, Value::Str(_)),
            Self::Symbol => matches!(value, Value::Symbol(_)),
            Self::List => value.as_list().is_some(),
        }
    }

    pub fn domain(self) -> Domain {
        Domain::predicate(self.label(), move |v| self.test(v))
    }
}

impl TypeDecl {
    pub fn description(&self) -> &str {
        if self.description.is_empty() {
            &self.name
        } else {
            &self.description
        }
    }

    /// Build the declared domain.
    pub fn domain(&self) -> Result<Domain, ConfigValidationError> {
        let unsupported = |value: &toml::Value| ConfigValidationError::UnsupportedValue {
            type_name: self.name.clone(),
            value: value.to_string(),
        };

        match (&self.interval, &self.set, self.predicate) {
            (Some(interval), None, None) => {
                let min = Value::from_toml(&interval.min).ok_or_else(|| unsupported(&interval.min))?;
                let max = Value::from_toml(&interval.max).ok_or_else(|| unsupported(&interval.max))?;
                ClosedInterval::new(min, max)
                    .map(Domain::Interval)
                    .map_err(|_| ConfigValidationError::InvalidInterval(self.name.clone()))
            }
            (None, Some(elements), None) => elements
                .iter()
                .map(|e| Value::from_toml(e).ok_or_else(|| unsupported(e)))
                .collect::<Result<Vec<_>, _>>()
                .map(Domain::set),
            (None, None, Some(predicate)) => Ok(predicate.domain()),
            (None, None, None) => Err(ConfigValidationError::NoDomain(self.name.clone())),
            _ => Err(ConfigValidationError::ConflictingDomains(self.name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.dispatch, DispatchConfig::default());
        assert_eq!(config.dispatch.excess_arguments, ExcessArguments::Reject);
        assert!(config.dispatch.deprecation_warnings);
        assert_eq!(config.logging.filter, "info");
        assert!(config.types.is_empty());
    }

    #[test]
    fn parses_full_config() {
        let config: Config = r#"
            [dispatch]
            excess_arguments = "pass-through"
            deprecation_warnings = false

            [logging]
            filter = "decree=debug"

            [[types]]
            name = "Percentage"
            description = "Percentage"
            interval = { min = 0, max = 100 }

            [[types]]
            name = "Speed"
            set = [1, 2, 3, 4, 5, 6]

            [[types]]
            name = "Label"
            predicate = "text"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.dispatch.excess_arguments, ExcessArguments::PassThrough);
        assert!(!config.dispatch.deprecation_warnings);
        assert_eq!(config.types.len(), 3);

        let pct = config.types[0].domain().unwrap();
        assert!(pct.is_valid(&Value::Int(100)));
        assert!(!pct.is_valid(&Value::Int(101)));

        let speed = config.types[1].domain().unwrap();
        assert!(speed.is_valid(&Value::Int(4)));
        assert_eq!(config.types[1].description(), "Speed");

        let label = config.types[2].domain().unwrap();
        assert!(label.is_valid(&Value::Str("hi".into())));
        assert!(!label.is_valid(&Value::Int(1)));
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = r#"
            [dispatch]
            excess_arguments = "maybe"
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decree.toml");
        std::fs::write(&path, "[[types]]\nname = \"Flag\"\nset = [true, false]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.types[0].name, "Flag");

        let missing = Config::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
