//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::types::is_valid_name;
use std::collections::HashSet;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("types[{0}].name is not a valid identifier")]
    InvalidTypeName(usize),
    #[error("type `{0}` is declared more than once")]
    DuplicateTypeName(String),
    #[error("type `{0}` needs one of `interval`, `set` or `predicate`")]
    NoDomain(String),
    #[error("type `{0}` declares more than one of `interval`, `set` and `predicate`")]
    ConflictingDomains(String),
    #[error("type `{0}` has interval bounds that are reversed or not comparable")]
    InvalidInterval(String),
    #[error("type `{type_name}` uses unsupported value {value}")]
    UnsupportedValue { type_name: String, value: String },
    #[error("logging.filter is not a valid filter directive: {0}")]
    InvalidLogFilter(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    if EnvFilter::try_new(&config.logging.filter).is_err() {
        errors.push(ConfigValidationError::InvalidLogFilter(config.logging.filter.clone()));
    }

    let mut seen = HashSet::new();
    for (index, decl) in config.types.iter().enumerate() {
        if !is_valid_name(&decl.name) {
            errors.push(ConfigValidationError::InvalidTypeName(index));
            continue;
        }
        if !seen.insert(decl.name.as_str()) {
            errors.push(ConfigValidationError::DuplicateTypeName(decl.name.clone()));
        }
        if let Err(e) = decl.domain() {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_unchecked(s: &str) -> Config {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let config = parse_unchecked(
            r#"
            [[types]]
            name = "Percentage"
            interval = { min = 100, max = 0 }

            [[types]]
            name = "Percentage"
            predicate = "integer"

            [[types]]
            name = "Nothing"

            [[types]]
            name = "Both"
            set = [1]
            predicate = "any"

            [[types]]
            name = "bad name"
            set = [1]
            "#,
        );

        let errors = validate(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ConfigValidationError::InvalidInterval("Percentage".into()),
                ConfigValidationError::DuplicateTypeName("Percentage".into()),
                ConfigValidationError::NoDomain("Nothing".into()),
                ConfigValidationError::ConflictingDomains("Both".into()),
                ConfigValidationError::InvalidTypeName(4),
            ]
        );
    }

    #[test]
    fn rejects_tables_in_sets() {
        let config = parse_unchecked(
            r#"
            [[types]]
            name = "Weird"
            set = [{ a = 1 }]
            "#,
        );
        let errors = validate(&config).unwrap_err();
        assert!(matches!(&errors[0], ConfigValidationError::UnsupportedValue { type_name, .. } if type_name == "Weird"));
    }

    #[test]
    fn rejects_bad_log_filter() {
        let config = parse_unchecked("[logging]\nfilter = \"decree=loudest\"\n");
        assert!(matches!(
            validate(&config).unwrap_err()[0],
            ConfigValidationError::InvalidLogFilter(_)
        ));
    }
}
