//! Integration tests for configuration-driven engines, textual invocation
//! and generated documentation.

mod common;

use common::{Party, gain_gold_command};
use decree::config::ConfigValidationError;
use decree::documentation::{render_catalog, render_command};
use decree::{CommandDescriptor, CommandPath, Config, ConfigError, Engine, ExcessArguments, ParameterDescriptor, Value};
use std::io::Write;

const CONFIG: &str = r#"
[dispatch]
excess_arguments = "pass-through"
deprecation_warnings = false

[logging]
filter = "decree=debug"

[[types]]
name = "Percentage"
description = "Whole percentage"
interval = { min = 0, max = 100 }

[[types]]
name = "Weather"
set = ["rain", "snow", "storm"]

[[types]]
name = "Amount"
predicate = "non-negative-number"
"#;

fn configured_engine() -> Engine {
    let config: Config = CONFIG.parse().expect("valid config");
    Engine::from_config(&config).expect("engine")
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.dispatch.excess_arguments, ExcessArguments::PassThrough);
    assert!(!config.dispatch.deprecation_warnings);
    assert_eq!(config.logging.filter, "decree=debug");
    assert_eq!(config.types.len(), 3);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(Config::load(dir.path().join("absent.toml")), Err(ConfigError::Io(_))));
}

#[test]
fn test_every_problem_is_reported() {
    let err = r#"
        [[types]]
        name = "Broken"

        [[types]]
        name = "Broken"
        set = [1]
    "#
    .parse::<Config>()
    .unwrap_err();

    match err {
        ConfigError::Invalid(errors) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.iter().any(|e| matches!(e, ConfigValidationError::NoDomain(_))));
            assert!(errors.iter().any(|e| matches!(e, ConfigValidationError::DuplicateTypeName(_))));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_configured_types_validate_arguments() {
    let engine = configured_engine();
    engine
        .declare(
            CommandDescriptor::new("change")
                .in_namespace("weather")
                .param(ParameterDescriptor::required("kind", "Weather"))
                .param(ParameterDescriptor::optional("power", "Percentage", 50))
                .body(|_, args| Ok(Value::List(args.to_vec()))),
        )
        .unwrap();

    assert_eq!(
        engine.invoke_line("weather::change rain").unwrap(),
        Value::List(vec![Value::from("rain"), Value::Int(50)])
    );
    assert!(engine.invoke_line("weather::change hail").is_err());
    assert!(engine.invoke_line("weather::change snow 101").is_err());
}

#[test]
fn test_pass_through_keeps_extra_arguments() {
    let engine = configured_engine();
    engine
        .declare(
            CommandDescriptor::new("pay")
                .in_namespace("shop")
                .param(ParameterDescriptor::required("amount", "Amount"))
                .body(|_, args| Ok(Value::Int(args.len() as i64))),
        )
        .unwrap();

    let result = engine
        .invoke(&CommandPath::new("shop", "pay"), &[Value::Float(2.5), Value::from("tip"), Value::Nil])
        .unwrap();
    assert_eq!(result, Value::Int(3));
}

#[test]
fn test_invoke_line_with_state() {
    let engine = Engine::new();
    engine.declare(gain_gold_command()).unwrap();
    let mut party = Party::default();

    engine.invoke_line_with_state("party::gain_gold 7", &mut party).unwrap();
    engine.invoke_line_with_state("party::gain_gold 3 true", &mut party).unwrap();
    assert_eq!(party.gold, 10);
    assert_eq!(party.log, vec!["gained 3".to_string()]);

    let err = engine.invoke_line_with_state("party::gain_gold [1", &mut party).unwrap_err();
    assert_eq!(err.error_code(), "invalid_invocation");
}

#[test]
fn test_catalog_covers_configured_engine() {
    let engine = configured_engine();
    engine.declare(gain_gold_command()).unwrap();

    let page = render_command(&engine.entry(&CommandPath::new("party", "gain_gold")).unwrap());
    assert!(page.starts_with("### `party::gain_gold(amount: PositiveInteger, note: Boolean = false)`"));

    let catalog = render_catalog(&engine);
    assert!(catalog.contains("## party"));
    assert!(catalog.contains("| `Percentage` | Whole percentage | [0, 100] |"));
    assert!(catalog.contains("| `Weather` | Weather | one of {\"rain\", \"snow\", \"storm\"} |"));
}
