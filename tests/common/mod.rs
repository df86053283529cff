//! Integration test common infrastructure.
//!
//! Builds isolated engines and a small host state that command bodies can
//! mutate, so side effects are observable from the test.

#![allow(dead_code)]

use decree::{ClosedInterval, CommandDescriptor, CommandError, Engine, ParameterDescriptor, Value};

/// Host state a test injects into command bodies.
#[derive(Debug, Default)]
pub struct Party {
    pub gold: i64,
    pub log: Vec<String>,
}

/// An engine with a `Percentage` type and `math::scale(value: Percentage)`.
pub fn percentage_engine() -> Engine {
    let engine = Engine::new();
    engine
        .register_type("Percentage", "Percentage", ClosedInterval::int(0, 100).into())
        .expect("register Percentage");
    engine
        .declare(scale_command(2))
        .expect("declare math::scale");
    engine
}

/// `math::scale(value: Percentage)` returning `value * factor`.
pub fn scale_command(factor: i64) -> CommandDescriptor {
    CommandDescriptor::new("scale")
        .in_namespace("math")
        .describe("Scales a percentage.")
        .param(ParameterDescriptor::required("value", "Percentage"))
        .body(move |_, args| {
            let value = args[0].as_int().ok_or_else(|| CommandError::failed("not an integer"))?;
            Ok(Value::Int(value * factor))
        })
}

/// `party::gain_gold(amount: PositiveInteger, note: Boolean = false)`,
/// which adds to [`Party::gold`].
pub fn gain_gold_command() -> CommandDescriptor {
    CommandDescriptor::new("gain_gold")
        .in_namespace("party")
        .param(ParameterDescriptor::required("amount", "PositiveInteger"))
        .param(ParameterDescriptor::optional("note", "Boolean", false))
        .body(|ctx, args| {
            let amount = args[0].as_int().unwrap_or_default();
            let note = args[1].as_bool().unwrap_or_default();
            let party = ctx.state::<Party>()?;
            party.gold += amount;
            if note {
                party.log.push(format!("gained {amount}"));
            }
            Ok(Value::Int(party.gold))
        })
}
