//! Parameter types available in every fresh registry.

use super::ParameterType;
use crate::domain::{ClosedInterval, Domain};
use crate::value::Value;

pub const COORDINATE: &str = "Coordinate";
pub const BOOLEAN: &str = "Boolean";
pub const POSITIVE_INTEGER: &str = "PositiveInteger";
pub const NULLABLE_POSITIVE_INTEGER: &str = "NullablePositiveInteger";
pub const POSITIVE_FLOAT: &str = "PositiveFloat";
pub const ITEM_ID: &str = "ItemId";
pub const DIRECTION: &str = "Direction";

/// Largest map coordinate accepted by [`COORDINATE`].
pub const MAX_COORDINATE: i64 = 999;

fn non_negative_int(v: &Value) -> bool {
    v.as_int().is_some_and(|i| i >= 0)
}

/// Every built-in type, in registration order.
pub fn all() -> Vec<ParameterType> {
    vec![
        ParameterType::new(
            COORDINATE,
            "Coordinate of a point in a cartesian coordinate system (i.e.: `x` or `y`)",
            ClosedInterval::int(0, MAX_COORDINATE).into(),
        ),
        ParameterType::new(BOOLEAN, "Boolean value", Domain::set([true, false])),
        ParameterType::new(
            POSITIVE_INTEGER,
            "Positive integer",
            Domain::predicate("integer >= 0", non_negative_int),
        ),
        ParameterType::new(
            NULLABLE_POSITIVE_INTEGER,
            "Positive integer or nil",
            Domain::predicate("nil or integer >= 0", |v| v.is_nil() || non_negative_int(v)),
        ),
        ParameterType::new(
            POSITIVE_FLOAT,
            "Positive number",
            Domain::predicate("number >= 0", |v| v.as_float().is_some_and(|f| f >= 0.0)),
        ),
        ParameterType::new(
            ITEM_ID,
            "Identifier of an item in the database",
            Domain::predicate("integer >= 1", |v| v.as_int().is_some_and(|i| i >= 1)),
        ),
        // Numeric-keypad directions: down, left, right, up.
        ParameterType::new(DIRECTION, "Direction", Domain::set([2, 4, 6, 8])),
    ]
}
