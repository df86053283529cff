//! Domains of definition for parameter types.
//!
//! A domain answers one question: does a value belong to it? Three kinds ship
//! with the engine ([`Predicate`], [`EnumeratedSet`], [`ClosedInterval`]);
//! anything else plugs in through the [`Validate`] trait as
//! [`Domain::Custom`]. The dispatcher only ever calls [`Domain::is_valid`].

use crate::error::RegistrationError;
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::warn;

/// Extension point for domains the engine does not ship with.
///
/// Implementations must be pure: the same value always yields the same answer.
pub trait Validate: Send + Sync {
    /// Tells whether `value` belongs to this domain.
    fn is_valid(&self, value: &Value) -> bool;

    /// Short human rendering of the domain, used in generated documentation.
    fn describe(&self) -> String;
}

// ============================================================================
// Built-in domain kinds
// ============================================================================

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// Domain defined by a caller-supplied boolean function.
#[derive(Clone)]
pub struct Predicate {
    label: String,
    test: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(label: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Validate for Predicate {
    fn is_valid(&self, value: &Value) -> bool {
        (self.test)(value)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Enumeration of distinct values. Membership is value equality.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumeratedSet {
    elements: Vec<Value>,
}

impl EnumeratedSet {
    pub fn new<I, V>(elements: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut deduped: Vec<Value> = Vec::new();
        for v in elements.into_iter().map(Into::into) {
            if !deduped.contains(&v) {
                deduped.push(v);
            }
        }
        Self { elements: deduped }
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }
}

impl Validate for EnumeratedSet {
    fn is_valid(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    fn describe(&self) -> String {
        let items: Vec<String> = self.elements.iter().map(ToString::to_string).collect();
        format!("one of {{{}}}", items.join(", "))
    }
}

/// Closed interval `[min, max]` under the values' natural ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedInterval {
    min: Value,
    max: Value,
}

impl ClosedInterval {
    /// Build an interval, rejecting bounds that are not comparable or reversed.
    pub fn new(min: impl Into<Value>, max: impl Into<Value>) -> Result<Self, RegistrationError> {
        let (min, max) = (min.into(), max.into());
        match min.compare(&max) {
            Some(Ordering::Less | Ordering::Equal) => Ok(Self { min, max }),
            _ => Err(RegistrationError::InvalidInterval { min, max }),
        }
    }

    /// Integer interval. Bounds are swapped if given in reverse.
    pub fn int(a: i64, b: i64) -> Self {
        Self {
            min: Value::Int(a.min(b)),
            max: Value::Int(a.max(b)),
        }
    }

    pub fn min(&self) -> &Value {
        &self.min
    }

    pub fn max(&self) -> &Value {
        &self.max
    }
}

impl Validate for ClosedInterval {
    fn is_valid(&self, value: &Value) -> bool {
        matches!(
            (self.min.compare(value), value.compare(&self.max)),
            (Some(Ordering::Less | Ordering::Equal), Some(Ordering::Less | Ordering::Equal))
        )
    }

    fn describe(&self) -> String {
        format!("[{}, {}]", self.min, self.max)
    }
}

// ============================================================================
// Domain
// ============================================================================

/// The set of valid values for a parameter type.
#[derive(Clone)]
pub enum Domain {
    Predicate(Predicate),
    Set(EnumeratedSet),
    Interval(ClosedInterval),
    Custom(Arc<dyn Validate>),
}

impl Domain {
    pub fn predicate<F>(label: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(label, test))
    }

    pub fn set<I, V>(elements: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Set(EnumeratedSet::new(elements))
    }

    pub fn interval(min: impl Into<Value>, max: impl Into<Value>) -> Result<Self, RegistrationError> {
        ClosedInterval::new(min, max).map(Self::Interval)
    }

    pub fn custom(validator: impl Validate + 'static) -> Self {
        Self::Custom(Arc::new(validator))
    }

    fn validator(&self) -> &dyn Validate {
        match self {
            Self::Predicate(p) => p,
            Self::Set(s) => s,
            Self::Interval(i) => i,
            Self::Custom(c) => c.as_ref(),
        }
    }

    /// Tells whether `value` belongs to this domain.
    ///
    /// Never panics: a validator that panics is logged and the value is
    /// reported as invalid.
    pub fn is_valid(&self, value: &Value) -> bool {
        let validator = self.validator();
        match catch_unwind(AssertUnwindSafe(|| validator.is_valid(value))) {
            Ok(valid) => valid,
            Err(_) => {
                let domain = catch_unwind(AssertUnwindSafe(|| validator.describe()))
                    .unwrap_or_else(|_| "<unprintable domain>".to_owned());
                warn!(%domain, value = %value, "Domain validator panicked; treating value as invalid");
                false
            }
        }
    }

    pub fn describe(&self) -> String {
        self.validator().describe()
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(p) => fmt::Debug::fmt(p, f),
            Self::Set(s) => fmt::Debug::fmt(s, f),
            Self::Interval(i) => fmt::Debug::fmt(i, f),
            Self::Custom(c) => f.debug_tuple("Custom").field(&c.describe()).finish(),
        }
    }
}

impl From<Predicate> for Domain {
    fn from(p: Predicate) -> Self {
        Self::Predicate(p)
    }
}

impl From<EnumeratedSet> for Domain {
    fn from(s: EnumeratedSet) -> Self {
        Self::Set(s)
    }
}

impl From<ClosedInterval> for Domain {
    fn from(i: ClosedInterval) -> Self {
        Self::Interval(i)
    }
}
