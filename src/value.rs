//! Dynamic values passed to and returned from commands.
//!
//! Commands are invoked positionally with a slice of [`Value`]s. Equality is
//! structural; ordering is only defined between numbers and between strings,
//! which is what [`ClosedInterval`](crate::domain::ClosedInterval) relies on.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A value flowing through the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    List(Vec<Value>),
}

impl Value {
    /// Short name of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::List(_) => "list",
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Natural ordering between two values.
    ///
    /// Returns `None` for non-comparable pairs (mixed kinds, NaN, lists...).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::Symbol(a), Self::Symbol(b)) => Some(a.cmp(b)),
            _ => {
                let (a, b) = (self.as_float()?, other.as_float()?);
                a.partial_cmp(&b)
            }
        }
    }

    /// Convert a TOML value (from configuration) into a [`Value`].
    ///
    /// Tables and datetimes have no counterpart and yield `None`.
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        Some(match value {
            toml::Value::String(s) => Self::Str(s.clone()),
            toml::Value::Integer(i) => Self::Int(*i),
            toml::Value::Float(f) => Self::Float(*f),
            toml::Value::Boolean(b) => Self::Bool(*b),
            toml::Value::Array(items) => Self::List(
                items
                    .iter()
                    .map(Self::from_toml)
                    .collect::<Option<Vec<_>>>()?,
            ),
            toml::Value::Datetime(_) | toml::Value::Table(_) => return None,
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Symbol(s) => write!(f, ":{s}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Nil, Into::into)
    }
}

// ============================================================================
// Literal parsing
// ============================================================================

/// Errors produced while parsing a value literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseValueError {
    #[error("empty literal")]
    Empty,
    #[error("unterminated string literal: {0}")]
    UnterminatedString(String),
    #[error("unterminated list literal: {0}")]
    UnterminatedList(String),
    #[error("invalid escape sequence in {0}")]
    InvalidEscape(String),
}

impl FromStr for Value {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseValueError::Empty);
        }

        match s {
            "nil" => return Ok(Self::Nil),
            "true" => return Ok(Self::Bool(true)),
            "false" => return Ok(Self::Bool(false)),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix('"') {
            let body = rest
                .strip_suffix('"')
                .ok_or_else(|| ParseValueError::UnterminatedString(s.to_owned()))?;
            return unescape(body).map(Self::Str).ok_or_else(|| ParseValueError::InvalidEscape(s.to_owned()));
        }

        if let Some(rest) = s.strip_prefix('[') {
            let body = rest
                .strip_suffix(']')
                .ok_or_else(|| ParseValueError::UnterminatedList(s.to_owned()))?;
            if body.trim().is_empty() {
                return Ok(Self::List(Vec::new()));
            }
            return split_top_level(body, |c| c == ',')
                .ok_or_else(|| ParseValueError::UnterminatedList(s.to_owned()))?
                .into_iter()
                .map(str::parse)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List);
        }

        if let Some(sym) = s.strip_prefix(':')
            && !sym.is_empty()
        {
            return Ok(Self::Symbol(sym.to_owned()));
        }

        if let Ok(i) = s.parse::<i64>() {
            return Ok(Self::Int(i));
        }
        let numeric_start = s.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        if numeric_start && let Ok(f) = s.parse::<f64>() {
            return Ok(Self::Float(f));
        }

        Ok(Self::Str(s.to_owned()))
    }
}

/// Reverses the escaping `Display` applies to strings.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let hex: String = chars.by_ref().take_while(|&c| c != '}').collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Split `input` on separator characters, ignoring those nested in quotes or brackets.
///
/// Returns `None` when a quote or bracket is left open.
pub(crate) fn split_top_level(input: &str, is_sep: impl Fn(char) -> bool) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '[' => depth += 1,
            ']' => depth = depth.checked_sub(1)?,
            _ if depth == 0 && is_sep(c) => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if in_quotes || depth != 0 {
        return None;
    }
    parts.push(&input[start..]);
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar_literals() {
        assert_eq!("nil".parse::<Value>(), Ok(Value::Nil));
        assert_eq!("true".parse::<Value>(), Ok(Value::Bool(true)));
        assert_eq!("-12".parse::<Value>(), Ok(Value::Int(-12)));
        assert_eq!("2.5".parse::<Value>(), Ok(Value::Float(2.5)));
        assert_eq!(":up".parse::<Value>(), Ok(Value::Symbol("up".into())));
        assert_eq!("hello".parse::<Value>(), Ok(Value::Str("hello".into())));
        assert_eq!(r#""a \"b\"""#.parse::<Value>(), Ok(Value::Str("a \"b\"".into())));
    }

    #[test]
    fn parses_nested_lists() {
        let v: Value = "[1, [2, \"x,y\"], nil]".parse().unwrap();
        assert_eq!(
            v,
            Value::List(vec![
                Value::Int(1),
                Value::List(vec![Value::Int(2), Value::Str("x,y".into())]),
                Value::Nil,
            ])
        );
        assert_eq!("[]".parse::<Value>(), Ok(Value::List(vec![])));
    }

    #[test]
    fn rejects_unterminated_literals() {
        assert!(matches!("\"abc".parse::<Value>(), Err(ParseValueError::UnterminatedString(_))));
        assert!(matches!("[1, 2".parse::<Value>(), Err(ParseValueError::UnterminatedList(_))));
        assert_eq!("   ".parse::<Value>(), Err(ParseValueError::Empty));
    }

    #[test]
    fn compare_mixes_numbers_only() {
        assert_eq!(Value::Int(3).compare(&Value::Float(3.5)), Some(Ordering::Less));
        assert_eq!(Value::Str("b".into()).compare(&Value::Str("a".into())), Some(Ordering::Greater));
        assert_eq!(Value::Int(1).compare(&Value::Str("1".into())), None);
        assert_eq!(Value::Nil.compare(&Value::Int(0)), None);
        assert_eq!(Value::Float(f64::NAN).compare(&Value::Float(1.0)), None);
    }

    #[test]
    fn control_characters_round_trip() {
        let v = Value::Str("bell\u{1} cr\r nul\0 tab\t 'q' \u{200b}".into());
        assert_eq!(v.to_string().parse::<Value>(), Ok(v));
        assert!(matches!("\"\\u{zz}\"".parse::<Value>(), Err(ParseValueError::InvalidEscape(_))));
        assert!(matches!("\"\\u{110000}\"".parse::<Value>(), Err(ParseValueError::InvalidEscape(_))));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let v = Value::List(vec![Value::Int(1), Value::Str("a b".into()), Value::Symbol("s".into())]);
        assert_eq!(v.to_string(), "[1, \"a b\", :s]");
        assert_eq!(v.to_string().parse::<Value>(), Ok(v));
    }
}
