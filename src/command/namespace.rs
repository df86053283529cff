//! Namespaces and fully qualified command paths.

use crate::error::InvocationError;
use crate::types::is_valid_name;
use std::fmt;
use std::str::FromStr;

/// Separator between namespace segments and the command name.
pub const SEPARATOR: &str = "::";

/// Logical grouping under which commands are reachable by name.
///
/// Segments are joined with `::`, e.g. `game::armors`. The empty namespace is
/// the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into().trim().trim_matches(':').to_owned())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Nested namespace `self::segment`.
    pub fn child(&self, segment: &str) -> Self {
        if self.is_root() {
            Self::new(segment)
        } else {
            Self(format!("{}{SEPARATOR}{segment}", self.0))
        }
    }

    /// Every segment is an identifier.
    pub fn is_well_formed(&self) -> bool {
        self.is_root() || self.0.split(SEPARATOR).all(is_valid_name)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// `(namespace, name)` key of a compiled entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandPath {
    namespace: Namespace,
    name: String,
}

impl CommandPath {
    pub fn new(namespace: impl Into<Namespace>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_root() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}{SEPARATOR}{}", self.namespace, self.name)
        }
    }
}

impl FromStr for CommandPath {
    type Err = InvocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvocationError::InvalidPath(s.to_owned());
        let (namespace, name) = match s.rsplit_once(SEPARATOR) {
            Some((ns, name)) => (Namespace(ns.to_owned()), name),
            None => (Namespace::root(), s),
        };
        if !is_valid_name(name) || !namespace.is_well_formed() || s.starts_with(SEPARATOR) {
            return Err(invalid());
        }
        Ok(Self::new(namespace, name))
    }
}
