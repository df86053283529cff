//! Author-facing command descriptions.
//!
//! A [`CommandDescriptor`] is built once by a command author and consumed by
//! [`Engine::declare`](crate::Engine::declare). Nothing here is validated
//! until then.

use super::context::{Body, Context};
use super::namespace::Namespace;
use crate::error::CommandResult;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// One positional parameter of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) description: String,
    pub(crate) default: Option<Value>,
}

impl ParameterDescriptor {
    /// A parameter the caller must supply.
    pub fn required(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            description: String::new(),
            default: None,
        }
    }

    /// A parameter substituted with `default` when omitted.
    pub fn optional(name: impl Into<String>, type_name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            default: Some(default.into()),
            ..Self::required(name, type_name)
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Release in which a command was deprecated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version {0:?}, expected MAJOR[.MINOR[.PATCH]]")]
pub struct InvalidVersion(String);

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> Result<u32, InvalidVersion> {
            match parts.next() {
                Some(p) => p.parse().map_err(|_| InvalidVersion(s.to_owned())),
                None if required => Err(InvalidVersion(s.to_owned())),
                None => Ok(0),
            }
        };
        let version = Self::new(next(true)?, next(false)?, next(false)?);
        if parts.next().is_some() {
            return Err(InvalidVersion(s.to_owned()));
        }
        Ok(version)
    }
}

/// Deprecation metadata surfaced as a notice on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    pub since: Option<Version>,
    pub superseded_by: Option<String>,
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("deprecated")?;
        if let Some(since) = self.since {
            write!(f, " since {since}")?;
        }
        if let Some(replacement) = &self.superseded_by {
            write!(f, "; use `{replacement}` instead")?;
        }
        Ok(())
    }
}

/// Structured description of a command, before compilation.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub(crate) namespace: Option<Namespace>,
    pub(crate) authored_in: Option<Namespace>,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) parameters: Vec<ParameterDescriptor>,
    pub(crate) deprecated_since: Option<Version>,
    pub(crate) superseded_by: Option<String>,
    pub(crate) body: Option<Body>,
    pub(crate) block_at_call_site: bool,
}

impl CommandDescriptor {
    /// Start describing a command. See also the [`command!`](crate::command!)
    /// macro, which records the authoring module as the default namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            authored_in: None,
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            deprecated_since: None,
            superseded_by: None,
            body: None,
            block_at_call_site: false,
        }
    }

    /// Bind under an explicit namespace.
    pub fn in_namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Record the module the command was written in (`module_path!()`).
    ///
    /// Used as the namespace when none is given explicitly.
    pub fn authored_in(mut self, module_path: &str) -> Self {
        self.authored_in = Some(Namespace::new(module_path));
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn params(mut self, parameters: impl IntoIterator<Item = ParameterDescriptor>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn deprecated_since(mut self, version: Version) -> Self {
        self.deprecated_since = Some(version);
        self
    }

    pub fn superseded_by(mut self, replacement: impl Into<String>) -> Self {
        self.superseded_by = Some(replacement.into());
        self
    }

    /// Implementation body, called with the finalized argument list.
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[Value]) -> CommandResult + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    /// Declare without a body; every caller must then supply a block.
    pub fn with_call_site_block(mut self) -> Self {
        self.block_at_call_site = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("namespace", &self.namespace)
            .field("authored_in", &self.authored_in)
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("deprecated_since", &self.deprecated_since)
            .field("superseded_by", &self.superseded_by)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
