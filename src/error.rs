//! Unified error handling for decree.
//!
//! Errors are split by the phase in which they surface: declaration
//! ([`RegistrationError`]), argument checking ([`ValidationError`]) and lookup
//! ([`DispatchError`]). [`CommandError`] is what an invocation returns.

use crate::command::CommandPath;
use crate::value::{ParseValueError, Value};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Registration Errors (declare time)
// ============================================================================

/// Errors raised while registering parameter types or declaring commands.
///
/// These are always fatal for the declaration: nothing is installed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("unknown parameter type `{0}`")]
    UnknownType(String),

    #[error("parameter `{parameter}` of `{command}` references unknown type `{type_name}`")]
    UnknownParameterType {
        command: CommandPath,
        parameter: String,
        type_name: String,
    },

    #[error("parameter type `{0}` is already registered")]
    DuplicateType(String),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("parameter `{parameter}` of `{command}` is declared twice")]
    DuplicateParameter { command: CommandPath, parameter: String },

    #[error("required parameter `{parameter}` of `{command}` follows optional parameter `{after}`")]
    RequiredAfterOptional {
        command: CommandPath,
        parameter: String,
        after: String,
    },

    #[error("default {value} of parameter `{parameter}` of `{command}` is not a valid {expected}")]
    InvalidDefault {
        command: CommandPath,
        parameter: String,
        value: Value,
        expected: String,
    },

    #[error("no underlying body to call for `{0}`")]
    MissingImplementation(CommandPath),

    #[error("invalid interval bounds [{min}, {max}]")]
    InvalidInterval { min: Value, max: Value },
}

impl RegistrationError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownType(_) | Self::UnknownParameterType { .. } => "unknown_type",
            Self::DuplicateType(_) => "duplicate_type",
            Self::InvalidName(_) => "invalid_name",
            Self::DuplicateParameter { .. } => "duplicate_parameter",
            Self::RequiredAfterOptional { .. } => "required_after_optional",
            Self::InvalidDefault { .. } => "invalid_default",
            Self::MissingImplementation(_) => "missing_implementation",
            Self::InvalidInterval { .. } => "invalid_interval",
        }
    }
}

// ============================================================================
// Validation Errors (call time)
// ============================================================================

/// What the caller supplied at a given position.
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    /// The argument list was too short to reach this position.
    NotProvided,
    Value(Value),
}

impl fmt::Display for Received {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotProvided => f.write_str("not provided"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

/// A call's arguments did not match the declared parameter list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid parameter `{parameter}` of `{command}` (should be a {expected}); actual value is {actual}")]
    InvalidArgument {
        command: CommandPath,
        parameter: String,
        position: usize,
        /// Human description of the parameter's type.
        expected: String,
        actual: Received,
    },

    #[error("too many arguments for `{command}`: expected at most {max}, got {got}")]
    TooManyArguments {
        command: CommandPath,
        max: usize,
        got: usize,
    },
}

impl ValidationError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument {
                actual: Received::NotProvided,
                ..
            } => "missing_argument",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::TooManyArguments { .. } => "too_many_arguments",
        }
    }

    /// Name of the offending parameter, if the error concerns one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument { parameter, .. } => Some(parameter),
            Self::TooManyArguments { .. } => None,
        }
    }
}

// ============================================================================
// Dispatch Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown command: {0}")]
    UnknownCommand(CommandPath),

    /// Declared to take its body at the call site, but none was supplied.
    #[error("there is no underlying body or block to call for `{0}`")]
    MissingImplementation(CommandPath),
}

impl DispatchError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "unknown_command",
            Self::MissingImplementation(_) => "missing_implementation",
        }
    }
}

// ============================================================================
// Textual Invocation Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("empty invocation")]
    Empty,
    #[error("invalid command path: {0:?}")]
    InvalidPath(String),
    #[error("unbalanced quotes or brackets in {0:?}")]
    Unbalanced(String),
    #[error("argument {position}: {source}")]
    Argument {
        position: usize,
        #[source]
        source: ParseValueError,
    },
}

impl InvocationError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "empty_invocation",
            Self::InvalidPath(_) => "invalid_path",
            Self::Unbalanced(_) => "unbalanced_invocation",
            Self::Argument { .. } => "invalid_literal",
        }
    }
}

// ============================================================================
// Command Errors (everything an invocation can return)
// ============================================================================

/// Errors returned from invoking a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// The body asked for host state that was not injected, or is of another type.
    #[error("`{command}` requires host state of type {expected}")]
    StateUnavailable {
        command: CommandPath,
        expected: &'static str,
    },

    /// The body itself reported a failure.
    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    /// Convenience constructor for body failures.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Dispatch(e) => e.error_code(),
            Self::Invocation(_) => "invalid_invocation",
            Self::StateUnavailable { .. } => "state_unavailable",
            Self::Failed(_) => "failed",
        }
    }

    /// The validation failure, if that is what this error is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for command bodies and invocations.
pub type CommandResult = Result<Value, CommandError>;
