//! Textual invocations: `namespace::name arg1 arg2 ...`.
//!
//! Arguments are separated by whitespace; quoted strings and bracketed
//! lists may contain spaces. Each argument is parsed as a [`Value`] literal.

use crate::command::CommandPath;
use crate::error::InvocationError;
use crate::value::{Value, split_top_level};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub path: CommandPath,
    pub args: Vec<Value>,
}

/// Parse a command line into a path and positional arguments.
pub fn parse(line: &str) -> Result<Invocation, InvocationError> {
    let tokens = split_top_level(line.trim(), char::is_whitespace)
        .ok_or_else(|| InvocationError::Unbalanced(line.to_owned()))?;
    let mut tokens = tokens.into_iter().filter(|t| !t.is_empty());

    let path: CommandPath = tokens.next().ok_or(InvocationError::Empty)?.parse()?;
    let args: Vec<Value> = tokens
        .enumerate()
        .map(|(position, token)| {
            token
                .parse::<Value>()
                .map_err(|source| InvocationError::Argument { position, source })
        })
        .collect::<Result<_, _>>()?;

    Ok(Invocation { path, args })
}
