//! Call context handed to command bodies.
//!
//! Bodies never reach for global host state. Whatever state a host wants its
//! commands to see is injected per call as a [`StateAccessor`], and bodies
//! downcast it to the concrete type they expect.

use super::CommandPath;
use crate::error::{CommandError, CommandResult};
use crate::value::Value;
use std::any::{Any, type_name};
use std::sync::Arc;

/// Opaque host state injected into a body at call time.
///
/// Implemented for every `Any + Send` type; pass `&mut my_state` directly.
pub trait StateAccessor: Any + Send {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Send> StateAccessor for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Signature shared by declared bodies and call-site blocks.
pub type BodyFn = dyn Fn(&mut Context<'_>, &[Value]) -> CommandResult + Send + Sync;

/// A declared implementation body.
pub type Body = Arc<BodyFn>;

/// Per-call context.
pub struct Context<'a> {
    path: &'a CommandPath,
    state: Option<&'a mut (dyn StateAccessor + 'static)>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(path: &'a CommandPath, state: Option<&'a mut (dyn StateAccessor + 'static)>) -> Self {
        Self { path, state }
    }

    /// Path of the command being executed.
    pub fn path(&self) -> &CommandPath {
        self.path
    }

    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    /// Borrow the injected host state as `T`.
    pub fn state<T: Any>(&mut self) -> Result<&mut T, CommandError> {
        let path = self.path;
        self.state
            .as_deref_mut()
            .and_then(|s| s.as_any_mut().downcast_mut::<T>())
            .ok_or_else(|| CommandError::StateUnavailable {
                command: path.clone(),
                expected: type_name::<T>(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Party {
        gold: i64,
    }

    #[test]
    fn downcasts_injected_state() {
        let path = CommandPath::new("party", "gold");
        let mut party = Party { gold: 10 };
        let mut ctx = Context::new(&path, Some(&mut party));

        assert!(ctx.has_state());
        ctx.state::<Party>().unwrap().gold += 5;
        assert!(matches!(
            ctx.state::<String>(),
            Err(CommandError::StateUnavailable { .. })
        ));
        drop(ctx);
        assert_eq!(party.gold, 15);
    }

    #[test]
    fn missing_state_names_expected_type() {
        let path = CommandPath::new("party", "gold");
        let mut ctx = Context::new(&path, None);
        let err = ctx.state::<Party>().unwrap_err();
        assert_eq!(err.error_code(), "state_unavailable");
        assert!(err.to_string().contains("Party"));
    }
}
