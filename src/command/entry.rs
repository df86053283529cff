//! Compiled entry points.
//!
//! A [`CompiledEntryPoint`] is what [`Engine::declare`](crate::Engine::declare)
//! installs. Every call walks the parameter list left to right, fills
//! defaults for omitted trailing arguments, checks each value against its
//! type's domain and only then hands the finalized list to the body.

use super::context::{Body, BodyFn, Context, StateAccessor};
use super::descriptor::Deprecation;
use super::namespace::CommandPath;
use crate::config::{DispatchConfig, ExcessArguments};
use crate::error::{CommandResult, DispatchError, Received, ValidationError};
use crate::telemetry::CommandTimer;
use crate::types::ParameterType;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, debug_span, warn};

/// A parameter with its type resolved.
#[derive(Debug, Clone)]
pub struct CompiledParameter {
    pub(crate) name: String,
    pub(crate) ty: Arc<ParameterType>,
    pub(crate) description: String,
    pub(crate) default: Option<Value>,
}

impl CompiledParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_type(&self) -> &ParameterType {
        &self.ty
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

/// The validated, invocable artifact produced by declaring a command.
pub struct CompiledEntryPoint {
    pub(crate) path: CommandPath,
    pub(crate) description: String,
    pub(crate) parameters: Vec<CompiledParameter>,
    pub(crate) deprecation: Option<Deprecation>,
    pub(crate) body: Option<Body>,
    pub(crate) policy: DispatchConfig,
    pub(crate) calls: AtomicU64,
}

impl CompiledEntryPoint {
    pub fn path(&self) -> &CommandPath {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[CompiledParameter] {
        &self.parameters
    }

    pub fn deprecation(&self) -> Option<&Deprecation> {
        self.deprecation.as_ref()
    }

    /// Whether callers must supply the implementation as a block.
    pub fn expects_block(&self) -> bool {
        self.body.is_none()
    }

    /// Number of leading parameters without a default.
    pub fn required_arity(&self) -> usize {
        self.parameters.iter().take_while(|p| !p.is_optional()).count()
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Number of calls that reached the body.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Validate `args` and produce the list the body will receive.
    ///
    /// Nothing is executed; this is the whole call-time check.
    pub fn finalize(&self, args: &[Value]) -> Result<Vec<Value>, ValidationError> {
        let mut finalized = Vec::with_capacity(self.parameters.len().max(args.len()));

        for (position, param) in self.parameters.iter().enumerate() {
            let value = match (args.get(position), &param.default) {
                (Some(given), _) => given.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) => return Err(self.invalid(position, Received::NotProvided)),
            };

            if !param.ty.is_valid(&value) {
                return Err(self.invalid(position, Received::Value(value)));
            }
            finalized.push(value);
        }

        let excess = args.get(self.parameters.len()..).unwrap_or_default();
        if !excess.is_empty() {
            match self.policy.excess_arguments {
                ExcessArguments::Reject => {
                    return Err(ValidationError::TooManyArguments {
                        command: self.path.clone(),
                        max: self.parameters.len(),
                        got: args.len(),
                    });
                }
                ExcessArguments::Ignore => {}
                ExcessArguments::PassThrough => finalized.extend_from_slice(excess),
            }
        }

        Ok(finalized)
    }

    fn invalid(&self, position: usize, actual: Received) -> ValidationError {
        let param = &self.parameters[position];
        ValidationError::InvalidArgument {
            command: self.path.clone(),
            parameter: param.name.clone(),
            position,
            expected: param.ty.description().to_owned(),
            actual,
        }
    }

    /// Call the command without host state.
    pub fn invoke(&self, args: &[Value]) -> CommandResult {
        self.call(args, None, None)
    }

    /// Call the command with host state injected into its context.
    pub fn invoke_with_state(&self, args: &[Value], state: &mut (dyn StateAccessor + 'static)) -> CommandResult {
        self.call(args, Some(state), None)
    }

    /// Call the command, supplying the implementation at the call site.
    ///
    /// A declared body takes precedence over `block`.
    pub fn invoke_with_block(
        &self,
        args: &[Value],
        state: Option<&mut (dyn StateAccessor + 'static)>,
        block: &BodyFn,
    ) -> CommandResult {
        self.call(args, state, Some(block))
    }

    fn call(&self, args: &[Value], state: Option<&mut (dyn StateAccessor + 'static)>, block: Option<&BodyFn>) -> CommandResult {
        let span = debug_span!("command", path = %self.path, args = args.len());
        let _enter = span.enter();
        let _timer = CommandTimer::new(&self.path);

        let finalized = self.finalize(args).inspect_err(|e| {
            debug!(error = %e, code = e.error_code(), "Rejected invocation");
        })?;

        let body: &BodyFn = match (&self.body, block) {
            (Some(body), _) => body.as_ref(),
            (None, Some(block)) => block,
            (None, None) => return Err(DispatchError::MissingImplementation(self.path.clone()).into()),
        };

        if let Some(deprecation) = &self.deprecation
            && self.policy.deprecation_warnings
        {
            warn!(command = %self.path, "{deprecation}");
        }

        self.calls.fetch_add(1, Ordering::Relaxed);
        let mut ctx = Context::new(&self.path, state);
        body(&mut ctx, &finalized)
    }
}

impl fmt::Debug for CompiledEntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledEntryPoint")
            .field("path", &self.path)
            .field("parameters", &self.parameters)
            .field("deprecation", &self.deprecation)
            .field("expects_block", &self.expects_block())
            .field("calls", &self.calls())
            .finish()
    }
}
