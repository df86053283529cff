//! The engine: parameter types, declared commands and dispatch policy.
//!
//! Most hosts use the process-wide [`Engine::global`] through the crate-level
//! [`declare`](crate::declare) / [`invoke`](crate::invoke) functions. Tests
//! and embedders can build isolated engines with [`Engine::new`] or
//! [`Engine::from_config`].

use crate::command::{
    BodyFn, CommandDescriptor, CommandPath, CommandRegistry, CompiledEntryPoint, StateAccessor, compile,
};
use crate::config::{Config, ConfigError, DispatchConfig};
use crate::domain::Domain;
use crate::error::{CommandResult, DispatchError, RegistrationError};
use crate::invocation;
use crate::types::{ParameterType, TypeRegistry};
use crate::value::Value;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

static GLOBAL: OnceLock<Engine> = OnceLock::new();

/// Parameter-type registry, command registry and dispatch policy.
pub struct Engine {
    types: TypeRegistry,
    commands: CommandRegistry,
    dispatch: DispatchConfig,
}

impl Engine {
    /// An engine with the built-in types and default policy.
    pub fn new() -> Self {
        Self::with_dispatch(DispatchConfig::default())
    }

    pub fn with_dispatch(dispatch: DispatchConfig) -> Self {
        Self {
            types: TypeRegistry::with_builtins(),
            commands: CommandRegistry::new(),
            dispatch,
        }
    }

    /// Build an engine from configuration, registering the configured types
    /// after the built-ins.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let engine = Self::with_dispatch(config.dispatch);
        for decl in &config.types {
            let domain = decl
                .domain()
                .map_err(|e| ConfigError::Invalid(vec![e]))?;
            engine.register_type(&decl.name, decl.description(), domain)?;
        }
        info!(
            types = engine.types.len(),
            excess_arguments = ?config.dispatch.excess_arguments,
            "Engine configured"
        );
        Ok(engine)
    }

    /// The process-wide engine, created with defaults on first use unless
    /// [`Engine::install_global`] ran first.
    pub fn global() -> &'static Engine {
        GLOBAL.get_or_init(Engine::new)
    }

    /// Make `engine` the process-wide engine.
    ///
    /// Must happen before the first call to [`Engine::global`]; otherwise
    /// the engine is handed back.
    pub fn install_global(engine: Engine) -> Result<&'static Engine, Engine> {
        GLOBAL.set(engine)?;
        Ok(Self::global())
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        self.dispatch
    }

    /// Register a new parameter type.
    pub fn register_type(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        domain: Domain,
    ) -> Result<Arc<ParameterType>, RegistrationError> {
        self.types.register(name, description, domain)
    }

    /// Compile `descriptor` and install it, replacing any command already
    /// bound at the same path.
    pub fn declare(&self, descriptor: CommandDescriptor) -> Result<Arc<CompiledEntryPoint>, RegistrationError> {
        let name = descriptor.name().to_owned();
        let entry = compile(descriptor, &self.types, self.dispatch).inspect_err(|e| {
            debug!(command = %name, code = e.error_code(), error = %e, "Declaration rejected");
        })?;
        let entry = Arc::new(entry);
        self.commands.install(Arc::clone(&entry));
        Ok(entry)
    }

    /// The entry point bound at `path`.
    pub fn entry(&self, path: &CommandPath) -> Result<Arc<CompiledEntryPoint>, DispatchError> {
        self.commands.get(path)
    }

    pub fn invoke(&self, path: &CommandPath, args: &[Value]) -> CommandResult {
        self.entry(path)?.invoke(args)
    }

    pub fn invoke_with_state(
        &self,
        path: &CommandPath,
        args: &[Value],
        state: &mut (dyn StateAccessor + 'static),
    ) -> CommandResult {
        self.entry(path)?.invoke_with_state(args, state)
    }

    pub fn invoke_with_block(
        &self,
        path: &CommandPath,
        args: &[Value],
        state: Option<&mut (dyn StateAccessor + 'static)>,
        block: &BodyFn,
    ) -> CommandResult {
        self.entry(path)?.invoke_with_block(args, state, block)
    }

    /// Parse and run a textual invocation such as `camera::scroll 2 10`.
    pub fn invoke_line(&self, line: &str) -> CommandResult {
        let inv = invocation::parse(line)?;
        self.invoke(&inv.path, &inv.args)
    }

    pub fn invoke_line_with_state(&self, line: &str, state: &mut (dyn StateAccessor + 'static)) -> CommandResult {
        let inv = invocation::parse(line)?;
        self.invoke_with_state(&inv.path, &inv.args, state)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
