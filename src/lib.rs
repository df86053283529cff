//! decree - declarative command registration with positional parameter validation.
//!
//! Commands are declared once as structured descriptions (namespace, name,
//! typed parameters, optional defaults, body) and compiled into entry points
//! that check every call before the body runs:
//!
//! ```
//! use decree::{ClosedInterval, CommandDescriptor, Engine, ParameterDescriptor, Value};
//!
//! let engine = Engine::new();
//! engine
//!     .register_type("Percentage", "Percentage", ClosedInterval::int(0, 100).into())
//!     .unwrap();
//! engine
//!     .declare(
//!         CommandDescriptor::new("scale")
//!             .in_namespace("math")
//!             .param(ParameterDescriptor::required("value", "Percentage"))
//!             .body(|_, args| Ok(Value::Int(args[0].as_int().unwrap_or_default() * 2))),
//!     )
//!     .unwrap();
//!
//! assert_eq!(engine.invoke_line("math::scale 50").unwrap(), Value::Int(100));
//! assert!(engine.invoke_line("math::scale 150").is_err());
//! ```

pub mod command;
pub mod config;
pub mod documentation;
pub mod domain;
pub mod engine;
pub mod error;
pub mod invocation;
pub mod telemetry;
pub mod types;
pub mod value;

pub use command::{
    Body, BodyFn, CommandDescriptor, CommandPath, CommandRegistry, CompiledEntryPoint, CompiledParameter, Context,
    Deprecation, Namespace, ParameterDescriptor, StateAccessor, Version,
};
pub use config::{Config, ConfigError, DispatchConfig, ExcessArguments};
pub use domain::{ClosedInterval, Domain, EnumeratedSet, Predicate, Validate};
pub use engine::Engine;
pub use error::{
    CommandError, CommandResult, DispatchError, InvocationError, Received, RegistrationError, ValidationError,
};
pub use types::{ParameterType, TypeRegistry};
pub use value::Value;

use std::sync::Arc;

/// Start a [`CommandDescriptor`] whose default namespace is the calling module.
///
/// ```
/// mod camera {
///     pub fn scroll() -> decree::CommandDescriptor {
///         decree::command!("scroll")
///     }
/// }
/// let entry = decree::Engine::new()
///     .declare(camera::scroll().body(|_, _| Ok(decree::Value::Nil)))
///     .unwrap();
/// assert!(entry.path().to_string().ends_with("camera::scroll"));
/// ```
#[macro_export]
macro_rules! command {
    ($name:expr) => {
        $crate::CommandDescriptor::new($name).authored_in(module_path!())
    };
}

/// Declare a command on the process-wide engine.
pub fn declare(descriptor: CommandDescriptor) -> Result<Arc<CompiledEntryPoint>, RegistrationError> {
    Engine::global().declare(descriptor)
}

/// Invoke a command on the process-wide engine.
pub fn invoke(path: &CommandPath, args: &[Value]) -> CommandResult {
    Engine::global().invoke(path, args)
}

/// Register a parameter type on the process-wide engine.
pub fn register_type(
    name: impl Into<String>,
    description: impl Into<String>,
    domain: Domain,
) -> Result<Arc<ParameterType>, RegistrationError> {
    Engine::global().register_type(name, description, domain)
}
