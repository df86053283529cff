//! Command declaration, compilation and dispatch.
//!
//! ## Flow
//!
//! 1. An author builds a [`CommandDescriptor`] (name, namespace, ordered
//!    [`ParameterDescriptor`]s, body, deprecation metadata).
//! 2. [`compile`] resolves every parameter type and checks the descriptor's
//!    shape, producing a [`CompiledEntryPoint`].
//! 3. The [`CommandRegistry`] installs the entry point under its
//!    [`CommandPath`], replacing any earlier declaration.
//! 4. Each call validates positionally, fills defaults, then runs the body
//!    with a [`Context`].

pub mod compiler;
pub mod context;
pub mod descriptor;
pub mod entry;
pub mod namespace;
pub mod registry;

pub use compiler::compile;
pub use context::{Body, BodyFn, Context, StateAccessor};
pub use descriptor::{CommandDescriptor, Deprecation, InvalidVersion, ParameterDescriptor, Version};
pub use entry::{CompiledEntryPoint, CompiledParameter};
pub use namespace::{CommandPath, Namespace};
pub use registry::CommandRegistry;
