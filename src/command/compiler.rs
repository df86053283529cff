//! Turns a [`CommandDescriptor`] into a [`CompiledEntryPoint`].
//!
//! All structural checks happen here so that a descriptor either compiles
//! completely or produces a [`RegistrationError`] and nothing is installed.

use super::descriptor::{CommandDescriptor, Deprecation};
use super::entry::{CompiledEntryPoint, CompiledParameter};
use super::namespace::{CommandPath, Namespace};
use crate::config::DispatchConfig;
use crate::error::RegistrationError;
use crate::types::{TypeRegistry, is_valid_name};
use std::collections::HashSet;
use std::sync::atomic::AtomicU64;

/// Compile a descriptor against the given type registry.
///
/// Namespace resolution: the explicit namespace, else the authoring module,
/// else the root namespace.
pub fn compile(
    descriptor: CommandDescriptor,
    types: &TypeRegistry,
    policy: DispatchConfig,
) -> Result<CompiledEntryPoint, RegistrationError> {
    let CommandDescriptor {
        namespace,
        authored_in,
        name,
        description,
        parameters,
        deprecated_since,
        superseded_by,
        body,
        block_at_call_site,
    } = descriptor;

    let namespace = namespace.or(authored_in).unwrap_or_else(Namespace::root);
    if !namespace.is_well_formed() {
        return Err(RegistrationError::InvalidName(namespace.to_string()));
    }
    if !is_valid_name(&name) {
        return Err(RegistrationError::InvalidName(name));
    }
    let path = CommandPath::new(namespace, name);

    let mut seen = HashSet::with_capacity(parameters.len());
    let mut last_optional: Option<String> = None;
    let mut compiled = Vec::with_capacity(parameters.len());

    for param in parameters {
        if !is_valid_name(&param.name) {
            return Err(RegistrationError::InvalidName(param.name));
        }
        if !seen.insert(param.name.clone()) {
            return Err(RegistrationError::DuplicateParameter {
                command: path,
                parameter: param.name,
            });
        }

        if param.default.is_some() {
            last_optional = Some(param.name.clone());
        } else if let Some(after) = last_optional {
            return Err(RegistrationError::RequiredAfterOptional {
                command: path,
                parameter: param.name,
                after,
            });
        }

        let ty = match types.resolve(&param.type_name) {
            Ok(ty) => ty,
            Err(_) => {
                return Err(RegistrationError::UnknownParameterType {
                    command: path,
                    parameter: param.name,
                    type_name: param.type_name,
                });
            }
        };

        if let Some(default) = &param.default
            && !ty.is_valid(default)
        {
            return Err(RegistrationError::InvalidDefault {
                command: path,
                parameter: param.name,
                value: default.clone(),
                expected: ty.description().to_owned(),
            });
        }

        compiled.push(CompiledParameter {
            name: param.name,
            ty,
            description: param.description,
            default: param.default,
        });
    }

    if body.is_none() && !block_at_call_site {
        return Err(RegistrationError::MissingImplementation(path));
    }

    let deprecation = (deprecated_since.is_some() || superseded_by.is_some()).then_some(Deprecation {
        since: deprecated_since,
        superseded_by,
    });

    Ok(CompiledEntryPoint {
        path,
        description,
        parameters: compiled,
        deprecation,
        body,
        policy,
        calls: AtomicU64::new(0),
    })
}
