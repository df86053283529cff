//! Parameter-type registry.
//!
//! Maps a type name (`Coordinate`, `Boolean`, ...) to its human description
//! and [`Domain`]. Commands reference types by name; the name is resolved
//! once, when the command is declared.
//!
//! Registering a name twice is rejected with
//! [`RegistrationError::DuplicateType`]; the first registration stays.

pub mod builtins;

use crate::domain::Domain;
use crate::error::RegistrationError;
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A named domain plus its developer-facing description.
#[derive(Debug, Clone)]
pub struct ParameterType {
    name: String,
    description: String,
    domain: Domain,
}

impl ParameterType {
    pub fn new(name: impl Into<String>, description: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            domain,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    #[inline]
    pub fn is_valid(&self, value: &Value) -> bool {
        self.domain.is_valid(value)
    }
}

/// Process-wide mapping from type name to [`ParameterType`].
///
/// Append-only: types are never removed once registered.
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<ParameterType>>>,
}

impl TypeRegistry {
    /// A registry with no types at all.
    pub fn empty() -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
        }
    }

    /// A registry seeded with the built-in types.
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        {
            let mut types = registry.types.write();
            for ty in builtins::all() {
                types.insert(ty.name.clone(), Arc::new(ty));
            }
        }
        registry
    }

    /// Install a new parameter type.
    pub fn register(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        domain: Domain,
    ) -> Result<Arc<ParameterType>, RegistrationError> {
        self.insert(ParameterType::new(name, description, domain))
    }

    /// Install an already-built parameter type.
    pub fn insert(&self, ty: ParameterType) -> Result<Arc<ParameterType>, RegistrationError> {
        if !is_valid_name(&ty.name) {
            return Err(RegistrationError::InvalidName(ty.name));
        }

        let mut types = self.types.write();
        if types.contains_key(&ty.name) {
            return Err(RegistrationError::DuplicateType(ty.name));
        }

        debug!(name = %ty.name, domain = %ty.domain.describe(), "Registered parameter type");
        let ty = Arc::new(ty);
        types.insert(ty.name.clone(), Arc::clone(&ty));
        Ok(ty)
    }

    /// Look a type up by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<ParameterType>, RegistrationError> {
        self.types
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistrationError::UnknownType(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered types, sorted by name.
    pub fn all(&self) -> Vec<Arc<ParameterType>> {
        let mut all: Vec<_> = self.types.read().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Names must be non-empty identifiers.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '?' || c == '!')
}
