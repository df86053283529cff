//! Command registry and dispatch table.
//!
//! Maps `(namespace, name)` to compiled entry points. Readers load an
//! immutable snapshot without locking; declarations are serialized by a
//! writer mutex and publish a fresh snapshot, so an entry point is either
//! fully visible or not visible at all.

use super::entry::CompiledEntryPoint;
use super::namespace::{CommandPath, Namespace};
use crate::error::DispatchError;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

type Table = HashMap<CommandPath, Arc<CompiledEntryPoint>>;

/// Registry of compiled entry points.
pub struct CommandRegistry {
    snap: ArcSwap<Table>,
    writer: Mutex<()>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            snap: ArcSwap::from_pointee(Table::new()),
            writer: Mutex::new(()),
        }
    }

    /// Install an entry point, replacing any previous one at the same path.
    ///
    /// Returns the replaced entry point, if any.
    pub fn install(&self, entry: Arc<CompiledEntryPoint>) -> Option<Arc<CompiledEntryPoint>> {
        let _guard = self.writer.lock();

        let mut next = Table::clone(&self.snap.load());
        let previous = next.insert(entry.path().clone(), Arc::clone(&entry));
        self.snap.store(Arc::new(next));

        if previous.is_some() {
            info!(command = %entry.path(), "Redeclared command; previous definition replaced");
        } else {
            debug!(command = %entry.path(), params = entry.arity(), "Declared command");
        }
        previous
    }

    /// Look up the entry point at `path`.
    pub fn get(&self, path: &CommandPath) -> Result<Arc<CompiledEntryPoint>, DispatchError> {
        self.snap
            .load()
            .get(path)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownCommand(path.clone()))
    }

    pub fn contains(&self, path: &CommandPath) -> bool {
        self.snap.load().contains_key(path)
    }

    /// All entry points, sorted by path.
    pub fn all(&self) -> Vec<Arc<CompiledEntryPoint>> {
        let mut all: Vec<_> = self.snap.load().values().cloned().collect();
        all.sort_by(|a, b| a.path().cmp(b.path()));
        all
    }

    /// Entry points bound directly under `namespace`, sorted by name.
    pub fn commands_in(&self, namespace: &Namespace) -> Vec<Arc<CompiledEntryPoint>> {
        let mut found: Vec<_> = self
            .snap
            .load()
            .values()
            .filter(|e| e.path().namespace() == namespace)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.path().name().cmp(b.path().name()));
        found
    }

    /// Namespaces that have at least one command, sorted.
    pub fn namespaces(&self) -> Vec<Namespace> {
        let mut namespaces: Vec<_> = self.snap.load().keys().map(|p| p.namespace().clone()).collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }

    pub fn len(&self) -> usize {
        self.snap.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snap.load().is_empty()
    }

    /// Call counts of commands that have been used, most used first.
    pub fn command_stats(&self) -> Vec<(CommandPath, u64)> {
        let mut stats: Vec<_> = self
            .snap
            .load()
            .values()
            .map(|e| (e.path().clone(), e.calls()))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandDescriptor, compile};
    use crate::config::DispatchConfig;
    use crate::types::TypeRegistry;
    use crate::value::Value;

    fn entry(namespace: &str, name: &str, result: i64) -> Arc<CompiledEntryPoint> {
        let descriptor = CommandDescriptor::new(name)
            .in_namespace(namespace)
            .body(move |_, _| Ok(Value::Int(result)));
        Arc::new(compile(descriptor, &TypeRegistry::with_builtins(), DispatchConfig::default()).unwrap())
    }

    #[test]
    fn last_declaration_wins() {
        let registry = CommandRegistry::new();
        assert!(registry.install(entry("map", "width", 1)).is_none());

        let old = registry.get(&CommandPath::new("map", "width")).unwrap();
        let replaced = registry.install(entry("map", "width", 2)).unwrap();
        assert!(Arc::ptr_eq(&old, &replaced));

        let current = registry.get(&CommandPath::new("map", "width")).unwrap();
        assert_eq!(current.invoke(&[]).unwrap(), Value::Int(2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_path_is_a_dispatch_error() {
        let registry = CommandRegistry::new();
        let path = CommandPath::new("map", "height");
        assert_eq!(registry.get(&path).unwrap_err(), DispatchError::UnknownCommand(path));
    }

    #[test]
    fn listing_by_namespace() {
        let registry = CommandRegistry::new();
        registry.install(entry("map", "width", 1));
        registry.install(entry("map", "height", 1));
        registry.install(entry("camera", "lock", 1));

        let names: Vec<_> = registry
            .commands_in(&Namespace::new("map"))
            .iter()
            .map(|e| e.path().name().to_owned())
            .collect();
        assert_eq!(names, ["height", "width"]);
        assert_eq!(registry.namespaces(), vec![Namespace::new("camera"), Namespace::new("map")]);
        assert_eq!(registry.all().len(), 3);
    }

    #[test]
    fn stats_count_successful_calls() {
        let registry = CommandRegistry::new();
        registry.install(entry("map", "width", 1));
        registry.install(entry("map", "height", 1));

        let width = registry.get(&CommandPath::new("map", "width")).unwrap();
        width.invoke(&[]).unwrap();
        width.invoke(&[]).unwrap();
        registry.get(&CommandPath::new("map", "height")).unwrap().invoke(&[]).unwrap();

        assert_eq!(
            registry.command_stats(),
            vec![(CommandPath::new("map", "width"), 2), (CommandPath::new("map", "height"), 1)]
        );
    }

    #[test]
    fn old_snapshot_readers_are_unaffected() {
        let registry = CommandRegistry::new();
        registry.install(entry("map", "width", 1));

        let held = registry.get(&CommandPath::new("map", "width")).unwrap();
        registry.install(entry("map", "width", 2));

        assert_eq!(held.invoke(&[]).unwrap(), Value::Int(1));
    }
}
