//! The fount: an owned registry of namespaces

use crate::{
    config::Configuration,
    container::Container,
    key::DEFAULT_NAMESPACE,
    module::ModuleSource,
    options::Options,
    registry::Registry
};
use std::{ops::Deref, sync::Arc};

/// A dependency container made of named namespaces.
///
/// Dereferences to the [`Container`] of the `default` namespace,
/// so registration and resolution can be called on it directly.
///
/// # Example
/// ```
/// use fount::{Fount, function};
///
/// let fount = Fount::new();
/// fount.register("a", 1);
/// fount.container("other").register("b", 2);
/// fount.register("sum", function!(|a, other_b| {
///     Ok(a.as_i64().unwrap_or_default() + other_b.as_i64().unwrap_or_default())
/// }));
///
/// assert_eq!(fount.get("sum").unwrap().as_i64(), Some(3));
/// assert_eq!(fount.containers(), ["default", "other"]);
/// ```
#[derive(Debug, Clone)]
pub struct Fount {
    root: Container,
}

impl Default for Fount {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Fount {
    type Target = Container;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl Fount {
    /// Creates a fount with default options
    #[inline]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates a fount with the given options
    pub fn with_options(options: Options) -> Self {
        let registry = Arc::new(Registry::new(options));
        Self { root: Container::new(registry, DEFAULT_NAMESPACE) }
    }

    /// Creates a fount that falls back to `modules` for unregistered bare keys
    #[inline]
    pub fn with_modules(modules: impl ModuleSource + 'static) -> Self {
        Self::with_options(Options::new().with_modules(modules))
    }

    /// Returns the container bound to the `name` namespace.
    /// The namespace is created on its first registration.
    #[inline]
    pub fn container(&self, name: &str) -> Container {
        Container::new(self.registry().clone(), name)
    }

    /// Namespace names in creation order
    #[inline]
    pub fn containers(&self) -> Vec<String> {
        self.registry().namespaces()
    }

    /// Removes the `namespace` with every registration and cached value
    #[inline]
    pub fn purge(&self, namespace: &str) {
        self.registry().purge(namespace);
    }

    /// Removes every namespace
    #[inline]
    pub fn purge_all(&self) {
        self.registry().purge_all();
    }

    /// Registers every entry of `config` into its namespace
    pub fn configure(&self, config: Configuration) -> &Self {
        for (namespace, key, entry) in config.into_entries() {
            let lifecycle = entry.lifecycle();
            self.container(&namespace)
                .register_with(&key, [] as [&str; 0], entry.into_value(), lifecycle);
        }
        self
    }

    #[inline]
    fn registry(&self) -> &Arc<Registry> {
        self.root.registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entry, ModuleMap, Value, function};

    #[test]
    fn it_lists_containers_in_creation_order() {
        let fount = Fount::new();
        fount.container("b").register("x", 1);
        fount.container("a").register("x", 1);
        fount.register("c.x", 1);

        assert_eq!(fount.containers(), ["b", "a", "c"]);
    }

    #[test]
    fn it_keeps_default_keys_separate() {
        let fount = Fount::new();
        fount.container("other").register("x", 1);

        assert!(fount.keys().is_empty());
        assert_eq!(fount.container("other").keys(), ["x"]);
    }

    #[test]
    fn it_does_not_create_namespaces_on_lookup() {
        let fount = Fount::new();

        assert!(fount.container("ghost").keys().is_empty());
        assert!(!fount.can_resolve("ghost.x"));
        fount.purge("ghost");

        assert!(fount.containers().is_empty());
    }

    #[test]
    fn it_purges_everything() {
        let fount = Fount::new();
        fount.register_scoped("a", 1);
        fount.container("other").register("b", 2);
        fount.get("a").unwrap();

        fount.purge_all();

        assert!(fount.containers().is_empty());
        assert!(fount.scopes().is_empty());
        assert!(fount.lookup("a").unwrap().is_none());
        assert!(fount.get("a").is_err());
    }

    #[test]
    fn it_configures_from_entries() {
        let fount = Fount::new();
        fount.configure(Configuration::new()
            .with("default", "a", 1)
            .with("default", "double", function!(|a| Ok(a.as_i64().unwrap_or_default() * 2)))
            .with_entry("other", "b", Entry::Scoped(Value::from("b"))));

        assert_eq!(fount.get("double").unwrap(), Value::Int(2));
        assert_eq!(fount.get("other.b").unwrap(), Value::from("b"));
        assert_eq!(fount.container("other").scopes(), ["default"]);
    }

    #[test]
    fn it_uses_modules_for_missing_keys() {
        let fount = Fount::with_modules(ModuleMap::new().with("postal", "bus"));

        assert_eq!(fount.get("postal").unwrap(), Value::from("bus"));
        assert_eq!(
            fount.get("wascally").unwrap_err().to_string(),
            "Fount could not resolve the following dependencies: wascally"
        );
    }
}
