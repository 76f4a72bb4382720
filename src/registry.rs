//! Namespaces, key routing and missing dependency detection

use crate::{
    error::Error,
    key::KeyPath,
    options::Options,
    producer::{Lifecycle, Producer, Resolution},
    resolver::make_resolver,
    store::{Definition, ValueStore},
    value::Value
};
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Owns every namespace of a fount
#[derive(Debug, Default)]
pub(crate) struct Registry {
    namespaces: RwLock<IndexMap<String, Arc<ValueStore>>>,
    options: Options,
}

impl Registry {
    #[inline]
    pub(crate) fn new(options: Options) -> Self {
        Self {
            namespaces: RwLock::default(),
            options
        }
    }

    #[inline]
    pub(crate) fn default_scope(&self) -> &str {
        self.options.default_scope()
    }

    #[inline]
    fn store(&self, namespace: &str) -> Option<Arc<ValueStore>> {
        self.namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(namespace)
            .cloned()
    }

    fn store_or_insert(&self, namespace: &str) -> Arc<ValueStore> {
        if let Some(store) = self.store(namespace) {
            return store;
        }
        self.namespaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(namespace.into())
            .or_default()
            .clone()
    }

    /// Registers a producer under `key`, routed from `namespace`.
    ///
    /// If no dependencies are given, the declared params of a function producer are used.
    pub(crate) fn register(
        &self,
        namespace: &str,
        key: &str,
        dependencies: Option<Vec<String>>,
        producer: Producer,
        lifecycle: Lifecycle
    ) {
        let path = KeyPath::route(namespace, key);
        let dependencies = match dependencies {
            Some(dependencies) if !dependencies.is_empty() => dependencies,
            _ => producer.params().to_vec()
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            namespace = %path.namespace,
            key = path.key,
            %lifecycle,
            ?dependencies,
            "registering"
        );

        let resolver = make_resolver(lifecycle, &path.namespace, path.key, producer, dependencies);
        self.store_or_insert(&path.namespace)
            .define(path.key, Definition { lifecycle, resolver });
    }

    /// Resolves `key` routed from `namespace` in `scope`.
    /// Returns `None` if the key is not registered.
    pub(crate) fn resolve(
        &self,
        namespace: &str,
        key: &str,
        scope: &str
    ) -> Result<Option<Resolution>, Error> {
        let path = KeyPath::route(namespace, key);
        match self.store(&path.namespace) {
            Some(store) => store.resolve(self, path.key, scope),
            None => Ok(None)
        }
    }

    /// Returns the requested keys that are not registered,
    /// in the form and order they were requested.
    ///
    /// A missing bare key is looked up in the module source first.
    pub(crate) fn missing_dependencies(&self, namespace: &str, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|key| !self.has_key(namespace, key))
            .cloned()
            .collect()
    }

    #[inline]
    pub(crate) fn can_resolve(&self, namespace: &str, keys: &[String]) -> bool {
        keys.iter().all(|key| self.has_key(namespace, key))
    }

    fn has_key(&self, namespace: &str, key: &str) -> bool {
        let path = KeyPath::route(namespace, key);
        if self.store(&path.namespace).is_some_and(|store| store.has_key(path.key)) {
            return true;
        }
        path.is_bare() && self.register_module(namespace, key).is_some()
    }

    /// Loads `name` from the module source and registers it into `namespace`
    pub(crate) fn register_module(&self, namespace: &str, name: &str) -> Option<Value> {
        let modules = self.options.modules()?;

        #[cfg(feature = "tracing")]
        tracing::trace!(namespace, name, "looking up a module");

        let Some(module) = modules.load(name) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(namespace, name, "module not found");
            return None;
        };

        match Producer::from(module.clone()) {
            Producer::Function(f) => self.register(
                namespace,
                name,
                None,
                Producer::Function(f.external()),
                Lifecycle::Factory
            ),
            producer => self.register(namespace, name, None, producer, Lifecycle::Static)
        }
        Some(module)
    }

    /// Removes a single definition from `namespace`, the key is not routed
    pub(crate) fn drop_key(&self, namespace: &str, key: &str) {
        if let Some(store) = self.store(namespace) {
            #[cfg(feature = "tracing")]
            tracing::debug!(namespace, key, "dropping");
            store.purge_definition(key);
        }
    }

    /// Removes `namespace` with every definition and scope cache it holds
    pub(crate) fn purge(&self, namespace: &str) {
        let removed = self.namespaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(namespace);
        if let Some(store) = removed {
            #[cfg(feature = "tracing")]
            tracing::debug!(namespace, "purging namespace");
            store.purge_all();
        }
    }

    pub(crate) fn purge_scope(&self, namespace: &str, scope: &str) {
        if let Some(store) = self.store(namespace) {
            #[cfg(feature = "tracing")]
            tracing::debug!(namespace, scope, "purging scope");
            store.purge_scope(scope);
        }
    }

    pub(crate) fn purge_all(&self) {
        let namespaces = std::mem::take(
            &mut *self.namespaces
                .write()
                .unwrap_or_else(PoisonError::into_inner)
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(count = namespaces.len(), "purging every namespace");

        for store in namespaces.values() {
            store.purge_all();
        }
    }

    /// Keys registered in `namespace` in registration order
    pub(crate) fn keys(&self, namespace: &str) -> Vec<String> {
        self.store(namespace)
            .map(|store| store.keys())
            .unwrap_or_default()
    }

    /// Populated scopes of `namespace`
    pub(crate) fn scopes(&self, namespace: &str) -> Vec<String> {
        self.store(namespace)
            .map(|store| store.scopes())
            .unwrap_or_default()
    }

    /// Namespace names in creation order
    pub(crate) fn namespaces(&self) -> Vec<String> {
        self.namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
