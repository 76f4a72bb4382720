//! Per-namespace storage of definitions and scope caches

use crate::{
    error::Error,
    pending::Pending,
    producer::{Lifecycle, Resolution},
    registry::Registry,
    resolver::Resolver,
    value::Value
};
use indexmap::{IndexMap, IndexSet};
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard}
};

/// A registered key: its lifecycle and the resolver built for it
pub(crate) struct Definition {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) resolver: Resolver,
}

impl Debug for Definition {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Definition({})", self.lifecycle)
    }
}

/// Definitions and scope caches of a single namespace
#[derive(Debug, Default)]
pub(crate) struct ValueStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    definitions: IndexMap<String, Definition>,
    /// scope name -> key -> cached snapshot
    scopes: IndexMap<String, IndexMap<String, Value>>,
    /// key -> scopes that hold a snapshot of it
    key_scopes: HashMap<String, IndexSet<String>>,
    /// Ticks on every overwrite or purge
    clock: u64,
    /// Last tick a key was overwritten or dropped at
    key_ticks: HashMap<String, u64>,
    /// Last tick a scope was purged at
    scope_ticks: HashMap<String, u64>,
    /// Last tick the whole store was purged at
    purged_at: u64,
}

impl State {
    #[inline]
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// A resolution started at `stamp` may be cached
    /// unless its key, its scope or the whole store changed since
    fn is_current(&self, key: &str, scope: &str, stamp: u64) -> bool {
        self.purged_at <= stamp
            && self.key_ticks.get(key).is_none_or(|&tick| tick <= stamp)
            && self.scope_ticks.get(scope).is_none_or(|&tick| tick <= stamp)
    }

    fn touch_key(&mut self, key: &str) {
        let tick = self.tick();
        self.key_ticks.insert(key.into(), tick);
    }

    fn touch_all(&mut self) {
        self.purged_at = self.tick();
        self.key_ticks.clear();
        self.scope_ticks.clear();
    }

    fn remove_key_scopes(&mut self, key: &str) {
        let Some(scopes) = self.key_scopes.remove(key) else {
            return;
        };
        for scope in scopes {
            if let Some(cache) = self.scopes.get_mut(&scope) {
                cache.shift_remove(key);
            }
        }
    }
}

impl ValueStore {
    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores or overwrites a definition.
    /// Snapshots cached for a previous definition of the key are dropped.
    pub(crate) fn define(&self, key: &str, definition: Definition) {
        let mut state = self.write();
        if state.definitions.insert(key.into(), definition).is_some() {
            state.remove_key_scopes(key);
            state.touch_key(key);
        }
    }

    #[inline]
    pub(crate) fn has_key(&self, key: &str) -> bool {
        self.read().definitions.contains_key(key)
    }

    /// Returns the cached snapshot of `key` in `scope` or runs its resolver.
    ///
    /// The resolver runs without holding the store lock,
    /// so it may resolve other keys of this namespace.
    pub(crate) fn resolve(
        self: &Arc<Self>,
        registry: &Registry,
        key: &str,
        scope: &str
    ) -> Result<Option<Resolution>, Error> {
        let (resolver, stamp) = {
            let state = self.read();
            if let Some(value) = state.scopes.get(scope).and_then(|cache| cache.get(key)) {
                #[cfg(feature = "tracing")]
                tracing::trace!(key, scope, "scope cache hit");
                return Ok(Some(Resolution::Ready(value.clone())));
            }
            let Some(definition) = state.definitions.get(key) else {
                return Ok(None);
            };
            (definition.resolver.clone(), state.clock)
        };

        let store = Store {
            values: Arc::clone(self),
            key: key.into(),
            scope: scope.into(),
            stamp
        };
        resolver(registry, &store, scope).map(Some)
    }

    /// Records a structural copy of `value` for `key` in `scope` and returns the copy.
    /// Nothing is recorded if the key or the scope was purged since `stamp`.
    pub(crate) fn cache(&self, key: &str, value: &Value, scope: &str, stamp: u64) -> Value {
        let snapshot = value.deep_clone();
        let mut state = self.write();
        if state.is_current(key, scope, stamp) {
            state.scopes
                .entry(scope.into())
                .or_default()
                .insert(key.into(), snapshot.clone());
            state.key_scopes
                .entry(key.into())
                .or_default()
                .insert(scope.into());
        }
        snapshot
    }

    /// Removes a definition and every snapshot of it
    pub(crate) fn purge_definition(&self, key: &str) {
        let mut state = self.write();
        state.definitions.shift_remove(key);
        state.remove_key_scopes(key);
        state.touch_key(key);
    }

    pub(crate) fn purge_definitions(&self) {
        let mut state = self.write();
        state.definitions.clear();
        state.touch_all();
    }

    pub(crate) fn purge_scope(&self, scope: &str) {
        let mut state = self.write();
        if let Some(cache) = state.scopes.shift_remove(scope) {
            for key in cache.keys() {
                if let Some(scopes) = state.key_scopes.get_mut(key) {
                    scopes.shift_remove(scope);
                }
            }
        }
        let tick = state.tick();
        state.scope_ticks.insert(scope.into(), tick);
    }

    pub(crate) fn purge_scopes(&self) {
        let mut state = self.write();
        state.scopes.clear();
        state.key_scopes.clear();
        state.touch_all();
    }

    pub(crate) fn purge_all(&self) {
        self.purge_definitions();
        self.purge_scopes();
    }

    /// Registered keys in registration order
    pub(crate) fn keys(&self) -> Vec<String> {
        self.read().definitions.keys().cloned().collect()
    }

    /// Scopes holding at least one snapshot
    pub(crate) fn scopes(&self) -> Vec<String> {
        self.read()
            .scopes
            .iter()
            .filter(|(_, cache)| !cache.is_empty())
            .map(|(scope, _)| scope.clone())
            .collect()
    }
}

/// Records resolved values of a single key into its scope cache
#[derive(Clone)]
pub(crate) struct Store {
    values: Arc<ValueStore>,
    key: Arc<str>,
    scope: Arc<str>,
    stamp: u64,
}

impl Store {
    /// Caches the resolved value and returns the cached copy.
    /// A pending value is cached once it settles.
    pub(crate) fn keep(&self, resolution: Resolution) -> Resolution {
        match resolution {
            Resolution::Ready(value) => Resolution::Ready(self.put(&value)),
            Resolution::Pending(pending) => {
                let store = self.clone();
                Resolution::Pending(Pending::new(async move {
                    let value = pending.await?.settle().await?;
                    Ok(store.put(&value))
                }))
            }
            unsatisfied => unsatisfied,
        }
    }

    #[inline]
    fn put(&self, value: &Value) -> Value {
        self.values.cache(&self.key, value, &self.scope, self.stamp)
    }
}
