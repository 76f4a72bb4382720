//! A namespace-bound view of a fount

use crate::{
    error::Error,
    function::Function,
    key::KeyList,
    pending::{self, Aggregate, Pending},
    producer::{Lifecycle, Producer, Resolution},
    registry::Registry,
    value::Value
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Exposes registration and resolution bound to a single namespace and scope.
///
/// Every operation that resolves keys checks all of them up front:
/// if any key is missing, [`Error::Unresolvable`] is returned before anything is computed.
///
/// # Example
/// ```
/// use fount::Fount;
///
/// let fount = Fount::new();
/// let db = fount.container("db");
/// db.register("host", "localhost");
///
/// assert_eq!(db.get("host").unwrap().as_str(), Some("localhost"));
/// assert_eq!(fount.get("db.host").unwrap().as_str(), Some("localhost"));
/// ```
#[derive(Debug, Clone)]
pub struct Container {
    registry: Arc<Registry>,
    namespace: Arc<str>,
    scope: Arc<str>,
}

impl Container {
    pub(crate) fn new(registry: Arc<Registry>, namespace: &str) -> Self {
        let scope = registry.default_scope().into();
        Self {
            registry,
            namespace: namespace.into(),
            scope
        }
    }

    #[inline]
    pub(crate) fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Name of the bound namespace
    #[inline]
    pub fn name(&self) -> &str {
        &self.namespace
    }

    /// Name of the scope used for resolution
    #[inline]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns a view of the same namespace that resolves `scoped` keys in `scope`
    ///
    /// # Example
    /// ```
    /// use fount::{Fount, function};
    /// use std::sync::{Arc, atomic::{AtomicI64, Ordering}};
    ///
    /// let counter = Arc::new(AtomicI64::new(0));
    /// let fount = Fount::new();
    /// fount.register_scoped("next", function!(|| Ok(counter.fetch_add(1, Ordering::SeqCst))));
    ///
    /// let request = fount.in_scope("request");
    /// assert_eq!(fount.get("next").unwrap().as_i64(), Some(0));
    /// assert_eq!(request.get("next").unwrap().as_i64(), Some(1));
    /// assert_eq!(fount.get("next").unwrap().as_i64(), Some(0));
    /// ```
    pub fn in_scope(&self, scope: impl Into<Arc<str>>) -> Self {
        Self {
            registry: self.registry.clone(),
            namespace: self.namespace.clone(),
            scope: scope.into()
        }
    }

    /// Registers a `static` producer
    #[inline]
    pub fn register(&self, key: &str, producer: impl Into<Value>) -> &Self {
        self.register_with(key, [] as [&str; 0], producer, Lifecycle::Static)
    }

    /// Registers a `scoped` producer
    #[inline]
    pub fn register_scoped(&self, key: &str, producer: impl Into<Value>) -> &Self {
        self.register_with(key, [] as [&str; 0], producer, Lifecycle::Scoped)
    }

    /// Registers a `factory` producer
    #[inline]
    pub fn register_factory(&self, key: &str, producer: impl Into<Value>) -> &Self {
        self.register_with(key, [] as [&str; 0], producer, Lifecycle::Factory)
    }

    /// Registers a producer with explicit dependency keys.
    ///
    /// When `dependencies` is empty, the declared params of a function producer are used.
    ///
    /// # Example
    /// ```
    /// use fount::{Fount, Function, Lifecycle, Value};
    ///
    /// let fount = Fount::new();
    /// fount.register("name", "fount");
    /// fount.register_with("greeting", ["name"], Function::new(["who"], |args: Vec<Value>| {
    ///     Ok(format!("hello, {}", args[0].as_str().unwrap_or_default()))
    /// }), Lifecycle::Factory);
    ///
    /// assert_eq!(fount.get("greeting").unwrap().as_str(), Some("hello, fount"));
    /// ```
    pub fn register_with(
        &self,
        key: &str,
        dependencies: impl KeyList,
        producer: impl Into<Value>,
        lifecycle: Lifecycle
    ) -> &Self {
        self.registry.register(
            &self.namespace,
            key,
            Some(dependencies.to_keys()),
            Producer::from(producer.into()),
            lifecycle
        );
        self
    }

    /// Registers a value that is returned as is.
    /// A function registered this way is never invoked by the container.
    pub fn register_as_value(&self, key: &str, value: impl Into<Value>) -> &Self {
        let value = match value.into() {
            Value::Function(f) => Value::Function(f.stub()),
            other => other
        };
        self.register(key, value)
    }

    /// Loads `name` from the configured [`ModuleSource`](crate::ModuleSource) and registers it.
    /// Returns `None` if there is no module source or it has no such module.
    #[inline]
    pub fn register_module(&self, name: &str) -> Option<Value> {
        self.registry.register_module(&self.namespace, name)
    }

    /// Resolves a key into a [`Pending`] value.
    ///
    /// A producer failure rejects the pending value,
    /// a missing key fails right away.
    pub fn resolve(&self, key: &str) -> Result<Pending, Error> {
        self.ensure(&[key.to_owned()])?;
        Ok(match self.lookup(key) {
            Ok(resolution) => resolution
                .map(Resolution::into_pending)
                .unwrap_or_else(|| Pending::ready(Ok(Value::Undefined))),
            Err(err) => Pending::ready(Err(err))
        })
    }

    /// Resolves every key and settles them into a single map keyed in request order
    ///
    /// # Example
    /// ```
    /// use fount::Fount;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let fount = Fount::new();
    /// fount.register("a", 1);
    /// fount.register("b", 2);
    ///
    /// let values = fount.resolve_all(["a", "b"]).unwrap().await.unwrap();
    /// assert_eq!(values["b"].as_i64(), Some(2));
    /// # }
    /// ```
    pub fn resolve_all(&self, keys: impl KeyList) -> Result<Aggregate, Error> {
        let keys = keys.to_keys();
        self.ensure(&keys)?;
        let entries = keys
            .into_iter()
            .map(|key| {
                let value = self.lookup_value(&key);
                (key, value)
            })
            .collect();
        Ok(pending::when_keys(entries))
    }

    /// Resolves a key into a plain value.
    /// A dependency that settles later is returned as [`Value::Pending`].
    pub fn get(&self, key: &str) -> Result<Value, Error> {
        self.ensure(&[key.to_owned()])?;
        self.lookup_value(key)
    }

    /// Resolves every key into plain values keyed in request order
    pub fn get_all(&self, keys: impl KeyList) -> Result<IndexMap<String, Value>, Error> {
        let keys = keys.to_keys();
        self.ensure(&keys)?;
        keys.into_iter()
            .map(|key| {
                let value = self.lookup_value(&key)?;
                Ok((key, value))
            })
            .collect()
    }

    /// Resolves the declared params of `f`, waits for all of them to settle,
    /// then calls `f` and settles its result
    #[inline]
    pub fn inject(&self, f: Function) -> Result<Pending, Error> {
        let keys = f.params().to_vec();
        self.inject_with(keys, f)
    }

    /// Same as [`Container::inject`] but resolves `dependencies` instead of the declared params.
    /// An empty list falls back to the declared params.
    pub fn inject_with(&self, dependencies: impl KeyList, f: Function) -> Result<Pending, Error> {
        let keys = dependencies_of(dependencies, &f);
        self.ensure(&keys)?;
        Ok(match self.lookup_args(&keys) {
            Ok(args) => pending::apply_when(f, args),
            Err(err) => Pending::ready(Err(err))
        })
    }

    /// Resolves the declared params of `f` and calls it right away.
    /// Arguments that settle later are passed as [`Value::Pending`].
    #[inline]
    pub fn invoke(&self, f: Function) -> Result<Value, Error> {
        let keys = f.params().to_vec();
        self.invoke_with(keys, f)
    }

    /// Same as [`Container::invoke`] but resolves `dependencies` instead of the declared params.
    /// An empty list falls back to the declared params.
    pub fn invoke_with(&self, dependencies: impl KeyList, f: Function) -> Result<Value, Error> {
        let keys = dependencies_of(dependencies, &f);
        self.ensure(&keys)?;
        f.call(self.lookup_args(&keys)?)
    }

    /// Returns `true` if every key is registered or can be loaded from the module source
    #[inline]
    pub fn can_resolve(&self, keys: impl KeyList) -> bool {
        self.registry.can_resolve(&self.namespace, &keys.to_keys())
    }

    /// Returns the keys that are not registered, as requested
    #[inline]
    pub fn missing(&self, keys: impl KeyList) -> Vec<String> {
        self.registry.missing_dependencies(&self.namespace, &keys.to_keys())
    }

    /// Resolves a key without checking it first.
    /// Returns `None` if it is not registered.
    #[inline]
    pub fn lookup(&self, key: &str) -> Result<Option<Resolution>, Error> {
        self.registry.resolve(&self.namespace, key, &self.scope)
    }

    /// Keys registered in this namespace in registration order
    #[inline]
    pub fn keys(&self) -> Vec<String> {
        self.registry.keys(&self.namespace)
    }

    /// Scopes of this namespace that hold cached values
    #[inline]
    pub fn scopes(&self) -> Vec<String> {
        self.registry.scopes(&self.namespace)
    }

    /// Removes this namespace with every registration and cached value
    #[inline]
    pub fn purge(&self) {
        self.registry.purge(&self.namespace);
    }

    /// Drops every value cached in `scope`
    #[inline]
    pub fn purge_scope(&self, scope: &str) {
        self.registry.purge_scope(&self.namespace, scope);
    }

    /// Removes a single registration of this namespace
    #[inline]
    pub fn drop(&self, key: &str) {
        self.registry.drop_key(&self.namespace, key);
    }

    fn ensure(&self, keys: &[String]) -> Result<(), Error> {
        let missing = self.registry.missing_dependencies(&self.namespace, keys);
        if missing.is_empty() {
            Ok(())
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(namespace = %self.namespace, ?missing, "unresolvable dependencies");
            Err(Error::Unresolvable(missing))
        }
    }

    #[inline]
    fn lookup_value(&self, key: &str) -> Result<Value, Error> {
        self.lookup(key).map(|resolution| resolution
            .map(Resolution::into_value)
            .unwrap_or_default())
    }

    fn lookup_args(&self, keys: &[String]) -> Result<Vec<Value>, Error> {
        keys.iter()
            .map(|key| self.lookup_value(key))
            .collect()
    }
}

#[inline]
fn dependencies_of(dependencies: impl KeyList, f: &Function) -> Vec<String> {
    let keys = dependencies.to_keys();
    if keys.is_empty() {
        f.params().to_vec()
    } else {
        keys
    }
}
