//! Lifecycle strategies that turn a producer into a resolver

use crate::{
    error::Error,
    function::Function,
    pending,
    producer::{Lifecycle, Producer, Resolution},
    registry::Registry,
    store::Store,
    value::Value
};
use std::sync::{Arc, Mutex, PoisonError};

/// A lifecycle-aware closure stored for a registered key.
/// Invoked with the registry, the scope cache recorder of the key and the scope name.
pub(crate) type Resolver = Arc<
    dyn Fn(&Registry, &Store, &str) -> Result<Resolution, Error>
    + Send
    + Sync
>;

/// Builds the resolver of `key` registered in `namespace`
pub(crate) fn make_resolver(
    lifecycle: Lifecycle,
    namespace: &str,
    key: &str,
    producer: Producer,
    dependencies: Vec<String>
) -> Resolver {
    let dependencies: Arc<[String]> = dependencies.into();
    match lifecycle {
        Lifecycle::Static => static_resolver(namespace.into(), producer, dependencies),
        Lifecycle::Scoped => scoped_resolver(namespace.into(), producer, dependencies),
        Lifecycle::Factory => factory_resolver(namespace.into(), key.into(), producer, dependencies),
    }
}

/// Resolves every dependency through the registry and calls `f`.
///
/// If any dependency is pending the result is a single pending value
/// that settles after all of them, otherwise `f` is called right away.
fn resolve_function(
    registry: &Registry,
    namespace: &str,
    f: &Function,
    dependencies: &[String],
    scope: &str
) -> Result<Resolution, Error> {
    let args = dependencies
        .iter()
        .map(|key| registry
            .resolve(namespace, key, scope)?
            .map(Resolution::into_value)
            .ok_or_else(|| Error::Unresolvable(vec![key.clone()])))
        .collect::<Result<Vec<_>, _>>()?;

    if args.iter().any(Value::is_pending) {
        Ok(Resolution::Pending(pending::apply_when(f.clone(), args)))
    } else {
        f.call(args).map(Resolution::from)
    }
}

/// Computes a function producer at most once, after all of its dependencies are registered,
/// and returns that result for every scope afterwards.
/// A function without dependencies is called on every resolution.
fn static_resolver(namespace: Arc<str>, producer: Producer, dependencies: Arc<[String]>) -> Resolver {
    match producer {
        Producer::Function(f) if dependencies.is_empty() => {
            Arc::new(move |_, _, _| f.call(Vec::new()).map(Resolution::from))
        }
        Producer::Function(f) => {
            let resolved: Mutex<Option<Resolution>> = Mutex::new(None);
            Arc::new(move |registry, _, _| {
                // held while computing, concurrent callers wait for the first result
                let mut resolved = resolved.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(resolution) = resolved.as_ref() {
                    return Ok(resolution.clone());
                }
                if !registry.can_resolve(&namespace, &dependencies) {
                    return Ok(Resolution::Unsatisfied(f.clone()));
                }
                let scope = registry.default_scope();
                let resolution = resolve_function(registry, &namespace, &f, &dependencies, scope)?;
                Ok(resolved.insert(resolution).clone())
            })
        }
        Producer::Pending(pending) => Arc::new(move |_, _, _| Ok(Resolution::Pending(pending.clone()))),
        Producer::Value(value) => Arc::new(move |_, _, _| Ok(Resolution::Ready(value.clone()))),
    }
}

/// Computes the producer once per scope and caches a structural copy of the result
fn scoped_resolver(namespace: Arc<str>, producer: Producer, dependencies: Arc<[String]>) -> Resolver {
    match producer {
        Producer::Function(f) => Arc::new(move |registry, store, scope| {
            if !registry.can_resolve(&namespace, &dependencies) {
                return Ok(Resolution::Unsatisfied(f.clone()));
            }
            resolve_function(registry, &namespace, &f, &dependencies, scope)
                .map(|resolution| store.keep(resolution))
        }),
        Producer::Pending(pending) => Arc::new(move |_, store, _| {
            Ok(store.keep(Resolution::Pending(pending.clone())))
        }),
        Producer::Value(value) => Arc::new(move |_, store, _| {
            Ok(store.keep(Resolution::Ready(value.clone())))
        }),
    }
}

/// Calls the producer on every resolution, nothing is cached.
///
/// Dependencies of a function loaded from a module source are routed
/// through the namespace named after its own key.
fn factory_resolver(
    namespace: Arc<str>,
    key: Arc<str>,
    producer: Producer,
    dependencies: Arc<[String]>
) -> Resolver {
    match producer {
        Producer::Function(f) => Arc::new(move |registry, _, scope| {
            let namespace = if f.is_external() { &key } else { &namespace };
            if !registry.can_resolve(namespace, &dependencies) {
                return Ok(Resolution::Unsatisfied(f.clone()));
            }
            resolve_function(registry, namespace, &f, &dependencies, scope)
        }),
        Producer::Pending(pending) => Arc::new(move |_, _, _| Ok(Resolution::Pending(pending.clone()))),
        Producer::Value(value) => Arc::new(move |_, _, _| Ok(Resolution::Ready(value.clone()))),
    }
}
