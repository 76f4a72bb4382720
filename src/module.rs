//! Module sources used as a fallback for unregistered keys

use crate::value::Value;
use indexmap::IndexMap;

/// A source of externally provided modules.
///
/// When a bare key is requested but not registered, the fount asks its module source
/// for a same-named module. A callable module is registered as a `factory`,
/// anything else as `static`.
///
/// # Example
/// ```
/// use fount::{Fount, ModuleMap, Options};
///
/// let fount = Fount::with_options(Options::new()
///     .with_modules(ModuleMap::new().with("postal", "a message bus")));
///
/// assert!(fount.can_resolve("postal"));
/// ```
pub trait ModuleSource: Send + Sync {
    /// Loads a module by its name
    fn load(&self, name: &str) -> Option<Value>;
}

impl<F> ModuleSource for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync
{
    #[inline]
    fn load(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

/// An in-memory [`ModuleSource`]
#[derive(Debug, Default, Clone)]
pub struct ModuleMap {
    modules: IndexMap<String, Value>,
}

impl ModuleMap {
    /// Creates an empty module map
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module
    pub fn with(mut self, name: impl Into<String>, module: impl Into<Value>) -> Self {
        self.modules.insert(name.into(), module.into());
        self
    }

    /// Names of the available modules
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

impl ModuleSource for ModuleMap {
    #[inline]
    fn load(&self, name: &str) -> Option<Value> {
        self.modules.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_loads_modules_by_name() {
        let modules = ModuleMap::new()
            .with("postal", "bus")
            .with("when", 1);

        assert_eq!(modules.load("postal"), Some(Value::from("bus")));
        assert_eq!(modules.load("wascally"), None);
        assert_eq!(modules.names().collect::<Vec<_>>(), ["postal", "when"]);
    }

    #[test]
    fn it_uses_closures_as_sources() {
        let source = |name: &str| (name == "fs").then(|| Value::from("module"));

        assert_eq!(source.load("fs"), Some(Value::from("module")));
        assert!(source.load("net").is_none());
    }
}
