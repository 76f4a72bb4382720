//! Fount configuration options

use crate::{key::DEFAULT_SCOPE, module::ModuleSource};
use std::{
    fmt::{Debug, Formatter},
    sync::Arc
};

/// Represents fount options
#[derive(Clone)]
pub struct Options {
    /// Scope used by `static` producers and by resolutions without an explicit scope
    ///
    /// Default: `default`
    default_scope: Arc<str>,

    /// Fallback source for unregistered bare keys
    ///
    /// Default: `None`
    modules: Option<Arc<dyn ModuleSource>>,
}

impl Default for Options {
    #[inline]
    fn default() -> Self {
        Self {
            default_scope: DEFAULT_SCOPE.into(),
            modules: None,
        }
    }
}

impl Debug for Options {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("default_scope", &self.default_scope)
            .field("modules", &self.modules.is_some())
            .finish()
    }
}

impl Options {
    /// Creates default options
    ///
    /// Defaults:
    /// - default_scope: `default`
    /// - modules: `None`
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the name of the default scope
    ///
    /// Default: `default`
    pub fn with_default_scope(mut self, scope: impl Into<Arc<str>>) -> Self {
        self.default_scope = scope.into();
        self
    }

    /// Configures a module source used for unregistered bare keys
    ///
    /// Default: `None`
    pub fn with_modules(mut self, modules: impl ModuleSource + 'static) -> Self {
        self.modules = Some(Arc::new(modules));
        self
    }

    #[inline]
    pub fn default_scope(&self) -> &str {
        &self.default_scope
    }

    #[inline]
    pub(crate) fn modules(&self) -> Option<&Arc<dyn ModuleSource>> {
        self.modules.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::Options;
    use crate::module::ModuleMap;

    #[test]
    fn it_creates_default_options() {
        let options = Options::default();

        assert_eq!(options.default_scope(), "default");
        assert!(options.modules().is_none());
    }

    #[test]
    fn it_configures_options() {
        let options = Options::new()
            .with_default_scope("request")
            .with_modules(ModuleMap::new());

        assert_eq!(options.default_scope(), "request");
        assert!(options.modules().is_some());
    }
}
