//! Bulk registration from a declarative configuration

use crate::{
    error::Error,
    producer::{Lifecycle, Producer},
    value::Value
};
use indexmap::IndexMap;
use serde_json::Value as Json;
use std::str::FromStr;

/// A single configured registration
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Static(Value),
    Scoped(Value),
    Factory(Value),
    /// Registered as `factory` if callable, `static` otherwise
    Plain(Value),
}

impl Entry {
    /// Lifecycle the entry is registered with
    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            Entry::Static(_) => Lifecycle::Static,
            Entry::Scoped(_) => Lifecycle::Scoped,
            Entry::Factory(_) => Lifecycle::Factory,
            Entry::Plain(value) if Producer::from(value.clone()).is_callable() => Lifecycle::Factory,
            Entry::Plain(_) => Lifecycle::Static,
        }
    }

    #[inline]
    pub fn into_value(self) -> Value {
        match self {
            Entry::Static(value)
            | Entry::Scoped(value)
            | Entry::Factory(value)
            | Entry::Plain(value) => value
        }
    }

    /// An object with a `scoped`, `static` or `factory` field selects that lifecycle
    /// in this order of precedence, other fields are ignored.
    /// Anything else is a plain value.
    fn from_json(json: Json) -> Self {
        let Json::Object(mut object) = json else {
            return Entry::Plain(json.into());
        };
        for (name, variant) in [
            ("scoped", Entry::Scoped as fn(Value) -> Entry),
            ("static", Entry::Static),
            ("factory", Entry::Factory)
        ] {
            if let Some(value) = object.remove(name) {
                return variant(value.into());
            }
        }
        Entry::Plain(Json::Object(object).into())
    }
}

impl From<Value> for Entry {
    #[inline]
    fn from(value: Value) -> Self {
        Entry::Plain(value)
    }
}

/// Registrations grouped by namespace, applied with [`Fount::configure`](crate::Fount::configure)
///
/// # Example
/// ```
/// use fount::{Configuration, Fount};
///
/// let config: Configuration = r#"{
///     "default": { "a": 1, "b": { "scoped": 2 } },
///     "other": { "c": "three" }
/// }"#.parse().unwrap();
///
/// let fount = Fount::new();
/// fount.configure(config);
///
/// assert_eq!(fount.get("b").unwrap().as_i64(), Some(2));
/// assert_eq!(fount.get("other.c").unwrap().as_str(), Some("three"));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Configuration {
    namespaces: IndexMap<String, IndexMap<String, Entry>>,
}

impl Configuration {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain value for `key` in `namespace`
    #[inline]
    pub fn with(
        self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>
    ) -> Self {
        self.with_entry(namespace, key, Entry::Plain(value.into()))
    }

    /// Adds an entry for `key` in `namespace`
    pub fn with_entry(
        mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        entry: Entry
    ) -> Self {
        self.namespaces
            .entry(namespace.into())
            .or_default()
            .insert(key.into(), entry);
        self
    }

    /// Builds a configuration from a JSON object of namespaces
    pub fn from_json(json: Json) -> Result<Self, Error> {
        let Json::Object(namespaces) = json else {
            return Err(Error::Config("expected an object of namespaces".into()));
        };
        namespaces
            .into_iter()
            .try_fold(Self::new(), |config, (namespace, entries)| {
                let Json::Object(entries) = entries else {
                    return Err(Error::Config(format!("expected an object of entries in `{namespace}`")));
                };
                Ok(entries.into_iter().fold(config, |config, (key, json)| {
                    config.with_entry(namespace.as_str(), key, Entry::from_json(json))
                }))
            })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Entries as `(namespace, key, entry)` in insertion order
    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, String, Entry)> {
        self.namespaces
            .into_iter()
            .flat_map(|(namespace, entries)| entries
                .into_iter()
                .map(move |(key, entry)| (namespace.clone(), key, entry)))
    }
}

impl FromStr for Configuration {
    type Err = Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(serde_json::from_str(s)?)
    }
}
