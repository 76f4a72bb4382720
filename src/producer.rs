//! Producers, lifecycles and resolution outcomes

use crate::{error::Error, function::Function, pending::Pending, value::Value};
use std::{
    fmt::{Display, Formatter},
    str::FromStr
};

/// What backs a registered key
#[derive(Debug, Clone)]
pub enum Producer {
    /// A plain value, returned as is
    Value(Value),
    /// A value that settles later
    Pending(Pending),
    /// A function invoked with its resolved dependencies
    Function(Function),
}

impl Producer {
    /// Dependency names declared by a function producer
    pub fn params(&self) -> &[String] {
        match self {
            Producer::Function(f) => f.params(),
            _ => &[]
        }
    }

    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Producer::Function(_))
    }
}

impl From<Value> for Producer {
    /// Classifies a value: a stub function is a plain value
    fn from(value: Value) -> Self {
        match value {
            Value::Pending(pending) => Producer::Pending(pending),
            Value::Function(f) if !f.is_stub() => Producer::Function(f),
            other => Producer::Value(other)
        }
    }
}

/// Caching policy of a registered key
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Computed once, shared across every scope
    #[default]
    Static,
    /// Computed once per scope, cached as a structural copy
    Scoped,
    /// Computed on every resolution
    Factory,
}

impl Lifecycle {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Static => "static",
            Lifecycle::Scoped => "scoped",
            Lifecycle::Factory => "factory",
        }
    }
}

impl Display for Lifecycle {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifecycle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Lifecycle::Static),
            "scoped" => Ok(Lifecycle::Scoped),
            "factory" => Ok(Lifecycle::Factory),
            other => Err(Error::InvalidLifecycle(other.into()))
        }
    }
}

/// The outcome of resolving a single key
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The value is available now
    Ready(Value),
    /// The value settles later
    Pending(Pending),
    /// The producer's dependencies are not registered yet.
    /// Resolving again after they are registered performs the computation.
    Unsatisfied(Function),
}

impl Resolution {
    /// Turns the outcome into a value.
    /// An unsatisfied producer resolves to the producer function itself.
    pub fn into_value(self) -> Value {
        match self {
            Resolution::Ready(value) => value,
            Resolution::Pending(pending) => Value::Pending(pending),
            Resolution::Unsatisfied(f) => Value::Function(f),
        }
    }

    /// Turns the outcome into a [`Pending`] value
    pub fn into_pending(self) -> Pending {
        match self {
            Resolution::Pending(pending) => pending,
            other => Pending::ready(Ok(other.into_value())),
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Resolution::Ready(_))
    }

    #[inline]
    pub fn is_unsatisfied(&self) -> bool {
        matches!(self, Resolution::Unsatisfied(_))
    }
}

impl From<Value> for Resolution {
    #[inline]
    fn from(value: Value) -> Self {
        match value {
            Value::Pending(pending) => Resolution::Pending(pending),
            other => Resolution::Ready(other)
        }
    }
}
