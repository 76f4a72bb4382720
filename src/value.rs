//! Dynamic values produced by dependencies and passed to producer functions

use crate::{error::Error, function::Function, pending::Pending};
use std::{
    any::{Any, type_name},
    collections::{HashMap, HashSet},
    fmt::{Debug, Formatter},
    sync::Arc
};

pub use self::object::{List, Map};

pub mod object;
mod json;

/// Floats in `[I64_MIN, I64_MAX)` convert to `i64` exactly
const I64_MIN: f64 = i64::MIN as f64;
const I64_MAX: f64 = 9_223_372_036_854_775_808.0;

/// A type-erased value that is shared by reference
pub type Opaque = Arc<
    dyn Any
    + Send
    + Sync
>;

/// A value registered in or resolved from a container.
///
/// [`List`] and [`Map`] are shared by reference: cloning a [`Value`] clones the handle,
/// so every holder observes mutations. Use [`Value::deep_clone`] to take an independent snapshot.
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a value
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Arc<str>),
    List(List),
    Map(Map),
    /// A callable value
    Function(Function),
    /// A value that settles later
    Pending(Pending),
    /// Any other Rust value, copied by identity
    Opaque(Opaque),
}

impl Value {
    /// Wraps an arbitrary Rust value
    #[inline]
    pub fn opaque<T: Send + Sync + 'static>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Value::Pending(_))
    }

    /// Returns `true` for plain data containers
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && (I64_MIN..I64_MAX).contains(f) => Some(*f as i64),
            _ => None
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None
        }
    }

    #[inline]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None
        }
    }

    /// Reads a field of a [`Map`] value, [`Value::Undefined`] otherwise
    pub fn get(&self, key: &str) -> Value {
        self.as_map()
            .and_then(|map| map.get(key))
            .unwrap_or_default()
    }

    /// Downcasts an [`Value::Opaque`] value into a shared pointer to `T`
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, Error> {
        match self {
            Value::Opaque(inner) => inner
                .clone()
                .downcast::<T>()
                .map_err(|_| Error::ResolveFailed(type_name::<T>())),
            _ => Err(Error::ResolveFailed(type_name::<T>()))
        }
    }

    /// Waits until the value is no longer pending
    pub async fn settle(self) -> Result<Value, Error> {
        let mut value = self;
        while let Value::Pending(pending) = value {
            value = pending.await?;
        }
        Ok(value)
    }

    /// Takes a structural copy of plain data.
    ///
    /// Lists and maps are copied recursively, shared sub-objects (including cycles)
    /// stay shared within the copy. Functions, pending and opaque values are copied by identity.
    pub fn deep_clone(&self) -> Value {
        self.deep_clone_with(&mut HashMap::new())
    }

    pub(crate) fn deep_clone_with(&self, seen: &mut HashMap<usize, Value>) -> Value {
        match self {
            Value::List(list) => list.deep_clone_with(seen),
            Value::Map(map) => map.deep_clone_with(seen),
            other => other.clone()
        }
    }
}

impl PartialEq for Value {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, &mut HashSet::new())
    }
}

impl Value {
    pub(crate) fn eq_with(&self, other: &Self, seen: &mut HashSet<(usize, usize)>) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a.eq_with(b, seen),
            (Value::Map(a), Value::Map(b)) => a.eq_with(b, seen),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Pending(a), Value::Pending(b)) => a.ptr_eq(b),
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "{b:?}"),
            Value::Int(i) => write!(f, "{i:?}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(list) => list.fmt(f),
            Value::Map(map) => map.fmt(f),
            Value::Function(func) => func.fmt(f),
            Value::Pending(_) => f.write_str("Pending(..)"),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<()> for Value {
    #[inline]
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($int:ty)*) => {
        $(impl From<$int> for Value {
            #[inline]
            fn from(i: $int) -> Self {
                Value::Int(i as i64)
            }
        })*
    };
}

impl_from_int! { i8 i16 i32 i64 u8 u16 u32 }

impl From<f32> for Value {
    #[inline]
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<List> for Value {
    #[inline]
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Map> for Value {
    #[inline]
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Function> for Value {
    #[inline]
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Pending> for Value {
    #[inline]
    fn from(pending: Pending) -> Self {
        Value::Pending(pending)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    #[inline]
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
