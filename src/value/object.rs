//! Shared plain-data containers

use super::Value;
use indexmap::IndexMap;
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt::{Debug, Formatter},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard}
};

/// An insertion-ordered map of values, shared by reference
#[derive(Clone, Default)]
pub struct Map(Arc<RwLock<IndexMap<String, Value>>>);

/// A sequence of values, shared by reference
#[derive(Clone, Default)]
pub struct List(Arc<RwLock<Vec<Value>>>);

impl Map {
    /// Creates an empty map
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Value>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Value>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Inserts or overwrites a field, returning the previous value
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.write().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Field names in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// A shallow copy of the entries
    pub fn entries(&self) -> IndexMap<String, Value> {
        self.read().clone()
    }

    /// Returns `true` if both handles point to the same map
    #[inline]
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(super) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub(super) fn deep_clone_with(&self, seen: &mut HashMap<usize, Value>) -> Value {
        if let Some(copy) = seen.get(&self.addr()) {
            return copy.clone();
        }
        let copy = Map::new();
        seen.insert(self.addr(), Value::Map(copy.clone()));

        let entries = self.entries();
        let mut fields = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            fields.insert(key, value.deep_clone_with(seen));
        }
        *copy.write() = fields;
        Value::Map(copy)
    }
}

impl List {
    /// Creates an empty list
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Vec<Value>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.read().get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.write().push(value.into());
    }

    /// Overwrites an item, returns `false` if the index is out of bounds
    pub fn set(&self, index: usize, value: impl Into<Value>) -> bool {
        match self.write().get_mut(index) {
            Some(item) => {
                *item = value.into();
                true
            }
            None => false
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// A shallow copy of the items
    pub fn to_vec(&self) -> Vec<Value> {
        self.read().clone()
    }

    /// Returns `true` if both handles point to the same list
    #[inline]
    pub fn ptr_eq(&self, other: &List) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(super) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub(super) fn deep_clone_with(&self, seen: &mut HashMap<usize, Value>) -> Value {
        if let Some(copy) = seen.get(&self.addr()) {
            return copy.clone();
        }
        let copy = List::new();
        seen.insert(self.addr(), Value::List(copy.clone()));

        let items = self
            .to_vec()
            .iter()
            .map(|item| item.deep_clone_with(seen))
            .collect();
        *copy.write() = items;
        Value::List(copy)
    }
}

impl Map {
    /// Compares by content. A pair of maps met again while comparing
    /// their own fields is treated as equal.
    pub(super) fn eq_with(&self, other: &Map, seen: &mut HashSet<(usize, usize)>) -> bool {
        if self.ptr_eq(other) || !seen.insert((self.addr(), other.addr())) {
            return true;
        }
        let (lhs, rhs) = (self.entries(), other.entries());
        lhs.len() == rhs.len() && lhs
            .iter()
            .all(|(key, value)| rhs.get(key).is_some_and(|other| value.eq_with(other, seen)))
    }

    fn fmt_with(&self, f: &mut Formatter<'_>, path: &RefCell<Vec<usize>>) -> std::fmt::Result {
        let Some(_visit) = Visit::enter(path, self.addr()) else {
            return f.write_str(CIRCULAR);
        };
        let entries = self.entries();
        f.debug_map()
            .entries(entries.iter().map(|(key, value)| (key, Nested { value, path })))
            .finish()
    }
}

impl List {
    /// Compares by content. A pair of lists met again while comparing
    /// their own items is treated as equal.
    pub(super) fn eq_with(&self, other: &List, seen: &mut HashSet<(usize, usize)>) -> bool {
        if self.ptr_eq(other) || !seen.insert((self.addr(), other.addr())) {
            return true;
        }
        let (lhs, rhs) = (self.to_vec(), other.to_vec());
        lhs.len() == rhs.len() && lhs
            .iter()
            .zip(&rhs)
            .all(|(value, other)| value.eq_with(other, seen))
    }

    fn fmt_with(&self, f: &mut Formatter<'_>, path: &RefCell<Vec<usize>>) -> std::fmt::Result {
        let Some(_visit) = Visit::enter(path, self.addr()) else {
            return f.write_str(CIRCULAR);
        };
        let items = self.to_vec();
        f.debug_list()
            .entries(items.iter().map(|value| Nested { value, path }))
            .finish()
    }
}

/// Rendered in place of a list or map that contains itself
pub(super) const CIRCULAR: &str = "[Circular]";

/// Marks a list or map as being walked until dropped
pub(super) struct Visit<'a> {
    path: &'a RefCell<Vec<usize>>,
}

impl<'a> Visit<'a> {
    /// Returns `None` if `addr` is already being walked
    pub(super) fn enter(path: &'a RefCell<Vec<usize>>, addr: usize) -> Option<Self> {
        let mut visiting = path.borrow_mut();
        if visiting.contains(&addr) {
            return None;
        }
        visiting.push(addr);
        Some(Self { path })
    }
}

impl Drop for Visit<'_> {
    fn drop(&mut self) {
        self.path.borrow_mut().pop();
    }
}

/// A value nested in a list or map being formatted
struct Nested<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<usize>>,
}

impl Debug for Nested<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Value::List(list) => list.fmt_with(f, self.path),
            Value::Map(map) => map.fmt_with(f, self.path),
            other => other.fmt(f)
        }
    }
}

impl PartialEq for Map {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, &mut HashSet::new())
    }
}

impl PartialEq for List {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, &mut HashSet::new())
    }
}

impl Debug for Map {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_with(f, &RefCell::default())
    }
}

impl Debug for List {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_with(f, &RefCell::default())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<IndexMap<_, _>>();
        Self(Arc::new(RwLock::new(fields)))
    }
}

impl<T: Into<Value>> FromIterator<T> for List {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items = iter.into_iter().map(Into::into).collect::<Vec<_>>();
        Self(Arc::new(RwLock::new(items)))
    }
}

impl From<IndexMap<String, Value>> for Map {
    #[inline]
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self(Arc::new(RwLock::new(fields)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_keeps_insertion_order() {
        let map = Map::from_iter([("z", 1), ("a", 2), ("m", 3)]);

        assert_eq!(map.keys(), vec!["z", "a", "m"]);
    }

    #[test]
    fn it_compares_maps_by_content() {
        let a = Map::from_iter([("x", 1), ("y", 2)]);
        let b = Map::from_iter([("y", 2), ("x", 1)]);

        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn it_overwrites_list_items() {
        let list = List::from_iter(["a", "b"]);

        assert!(list.set(1, "c"));
        assert!(!list.set(5, "d"));
        assert_eq!(list.to_vec(), vec![Value::from("a"), Value::from("c")]);
    }

    #[test]
    fn it_removes_fields() {
        let map = Map::from_iter([("x", 1)]);

        assert_eq!(map.remove("x"), Some(Value::Int(1)));
        assert!(map.is_empty());
    }

    #[test]
    fn it_compares_and_prints_cycles() {
        let a = Map::from_iter([("x", 1)]);
        a.insert("me", a.clone());
        let b = Map::from_iter([("x", 1)]);
        b.insert("me", b.clone());
        let list = List::from_iter([1]);
        list.push(list.clone());

        assert_eq!(a, b);
        assert_ne!(a, Map::from_iter([("x", 1)]));
        assert_eq!(format!("{a:?}"), r#"{"x": 1, "me": [Circular]}"#);
        assert_eq!(format!("{list:?}"), "[1, [Circular]]");
    }

    #[test]
    fn it_prints_shared_objects_in_full() {
        let inner = List::from_iter([1]);
        let outer = List::from_iter([inner.clone(), inner]);

        assert_eq!(format!("{outer:?}"), "[[1], [1]]");
    }
}
