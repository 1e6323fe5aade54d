//! The dynamically-typed value tree.
//!
//! Scalars are stored inline. Sequences and mappings are shared handles: a
//! clone of a [`Sequence`] or [`Mapping`] (or of any [`Value`] / [`Node`]
//! holding one) points at the same storage, so a mutation made through one
//! handle is visible through every other. Use [`Value::deep_clone`] to get an
//! independent copy.
//!
//! The handles are built on `Rc<RefCell<_>>` and are therefore neither `Send`
//! nor `Sync`. A tree that must be shared between threads has to be guarded
//! and rebuilt by the caller.
//!
//! Inserting a container into itself (directly or through a descendant)
//! creates a reference cycle. Such a tree leaks, and `Debug`, `PartialEq` and
//! encoding recurse without bound on it.
//!
//! [`Node`]: crate::Node

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// A decoded document value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Null, and the placeholder for anything missing.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Only produced for integers above `i64::MAX`.
    Uint(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Sequence(Sequence),
    Mapping(Mapping),
}

impl Value {
    /// Name of the variant, as used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Recursively copies the value so that no container is shared with
    /// `self`.
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::Sequence(seq) => Value::Sequence(seq.deep_clone()),
            Value::Mapping(map) => Value::Mapping(map.deep_clone()),
            scalar => scalar.clone(),
        }
    }
}

/// Shared, mutable, ordered list of values.
#[derive(Clone, Default)]
pub struct Sequence(Rc<RefCell<Vec<Value>>>);

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns the element at `index`. Containers inside are shared, not
    /// copied.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Replaces the element at `index`, returning the previous one. Does
    /// nothing and returns `None` when `index` is out of bounds.
    pub fn replace(&self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let mut items = self.0.borrow_mut();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value.into()))
    }

    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut items = self.0.borrow_mut();
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// True when both handles point at the same storage.
    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn deep_clone(&self) -> Sequence {
        self.0.borrow().iter().map(Value::deep_clone).collect()
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(items: Vec<Value>) -> Self {
        Sequence(Rc::new(RefCell::new(items)))
    }
}

impl<V: Into<Value>> FromIterator<V> for Sequence {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        iter.into_iter().map(Into::into).collect::<Vec<Value>>().into()
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

/// Shared, mutable mapping from string keys to values. Insertion order is
/// kept for encoding; lookups do not depend on it.
#[derive(Clone, Default)]
pub struct Mapping(Rc<RefCell<IndexMap<String, Value>>>);

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    /// Returns the entry for `key`. Containers inside are shared, not copied.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Inserts or overwrites `key`, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().shift_remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &Mapping) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn deep_clone(&self) -> Mapping {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_clone()))
            .collect()
    }

    /// Returns the mapping stored under `key`, inserting a fresh one when the
    /// key is absent or holds anything else.
    pub(crate) fn child_mapping(&self, key: &str) -> Mapping {
        let mut entries = self.0.borrow_mut();
        if let Some(Value::Mapping(child)) = entries.get(key) {
            return child.clone();
        }
        if let Some(previous) = entries.get(key) {
            tracing::trace!(key, kind = previous.kind(), "replacing non-mapping value on path");
        }
        let child = Mapping::new();
        entries.insert(key.to_string(), Value::Mapping(child.clone()));
        child
    }
}

impl From<IndexMap<String, Value>> for Mapping {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Mapping(Rc::new(RefCell::new(entries)))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<IndexMap<String, Value>>()
            .into()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.borrow().iter()).finish()
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, isize, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Uint(v),
        }
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::from(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Sequence(v.into())
    }
}

impl From<Sequence> for Value {
    fn from(v: Sequence) -> Self {
        Value::Sequence(v)
    }
}

impl From<Mapping> for Value {
    fn from(v: Mapping) -> Self {
        Value::Mapping(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<V: Into<Value>> FromIterator<V> for Value {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}
