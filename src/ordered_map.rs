use std::cmp::Ordering;
use std::fmt;
use std::iter::Zip;
use std::marker::PhantomData;
use std::{slice, vec};

use itertools::Itertools;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{MapError, MapResult};

/// Borrowing iterator over `(&K, &V)` pairs in ascending key order
pub type Iter<'a, K, V> = Zip<slice::Iter<'a, K>, slice::Iter<'a, V>>;

/// Owning iterator over `(K, V)` pairs in ascending key order
pub type IntoIter<K, V> = Zip<vec::IntoIter<K>, vec::IntoIter<V>>;

/// A map that keeps its keys sorted without hashing or tree balancing.
///
/// Keys and values live in two index-aligned vectors: `keys[i]` maps to
/// `values[i]`, and `keys` is strictly ascending under `K: Ord`. Every
/// lookup and mutation is a linear scan over the keys, so all operations
/// are O(n) in the number of stored keys.
///
/// Key equality is decided by the ordering (`cmp == Equal`), so two
/// separately built keys with the same contents always find each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderedMap<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        OrderedMap {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in ascending order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Values in the order of their keys
    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.keys.iter().zip(self.values.iter())
    }

    /// Checked enumeration of every entry in ascending key order.
    ///
    /// Fails with [`MapError::InvariantViolation`] instead of pairing up
    /// mismatched data if the key and value storage ever diverge in length.
    pub fn entries(&self) -> MapResult<Vec<(&K, &V)>> {
        if self.keys.len() != self.values.len() {
            return Err(MapError::out_of_sync(self.keys.len(), self.values.len()));
        }
        Ok(self.iter().collect())
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.keys.first().zip(self.values.first())
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.keys.last().zip(self.values.last())
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values.contains(value)
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Linear search over the sorted keys.
    ///
    /// Returns `Ok(index)` of the equal key, or `Err(index)` of the first key
    /// ordered after `key` (the length when every key orders before it).
    fn search(&self, key: &K) -> Result<usize, usize> {
        for (index, existing) in self.keys.iter().enumerate() {
            match key.cmp(existing) {
                Ordering::Equal => return Ok(index),
                Ordering::Less => return Err(index),
                Ordering::Greater => {}
            }
        }
        Err(self.keys.len())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match self.search(key) {
            Ok(index) => Some(&self.values[index]),
            Err(_) => None,
        }
    }

    /// Mutable access to a value. Keys are never handed out mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.search(key) {
            Ok(index) => Some(&mut self.values[index]),
            Err(_) => None,
        }
    }

    /// Insert or update.
    ///
    /// If an equal key is already stored its value is replaced and the old
    /// value returned. Otherwise the pair goes in front of the first key that
    /// orders after `key` (index 0 for a new minimum, the end for a new
    /// maximum) and `None` is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let previous = match self.search(&key) {
            Ok(index) => {
                log::trace!("put: replacing value at index {}", index);
                Some(std::mem::replace(&mut self.values[index], value))
            }
            Err(index) => {
                log::trace!("put: inserting new key at index {} of {}", index, self.keys.len());
                self.keys.insert(index, key);
                self.values.insert(index, value);
                None
            }
        };
        debug_assert!(self.is_strictly_ascending());
        debug_assert_eq!(self.keys.len(), self.values.len());
        previous
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.search(key).ok()?;
        log::trace!("remove: dropping entry at index {}", index);
        self.keys.remove(index);
        Some(self.values.remove(index))
    }

    /// Puts every pair of `source` in the source's own iteration order.
    ///
    /// Each pair goes through [`OrderedMap::put`], so the map is valid after
    /// every single step and later duplicates replace earlier ones.
    pub fn put_all<I>(&mut self, source: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut inserted = 0;
        let mut replaced = 0;
        for (key, value) in source {
            match self.put(key, value) {
                Some(_) => replaced += 1,
                None => inserted += 1,
            }
        }
        log::debug!(
            "put_all: {} inserted, {} replaced, {} total",
            inserted,
            replaced,
            self.len()
        );
    }

    /// True when no two adjacent keys are out of order or equal
    pub fn is_strictly_ascending(&self) -> bool {
        self.keys.iter().tuple_windows().all(|(a, b)| a < b)
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        map.put_all(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}

// Serde support: a plain map on the wire, entries in ascending key order.

impl<K, V> Serialize for OrderedMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<K, V> {
    marker: PhantomData<fn() -> OrderedMap<K, V>>,
}

impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // Input order is untrusted; put() restores sorting and drops duplicates.
        let mut map = OrderedMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            map.put(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor {
            marker: PhantomData,
        })
    }
}
