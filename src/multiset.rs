use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{MultisetError, MultisetResult};
use crate::ordered_map::OrderedMap;

/// Counts how many times each distinct element was added.
///
/// Backed by an [`OrderedMap`] from element to count, so elements come out in
/// ascending order and equality of elements is decided by `Ord`. A stored
/// count is always at least 1; removing an element drops its entry. Counts
/// saturate at `usize::MAX` instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountingMultiset<K> {
    counts: OrderedMap<K, usize>,
}

impl<K> Default for CountingMultiset<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> CountingMultiset<K> {
    pub fn new() -> Self {
        CountingMultiset {
            counts: OrderedMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CountingMultiset {
            counts: OrderedMap::with_capacity(capacity),
        }
    }

    /// Number of distinct elements, not the sum of their counts
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts
            .values()
            .iter()
            .fold(0, |total: usize, &count| total.saturating_add(count))
    }

    /// Read-only element -> count view
    pub fn as_map(&self) -> &OrderedMap<K, usize> {
        &self.counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.counts.iter().map(|(element, &count)| (element, count))
    }

    /// Copies every (element, count) pair into `destination`.
    pub fn write_into<D>(&self, destination: &mut D)
    where
        K: Clone,
        D: Extend<(K, usize)>,
    {
        destination.extend(self.iter().map(|(element, count)| (element.clone(), count)));
        log::debug!("write_into: copied {} elements", self.len());
    }
}

impl<K: Ord> CountingMultiset<K> {
    pub fn add(&mut self, element: K) {
        match self.counts.get_mut(&element) {
            Some(count) => *count = count.saturating_add(1),
            None => {
                self.counts.put(element, 1);
            }
        }
    }

    pub fn contains(&self, element: &K) -> bool {
        self.counts.contains_key(element)
    }

    /// Merges `source` into this multiset, summing counts of shared elements.
    pub fn add_all(&mut self, source: &CountingMultiset<K>)
    where
        K: Clone,
    {
        let mut merged = 0;
        let mut copied = 0;
        for (element, count) in source.iter() {
            match self.counts.get_mut(element) {
                Some(existing) => {
                    *existing = existing.saturating_add(count);
                    merged += 1;
                }
                None => {
                    self.counts.put(element.clone(), count);
                    copied += 1;
                }
            }
        }
        log::debug!(
            "add_all: {} merged, {} copied, {} distinct",
            merged,
            copied,
            self.len()
        );
    }

    /// Current count of `element`, or [`MultisetError::NotFound`] if it is not tracked.
    pub fn count(&self, element: &K) -> MultisetResult<usize> {
        self.counts
            .get(element)
            .copied()
            .ok_or(MultisetError::NotFound)
    }

    /// Drops `element` entirely and returns the count it had.
    pub fn remove(&mut self, element: &K) -> MultisetResult<usize> {
        self.counts
            .remove(element)
            .ok_or(MultisetError::NotFound)
    }
}

impl<K: Ord> Extend<K> for CountingMultiset<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for element in iter {
            self.add(element);
        }
    }
}

impl<K: Ord> FromIterator<K> for CountingMultiset<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut multiset = CountingMultiset::new();
        multiset.extend(iter);
        multiset
    }
}

impl<K: Serialize> Serialize for CountingMultiset<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.counts.serialize(serializer)
    }
}

impl<'de, K> Deserialize<'de> for CountingMultiset<K>
where
    K: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let counts = OrderedMap::<K, usize>::deserialize(deserializer)?;
        if counts.values().contains(&0) {
            return Err(D::Error::custom("element count must be at least 1"));
        }
        Ok(CountingMultiset { counts })
    }
}
