//! Sorted keyed container with merge-on-collision upserts.
//!
//! [`SortedMergeList`] keeps `(key, value)` pairs in strictly increasing key
//! order inside a single vector. Lookups and upserts locate their slot by
//! binary search; an upsert that hits an existing key combines the stored
//! value with the incoming one through a caller-supplied merge function and
//! leaves every other entry untouched.
//!
//! # Invariants
//!
//! - Keys are unique and strictly increasing
//! - An upsert touches at most one existing entry
//!
//! # Example
//!
//! ```ignore
//! let mut log = SortedMergeList::new();
//! log.upsert_with(F64Key::new(5.0)?, 2_i64, |old, new| *old += new);
//! log.upsert_with(F64Key::new(5.0)?, -1_i64, |old, new| *old += new);
//! assert_eq!(log.get(&F64Key::new(5.0)?), Some(&1));
//! ```

use std::ops::RangeBounds;

#[derive(Debug, Clone, PartialEq)]
pub struct SortedMergeList<K: Ord, V> {
    entries: Vec<(K, V)>,
}

impl<K: Ord, V> Default for SortedMergeList<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

/// Outcome of [`SortedMergeList::upsert_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new entry was inserted at the given position.
    Inserted(usize),
    /// The value at the given position was merged in place.
    Merged(usize),
}

impl Upsert {
    pub fn position(&self) -> usize {
        match *self {
            Upsert::Inserted(i) | Upsert::Merged(i) => i,
        }
    }
}

impl<K: Ord, V> SortedMergeList<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binary search for `key`: `Ok(i)` if present, `Err(i)` with the
    /// insertion point otherwise.
    pub fn position(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }

    /// Inserts `value` at `key`, or merges it into the existing value there.
    ///
    /// `merge(existing, incoming)` mutates the stored value in place.
    pub fn upsert_with<F>(&mut self, key: K, value: V, merge: F) -> Upsert
    where
        F: FnOnce(&mut V, V),
    {
        match self.position(&key) {
            Ok(i) => {
                merge(&mut self.entries[i].1, value);
                Upsert::Merged(i)
            }
            Err(i) => {
                self.entries.insert(i, (key, value));
                Upsert::Inserted(i)
            }
        }
    }

    /// Inserts or replaces the value at `key`, returning the previous one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.position(&key) {
            Ok(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            Err(i) => {
                self.entries.insert(i, (key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).ok().map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.position(key) {
            Ok(i) => Some(&mut self.entries[i].1),
            Err(_) => None,
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.position(key).ok().map(|i| self.entries.remove(i).1)
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Mutable access to the values from position `from` onwards.
    ///
    /// Keys stay immutable so the ordering cannot be broken.
    pub fn values_mut_from(&mut self, from: usize) -> impl Iterator<Item = &mut V> + '_ {
        self.entries.iter_mut().skip(from).map(|(_, v)| v)
    }

    pub fn at(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.first().map(|(k, v)| (k, v))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.entries.last().map(|(k, v)| (k, v))
    }

    /// Last entry whose key is `<= key`.
    pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
        let idx = match self.position(key) {
            Ok(i) => i + 1,
            Err(i) => i,
        };
        idx.checked_sub(1).and_then(|i| self.at(i))
    }

    /// Entries whose keys fall inside `range`, in key order.
    pub fn range<R>(&self, range: R) -> impl Iterator<Item = (&K, &V)> + '_
    where
        R: RangeBounds<K>,
    {
        use std::ops::Bound;
        let lo = match range.start_bound() {
            Bound::Included(k) => self.entries.partition_point(|(x, _)| x < k),
            Bound::Excluded(k) => self.entries.partition_point(|(x, _)| x <= k),
            Bound::Unbounded => 0,
        };
        let hi = match range.end_bound() {
            Bound::Included(k) => self.entries.partition_point(|(x, _)| x <= k),
            Bound::Excluded(k) => self.entries.partition_point(|(x, _)| x < k),
            Bound::Unbounded => self.entries.len(),
        };
        self.entries[lo..hi.max(lo)].iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SortedMergeList<K, V>
where
    V: std::ops::AddAssign,
{
    /// Builds a list by summing values that share a key.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (k, v) in iter {
            list.upsert_with(k, v, |old, new| *old += new);
        }
        list
    }
}
