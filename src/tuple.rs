//! Ground tuples in two flavors.
//!
//! `Tuple` is an owned inline vector, copied freely. `SharedTuple` is an
//! immutable reference-counted slice whose equality and hash are purely
//! structural, so the same fact can live in a relation and in any number of
//! working tables without being copied, and a set of them never holds two
//! structurally equal tuples.

use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Index into a task's object list.
pub type ObjectId = u32;

/// Value-owned ground tuple.
pub type Tuple = SmallVec<[ObjectId; 4]>;

pub type FxBuildHasher = BuildHasherDefault<FxHasher>;
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
pub type FxHashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Immutable, shared, content-compared ground tuple.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SharedTuple(Arc<[ObjectId]>);

impl SharedTuple {
    pub fn new(values: &[ObjectId]) -> Self {
        SharedTuple(Arc::from(values))
    }

    /// The zero-length tuple; the single row of a table with no columns.
    pub fn unit() -> Self {
        SharedTuple(Arc::from(&[] as &[ObjectId]))
    }

    pub fn as_slice(&self) -> &[ObjectId] {
        &self.0
    }

    pub fn to_tuple(&self) -> Tuple {
        Tuple::from_slice(&self.0)
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &SharedTuple) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// Must agree with `<[ObjectId] as Hash>` so that sets keyed on `SharedTuple`
// can be probed with a borrowed slice.
impl Hash for SharedTuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl Borrow<[ObjectId]> for SharedTuple {
    fn borrow(&self) -> &[ObjectId] {
        &self.0
    }
}

impl Deref for SharedTuple {
    type Target = [ObjectId];

    fn deref(&self) -> &[ObjectId] {
        &self.0
    }
}

impl From<&[ObjectId]> for SharedTuple {
    fn from(values: &[ObjectId]) -> Self {
        SharedTuple::new(values)
    }
}

impl From<Vec<ObjectId>> for SharedTuple {
    fn from(values: Vec<ObjectId>) -> Self {
        SharedTuple(Arc::from(values))
    }
}

impl From<Tuple> for SharedTuple {
    fn from(values: Tuple) -> Self {
        SharedTuple::new(&values)
    }
}

impl FromIterator<ObjectId> for SharedTuple {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        SharedTuple(iter.into_iter().collect())
    }
}

impl fmt::Debug for SharedTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

/// Gather `row[columns[i]]` for each `i` into a fresh tuple.
#[inline]
pub fn project(row: &[ObjectId], columns: &[usize]) -> Tuple {
    columns.iter().map(|&c| row[c]).collect()
}

#[cfg(test)]
#[path = "tests/tuple.rs"]
mod tests;
