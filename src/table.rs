//! Working tables used while grounding one action schema.
//!
//! A table pairs a set of rows with `tuple_index`, which names the lifted
//! variable bound by each column. Every row is exactly as long as
//! `tuple_index`; a column is free (joinable, projectable) iff its entry is
//! non-negative.

use crate::tuple::{FxHashSet, ObjectId, SharedTuple, Tuple};

/// Lifted variable id carried by a table column. Negative means "not a
/// variable".
pub type VarIndex = i32;

/// Anything with a column-to-variable map.
pub trait Columns {
    fn tuple_index(&self) -> &[VarIndex];

    fn index_is_variable(&self, column: usize) -> bool {
        self.tuple_index()[column] >= 0
    }

    /// First column bound to `var`.
    fn column_of(&self, var: VarIndex) -> Option<usize> {
        self.tuple_index().iter().position(|&v| v == var)
    }

    fn arity(&self) -> usize {
        self.tuple_index().len()
    }
}

/// Value-owned table with multiset semantics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub tuples: Vec<Tuple>,
    pub tuple_index: Vec<VarIndex>,
}

impl Table {
    pub fn new(tuples: Vec<Tuple>, tuple_index: Vec<VarIndex>) -> Self {
        debug_assert!(tuples.iter().all(|t| t.len() == tuple_index.len()));
        Self {
            tuples,
            tuple_index,
        }
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Collapse duplicate rows into a [`SharedTable`].
    pub fn into_shared(self) -> SharedTable {
        SharedTable {
            tuples: self.tuples.into_iter().map(SharedTuple::from).collect(),
            tuple_index: self.tuple_index,
        }
    }
}

impl Columns for Table {
    fn tuple_index(&self) -> &[VarIndex] {
        &self.tuple_index
    }
}

/// Table of shared tuples with set semantics.
///
/// Rows are reference-counted, so a table built straight from a relation
/// shares the relation's tuples instead of copying them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharedTable {
    pub tuples: FxHashSet<SharedTuple>,
    pub tuple_index: Vec<VarIndex>,
}

impl SharedTable {
    pub fn new(tuples: FxHashSet<SharedTuple>, tuple_index: Vec<VarIndex>) -> Self {
        debug_assert!(tuples.iter().all(|t| t.len() == tuple_index.len()));
        Self {
            tuples,
            tuple_index,
        }
    }

    /// No rows, no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// No rows over the given columns.
    pub fn empty_with_index(tuple_index: Vec<VarIndex>) -> Self {
        Self {
            tuples: FxHashSet::default(),
            tuple_index,
        }
    }

    /// One zero-length row: the "true" table with no columns.
    pub fn unit() -> Self {
        let mut tuples = FxHashSet::default();
        tuples.insert(SharedTuple::unit());
        Self {
            tuples,
            tuple_index: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn insert(&mut self, tuple: SharedTuple) -> bool {
        debug_assert_eq!(tuple.len(), self.tuple_index.len());
        self.tuples.insert(tuple)
    }

    pub fn contains(&self, tuple: &[ObjectId]) -> bool {
        self.tuples.contains(tuple)
    }

    pub fn retain(&mut self, keep: impl FnMut(&SharedTuple) -> bool) {
        self.tuples.retain(keep);
    }

    /// Project onto `vars`, in that order, dropping duplicate rows.
    ///
    /// Variables without a column are skipped.
    pub fn project(&self, vars: &[VarIndex]) -> SharedTable {
        let columns: Vec<usize> = vars.iter().filter_map(|&v| self.column_of(v)).collect();
        if columns.len() == self.tuple_index.len()
            && columns.iter().enumerate().all(|(i, &c)| i == c)
        {
            return self.clone();
        }
        let tuple_index = columns.iter().map(|&c| self.tuple_index[c]).collect();
        let tuples = self
            .tuples
            .iter()
            .map(|t| columns.iter().map(|&c| t[c]).collect())
            .collect();
        SharedTable {
            tuples,
            tuple_index,
        }
    }

    /// Rows as value-owned tuples, in unspecified order.
    pub fn to_table(&self) -> Table {
        Table {
            tuples: self.tuples.iter().map(SharedTuple::to_tuple).collect(),
            tuple_index: self.tuple_index.clone(),
        }
    }
}

impl Columns for SharedTable {
    fn tuple_index(&self) -> &[VarIndex] {
        &self.tuple_index
    }
}

#[cfg(test)]
#[path = "tests/table.rs"]
mod tests;
