//! Hash join over working tables.
//!
//! The left table drives the build phase: its rows are indexed by their key
//! columns. Each right row is then projected onto its own key columns and
//! probed. When the tables share no variable the join degenerates to a cross
//! product.

use crate::columns::{match_columns, natural_columns, relevant_columns, ColumnMatch, KeptColumns};
use crate::table::{SharedTable, Table, VarIndex};
use crate::trace::trace;
use crate::tuple::{project, FxHashMap, FxHashSet, ObjectId, SharedTuple, Tuple};
use smallvec::SmallVec;

/// Natural join of two value-owned tables.
///
/// Output rows are `a`'s columns followed by `b`'s non-key columns. Duplicate
/// rows are kept.
pub fn hash_join(a: &Table, b: &Table) -> Table {
    let key = match_columns(a, b);
    let kept = natural_columns(a, b, &key);
    let tuple_index = kept.output_index(a, b);
    if a.is_empty() || b.is_empty() {
        return Table::new(Vec::new(), tuple_index);
    }

    let left: Vec<&[ObjectId]> = a.tuples.iter().map(|t| t.as_slice()).collect();
    let right: Vec<&[ObjectId]> = b.tuples.iter().map(|t| t.as_slice()).collect();
    let mut tuples = Vec::new();
    join_rows(&left, &right, &key, &kept, |row| tuples.push(Tuple::from_slice(row)));

    trace!(
        left = a.len(),
        right = b.len(),
        keys = key.len(),
        out = tuples.len(),
        "hash_join"
    );
    Table::new(tuples, tuple_index)
}

/// Natural join of two shared tables, without projection.
pub fn hash_join_shared(a: &SharedTable, b: &SharedTable) -> SharedTable {
    let key = match_columns(a, b);
    let kept = natural_columns(a, b, &key);
    join_shared(a, b, &key, &kept)
}

/// Join `a` and `b`, keeping only the columns of variables in `required`.
///
/// The result is the natural join projected onto `required`, with duplicate
/// rows removed. When nothing is kept the result has no columns: one empty
/// row if the join is non-empty, none otherwise.
pub fn hash_join_projected(a: &SharedTable, b: &SharedTable, required: &[VarIndex]) -> SharedTable {
    hash_join_projected_keyed(a, b, required).0
}

/// [`hash_join_projected`], also returning the number of key columns.
pub(crate) fn hash_join_projected_keyed(
    a: &SharedTable,
    b: &SharedTable,
    required: &[VarIndex],
) -> (SharedTable, usize) {
    let key = match_columns(a, b);
    let kept = relevant_columns(a, b, required);
    (join_shared(a, b, &key, &kept), key.len())
}

fn join_shared(a: &SharedTable, b: &SharedTable, key: &ColumnMatch, kept: &KeptColumns) -> SharedTable {
    let tuple_index = kept.output_index(a, b);
    if a.is_empty() || b.is_empty() {
        return SharedTable::empty_with_index(tuple_index);
    }
    if key.is_empty() && kept.is_empty() {
        return SharedTable::unit();
    }

    let left: Vec<&[ObjectId]> = a.tuples.iter().map(|t| t.as_slice()).collect();
    let right: Vec<&[ObjectId]> = b.tuples.iter().map(|t| t.as_slice()).collect();
    let mut tuples: FxHashSet<SharedTuple> = FxHashSet::default();
    join_rows(&left, &right, key, kept, |row| {
        if !tuples.contains(row) {
            tuples.insert(SharedTuple::new(row));
        }
    });

    trace!(
        left = a.len(),
        right = b.len(),
        keys = key.len(),
        out = tuples.len(),
        "hash_join_projected"
    );
    SharedTable::new(tuples, tuple_index)
}

/// Emit every joined row, built from the kept columns of both sides.
fn join_rows<F>(
    left: &[&[ObjectId]],
    right: &[&[ObjectId]],
    key: &ColumnMatch,
    kept: &KeptColumns,
    mut emit: F,
) where
    F: FnMut(&[ObjectId]),
{
    let mut out = Tuple::new();
    let write = |l: &[ObjectId], r: &[ObjectId], out: &mut Tuple| {
        out.clear();
        out.extend(kept.left.iter().map(|&i| l[i]));
        out.extend(kept.right.iter().map(|&j| r[j]));
    };

    if key.is_empty() {
        for &l in left {
            for &r in right {
                write(l, r, &mut out);
                emit(&out);
            }
        }
        return;
    }

    let mut index: FxHashMap<Tuple, SmallVec<[&[ObjectId]; 2]>> = FxHashMap::default();
    for &l in left {
        index.entry(project(l, &key.left)).or_default().push(l);
    }

    let mut probe = Tuple::new();
    for &r in right {
        probe.clear();
        probe.extend(key.right.iter().map(|&j| r[j]));
        if let Some(hits) = index.get(probe.as_slice()) {
            for &l in hits {
                write(l, r, &mut out);
                emit(&out);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/join.rs"]
mod tests;
