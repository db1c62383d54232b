//! Column matching and pruning for pairwise joins.
//!
//! `match_columns` finds the join key: column pairs bound to the same lifted
//! variable in both tables. `relevant_columns` decides which columns survive
//! into the join output, given the variables still needed downstream.

use crate::table::{Columns, VarIndex};
use smallvec::SmallVec;

pub type ColumnList = SmallVec<[usize; 4]>;

/// Key columns of a join, aligned pairwise: `left[k]` matches `right[k]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnMatch {
    pub left: ColumnList,
    pub right: ColumnList,
}

impl ColumnMatch {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }
}

/// Columns of each side retained in a join's output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeptColumns {
    pub left: ColumnList,
    pub right: ColumnList,
}

impl KeptColumns {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Variable ids of the output, left columns first.
    pub fn output_index<A: Columns, B: Columns>(&self, a: &A, b: &B) -> Vec<VarIndex> {
        self.left
            .iter()
            .map(|&i| a.tuple_index()[i])
            .chain(self.right.iter().map(|&j| b.tuple_index()[j]))
            .collect()
    }
}

/// Join key between `a` and `b`. Only free columns take part.
pub fn match_columns<A: Columns, B: Columns>(a: &A, b: &B) -> ColumnMatch {
    let mut matches = ColumnMatch::default();
    for (i, &va) in a.tuple_index().iter().enumerate() {
        if va < 0 {
            continue;
        }
        for (j, &vb) in b.tuple_index().iter().enumerate() {
            if va == vb {
                matches.left.push(i);
                matches.right.push(j);
            }
        }
    }
    matches
}

/// `match_columns` as a list of `(i, j)` pairs.
pub fn matching_pairs<A: Columns, B: Columns>(a: &A, b: &B) -> Vec<(usize, usize)> {
    let m = match_columns(a, b);
    m.left.into_iter().zip(m.right).collect()
}

/// Columns to keep when only the variables in `required` matter downstream.
///
/// A variable bound on both sides is kept once, from `a`. Columns of
/// variables outside `required` are dropped.
pub fn relevant_columns<A: Columns, B: Columns>(a: &A, b: &B, required: &[VarIndex]) -> KeptColumns {
    let mut kept = KeptColumns::default();
    let mut seen: SmallVec<[VarIndex; 8]> = SmallVec::new();
    for (i, &v) in a.tuple_index().iter().enumerate() {
        if v >= 0 && required.contains(&v) && !seen.contains(&v) {
            kept.left.push(i);
            seen.push(v);
        }
    }
    for (j, &v) in b.tuple_index().iter().enumerate() {
        if v >= 0 && required.contains(&v) && !seen.contains(&v) {
            kept.right.push(j);
            seen.push(v);
        }
    }
    kept
}

/// Columns kept by an unprojected natural join: all of `a`, and the columns
/// of `b` that are not part of the key.
pub fn natural_columns<A: Columns, B: Columns>(a: &A, b: &B, key: &ColumnMatch) -> KeptColumns {
    KeptColumns {
        left: (0..a.arity()).collect(),
        right: (0..b.arity()).filter(|j| !key.right.contains(j)).collect(),
    }
}

#[cfg(test)]
#[path = "tests/columns.rs"]
mod tests;
