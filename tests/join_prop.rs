use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use relground::join::{hash_join, hash_join_projected, hash_join_shared};
use relground::model::PredicateId;
use relground::state::Relation;
use relground::table::{SharedTable, Table, VarIndex};
use relground::tuple::{ObjectId, SharedTuple, Tuple};

const VARS: [VarIndex; 4] = [0, 1, 2, 3];

type Binding = BTreeMap<VarIndex, ObjectId>;

#[derive(Clone, Debug)]
struct RawTable {
    index: Vec<VarIndex>,
    rows: Vec<Vec<ObjectId>>,
}

impl RawTable {
    fn table(&self) -> Table {
        Table::new(
            self.rows.iter().map(|r| Tuple::from_slice(r)).collect(),
            self.index.clone(),
        )
    }

    fn shared(&self) -> SharedTable {
        SharedTable::new(
            self.rows.iter().map(|r| SharedTuple::new(r)).collect(),
            self.index.clone(),
        )
    }
}

fn raw_table_strategy() -> impl Strategy<Value = RawTable> {
    prop::sample::subsequence(VARS.to_vec(), 0..=3)
        .prop_shuffle()
        .prop_flat_map(|index| {
            let arity = index.len();
            (
                Just(index),
                prop::collection::vec(prop::collection::vec(0u32..3, arity), 0..6),
            )
        })
        .prop_map(|(index, rows)| RawTable { index, rows })
}

fn binding(index: &[VarIndex], row: &[ObjectId]) -> Binding {
    index.iter().copied().zip(row.iter().copied()).collect()
}

/// Nested-loop natural join, one binding per compatible pair.
fn brute_force(a: &RawTable, b: &RawTable) -> Vec<Binding> {
    let mut out = Vec::new();
    for l in &a.rows {
        for r in &b.rows {
            let left = binding(&a.index, l);
            let right = binding(&b.index, r);
            if right.iter().all(|(v, x)| left.get(v).map_or(true, |y| x == y)) {
                let mut joined = left;
                joined.extend(right);
                out.push(joined);
            }
        }
    }
    out.sort();
    out
}

fn table_bindings(table: &Table) -> Vec<Binding> {
    let mut out: Vec<Binding> = table
        .tuples
        .iter()
        .map(|t| binding(&table.tuple_index, t))
        .collect();
    out.sort();
    out
}

fn shared_bindings(table: &SharedTable) -> BTreeSet<Binding> {
    table
        .tuples
        .iter()
        .map(|t| binding(&table.tuple_index, t))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn hash_join_matches_nested_loops(a in raw_table_strategy(), b in raw_table_strategy()) {
        let joined = hash_join(&a.table(), &b.table());
        prop_assert_eq!(table_bindings(&joined), brute_force(&a, &b));
    }

    #[test]
    fn output_columns_are_left_then_new_right(a in raw_table_strategy(), b in raw_table_strategy()) {
        let joined = hash_join(&a.table(), &b.table());
        let mut expected = a.index.clone();
        expected.extend(b.index.iter().filter(|v| !a.index.contains(v)));
        prop_assert_eq!(joined.tuple_index, expected);
    }

    #[test]
    fn shared_join_is_the_deduplicated_natural_join(
        a in raw_table_strategy(),
        b in raw_table_strategy(),
    ) {
        let joined = hash_join_shared(&a.shared(), &b.shared());
        let expected: BTreeSet<Binding> = brute_force(&a, &b).into_iter().collect();
        prop_assert_eq!(shared_bindings(&joined), expected);
    }

    #[test]
    fn projected_join_is_the_projection_of_the_join(
        a in raw_table_strategy(),
        b in raw_table_strategy(),
        required in prop::sample::subsequence(VARS.to_vec(), 0..=4),
    ) {
        let joined = hash_join_projected(&a.shared(), &b.shared(), &required);
        let expected: BTreeSet<Binding> = brute_force(&a, &b)
            .into_iter()
            .map(|m| m.into_iter().filter(|(v, _)| required.contains(v)).collect())
            .collect();
        prop_assert_eq!(shared_bindings(&joined), expected);
        prop_assert!(joined.tuple_index.iter().all(|v| required.contains(v)));
    }

    #[test]
    fn reinsertion_never_grows_a_relation(
        rows in prop::collection::vec(prop::collection::vec(0u32..4, 2), 0..20),
    ) {
        let mut relation = Relation::new(PredicateId(0));
        for row in &rows {
            relation.insert_slice(row);
        }
        let distinct: BTreeSet<&Vec<ObjectId>> = rows.iter().collect();
        prop_assert_eq!(relation.len(), distinct.len());

        for row in &rows {
            prop_assert!(!relation.insert(SharedTuple::new(row)));
            prop_assert!(relation.contains(row));
        }
        prop_assert_eq!(relation.len(), distinct.len());
    }
}
