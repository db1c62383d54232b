use crate::model::{Argument, Atom, Parameter, PredicateId};
use crate::table::{SharedTable, Table, VarIndex};
use crate::task::{Task, TaskBuilder};
use crate::tuple::{ObjectId, SharedTuple, Tuple};

pub(crate) fn p(index: usize) -> Argument {
    Argument::Parameter(index)
}

pub(crate) fn c(object: ObjectId) -> Argument {
    Argument::Constant(object)
}

pub(crate) fn atom<const N: usize>(predicate: PredicateId, args: [Argument; N]) -> Atom {
    Atom::new(predicate, args)
}

pub(crate) fn not<const N: usize>(predicate: PredicateId, args: [Argument; N]) -> Atom {
    Atom::negated(predicate, args)
}

pub(crate) fn table(index: &[VarIndex], rows: &[&[ObjectId]]) -> Table {
    Table::new(
        rows.iter().map(|r| Tuple::from_slice(r)).collect(),
        index.to_vec(),
    )
}

pub(crate) fn shared_table(index: &[VarIndex], rows: &[&[ObjectId]]) -> SharedTable {
    SharedTable::new(
        rows.iter().map(|r| SharedTuple::new(r)).collect(),
        index.to_vec(),
    )
}

/// Rows of `table`, sorted, with columns reordered to follow `vars`.
pub(crate) fn rows_by_vars(table: &SharedTable, vars: &[VarIndex]) -> Vec<Vec<ObjectId>> {
    use crate::table::Columns;
    let columns: Vec<usize> = vars
        .iter()
        .map(|&v| table.column_of(v).expect("variable missing from table"))
        .collect();
    let mut rows: Vec<Vec<ObjectId>> = table
        .tuples
        .iter()
        .map(|t| columns.iter().map(|&c| t[c]).collect())
        .collect();
    rows.sort();
    rows
}

/// Blocks world over `a`, `b`, `c` with `a` on `b`, and goal `on(c, a)`.
///
/// Predicates: `on/2`, `ontable/1`, `clear/1`, `holding/1`, `handempty/0`.
pub(crate) fn blocks_world() -> Task {
    let mut b = TaskBuilder::new();
    let block = b.add_type("block").unwrap();
    let a = b.add_object("a", &[block]).unwrap();
    let bb = b.add_object("b", &[block]).unwrap();
    let cc = b.add_object("c", &[block]).unwrap();

    let on = b.add_predicate("on", 2).unwrap();
    let ontable = b.add_predicate("ontable", 1).unwrap();
    let clear = b.add_predicate("clear", 1).unwrap();
    let holding = b.add_predicate("holding", 1).unwrap();
    let handempty = b.add_predicate("handempty", 0).unwrap();
    let eq = b.equality();

    let x = || Parameter {
        name: "?x".into(),
        ty: block,
    };
    let y = || Parameter {
        name: "?y".into(),
        ty: block,
    };

    b.add_action(
        "pick-up",
        vec![x()],
        vec![atom(clear, [p(0)]), atom(ontable, [p(0)]), atom(handempty, [])],
        vec![
            not(ontable, [p(0)]),
            not(clear, [p(0)]),
            not(handempty, []),
            atom(holding, [p(0)]),
        ],
        1,
    )
    .unwrap();
    b.add_action(
        "put-down",
        vec![x()],
        vec![atom(holding, [p(0)])],
        vec![
            not(holding, [p(0)]),
            atom(clear, [p(0)]),
            atom(handempty, []),
            atom(ontable, [p(0)]),
        ],
        1,
    )
    .unwrap();
    b.add_action(
        "stack",
        vec![x(), y()],
        vec![atom(holding, [p(0)]), atom(clear, [p(1)]), not(eq, [p(0), p(1)])],
        vec![
            not(holding, [p(0)]),
            not(clear, [p(1)]),
            atom(clear, [p(0)]),
            atom(handempty, []),
            atom(on, [p(0), p(1)]),
        ],
        1,
    )
    .unwrap();
    b.add_action(
        "unstack",
        vec![x(), y()],
        vec![
            atom(on, [p(0), p(1)]),
            atom(clear, [p(0)]),
            atom(handempty, []),
        ],
        vec![
            atom(holding, [p(0)]),
            atom(clear, [p(1)]),
            not(clear, [p(0)]),
            not(handempty, []),
            not(on, [p(0), p(1)]),
        ],
        1,
    )
    .unwrap();

    b.add_fact(on, &[a, bb]);
    b.add_fact(ontable, &[bb]);
    b.add_fact(ontable, &[cc]);
    b.add_fact(clear, &[a]);
    b.add_fact(clear, &[cc]);
    b.add_fact(handempty, &[]);
    b.add_goal(on, &[cc, a], false);

    b.build().unwrap()
}

/// A truck on a directed road chain `l0 -> l1 -> l2`, plus an unreachable `l3`.
///
/// `road/2` is static, `at/2` is fluent. Goal: `at(t, l2)`.
pub(crate) fn road_network() -> Task {
    let mut b = TaskBuilder::new();
    let truck = b.add_type("truck").unwrap();
    let location = b.add_type("location").unwrap();
    let t = b.add_object("t", &[truck]).unwrap();
    let l: Vec<ObjectId> = (0..4)
        .map(|i| b.add_object(&format!("l{i}"), &[location]).unwrap())
        .collect();

    let road = b.add_predicate("road", 2).unwrap();
    let at = b.add_predicate("at", 2).unwrap();

    b.add_action(
        "drive",
        vec![
            Parameter {
                name: "?t".into(),
                ty: truck,
            },
            Parameter {
                name: "?from".into(),
                ty: location,
            },
            Parameter {
                name: "?to".into(),
                ty: location,
            },
        ],
        vec![atom(at, [p(0), p(1)]), atom(road, [p(1), p(2)])],
        vec![atom(at, [p(0), p(2)]), not(at, [p(0), p(1)])],
        1,
    )
    .unwrap();

    b.add_fact(road, &[l[0], l[1]]);
    b.add_fact(road, &[l[1], l[2]]);
    b.add_fact(at, &[t, l[0]]);
    b.add_goal(at, &[t, l[2]], false);

    b.build().unwrap()
}
