//! Per-schema precompilation.
//!
//! Splits each schema's precondition into equality filters, ground checks,
//! static atoms (resolved once against the background relations) and fluent
//! atoms (resolved against the live state on every call). Runs once per task.

use crate::error::GroundingError;
use crate::instantiate::ground_atom_holds;
use crate::model::{ActionSchema, Argument, Atom};
use crate::state::Relation;
use crate::table::{SharedTable, VarIndex};
use crate::task::Task;
use crate::trace::debug;
use crate::tuple::{FxHashSet, ObjectId, SharedTuple};
use smallvec::SmallVec;

/// An `=` precondition between parameters, or a parameter and a constant.
///
/// Constant/constant comparisons are decided during precompilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EqualityFilter {
    Constant {
        param: VarIndex,
        object: ObjectId,
        negated: bool,
    },
    Parameters {
        left: VarIndex,
        right: VarIndex,
        negated: bool,
    },
}

impl EqualityFilter {
    pub fn vars(&self) -> SmallVec<[VarIndex; 2]> {
        match *self {
            EqualityFilter::Constant { param, .. } => smallvec::smallvec![param],
            EqualityFilter::Parameters { left, right, .. } => smallvec::smallvec![left, right],
        }
    }

    /// Whether `row` passes, given the columns of the filter's variables.
    #[inline]
    pub fn accepts(&self, row: &[ObjectId], columns: &[usize]) -> bool {
        match *self {
            EqualityFilter::Constant { object, negated, .. } => (row[columns[0]] == object) != negated,
            EqualityFilter::Parameters { negated, .. } => {
                (row[columns[0]] == row[columns[1]]) != negated
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PrecompiledActionData {
    pub is_ground: bool,
    /// Some static precondition can never hold; every instantiation is empty.
    pub statically_inapplicable: bool,
    pub parameter_count: usize,
    /// Preconditions that take part in the join: not ground, not `=`.
    pub relevant_precondition_atoms: Vec<Atom>,
    /// Positions in `relevant_precondition_atoms` resolved per call, ascending.
    pub fluent_tables: Vec<usize>,
    /// One table per relevant atom; positions listed in `fluent_tables` hold
    /// an empty placeholder.
    pub precompiled_db: Vec<SharedTable>,
    /// Single-column tables of typed objects, one per parameter that no
    /// relevant atom binds.
    pub parameter_tables: Vec<SharedTable>,
    pub static_filters: Vec<EqualityFilter>,
    /// Ground preconditions over fluent predicates, checked per call.
    pub fluent_ground_atoms: Vec<Atom>,
}

impl PrecompiledActionData {
    pub fn is_fluent(&self, position: usize) -> bool {
        self.fluent_tables.binary_search(&position).is_ok()
    }

    fn inapplicable(mut self) -> Self {
        self.statically_inapplicable = true;
        self
    }
}

/// Precompile every schema of `task`, in schema order.
pub fn precompile(task: &Task) -> Result<Vec<PrecompiledActionData>, GroundingError> {
    task.action_schemas()
        .iter()
        .map(|schema| precompile_action(schema, task))
        .collect()
}

pub fn precompile_action(
    schema: &ActionSchema,
    task: &Task,
) -> Result<PrecompiledActionData, GroundingError> {
    let static_info = task.static_info();
    let mut data = PrecompiledActionData {
        is_ground: schema.is_ground(),
        parameter_count: schema.parameters.len(),
        ..Default::default()
    };
    if data.is_ground {
        return Ok(data);
    }

    let mut static_ground = Vec::new();
    let mut relevant = Vec::new();
    for atom in &schema.precondition {
        let is_equality = static_info.is_equality(atom.predicate);
        if atom.negated && !is_equality {
            return Err(GroundingError::NegatedPrecondition {
                action: schema.name.clone(),
                predicate: task.predicate(atom.predicate).name.clone(),
            });
        }

        if is_equality {
            match classify_equality(atom) {
                EqualityCheck::Filter(filter) => data.static_filters.push(filter),
                EqualityCheck::Never => {
                    debug!(action = %schema.name, "equality precondition never holds");
                    return Ok(data.inapplicable());
                }
                EqualityCheck::Always => {}
            }
        } else if atom.is_ground() {
            if static_info.is_static(atom.predicate) {
                static_ground.push(atom);
            } else {
                data.fluent_ground_atoms.push(atom.clone());
            }
        } else {
            relevant.push(atom.clone());
        }
    }

    if static_ground
        .iter()
        .any(|atom| !ground_atom_holds(atom, static_info.as_state(), static_info))
    {
        debug!(action = %schema.name, "static ground precondition is false");
        return Ok(data.inapplicable());
    }

    let mut covered = vec![false; data.parameter_count];
    for (i, atom) in relevant.iter().enumerate() {
        for p in atom.parameters() {
            covered[p] = true;
        }
        if !static_info.is_static(atom.predicate) {
            data.fluent_tables.push(i);
            data.precompiled_db.push(SharedTable::empty());
            continue;
        }
        let table = select_tuples(static_info.relation(atom.predicate), atom);
        if table.is_empty() {
            debug!(
                action = %schema.name,
                predicate = %task.predicate(atom.predicate).name,
                "static precondition matches nothing"
            );
            return Ok(data.inapplicable());
        }
        data.precompiled_db.push(table);
    }
    data.relevant_precondition_atoms = relevant;

    for (k, param) in schema.parameters.iter().enumerate() {
        if covered[k] {
            continue;
        }
        let tuples: FxHashSet<SharedTuple> = task
            .objects_of_type(param.ty)
            .map(|o| SharedTuple::new(&[o]))
            .collect();
        if tuples.is_empty() {
            debug!(action = %schema.name, param = %param.name, "no object has the parameter's type");
            return Ok(data.inapplicable());
        }
        data.parameter_tables
            .push(SharedTable::new(tuples, vec![k as VarIndex]));
    }

    Ok(data)
}

enum EqualityCheck {
    Always,
    Never,
    Filter(EqualityFilter),
}

fn classify_equality(atom: &Atom) -> EqualityCheck {
    let negated = atom.negated;
    match (atom.arguments[0], atom.arguments[1]) {
        (Argument::Constant(a), Argument::Constant(b)) => {
            if (a == b) != negated {
                EqualityCheck::Always
            } else {
                EqualityCheck::Never
            }
        }
        (Argument::Parameter(p), Argument::Constant(object))
        | (Argument::Constant(object), Argument::Parameter(p)) => {
            EqualityCheck::Filter(EqualityFilter::Constant {
                param: p as VarIndex,
                object,
                negated,
            })
        }
        (Argument::Parameter(p), Argument::Parameter(q)) if p == q => {
            if negated {
                EqualityCheck::Never
            } else {
                EqualityCheck::Always
            }
        }
        (Argument::Parameter(p), Argument::Parameter(q)) => {
            EqualityCheck::Filter(EqualityFilter::Parameters {
                left: p as VarIndex,
                right: q as VarIndex,
                negated,
            })
        }
    }
}

/// Tuples of `relation` matching `atom`'s constants, projected onto its
/// distinct parameters.
///
/// A parameter repeated inside the atom keeps only tuples whose positions
/// agree and yields a single column. When the atom is all distinct
/// parameters the relation's tuples are shared, not copied.
pub fn select_tuples(relation: &Relation, atom: &Atom) -> SharedTable {
    let mut tuple_index: Vec<VarIndex> = Vec::new();
    let mut columns: SmallVec<[usize; 4]> = SmallVec::new();
    let mut constants: SmallVec<[(usize, ObjectId); 4]> = SmallVec::new();
    let mut repeats: SmallVec<[(usize, usize); 2]> = SmallVec::new();

    for (pos, arg) in atom.arguments.iter().enumerate() {
        match *arg {
            Argument::Constant(o) => constants.push((pos, o)),
            Argument::Parameter(p) => {
                let var = p as VarIndex;
                match tuple_index.iter().position(|&v| v == var) {
                    Some(k) => repeats.push((pos, columns[k])),
                    None => {
                        tuple_index.push(var);
                        columns.push(pos);
                    }
                }
            }
        }
    }

    let whole = constants.is_empty() && repeats.is_empty();
    let mut table = SharedTable::empty_with_index(tuple_index);
    for tuple in relation.iter() {
        if constants.iter().any(|&(pos, o)| tuple[pos] != o) {
            continue;
        }
        if repeats.iter().any(|&(pos, first)| tuple[pos] != tuple[first]) {
            continue;
        }
        if whole {
            table.insert(tuple.clone());
        } else {
            table.insert(columns.iter().map(|&c| tuple[c]).collect());
        }
    }
    table
}

#[cfg(test)]
#[path = "tests/precompile.rs"]
mod tests;
