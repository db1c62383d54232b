//! Instantiation of lifted action schemas against a live state.
//!
//! The precompiled static tables and freshly selected fluent tables are
//! joined left to right. After each join the working table is projected onto
//! the variables still needed: the requested output, the variables of every
//! table not yet joined, and the variables of equality filters not yet
//! applied. A filter runs as soon as all of its variables are present.

use std::borrow::Cow;

use crate::error::GroundingError;
use crate::join::hash_join_projected_keyed;
use crate::metrics::GroundingMetrics;
use crate::model::{ActionSchema, Argument, Atom};
use crate::precompile::{select_tuples, EqualityFilter, PrecompiledActionData};
use crate::state::{DBState, StaticInformation};
use crate::table::{Columns, SharedTable, VarIndex};
use crate::trace::{debug, debug_span};
use smallvec::SmallVec;

/// Bindings of `schema`'s parameters that satisfy its precondition in `state`.
///
/// The result has one column per variable of `relevant`, in that order
/// (duplicates collapsed); `None` means every parameter. An empty table is a
/// normal outcome, not an error.
pub fn instantiate(
    schema: &ActionSchema,
    data: &PrecompiledActionData,
    state: &DBState,
    relevant: Option<&[VarIndex]>,
) -> Result<SharedTable, GroundingError> {
    instantiate_with(schema, data, state, relevant, &GroundingMetrics::new())
}

/// [`instantiate`], recording counters into `metrics`.
pub fn instantiate_with(
    schema: &ActionSchema,
    data: &PrecompiledActionData,
    state: &DBState,
    relevant: Option<&[VarIndex]>,
    metrics: &GroundingMetrics,
) -> Result<SharedTable, GroundingError> {
    if data.is_ground {
        return Err(GroundingError::GroundSchema {
            action: schema.name.clone(),
        });
    }
    let _span = debug_span!("instantiate", action = %schema.name).entered();
    metrics.record_instantiation();

    let output = output_vars(schema, data.parameter_count, relevant)?;
    if data.statically_inapplicable {
        metrics.record_static_short_circuit();
        return Ok(SharedTable::empty_with_index(output));
    }

    if !data
        .fluent_ground_atoms
        .iter()
        .all(|atom| fact_holds(atom, state))
    {
        debug!(action = %schema.name, "ground fluent precondition is false");
        metrics.record_fluent_short_circuit();
        return Ok(SharedTable::empty_with_index(output));
    }

    let mut fluent = Vec::with_capacity(data.fluent_tables.len());
    for &position in &data.fluent_tables {
        let atom = &data.relevant_precondition_atoms[position];
        let table = select_tuples(state.relation(atom.predicate), atom);
        if table.is_empty() {
            debug!(action = %schema.name, predicate = atom.predicate.0, "fluent precondition matches nothing");
            metrics.record_fluent_short_circuit();
            return Ok(SharedTable::empty_with_index(output));
        }
        fluent.push(table);
    }

    let mut fluent_iter = fluent.iter();
    let mut tables: Vec<&SharedTable> =
        Vec::with_capacity(data.precompiled_db.len() + data.parameter_tables.len());
    for (position, table) in data.precompiled_db.iter().enumerate() {
        if data.is_fluent(position) {
            match fluent_iter.next() {
                Some(t) => tables.push(t),
                None => return Ok(SharedTable::empty_with_index(output)),
            }
        } else {
            tables.push(table);
        }
    }
    tables.extend(data.parameter_tables.iter());

    let Some((&first, rest)) = tables.split_first() else {
        return Ok(SharedTable::empty_with_index(output));
    };

    let schedule = schedule_filters(&data.static_filters, &tables);
    let mut working = Cow::Borrowed(first);
    apply_filters(&mut working, filters_at(&data.static_filters, &schedule, 0), metrics);
    metrics.update_max_table_size(working.len() as u64);

    for (offset, &next) in rest.iter().enumerate() {
        if working.is_empty() {
            break;
        }
        let step = offset + 1;
        let required = required_vars(
            &output,
            &tables[step + 1..],
            &data.static_filters,
            &schedule,
            step,
        );
        let (joined, keys) = hash_join_projected_keyed(&working, next, &required);
        metrics.record_join(keys == 0, joined.len());
        working = Cow::Owned(joined);
        apply_filters(&mut working, filters_at(&data.static_filters, &schedule, step), metrics);
    }

    if working.is_empty() {
        return Ok(SharedTable::empty_with_index(output));
    }
    Ok(working.project(&output))
}

/// Whether a zero-parameter schema is applicable in `state`.
///
/// Every precondition atom is checked; static predicates are read from
/// `static_info`, fluent ones from `state`.
pub fn is_ground_applicable(
    schema: &ActionSchema,
    state: &DBState,
    static_info: &StaticInformation,
) -> bool {
    schema
        .precondition
        .iter()
        .all(|atom| ground_atom_holds(atom, state, static_info))
}

/// Truth of a ground atom, negation included. Non-ground atoms never hold.
pub fn ground_atom_holds(atom: &Atom, state: &DBState, static_info: &StaticInformation) -> bool {
    let present = if static_info.is_equality(atom.predicate) {
        match atom.arguments.as_slice() {
            [Argument::Constant(a), Argument::Constant(b)] => a == b,
            _ => return false,
        }
    } else if static_info.is_static(atom.predicate) {
        match lookup(atom, static_info.as_state()) {
            Some(present) => present,
            None => return false,
        }
    } else {
        match lookup(atom, state) {
            Some(present) => present,
            None => return false,
        }
    };
    present != atom.negated
}

fn fact_holds(atom: &Atom, state: &DBState) -> bool {
    lookup(atom, state).unwrap_or(false) != atom.negated
}

fn lookup(atom: &Atom, state: &DBState) -> Option<bool> {
    let tuple = atom.ground_tuple()?;
    Some(if tuple.is_empty() {
        state.is_nullary_true(atom.predicate)
    } else {
        state.contains(atom.predicate, &tuple)
    })
}

fn output_vars(
    schema: &ActionSchema,
    parameter_count: usize,
    relevant: Option<&[VarIndex]>,
) -> Result<Vec<VarIndex>, GroundingError> {
    let Some(relevant) = relevant else {
        return Ok((0..parameter_count as VarIndex).collect());
    };
    let mut output = Vec::with_capacity(relevant.len());
    for &var in relevant {
        if var < 0 || var as usize >= parameter_count {
            return Err(GroundingError::ParameterOutOfRange {
                action: schema.name.clone(),
                index: var.max(0) as usize,
            });
        }
        if !output.contains(&var) {
            output.push(var);
        }
    }
    Ok(output)
}

/// For each filter, the first table position at which all of its variables
/// are bound.
fn schedule_filters(filters: &[EqualityFilter], tables: &[&SharedTable]) -> Vec<usize> {
    let mut bound: SmallVec<[VarIndex; 8]> = SmallVec::new();
    let mut schedule = vec![usize::MAX; filters.len()];
    for (step, table) in tables.iter().enumerate() {
        bound.extend(table.tuple_index.iter().copied().filter(|&v| v >= 0));
        for (filter, slot) in filters.iter().zip(schedule.iter_mut()) {
            if *slot == usize::MAX && filter.vars().iter().all(|v| bound.contains(v)) {
                *slot = step;
            }
        }
    }
    schedule
}

fn filters_at<'a>(
    filters: &'a [EqualityFilter],
    schedule: &'a [usize],
    step: usize,
) -> impl Iterator<Item = &'a EqualityFilter> + 'a {
    filters
        .iter()
        .zip(schedule)
        .filter(move |(_, s)| **s == step)
        .map(|(f, _)| f)
}

/// Variables the join at `step` must keep.
fn required_vars(
    output: &[VarIndex],
    later: &[&SharedTable],
    filters: &[EqualityFilter],
    schedule: &[usize],
    step: usize,
) -> Vec<VarIndex> {
    let mut required = output.to_vec();
    let mut push = |var: VarIndex| {
        if var >= 0 && !required.contains(&var) {
            required.push(var);
        }
    };
    for table in later {
        table.tuple_index.iter().copied().for_each(&mut push);
    }
    for (filter, &s) in filters.iter().zip(schedule) {
        if s >= step {
            filter.vars().into_iter().for_each(&mut push);
        }
    }
    required
}

fn apply_filters<'a>(
    working: &mut Cow<'_, SharedTable>,
    filters: impl Iterator<Item = &'a EqualityFilter>,
    metrics: &GroundingMetrics,
) {
    for filter in filters {
        let columns: SmallVec<[usize; 2]> = filter
            .vars()
            .iter()
            .filter_map(|&v| working.column_of(v))
            .collect();
        if columns.len() != filter.vars().len() {
            continue;
        }
        if working.tuples.iter().all(|row| filter.accepts(row, &columns)) {
            continue;
        }
        let before = working.len();
        working.to_mut().retain(|row| filter.accepts(row, &columns));
        metrics.record_filtered(before - working.len());
    }
}

#[cfg(test)]
#[path = "tests/instantiate.rs"]
mod tests;
