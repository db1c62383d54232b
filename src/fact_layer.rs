//! Relaxed forward reachability.
//!
//! Each pass grounds every positive effect of every schema against the
//! current state and adds the resulting facts. Deletions are ignored, so the
//! state only grows and the loop ends once a pass adds nothing.

use crate::config::FactLayerConfig;
use crate::error::GroundingError;
use crate::goal::GoalCondition;
use crate::grounder::Grounder;
use crate::model::{Argument, Atom};
use crate::state::DBState;
use crate::table::{Columns, SharedTable, VarIndex};
use crate::trace::{debug, info};
use crate::tuple::{ObjectId, Tuple};
use smallvec::SmallVec;

/// Summary of one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerStats {
    /// 1-based pass number.
    pub pass: usize,
    pub facts_added: usize,
    pub total_facts: usize,
    pub goal_reached: bool,
}

#[derive(Clone, Debug)]
pub struct FactLayers {
    /// Every fact reached.
    pub state: DBState,
    pub passes: usize,
    pub goal_reached: bool,
    /// The last pass added nothing: `state` is the full fixpoint.
    pub saturated: bool,
    pub layers: Vec<LayerStats>,
}

/// Run passes from `initial` until nothing new is derived, the goal holds
/// (when `config.stop_at_goal`) or `config.max_passes` is reached.
pub fn run_fact_layers(
    grounder: &Grounder<'_>,
    initial: &DBState,
    goal: &GoalCondition,
    config: &FactLayerConfig,
) -> Result<FactLayers, GroundingError> {
    let mut state = initial.clone();
    let mut layers = Vec::new();
    let mut goal_reached = goal.is_satisfied(&state);
    let mut saturated = false;

    if !(goal_reached && config.stop_at_goal) {
        loop {
            if config.max_passes.is_some_and(|max| layers.len() >= max) {
                break;
            }
            let facts_added = generate_next_fact_layer(grounder, &mut state)?;
            grounder.metrics().record_pass(facts_added);
            goal_reached = goal.is_satisfied(&state);
            let stats = LayerStats {
                pass: layers.len() + 1,
                facts_added,
                total_facts: state.fact_count(),
                goal_reached,
            };
            debug!(
                pass = stats.pass,
                added = stats.facts_added,
                total = stats.total_facts,
                goal_reached,
                "fact layer pass"
            );
            layers.push(stats);

            if facts_added == 0 {
                saturated = true;
                break;
            }
            if goal_reached && config.stop_at_goal {
                break;
            }
        }
    }

    info!(
        passes = layers.len(),
        goal_reached,
        saturated,
        facts = state.fact_count(),
        "fact layers finished"
    );
    Ok(FactLayers {
        state,
        passes: layers.len(),
        goal_reached,
        saturated,
        layers,
    })
}

/// One pass over every schema. Returns the number of facts added to `state`.
///
/// Facts are added as soon as they are derived, so later schemas in the same
/// pass already see them. The goal is not consulted here: [`run_fact_layers`]
/// checks it once after each whole pass.
pub fn generate_next_fact_layer(
    grounder: &Grounder<'_>,
    state: &mut DBState,
) -> Result<usize, GroundingError> {
    let mut added = 0;
    for schema in grounder.task().action_schemas() {
        let data = grounder.action_data(schema.index)?;
        if data.is_ground {
            if grounder.is_ground_applicable(schema.index, state)? {
                for effect in schema.positive_effects() {
                    added += assert_effect(state, &schema.name, effect, &SharedTable::unit())?;
                }
            }
            continue;
        }
        if data.statically_inapplicable {
            continue;
        }
        for effect in schema.positive_effects() {
            let relevant: SmallVec<[VarIndex; 4]> = effect
                .parameters()
                .into_iter()
                .map(|p| p as VarIndex)
                .collect();
            let bindings = grounder.instantiate(schema.index, state, Some(relevant.as_slice()))?;
            added += assert_effect(state, &schema.name, effect, &bindings)?;
        }
    }
    Ok(added)
}

/// Add `effect` grounded under every row of `bindings`. Returns how many
/// facts were new.
fn assert_effect(
    state: &mut DBState,
    action: &str,
    effect: &Atom,
    bindings: &SharedTable,
) -> Result<usize, GroundingError> {
    if bindings.is_empty() {
        return Ok(0);
    }
    if effect.arguments.is_empty() {
        return Ok(usize::from(state.set_nullary(effect.predicate)));
    }

    let slots = effect
        .arguments
        .iter()
        .map(|arg| match *arg {
            Argument::Constant(o) => Ok(Slot::Constant(o)),
            Argument::Parameter(p) => bindings
                .column_of(p as VarIndex)
                .map(Slot::Column)
                .ok_or_else(|| GroundingError::ParameterOutOfRange {
                    action: action.to_string(),
                    index: p,
                }),
        })
        .collect::<Result<SmallVec<[Slot; 4]>, _>>()?;

    let mut added = 0;
    let mut fact = Tuple::new();
    for row in &bindings.tuples {
        fact.clear();
        fact.extend(slots.iter().map(|slot| match *slot {
            Slot::Constant(o) => o,
            Slot::Column(c) => row[c],
        }));
        added += usize::from(state.insert(effect.predicate, &fact));
    }
    Ok(added)
}

#[derive(Clone, Copy)]
enum Slot {
    Constant(ObjectId),
    Column(usize),
}

#[cfg(test)]
#[path = "tests/fact_layer.rs"]
mod tests;
