//! Lifted action grounding for classical planning.
//!
//! Action schemas are instantiated by joining one table per precondition
//! atom with a hash join that projects away variables as soon as nothing
//! downstream needs them. Static preconditions are resolved once per task;
//! fluent ones are selected from the live state on every call. On top of
//! that, [`run_fact_layers`] computes relaxed forward reachability.

pub mod columns;
pub mod config;
pub mod error;
pub mod fact_layer;
pub mod goal;
pub mod grounder;
pub mod instantiate;
pub mod join;
pub mod metrics;
pub mod model;
pub mod precompile;
pub mod state;
pub mod symbol;
pub mod table;
pub mod task;
pub mod trace;
pub mod tuple;

pub use config::FactLayerConfig;
pub use error::GroundingError;
pub use fact_layer::{generate_next_fact_layer, run_fact_layers, FactLayers, LayerStats};
pub use goal::{AtomicGoal, GoalCondition};
pub use grounder::{Grounder, LiftedOperatorId};
pub use instantiate::{instantiate, is_ground_applicable};
pub use join::{hash_join, hash_join_projected};
pub use model::{ActionSchema, Argument, Atom, ObjectType, Parameter, PredicateId};
pub use precompile::{precompile, precompile_action, PrecompiledActionData};
pub use state::{DBState, Relation, StaticInformation};
pub use table::{SharedTable, Table, VarIndex};
pub use task::{Task, TaskBuilder};
pub use tuple::{ObjectId, SharedTuple, Tuple};

#[cfg(test)]
pub(crate) mod test_utils;
