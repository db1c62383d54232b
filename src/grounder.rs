//! Grounding entry point for one task.
//!
//! A [`Grounder`] precompiles every schema once and then answers
//! instantiation and applicability queries against any number of live
//! states. It only reads the task, so one grounder may serve concurrent
//! searches.

use crate::error::GroundingError;
use crate::instantiate;
use crate::metrics::GroundingMetrics;
use crate::model::ActionSchema;
use crate::precompile::{precompile, PrecompiledActionData};
use crate::state::DBState;
use crate::table::{SharedTable, VarIndex};
use crate::task::Task;
use crate::tuple::Tuple;

/// An action schema together with one binding of its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiftedOperatorId {
    pub action: usize,
    /// `instantiation[k]` is the object bound to parameter `k`.
    pub instantiation: Tuple,
}

impl LiftedOperatorId {
    pub fn new(action: usize, instantiation: Tuple) -> Self {
        Self {
            action,
            instantiation,
        }
    }

    /// `name(obj, obj)`, or the bare name for a ground action.
    pub fn describe(&self, task: &Task) -> String {
        let name = &task.action_schemas()[self.action].name;
        if self.instantiation.is_empty() {
            return name.clone();
        }
        let args: Vec<&str> = self
            .instantiation
            .iter()
            .map(|&o| task.objects()[o as usize].name.as_str())
            .collect();
        format!("{}({})", name, args.join(", "))
    }
}

#[derive(Debug)]
pub struct Grounder<'t> {
    task: &'t Task,
    action_data: Vec<PrecompiledActionData>,
    metrics: GroundingMetrics,
}

impl<'t> Grounder<'t> {
    /// Precompile every schema of `task`.
    pub fn new(task: &'t Task) -> Result<Self, GroundingError> {
        Ok(Self {
            task,
            action_data: precompile(task)?,
            metrics: GroundingMetrics::new(),
        })
    }

    pub fn task(&self) -> &'t Task {
        self.task
    }

    pub fn metrics(&self) -> &GroundingMetrics {
        &self.metrics
    }

    pub fn action_data(&self, action: usize) -> Result<&PrecompiledActionData, GroundingError> {
        self.action_data
            .get(action)
            .ok_or(GroundingError::UnknownAction(action))
    }

    fn schema(
        &self,
        action: usize,
    ) -> Result<(&'t ActionSchema, &PrecompiledActionData), GroundingError> {
        let schema = self
            .task
            .action_schemas()
            .get(action)
            .ok_or(GroundingError::UnknownAction(action))?;
        Ok((schema, self.action_data(action)?))
    }

    /// Valid bindings of a lifted schema's parameters in `state`.
    pub fn instantiate(
        &self,
        action: usize,
        state: &DBState,
        relevant: Option<&[VarIndex]>,
    ) -> Result<SharedTable, GroundingError> {
        let (schema, data) = self.schema(action)?;
        instantiate::instantiate_with(schema, data, state, relevant, &self.metrics)
    }

    /// Applicability of a zero-parameter schema.
    pub fn is_ground_applicable(
        &self,
        action: usize,
        state: &DBState,
    ) -> Result<bool, GroundingError> {
        let (schema, _) = self.schema(action)?;
        Ok(instantiate::is_ground_applicable(
            schema,
            state,
            self.task.static_info(),
        ))
    }

    /// Every applicable operator of one schema, sorted.
    pub fn applicable_actions(
        &self,
        action: usize,
        state: &DBState,
    ) -> Result<Vec<LiftedOperatorId>, GroundingError> {
        let (_, data) = self.schema(action)?;
        if data.is_ground {
            return Ok(if self.is_ground_applicable(action, state)? {
                vec![LiftedOperatorId::new(action, Tuple::new())]
            } else {
                Vec::new()
            });
        }

        // Without a relevant set, columns follow parameter order.
        let table = self.instantiate(action, state, None)?;
        let mut operators: Vec<LiftedOperatorId> = table
            .tuples
            .iter()
            .map(|row| LiftedOperatorId::new(action, row.to_tuple()))
            .collect();
        operators.sort();
        Ok(operators)
    }

    /// Every applicable operator of every schema, by schema then binding.
    pub fn all_applicable_actions(
        &self,
        state: &DBState,
    ) -> Result<Vec<LiftedOperatorId>, GroundingError> {
        let mut operators = Vec::new();
        for action in 0..self.action_data.len() {
            operators.extend(self.applicable_actions(action, state)?);
        }
        Ok(operators)
    }
}

#[cfg(test)]
#[path = "tests/grounder.rs"]
mod tests;
