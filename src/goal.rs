use crate::model::PredicateId;
use crate::state::DBState;
use crate::tuple::Tuple;

/// One goal literal. Nullary goals have an empty argument tuple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtomicGoal {
    pub predicate: PredicateId,
    pub arguments: Tuple,
    pub negated: bool,
}

impl AtomicGoal {
    pub fn holds_in(&self, state: &DBState) -> bool {
        let present = if self.arguments.is_empty() {
            state.is_nullary_true(self.predicate)
        } else {
            state.contains(self.predicate, &self.arguments)
        };
        present != self.negated
    }
}

/// Conjunction of goal literals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoalCondition {
    pub goals: Vec<AtomicGoal>,
}

impl GoalCondition {
    pub fn new(goals: Vec<AtomicGoal>) -> Self {
        Self { goals }
    }

    /// Positive literals present, negated literals absent.
    pub fn is_satisfied(&self, state: &DBState) -> bool {
        self.goals.iter().all(|g| g.holds_in(state))
    }

    pub fn unsatisfied<'a>(&'a self, state: &'a DBState) -> impl Iterator<Item = &'a AtomicGoal> {
        self.goals.iter().filter(move |g| !g.holds_in(state))
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/goal.rs"]
mod tests;
