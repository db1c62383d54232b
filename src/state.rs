//! Relations and world states.

use crate::model::PredicateId;
use crate::tuple::{FxHashSet, ObjectId, SharedTuple};

/// The current extension of one predicate.
///
/// Tuples are kept as a content-keyed set: inserting a tuple that is already
/// present leaves the relation unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub predicate: PredicateId,
    tuples: FxHashSet<SharedTuple>,
}

impl Relation {
    pub fn new(predicate: PredicateId) -> Self {
        Self {
            predicate,
            tuples: FxHashSet::default(),
        }
    }

    /// Insert a tuple. Returns true iff the relation grew.
    pub fn insert(&mut self, tuple: SharedTuple) -> bool {
        self.tuples.insert(tuple)
    }

    /// Insert from a borrowed slice, allocating only when the tuple is new.
    pub fn insert_slice(&mut self, tuple: &[ObjectId]) -> bool {
        if self.tuples.contains(tuple) {
            return false;
        }
        self.tuples.insert(SharedTuple::new(tuple))
    }

    pub fn contains(&self, tuple: &[ObjectId]) -> bool {
        self.tuples.contains(tuple)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedTuple> {
        self.tuples.iter()
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn is_superset(&self, other: &Relation) -> bool {
        self.tuples.is_superset(&other.tuples)
    }
}

impl Extend<SharedTuple> for Relation {
    fn extend<I: IntoIterator<Item = SharedTuple>>(&mut self, iter: I) {
        self.tuples.extend(iter);
    }
}

/// Full world state: one relation per predicate plus nullary flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DBState {
    relations: Vec<Relation>,
    nullary_atoms: Vec<bool>,
}

impl DBState {
    /// An empty state over `predicate_count` predicates.
    pub fn new(predicate_count: usize) -> Self {
        Self {
            relations: (0..predicate_count)
                .map(|p| Relation::new(PredicateId(p as u32)))
                .collect(),
            nullary_atoms: vec![false; predicate_count],
        }
    }

    pub fn predicate_count(&self) -> usize {
        self.relations.len()
    }

    pub fn relation(&self, predicate: PredicateId) -> &Relation {
        &self.relations[predicate.index()]
    }

    pub fn relation_mut(&mut self, predicate: PredicateId) -> &mut Relation {
        &mut self.relations[predicate.index()]
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn insert(&mut self, predicate: PredicateId, tuple: &[ObjectId]) -> bool {
        self.relations[predicate.index()].insert_slice(tuple)
    }

    pub fn contains(&self, predicate: PredicateId, tuple: &[ObjectId]) -> bool {
        self.relations[predicate.index()].contains(tuple)
    }

    pub fn nullary_atoms(&self) -> &[bool] {
        &self.nullary_atoms
    }

    pub fn is_nullary_true(&self, predicate: PredicateId) -> bool {
        self.nullary_atoms[predicate.index()]
    }

    /// Set a nullary flag. Returns true iff it was previously false.
    pub fn set_nullary(&mut self, predicate: PredicateId) -> bool {
        !std::mem::replace(&mut self.nullary_atoms[predicate.index()], true)
    }

    /// Number of true facts, nullary ones included.
    pub fn fact_count(&self) -> usize {
        self.relations.iter().map(Relation::len).sum::<usize>()
            + self.nullary_atoms.iter().filter(|&&b| b).count()
    }

    /// True iff every fact of `other` also holds here.
    pub fn is_superset(&self, other: &DBState) -> bool {
        self.relations.len() == other.relations.len()
            && self
                .relations
                .iter()
                .zip(&other.relations)
                .all(|(mine, theirs)| mine.is_superset(theirs))
            && self
                .nullary_atoms
                .iter()
                .zip(&other.nullary_atoms)
                .all(|(&mine, &theirs)| mine || !theirs)
    }
}

/// Immutable background facts for the static predicates.
///
/// Built once per task and only ever read afterwards, so it may be shared by
/// concurrent readers without synchronization.
#[derive(Clone, Debug)]
pub struct StaticInformation {
    state: DBState,
    is_static: Vec<bool>,
    equality: Option<PredicateId>,
}

impl StaticInformation {
    /// Restrict `initial` to the predicates flagged in `is_static`.
    pub fn from_initial_state(
        initial: &DBState,
        is_static: Vec<bool>,
        equality: Option<PredicateId>,
    ) -> Self {
        let mut state = DBState::new(initial.predicate_count());
        for (p, relation) in initial.relations.iter().enumerate() {
            if is_static[p] {
                state.relations[p] = relation.clone();
                state.nullary_atoms[p] = initial.nullary_atoms[p];
            }
        }
        Self {
            state,
            is_static,
            equality,
        }
    }

    pub fn relation(&self, predicate: PredicateId) -> &Relation {
        self.state.relation(predicate)
    }

    pub fn is_static(&self, predicate: PredicateId) -> bool {
        self.is_static[predicate.index()]
    }

    pub fn is_nullary_true(&self, predicate: PredicateId) -> bool {
        self.state.is_nullary_true(predicate)
    }

    pub fn equality(&self) -> Option<PredicateId> {
        self.equality
    }

    pub fn is_equality(&self, predicate: PredicateId) -> bool {
        self.equality == Some(predicate)
    }

    pub fn as_state(&self) -> &DBState {
        &self.state
    }
}

#[cfg(test)]
#[path = "tests/state.rs"]
mod tests;
