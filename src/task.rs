//! The planning task consumed by the grounder.
//!
//! Parsing lives outside this crate; callers describe a task through
//! [`TaskBuilder`], which validates every atom and classifies predicates as
//! static or fluent once, up front.

use crate::error::GroundingError;
use crate::goal::{AtomicGoal, GoalCondition};
use crate::model::{
    ActionSchema, Argument, Atom, Object, ObjectType, Parameter, Predicate, PredicateId, EQUALITY,
};
use crate::state::{DBState, StaticInformation};
use crate::symbol::{Symbol, SymbolStore};
use crate::tuple::{FxHashMap, ObjectId, Tuple};

/// A fully validated task.
#[derive(Debug)]
pub struct Task {
    symbols: SymbolStore,
    types: Vec<String>,
    objects: Vec<Object>,
    predicates: Vec<Predicate>,
    actions: Vec<ActionSchema>,
    initial_state: DBState,
    static_info: StaticInformation,
    goal: GoalCondition,
    object_names: FxHashMap<Symbol, ObjectId>,
    predicate_names: FxHashMap<Symbol, PredicateId>,
    action_names: FxHashMap<Symbol, usize>,
}

impl Task {
    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn predicate(&self, id: PredicateId) -> &Predicate {
        &self.predicates[id.index()]
    }

    pub fn action_schemas(&self) -> &[ActionSchema] {
        &self.actions
    }

    pub fn initial_state(&self) -> &DBState {
        &self.initial_state
    }

    pub fn static_info(&self) -> &StaticInformation {
        &self.static_info
    }

    pub fn goal(&self) -> &GoalCondition {
        &self.goal
    }

    pub fn object_id(&self, name: &str) -> Option<ObjectId> {
        self.symbols
            .get(name)
            .and_then(|s| self.object_names.get(&s).copied())
    }

    pub fn predicate_id(&self, name: &str) -> Option<PredicateId> {
        self.symbols
            .get(name)
            .and_then(|s| self.predicate_names.get(&s).copied())
    }

    pub fn action_index(&self, name: &str) -> Option<usize> {
        self.symbols
            .get(name)
            .and_then(|s| self.action_names.get(&s).copied())
    }

    /// Objects declaring type `ty`.
    pub fn objects_of_type(&self, ty: ObjectType) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter(move |(_, o)| o.has_type(ty))
            .map(|(i, _)| i as ObjectId)
    }

    /// Render a fact as `name(obj, obj)`, or bare `name` when nullary.
    pub fn format_fact(&self, predicate: PredicateId, tuple: &[ObjectId]) -> String {
        let name = &self.predicates[predicate.index()].name;
        if tuple.is_empty() {
            return name.clone();
        }
        let args: Vec<&str> = tuple
            .iter()
            .map(|&o| self.objects[o as usize].name.as_str())
            .collect();
        format!("{}({})", name, args.join(", "))
    }

    /// Every true fact of `state`, rendered and sorted.
    pub fn dump_state(&self, state: &DBState) -> Vec<String> {
        let mut facts: Vec<String> = state
            .relations()
            .iter()
            .flat_map(|r| r.iter().map(move |t| self.format_fact(r.predicate, t)))
            .collect();
        for (p, &on) in state.nullary_atoms().iter().enumerate() {
            if on {
                facts.push(self.format_fact(PredicateId(p as u32), &[]));
            }
        }
        facts.sort();
        facts
    }
}

/// Incremental, validating constructor for [`Task`].
#[derive(Default)]
pub struct TaskBuilder {
    symbols: SymbolStore,
    types: Vec<String>,
    type_names: FxHashMap<Symbol, ObjectType>,
    objects: Vec<Object>,
    object_names: FxHashMap<Symbol, ObjectId>,
    predicates: Vec<(String, usize)>,
    predicate_names: FxHashMap<Symbol, PredicateId>,
    actions: Vec<ActionSchema>,
    action_names: FxHashMap<Symbol, usize>,
    facts: Vec<(PredicateId, Tuple)>,
    goals: Vec<AtomicGoal>,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, name: &str) -> Result<ObjectType, GroundingError> {
        let symbol = self.symbols.intern(name);
        if self.type_names.contains_key(&symbol) {
            return Err(duplicate("type", name));
        }
        let ty = ObjectType(self.types.len() as u32);
        self.types.push(name.to_string());
        self.type_names.insert(symbol, ty);
        Ok(ty)
    }

    pub fn type_id(&self, name: &str) -> Option<ObjectType> {
        self.symbols
            .get(name)
            .and_then(|s| self.type_names.get(&s).copied())
    }

    pub fn add_object(
        &mut self,
        name: &str,
        types: &[ObjectType],
    ) -> Result<ObjectId, GroundingError> {
        if let Some(bad) = types.iter().find(|t| t.0 as usize >= self.types.len()) {
            return Err(GroundingError::UnknownType(bad.0));
        }
        let symbol = self.symbols.intern(name);
        if self.object_names.contains_key(&symbol) {
            return Err(duplicate("object", name));
        }
        let id = self.objects.len() as ObjectId;
        self.objects.push(Object {
            name: name.to_string(),
            types: types.iter().copied().collect(),
        });
        self.object_names.insert(symbol, id);
        Ok(id)
    }

    pub fn object(&self, name: &str) -> Option<ObjectId> {
        self.symbols
            .get(name)
            .and_then(|s| self.object_names.get(&s).copied())
    }

    pub fn add_predicate(&mut self, name: &str, arity: usize) -> Result<PredicateId, GroundingError> {
        let symbol = self.symbols.intern(name);
        if self.predicate_names.contains_key(&symbol) {
            return Err(duplicate("predicate", name));
        }
        let id = PredicateId(self.predicates.len() as u32);
        self.predicates.push((name.to_string(), arity));
        self.predicate_names.insert(symbol, id);
        Ok(id)
    }

    /// The built-in binary `=` predicate, declared on first use.
    pub fn equality(&mut self) -> PredicateId {
        let symbol = self.symbols.intern(EQUALITY);
        if let Some(&id) = self.predicate_names.get(&symbol) {
            return id;
        }
        let id = PredicateId(self.predicates.len() as u32);
        self.predicates.push((EQUALITY.to_string(), 2));
        self.predicate_names.insert(symbol, id);
        id
    }

    pub fn add_action(
        &mut self,
        name: &str,
        parameters: Vec<Parameter>,
        precondition: Vec<Atom>,
        effects: Vec<Atom>,
        cost: u32,
    ) -> Result<usize, GroundingError> {
        let symbol = self.symbols.intern(name);
        if self.action_names.contains_key(&symbol) {
            return Err(duplicate("action", name));
        }
        let index = self.actions.len();
        self.actions.push(ActionSchema {
            name: name.to_string(),
            index,
            parameters,
            precondition,
            effects,
            cost,
        });
        self.action_names.insert(symbol, index);
        Ok(index)
    }

    /// Add a fact (nullary when `tuple` is empty) to the initial state.
    pub fn add_fact(&mut self, predicate: PredicateId, tuple: &[ObjectId]) {
        self.facts.push((predicate, Tuple::from_slice(tuple)));
    }

    pub fn add_goal(&mut self, predicate: PredicateId, tuple: &[ObjectId], negated: bool) {
        self.goals.push(AtomicGoal {
            predicate,
            arguments: Tuple::from_slice(tuple),
            negated,
        });
    }

    /// Validate everything and classify predicates.
    pub fn build(self) -> Result<Task, GroundingError> {
        for action in &self.actions {
            self.check_action(action)?;
        }
        for (p, tuple) in &self.facts {
            self.check_tuple(*p, tuple)?;
        }
        for goal in &self.goals {
            self.check_tuple(goal.predicate, &goal.arguments)?;
        }

        let mut is_static = vec![true; self.predicates.len()];
        for effect in self.actions.iter().flat_map(|a| a.effects.iter()) {
            is_static[effect.predicate.index()] = false;
        }

        let predicates: Vec<Predicate> = self
            .predicates
            .iter()
            .zip(&is_static)
            .map(|((name, arity), &is_static)| Predicate {
                name: name.clone(),
                arity: *arity,
                is_static,
            })
            .collect();

        let mut initial_state = DBState::new(predicates.len());
        for (p, tuple) in &self.facts {
            if tuple.is_empty() {
                initial_state.set_nullary(*p);
            } else {
                initial_state.insert(*p, tuple);
            }
        }

        let equality = predicates
            .iter()
            .position(Predicate::is_equality)
            .map(|p| PredicateId(p as u32));
        let static_info = StaticInformation::from_initial_state(&initial_state, is_static, equality);

        Ok(Task {
            symbols: self.symbols,
            types: self.types,
            objects: self.objects,
            predicates,
            actions: self.actions,
            initial_state,
            static_info,
            goal: GoalCondition::new(self.goals),
            object_names: self.object_names,
            predicate_names: self.predicate_names,
            action_names: self.action_names,
        })
    }

    fn check_tuple(&self, predicate: PredicateId, tuple: &[ObjectId]) -> Result<(), GroundingError> {
        let (name, arity) = self
            .predicates
            .get(predicate.index())
            .ok_or(GroundingError::UnknownPredicate(predicate.0))?;
        if tuple.len() != *arity {
            return Err(GroundingError::ArityMismatch {
                predicate: name.clone(),
                expected: *arity,
                found: tuple.len(),
            });
        }
        match tuple.iter().find(|&&o| o as usize >= self.objects.len()) {
            Some(&bad) => Err(GroundingError::UnknownObject(bad)),
            None => Ok(()),
        }
    }

    fn check_action(&self, action: &ActionSchema) -> Result<(), GroundingError> {
        if let Some(bad) = action
            .parameters
            .iter()
            .find(|p| p.ty.0 as usize >= self.types.len())
        {
            return Err(GroundingError::UnknownType(bad.ty.0));
        }
        for atom in action.precondition.iter().chain(&action.effects) {
            let (name, arity) = self
                .predicates
                .get(atom.predicate.index())
                .ok_or(GroundingError::UnknownPredicate(atom.predicate.0))?;
            if name == EQUALITY && atom.arguments.len() != 2 {
                return Err(GroundingError::MalformedEquality {
                    action: action.name.clone(),
                });
            }
            if atom.arguments.len() != *arity {
                return Err(GroundingError::ArityMismatch {
                    predicate: name.clone(),
                    expected: *arity,
                    found: atom.arguments.len(),
                });
            }
            for arg in &atom.arguments {
                match *arg {
                    Argument::Constant(o) if o as usize >= self.objects.len() => {
                        return Err(GroundingError::UnknownObject(o));
                    }
                    Argument::Parameter(index) if index >= action.parameters.len() => {
                        return Err(GroundingError::ParameterOutOfRange {
                            action: action.name.clone(),
                            index,
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

fn duplicate(kind: &'static str, name: &str) -> GroundingError {
    GroundingError::DuplicateName {
        kind,
        name: name.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/task.rs"]
mod tests;
