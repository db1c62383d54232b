//! Lifted task vocabulary: objects, predicates, atoms and action schemas.

use crate::tuple::{ObjectId, Tuple};
use smallvec::SmallVec;

/// Index of a predicate in the task's predicate list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(pub u32);

impl PredicateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a declared object type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectType(pub u32);

/// Name of the built-in equality predicate.
pub const EQUALITY: &str = "=";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub name: String,
    /// Declared types, already closed under supertypes.
    pub types: SmallVec<[ObjectType; 2]>,
}

impl Object {
    pub fn has_type(&self, ty: ObjectType) -> bool {
        self.types.contains(&ty)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub name: String,
    pub arity: usize,
    /// True iff no action effect ever mentions this predicate.
    pub is_static: bool,
}

impl Predicate {
    pub fn is_equality(&self) -> bool {
        self.name == EQUALITY
    }
}

/// One argument position of an atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Argument {
    /// Bound to a specific object.
    Constant(ObjectId),
    /// Bound to a position in the owning schema's parameter list.
    Parameter(usize),
}

impl Argument {
    pub fn is_constant(self) -> bool {
        matches!(self, Argument::Constant(_))
    }

    pub fn as_parameter(self) -> Option<usize> {
        match self {
            Argument::Parameter(p) => Some(p),
            Argument::Constant(_) => None,
        }
    }

    pub fn as_constant(self) -> Option<ObjectId> {
        match self {
            Argument::Constant(c) => Some(c),
            Argument::Parameter(_) => None,
        }
    }
}

/// A predicate applied to arguments, possibly negated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Atom {
    pub predicate: PredicateId,
    pub arguments: SmallVec<[Argument; 4]>,
    pub negated: bool,
}

impl Atom {
    pub fn new(predicate: PredicateId, arguments: impl IntoIterator<Item = Argument>) -> Self {
        Self {
            predicate,
            arguments: arguments.into_iter().collect(),
            negated: false,
        }
    }

    pub fn negated(predicate: PredicateId, arguments: impl IntoIterator<Item = Argument>) -> Self {
        Self {
            negated: true,
            ..Self::new(predicate, arguments)
        }
    }

    /// True iff every argument is a constant (nullary atoms included).
    pub fn is_ground(&self) -> bool {
        self.arguments.iter().all(|a| a.is_constant())
    }

    /// The constant tuple of a ground atom.
    pub fn ground_tuple(&self) -> Option<Tuple> {
        self.arguments.iter().map(|a| a.as_constant()).collect()
    }

    /// Distinct parameters in order of first occurrence.
    pub fn parameters(&self) -> SmallVec<[usize; 4]> {
        let mut params = SmallVec::new();
        for p in self.arguments.iter().filter_map(|a| a.as_parameter()) {
            if !params.contains(&p) {
                params.push(p);
            }
        }
        params
    }

    /// Substitute `binding` for the parameters, yielding a ground tuple.
    ///
    /// `binding[k]` is the object for parameter `k`.
    pub fn ground_with(&self, binding: &[ObjectId]) -> Tuple {
        self.arguments
            .iter()
            .map(|a| match *a {
                Argument::Constant(c) => c,
                Argument::Parameter(p) => binding[p],
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: ObjectType,
}

/// A parametrized action template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSchema {
    pub name: String,
    /// Position of this schema in the task's action list.
    pub index: usize,
    pub parameters: Vec<Parameter>,
    pub precondition: Vec<Atom>,
    /// Negated effects are deletions.
    pub effects: Vec<Atom>,
    pub cost: u32,
}

impl ActionSchema {
    pub fn is_ground(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn positive_effects(&self) -> impl Iterator<Item = &Atom> {
        self.effects.iter().filter(|e| !e.negated)
    }
}
