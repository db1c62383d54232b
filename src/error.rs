use thiserror::Error;

/// Errors raised while building a task or preparing it for grounding.
///
/// Empty groundings are not errors: a statically inapplicable schema or a
/// fluent precondition with no matching tuples both yield an empty table.
#[derive(Debug, Error)]
pub enum GroundingError {
    #[error("action `{action}` has no parameters; test it with is_ground_applicable instead")]
    GroundSchema { action: String },

    #[error("action `{action}`: negated precondition on `{predicate}` is not supported")]
    NegatedPrecondition { action: String, predicate: String },

    #[error("atom over `{predicate}` has {found} arguments, expected {expected}")]
    ArityMismatch {
        predicate: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown predicate id {0}")]
    UnknownPredicate(u32),

    #[error("unknown object id {0}")]
    UnknownObject(u32),

    #[error("unknown type id {0}")]
    UnknownType(u32),

    #[error("unknown action index {0}")]
    UnknownAction(usize),

    #[error("action `{action}` references parameter ?{index} which it does not declare")]
    ParameterOutOfRange { action: String, index: usize },

    #[error("action `{action}`: equality atom must have exactly two arguments")]
    MalformedEquality { action: String },

    #[error("{kind} `{name}` is declared twice")]
    DuplicateName { kind: &'static str, name: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
