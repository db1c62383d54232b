use proptest::prelude::*;
use relground::config::FactLayerConfig;
use relground::fact_layer::{generate_next_fact_layer, run_fact_layers};
use relground::grounder::Grounder;
use relground::model::{Argument, Atom, Parameter, PredicateId};
use relground::task::{Task, TaskBuilder};

/// Arities of `p0..p3`; index 4 is `=`.
const ARITIES: [usize; 5] = [0, 1, 2, 2, 2];
const EQ: usize = 4;

#[derive(Clone, Debug)]
struct RawAtom {
    predicate: usize,
    args: [(bool, u32); 2],
    negated: bool,
}

#[derive(Clone, Debug)]
struct RawAction {
    params: usize,
    precondition: Vec<RawAtom>,
    effects: Vec<RawAtom>,
}

#[derive(Clone, Debug)]
struct RawTask {
    objects: u32,
    actions: Vec<RawAction>,
    facts: Vec<RawAtom>,
}

fn raw_atom_strategy() -> impl Strategy<Value = RawAtom> {
    (
        0..ARITIES.len(),
        (any::<bool>(), 0u32..3),
        (any::<bool>(), 0u32..3),
        any::<bool>(),
    )
        .prop_map(|(predicate, first, second, negated)| RawAtom {
            predicate,
            args: [first, second],
            negated,
        })
}

fn raw_action_strategy() -> impl Strategy<Value = RawAction> {
    (
        1usize..=2,
        prop::collection::vec(raw_atom_strategy(), 0..3),
        prop::collection::vec(raw_atom_strategy(), 1..3),
    )
        .prop_map(|(params, precondition, effects)| RawAction {
            params,
            precondition,
            effects,
        })
}

prop_compose! {
    fn raw_task_strategy()
        (
            objects in 1u32..=3,
            actions in prop::collection::vec(raw_action_strategy(), 1..=3),
            facts in prop::collection::vec(raw_atom_strategy(), 0..5),
        )
        -> RawTask
    {
        RawTask { objects, actions, facts }
    }
}

fn argument(raw: (bool, u32), params: usize, objects: u32) -> Argument {
    match raw {
        (true, v) if params > 0 => Argument::Parameter(v as usize % params),
        (_, v) => Argument::Constant(v % objects),
    }
}

/// Equality only appears in preconditions, where it is the one atom that may
/// be negated.
fn atom(raw: &RawAtom, precondition: bool, params: usize, objects: u32) -> Atom {
    let predicate = if raw.predicate == EQ && !precondition {
        EQ - 1
    } else {
        raw.predicate
    };
    let args = raw.args[..ARITIES[predicate]]
        .iter()
        .map(|&a| argument(a, params, objects));
    let negated = if precondition {
        raw.negated && predicate == EQ
    } else {
        raw.negated
    };
    if negated {
        Atom::negated(PredicateId(predicate as u32), args)
    } else {
        Atom::new(PredicateId(predicate as u32), args)
    }
}

fn build(raw: &RawTask) -> Task {
    let mut b = TaskBuilder::new();
    let ty = b.add_type("obj").unwrap();
    for i in 0..raw.objects {
        b.add_object(&format!("o{i}"), &[ty]).unwrap();
    }
    for (i, &arity) in ARITIES[..EQ].iter().enumerate() {
        b.add_predicate(&format!("p{i}"), arity).unwrap();
    }
    assert_eq!(b.equality(), PredicateId(EQ as u32));

    for (i, action) in raw.actions.iter().enumerate() {
        let parameters = (0..action.params)
            .map(|k| Parameter {
                name: format!("?x{k}"),
                ty,
            })
            .collect();
        let precondition = action
            .precondition
            .iter()
            .map(|a| atom(a, true, action.params, raw.objects))
            .collect();
        let effects = action
            .effects
            .iter()
            .map(|a| atom(a, false, action.params, raw.objects))
            .collect();
        b.add_action(&format!("a{i}"), parameters, precondition, effects, 1)
            .unwrap();
    }
    for fact in &raw.facts {
        let fact = atom(fact, false, 0, raw.objects);
        let tuple: Vec<u32> = fact.arguments.iter().filter_map(|a| a.as_constant()).collect();
        b.add_fact(fact.predicate, &tuple);
    }
    b.build().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn fixpoint_terminates_and_only_grows(raw in raw_task_strategy()) {
        let task = build(&raw);
        let grounder = Grounder::new(&task).unwrap();
        let result = run_fact_layers(
            &grounder,
            task.initial_state(),
            task.goal(),
            &FactLayerConfig::saturate(),
        )
        .unwrap();

        prop_assert!(result.saturated);
        prop_assert!(result.state.is_superset(task.initial_state()));
        prop_assert_eq!(result.layers.len(), result.passes);

        let mut total = task.initial_state().fact_count();
        for (i, layer) in result.layers.iter().enumerate() {
            prop_assert_eq!(layer.pass, i + 1);
            prop_assert_eq!(layer.total_facts, total + layer.facts_added);
            let last = i + 1 == result.layers.len();
            prop_assert_eq!(layer.facts_added == 0, last);
            total = layer.total_facts;
        }

        let mut again = result.state.clone();
        prop_assert_eq!(generate_next_fact_layer(&grounder, &mut again).unwrap(), 0);
    }

    #[test]
    fn applicable_operators_effects_are_reachable(raw in raw_task_strategy()) {
        let task = build(&raw);
        let grounder = Grounder::new(&task).unwrap();
        let reached = run_fact_layers(
            &grounder,
            task.initial_state(),
            task.goal(),
            &FactLayerConfig::saturate(),
        )
        .unwrap()
        .state;

        for op in grounder.all_applicable_actions(task.initial_state()).unwrap() {
            let schema = &task.action_schemas()[op.action];
            for effect in schema.positive_effects() {
                let fact = effect.ground_with(&op.instantiation);
                if fact.is_empty() {
                    prop_assert!(reached.is_nullary_true(effect.predicate));
                } else {
                    prop_assert!(reached.contains(effect.predicate, &fact));
                }
            }
        }
    }
}
