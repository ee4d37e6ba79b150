use num_bigint::BigUint;
use test_log::test;

use reactive_mc::bitset::BitSet;
use reactive_mc::explicit::ExplicitFsm;
use reactive_mc::formula::Formula;
use reactive_mc::fsm::{StateSpace, SymbolicFsm};
use reactive_mc::model::{self, Model};
use reactive_mc::persistence::PersistenceMode;
use reactive_mc::reach::ReachabilitySolver;
use reactive_mc::verify::{CheckOptions, Composition, ReactiveVerifier, Verdict};
use reactive_mc::Error;

const ALTERNATING: &str = include_str!("../demos/alternating.smv");
const STARVING: &str = include_str!("../demos/starving.smv");
const SPLIT: &str = include_str!("../demos/split.smv");
const COUNTER: &str = include_str!("../demos/counter.smv");

fn verdicts(model: &Model, options: CheckOptions) -> Vec<Verdict> {
    let verifier = ReactiveVerifier::new(&model.fsm).with_options(options);
    model
        .properties()
        .map(|(_, formula)| match formula {
            Some(formula) => verifier.verify(formula).unwrap(),
            None => Verdict::NotApplicable,
        })
        .collect()
}

fn joint() -> CheckOptions {
    CheckOptions {
        composition: Composition::Joint,
        ..CheckOptions::default()
    }
}

fn violated() -> Verdict {
    Verdict::Violated { counterexample: None }
}

#[test]
fn test_alternating_holds() {
    let model = model::from_source(ALTERNATING).unwrap();
    let reach = ReachabilitySolver::new(&model.fsm).compute().unwrap();
    assert_eq!(model.fsm.cardinality(&reach), BigUint::from(2u32));

    let expected = vec![Verdict::Holds, Verdict::NotApplicable];
    assert_eq!(verdicts(&model, CheckOptions::default()), expected);
    assert_eq!(verdicts(&model, joint()), expected);
}

#[test]
fn test_starving_violated() {
    let model = model::from_source(STARVING).unwrap();
    let fsm = &model.fsm;

    // the sink is in the model but not reachable
    let sink = fsm.evaluate(&model::parse_formula("s = c").unwrap()).unwrap();
    let reach = ReachabilitySolver::new(fsm).compute().unwrap();
    assert!(!fsm.is_empty(&sink));
    assert!(!fsm.intersects(&reach, &sink));

    let expected = vec![violated(), Verdict::Holds, Verdict::NotApplicable];
    assert_eq!(verdicts(&model, CheckOptions::default()), expected);
    assert_eq!(verdicts(&model, joint()), expected);
}

#[test]
fn test_split_needs_joint_composition() {
    let model = model::from_source(SPLIT).unwrap();
    assert_eq!(verdicts(&model, CheckOptions::default()), vec![violated()]);
    assert_eq!(verdicts(&model, joint()), vec![Verdict::Holds]);
}

#[test]
fn test_counter() {
    let model = model::from_source(COUNTER).unwrap();
    assert_eq!(
        verdicts(&model, CheckOptions::default()),
        vec![violated(), violated(), Verdict::NotApplicable]
    );
    // every reset returns to zero, so no fair run avoids it
    assert_eq!(
        verdicts(&model, joint()),
        vec![Verdict::Holds, violated(), Verdict::NotApplicable]
    );
}

fn single_step() -> CheckOptions {
    CheckOptions {
        persistence: PersistenceMode::SingleStep,
        ..CheckOptions::default()
    }
}

#[test]
fn test_persistence_modes_agree_on_simple_loops() {
    for source in [ALTERNATING, STARVING, SPLIT] {
        let model = model::from_source(source).unwrap();
        assert_eq!(
            verdicts(&model, single_step()),
            verdicts(&model, CheckOptions::default()),
            "model '{}'",
            model.name
        );
    }
}

#[test]
fn test_single_step_misses_persistence() {
    // states with `reset` leave `n != 0` at once, hiding the `n = 1` self-loop
    let model = model::from_source(COUNTER).unwrap();
    assert_eq!(
        verdicts(&model, single_step()),
        vec![Verdict::Holds, Verdict::Holds, Verdict::NotApplicable]
    );
}

#[test]
fn test_backends_agree() {
    // A <-> B with p on A and B, unreachable sink C with q.
    let mut explicit = ExplicitFsm::new();
    let a = explicit.add_state();
    let b = explicit.add_state();
    let c = explicit.add_state();
    explicit.add_transition(a, b);
    explicit.add_transition(b, a);
    explicit.add_transition(c, c);
    explicit.add_initial(a);
    for s in [a, b] {
        explicit.label(s, "p");
    }
    explicit.label(c, "q");

    let symbolic = model::from_source(
        "MODULE main
         VAR p : boolean; q : boolean; s : {a, b, c};
         ASSIGN
           init(s) := a;
           next(s) := case s = a : b; s = b : a; TRUE : c; esac;
           p := s != c;
           q := s = c;",
    )
    .unwrap();

    let spec = Formula::atom("p")
        .infinitely_often()
        .implies(Formula::atom("q").infinitely_often())
        .in_context("main");
    for options in [CheckOptions::default(), joint()] {
        let lhs = ReactiveVerifier::new(&explicit).with_options(options).verify(&spec).unwrap();
        let rhs = ReactiveVerifier::new(&symbolic.fsm).with_options(options).verify(&spec).unwrap();
        assert_eq!(lhs, rhs);
        assert!(lhs.is_violated());
    }
}

/// A backend whose emptiness test never succeeds.
struct NeverEmpty(ExplicitFsm);

impl StateSpace for NeverEmpty {
    type Set = BitSet;

    fn empty(&self) -> BitSet {
        self.0.empty()
    }
    fn universe(&self) -> BitSet {
        self.0.universe()
    }
    fn union(&self, a: &BitSet, b: &BitSet) -> BitSet {
        self.0.union(a, b)
    }
    fn intersection(&self, a: &BitSet, b: &BitSet) -> BitSet {
        self.0.intersection(a, b)
    }
    fn difference(&self, a: &BitSet, b: &BitSet) -> BitSet {
        self.0.difference(a, b)
    }
    fn is_empty(&self, _a: &BitSet) -> bool {
        false
    }
    fn cardinality(&self, a: &BitSet) -> BigUint {
        self.0.cardinality(a)
    }
}

impl SymbolicFsm for NeverEmpty {
    fn initial_states(&self) -> BitSet {
        self.0.initial_states()
    }
    fn pre(&self, s: &BitSet) -> BitSet {
        self.0.pre(s)
    }
    fn post(&self, s: &BitSet) -> BitSet {
        self.0.post(s)
    }
    fn evaluate(&self, formula: &Formula) -> reactive_mc::Result<BitSet> {
        self.0.evaluate(formula)
    }
}

#[test]
fn test_divergence_is_reported() {
    let mut inner = ExplicitFsm::new();
    let a = inner.add_state();
    let b = inner.add_state();
    inner.add_transition(a, b);
    inner.add_transition(b, a);
    inner.add_initial(a);
    let fsm = NeverEmpty(inner);

    let err = ReachabilitySolver::new(&fsm).compute().unwrap_err();
    assert!(matches!(err, Error::Divergence { fixpoint: "reachability", .. }));
    assert!(err.is_internal());

    let spec = Formula::atom("p")
        .infinitely_often()
        .implies(Formula::atom("q").infinitely_often())
        .in_context("main");
    let err = ReactiveVerifier::new(&fsm).verify(&spec).unwrap_err();
    assert!(matches!(err, Error::Divergence { .. }));
}
