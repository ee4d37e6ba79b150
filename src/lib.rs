//! # reactive-mc: symbolic checking of reactive properties
//!
//! **`reactive-mc`** decides whether a finite-state transition system
//! satisfies LTL properties of the reactive (GR(1)) shape
//!
//! ```text
//! G F f -> G F g        "if f happens infinitely often, so does g"
//! ```
//!
//! where `f` and `g` are state predicates. Properties of any other shape are
//! reported as not applicable.
//!
//! ## How it works
//!
//! 1. The [`classify`] module recognizes the `G F f -> G F g` shape in a
//!    [`Formula`][crate::formula::Formula] tree.
//! 2. [`ReachabilitySolver`][crate::reach::ReachabilitySolver] computes the reachable states.
//! 3. [`RecurrenceChecker`][crate::recurrence::RecurrenceChecker] decides whether `f` can recur forever,
//!    [`PersistenceChecker`][crate::persistence::PersistenceChecker] whether `!g` can persist forever.
//! 4. [`ReactiveVerifier`][crate::verify::ReactiveVerifier] combines the two into a
//!    [`Verdict`][crate::verify::Verdict]. With
//!    [`Composition::Joint`][crate::verify::Composition::Joint] it instead runs
//!    [`FairCycleChecker`][crate::fair::FairCycleChecker], which looks for a
//!    single execution doing both.
//!
//! All checkers are generic over the [`SymbolicFsm`][crate::fsm::SymbolicFsm] capability.
//! Two backends implement it:
//!
//! - [`symbolic`]: BDD-encoded transition systems, built with [`model::load`] from
//!   NuSMV-style model files.
//! - [`explicit`]: small explicit-state graphs, handy for tests.
//!
//! ## Basic Usage
//!
//! ```rust
//! use reactive_mc::model;
//! use reactive_mc::verify::{ReactiveVerifier, Verdict};
//!
//! let model = model::from_source(
//!     "MODULE main
//!      VAR x : boolean;
//!      INIT !x
//!      TRANS next(x) = !x
//!      LTLSPEC G F !x -> G F x",
//! )?;
//!
//! let verifier = ReactiveVerifier::new(&model.fsm);
//! let (_, spec) = model.properties().next().unwrap();
//! assert_eq!(verifier.verify(spec.unwrap())?, Verdict::Holds);
//! # Ok::<(), reactive_mc::Error>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: The [`Bdd`][crate::bdd::Bdd] manager: reduced ordered BDDs with complement edges,
//!   quantification, relational product and renaming.
//! - **[`sat`]**: Exact model counting.
//! - **[`fsm`]**: The capability traits the checkers are written against.
//! - **[`verify`]**: Verdicts and check options.

pub mod bdd;
pub mod bitset;
pub mod cache;
pub mod classify;
pub mod error;
pub mod explicit;
pub mod fair;
pub mod fixpoint;
pub mod formula;
pub mod fsm;
pub mod model;
pub mod persistence;
pub mod reach;
pub mod recurrence;
pub mod reference;
pub mod sat;
pub mod symbolic;
pub mod table;
pub mod utils;
pub mod value;
pub mod verify;

pub use crate::error::{Error, Result};
