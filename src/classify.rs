//! Recognition of the reactive fragment `G F f -> G F g`.
//!
//! Matching is purely structural: no rewriting, so `G F p -> G F q` matches
//! but an equivalent `!(G F p) | G F q` does not.

use log::debug;

use crate::formula::{BinaryOp, Formula};

/// Why a formula is not of the expected shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The property is not wrapped in a context.
    NoContext,
    /// The top-level connective is not an implication.
    NotImplication,
    /// A side is not of the form `G F φ`.
    NotGloballyFinally,
    /// A side is `G F φ`, but `φ` contains a temporal operator.
    TemporalBody,
}

/// The two halves of `G F assumption -> G F guarantee`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reactive<'a> {
    pub assumption: &'a Formula,
    pub guarantee: &'a Formula,
}

/// Whether `formula` is free of temporal operators.
pub fn is_boolean_formula(formula: &Formula) -> bool {
    match formula {
        Formula::True | Formula::False | Formula::Atom(_) | Formula::Number(_) | Formula::Comparison(_, _, _) => true,
        Formula::Not(phi) => is_boolean_formula(phi),
        Formula::Binary(_, l, r) => is_boolean_formula(l) && is_boolean_formula(r),
        Formula::Next(_) | Formula::Global(_) | Formula::Future(_) | Formula::Until(_, _) | Formula::Context(_, _) => {
            false
        }
    }
}

pub fn match_gf(formula: &Formula) -> Result<&Formula, Mismatch> {
    match formula {
        Formula::Global(inner) => match inner.as_ref() {
            Formula::Future(phi) if is_boolean_formula(phi) => Ok(phi),
            Formula::Future(_) => Err(Mismatch::TemporalBody),
            _ => Err(Mismatch::NotGloballyFinally),
        },
        _ => Err(Mismatch::NotGloballyFinally),
    }
}

/// Returns `φ` if `formula` is `G F φ` with a boolean `φ`.
pub fn classify_gf(formula: &Formula) -> Option<&Formula> {
    match_gf(formula).ok()
}

pub fn match_reactive(formula: &Formula) -> Result<Reactive<'_>, Mismatch> {
    let Formula::Context(_, body) = formula else {
        return Err(Mismatch::NoContext);
    };
    let Formula::Binary(BinaryOp::Implies, lhs, rhs) = body.as_ref() else {
        return Err(Mismatch::NotImplication);
    };
    Ok(Reactive {
        assumption: match_gf(lhs)?,
        guarantee: match_gf(rhs)?,
    })
}

/// Returns `(f, g)` if `formula` is a context around `G F f -> G F g`.
pub fn parse_reactive(formula: &Formula) -> Option<Reactive<'_>> {
    match match_reactive(formula) {
        Ok(reactive) => Some(reactive),
        Err(reason) => {
            debug!("`{}` is not a reactive property: {:?}", formula, reason);
            None
        }
    }
}
