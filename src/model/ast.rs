use std::fmt;

use crate::formula::Formula;
use crate::symbolic::{Domain, Rhs};

/// Parsed model, before compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelAst {
    pub name: String,
    pub vars: Vec<(String, Domain)>,
    pub init: Vec<Formula>,
    pub trans: Vec<Formula>,
    pub invar: Vec<Formula>,
    pub assigns: Vec<Assignment>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssignKind {
    /// `init(v) := ..`
    Init,
    /// `next(v) := ..`
    Next,
    /// `v := ..`, holds in every state.
    Invariant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub kind: AssignKind,
    pub var: String,
    pub rhs: Rhs,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Ltl,
    Ctl,
    Invariant,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyKind::Ltl => "LTLSPEC",
            PropertyKind::Ctl => "CTLSPEC",
            PropertyKind::Invariant => "INVARSPEC",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub kind: PropertyKind,
    /// Source text of the property.
    pub text: String,
    /// Parsed formula, wrapped in the module context; LTL properties only.
    pub formula: Option<Formula>,
}
