//! Model files: a single NuSMV-style module with its properties.
//!
//! ```text
//! MODULE main
//! VAR
//!   x : boolean;
//!   s : {idle, busy};
//! INIT !x & s = idle
//! TRANS next(x) = !x
//! ASSIGN
//!   next(s) := case x : busy; TRUE : {idle, busy}; esac;
//! LTLSPEC G F x -> G F s = busy
//! ```
//!
//! Missing `INIT` or `TRANS` constraints leave the initial states or the
//! transitions unconstrained.

pub mod ast;
pub mod parser;

use std::path::Path;

use log::{debug, info};

use self::ast::{AssignKind, ModelAst, Property, PropertyKind};
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::symbolic::{SymbolicModel, TransitionSystem};

pub use self::parser::{parse_formula, parse_model};

/// A compiled model and its properties, in source order.
#[derive(Debug)]
pub struct Model {
    pub name: String,
    pub fsm: SymbolicModel,
    pub properties: Vec<Property>,
}

impl Model {
    /// `(kind, formula)` of every property; only LTL properties have a formula.
    pub fn properties(&self) -> impl Iterator<Item = (PropertyKind, Option<&Formula>)> + '_ {
        self.properties.iter().map(|p| (p.kind, p.formula.as_ref()))
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    info!("Loading model from '{}'", path.display());
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_source(&source)
}

pub fn from_source(source: &str) -> Result<Model> {
    let ast = parse_model(source)?;
    compile(ast)
}

pub fn compile(ast: ModelAst) -> Result<Model> {
    let mut ts = TransitionSystem::new();
    for (name, domain) in &ast.vars {
        debug!("var {} : {}", name, domain);
        ts.declare(name, domain.clone())?;
    }

    let has_init = !ast.init.is_empty() || ast.assigns.iter().any(|a| a.kind == AssignKind::Init);
    let has_trans = !ast.trans.is_empty() || ast.assigns.iter().any(|a| a.kind == AssignKind::Next);
    if !has_init {
        ts.set_initial(ts.bdd().one);
    }
    if !has_trans {
        ts.set_transition(ts.bdd().one);
    }

    for f in &ast.init {
        let init = ts.compile_state(f)?;
        ts.constrain_initial(init);
    }
    for f in &ast.trans {
        let trans = ts.compile_transition(f)?;
        ts.constrain_transition(trans);
    }
    for f in &ast.invar {
        let invar = ts.compile_state(f)?;
        ts.add_invariant(invar);
    }

    for assignment in &ast.assigns {
        match assignment.kind {
            AssignKind::Init => ts.assign_init(&assignment.var, &assignment.rhs)?,
            AssignKind::Next => ts.assign_next(&assignment.var, &assignment.rhs)?,
            AssignKind::Invariant => ts.assign_invariant(&assignment.var, &assignment.rhs)?,
        }
    }

    let fsm = ts.finish()?;
    info!(
        "Model '{}': {} variables, {} properties",
        ast.name,
        fsm.variables().len(),
        ast.properties.len()
    );
    Ok(Model {
        name: ast.name,
        fsm,
        properties: ast.properties,
    })
}
