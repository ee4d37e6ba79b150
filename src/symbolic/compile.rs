//! Compilation of formulas and assignment right-hand sides into BDDs.

use crate::error::{Error, Result};
use crate::formula::{BinaryOp, Formula};
use crate::reference::Ref;
use crate::symbolic::encoding::{Domain, Encoding, Frame};
use crate::value::Value;

/// Right-hand side of an `init(v) :=` or `next(v) :=` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rhs {
    Expr(Formula),
    /// Nondeterministic choice among the listed values.
    Set(Vec<Formula>),
    /// The first branch whose guard holds.
    Case(Vec<(Formula, Rhs)>),
}

/// A value together with the condition under which an expression takes it.
type Guarded = Vec<(Ref, Value)>;

pub(crate) struct Compiler<'a> {
    enc: &'a Encoding,
    /// Whether `next(..)` may appear, i.e. whether this is a transition constraint.
    allow_next: bool,
}

impl<'a> Compiler<'a> {
    pub fn state(enc: &'a Encoding) -> Self {
        Self { enc, allow_next: false }
    }

    pub fn transition(enc: &'a Encoding) -> Self {
        Self { enc, allow_next: true }
    }

    fn enter_next(&self, formula: &Formula, frame: Frame) -> Result<Frame> {
        if !self.allow_next {
            return Err(Error::Temporal(formula.to_string()));
        }
        if frame == Frame::Next {
            return Err(Error::Type(format!("nested `next` in `{}`", formula)));
        }
        Ok(Frame::Next)
    }

    pub fn compile_bool(&self, formula: &Formula, frame: Frame) -> Result<Ref> {
        let bdd = &self.enc.bdd;
        match formula {
            Formula::True => Ok(bdd.one),
            Formula::False => Ok(bdd.zero),
            Formula::Atom(name) => match self.enc.vars.get(name) {
                Some(var) if var.domain == Domain::Boolean => {
                    Ok(self.enc.value_is(var, frame, &Value::Bool(true)))
                }
                Some(var) => Err(Error::Type(format!(
                    "`{}` of type {} used as a condition",
                    name, var.domain
                ))),
                None if self.enc.vars.is_symbol(name) => {
                    Err(Error::Type(format!("constant `{}` used as a condition", name)))
                }
                None => Err(Error::Undeclared(name.clone())),
            },
            Formula::Number(n) => Err(Error::Type(format!("integer `{}` used as a condition", n))),
            Formula::Comparison(op, l, r) => {
                let lhs = self.compile_values(l, frame)?;
                let rhs = self.compile_values(r, frame)?;
                let mut res = bdd.zero;
                for (cl, vl) in &lhs {
                    for (cr, vr) in &rhs {
                        if vl.compare(*op, vr)? {
                            res = bdd.apply_or(res, bdd.apply_and(*cl, *cr));
                        }
                    }
                }
                Ok(res)
            }
            Formula::Not(phi) => Ok(-self.compile_bool(phi, frame)?),
            Formula::Binary(op, l, r) => {
                let l = self.compile_bool(l, frame)?;
                let r = self.compile_bool(r, frame)?;
                Ok(match op {
                    BinaryOp::And => bdd.apply_and(l, r),
                    BinaryOp::Or => bdd.apply_or(l, r),
                    BinaryOp::Xor => bdd.apply_xor(l, r),
                    BinaryOp::Xnor | BinaryOp::Iff => bdd.apply_eq(l, r),
                    BinaryOp::Implies => bdd.apply_imply(l, r),
                })
            }
            Formula::Next(phi) => {
                let frame = self.enter_next(formula, frame)?;
                self.compile_bool(phi, frame)
            }
            Formula::Global(_) | Formula::Future(_) | Formula::Until(_, _) | Formula::Context(_, _) => {
                Err(Error::Temporal(formula.to_string()))
            }
        }
    }

    /// The possible values of an operand, each guarded by the states where it is taken.
    pub fn compile_values(&self, formula: &Formula, frame: Frame) -> Result<Guarded> {
        let bdd = &self.enc.bdd;
        match formula {
            Formula::Atom(name) => match self.enc.vars.get(name) {
                Some(var) => Ok(var
                    .domain
                    .values()
                    .map(|value| (self.enc.value_is(var, frame, &value), value))
                    .collect()),
                None if self.enc.vars.is_symbol(name) => Ok(vec![(bdd.one, Value::symbol(name.as_str()))]),
                None => Err(Error::Undeclared(name.clone())),
            },
            Formula::Number(n) => Ok(vec![(bdd.one, Value::Int(*n))]),
            Formula::True => Ok(vec![(bdd.one, Value::Bool(true))]),
            Formula::False => Ok(vec![(bdd.one, Value::Bool(false))]),
            Formula::Next(phi) => {
                let frame = self.enter_next(formula, frame)?;
                self.compile_values(phi, frame)
            }
            _ => {
                let b = self.compile_bool(formula, frame)?;
                Ok(vec![(b, Value::Bool(true)), (-b, Value::Bool(false))])
            }
        }
    }

    /// The values an assignment may pick, each guarded by the states where it may.
    ///
    /// Guards of different values may overlap (nondeterminism). States where no
    /// `case` branch applies get no value at all.
    pub fn compile_rhs(&self, rhs: &Rhs) -> Result<Guarded> {
        let bdd = &self.enc.bdd;
        match rhs {
            Rhs::Expr(e) => self.compile_values(e, Frame::Current),
            Rhs::Set(elements) => {
                let mut res = Vec::new();
                for e in elements {
                    res.extend(self.compile_values(e, Frame::Current)?);
                }
                Ok(res)
            }
            Rhs::Case(branches) => {
                let mut remaining = bdd.one;
                let mut res = Vec::new();
                for (guard, branch) in branches {
                    let g = self.compile_bool(guard, Frame::Current)?;
                    let taken = bdd.apply_and(remaining, g);
                    for (c, v) in self.compile_rhs(branch)? {
                        res.push((bdd.apply_and(taken, c), v));
                    }
                    remaining = bdd.apply_diff(remaining, g);
                }
                Ok(res)
            }
        }
    }

    /// Relation between the current state and the value of `name` in `target`.
    pub fn assignment(&self, name: &str, rhs: &Rhs, target: Frame) -> Result<Ref> {
        let bdd = &self.enc.bdd;
        let var = self
            .enc
            .vars
            .get(name)
            .ok_or_else(|| Error::Undeclared(name.to_string()))?;

        let mut res = bdd.zero;
        for (c, value) in self.compile_rhs(rhs)? {
            if bdd.is_zero(c) {
                continue;
            }
            if var.domain.index_of(&value).is_none() {
                return Err(Error::OutOfDomain {
                    var: name.to_string(),
                    value,
                });
            }
            res = bdd.apply_or(res, bdd.apply_and(c, self.enc.value_is(var, target, &value)));
        }
        Ok(res)
    }
}
