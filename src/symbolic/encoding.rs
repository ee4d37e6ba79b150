//! Binary encoding of finite-domain state variables.
//!
//! A variable with `n` values is encoded by `ceil(log2 n)` bits, value `i`
//! of the domain by the binary code of `i` (bit `k` is the `k`-th least
//! significant). Every bit owns two BDD variables, allocated next to each
//! other: one for the present state and one for the next state.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::bdd::Bdd;
use crate::error::{Error, Result};
use crate::reference::Ref;
use crate::value::Value;

/// Widest domain accepted by [`Encoding::declare`], in bits.
pub const MAX_WIDTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Domain {
    Boolean,
    /// Integers `lo..=hi`.
    Range(i64, i64),
    /// Explicitly listed values, in declaration order.
    Enum(Vec<Value>),
}

impl Domain {
    pub fn size(&self) -> usize {
        match self {
            Domain::Boolean => 2,
            Domain::Range(lo, hi) => {
                let n = i128::from(*hi) - i128::from(*lo) + 1;
                if n <= 0 {
                    0
                } else {
                    usize::try_from(n).unwrap_or(usize::MAX)
                }
            }
            Domain::Enum(values) => values.len(),
        }
    }

    /// Number of bits needed to encode every value.
    pub fn width(&self) -> usize {
        let n = self.size();
        (usize::BITS - (n.max(1) - 1).leading_zeros()) as usize
    }

    pub fn value_at(&self, index: usize) -> Value {
        match self {
            Domain::Boolean => Value::Bool(index == 1),
            Domain::Range(lo, _) => Value::Int(lo + index as i64),
            Domain::Enum(values) => values[index].clone(),
        }
    }

    pub fn index_of(&self, value: &Value) -> Option<usize> {
        match (self, value) {
            (Domain::Boolean, Value::Bool(b)) => Some(*b as usize),
            (Domain::Range(lo, hi), Value::Int(n)) if lo <= n && n <= hi => {
                usize::try_from(i128::from(*n) - i128::from(*lo)).ok()
            }
            (Domain::Enum(values), _) => values.iter().position(|v| v == value),
            _ => None,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.size()).map(|i| self.value_at(i))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Boolean => write!(f, "boolean"),
            Domain::Range(lo, hi) => write!(f, "{}..{}", lo, hi),
            Domain::Enum(values) => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{{{}}}", values.join(", "))
            }
        }
    }
}

/// Present or next copy of the state variables.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Frame {
    Current,
    Next,
}

#[derive(Debug, Clone)]
pub struct StateVar {
    pub name: String,
    pub domain: Domain,
    present: Vec<u32>,
    next: Vec<u32>,
}

impl StateVar {
    pub fn bits(&self, frame: Frame) -> &[u32] {
        match frame {
            Frame::Current => &self.present,
            Frame::Next => &self.next,
        }
    }
}

/// Maps model variables to BDD variables.
#[derive(Debug, Default)]
pub struct VarManager {
    vars: Vec<StateVar>,
    by_name: HashMap<String, usize>,
    /// Symbolic constants of all enumerations.
    symbols: HashSet<String>,
}

impl VarManager {
    pub fn vars(&self) -> &[StateVar] {
        &self.vars
    }

    pub fn get(&self, name: &str) -> Option<&StateVar> {
        self.by_name.get(name).map(|&i| &self.vars[i])
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }

    pub fn present_vars(&self) -> Vec<u32> {
        self.vars.iter().flat_map(|v| v.present.iter().copied()).collect()
    }

    pub fn next_vars(&self) -> Vec<u32> {
        self.vars.iter().flat_map(|v| v.next.iter().copied()).collect()
    }

    /// `present -> next`
    pub fn present_to_next(&self) -> HashMap<u32, u32> {
        self.present_vars().into_iter().zip(self.next_vars()).collect()
    }

    /// `next -> present`
    pub fn next_to_present(&self) -> HashMap<u32, u32> {
        self.next_vars().into_iter().zip(self.present_vars()).collect()
    }
}

/// The BDD manager together with the variable encoding.
#[derive(Debug, Default)]
pub struct Encoding {
    pub bdd: Bdd,
    pub vars: VarManager,
}

impl Encoding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, domain: Domain) -> Result<()> {
        if self.vars.by_name.contains_key(name) || self.vars.is_symbol(name) {
            return Err(Error::Redeclared(name.to_string()));
        }
        if domain.width() > MAX_WIDTH {
            return Err(Error::Type(format!(
                "domain {} of `{}` needs more than {} bits",
                domain, name, MAX_WIDTH
            )));
        }
        match &domain {
            Domain::Range(lo, hi) if lo > hi => {
                return Err(Error::Type(format!("empty range {}..{} for `{}`", lo, hi, name)));
            }
            Domain::Enum(values) if values.is_empty() => {
                return Err(Error::Type(format!("empty enumeration for `{}`", name)));
            }
            Domain::Enum(values) => {
                for value in values {
                    if let Value::Symbol(s) = value {
                        if self.vars.by_name.contains_key(s) {
                            return Err(Error::Redeclared(s.clone()));
                        }
                        self.vars.symbols.insert(s.clone());
                    }
                }
            }
            _ => {}
        }

        let mut present = Vec::new();
        let mut next = Vec::new();
        for _ in 0..domain.width() {
            present.push(self.bdd.allocate_variable());
            next.push(self.bdd.allocate_variable());
        }

        self.vars.by_name.insert(name.to_string(), self.vars.vars.len());
        self.vars.vars.push(StateVar {
            name: name.to_string(),
            domain,
            present,
            next,
        });
        Ok(())
    }

    /// The code of the `index`-th domain value.
    pub fn code(&self, var: &StateVar, frame: Frame, index: usize) -> Ref {
        let literals = var.bits(frame).iter().enumerate().map(|(k, &v)| {
            let x = self.bdd.mk_var(v);
            if (index >> k) & 1 == 1 {
                x
            } else {
                -x
            }
        });
        self.bdd.apply_and_many(literals)
    }

    /// States where `var` holds `value`; `zero` when the value is outside the domain.
    pub fn value_is(&self, var: &StateVar, frame: Frame, value: &Value) -> Ref {
        match var.domain.index_of(value) {
            Some(index) => self.code(var, frame, index),
            None => self.bdd.zero,
        }
    }

    /// Codes that stand for a domain value.
    pub fn valid(&self, var: &StateVar, frame: Frame) -> Ref {
        let n = var.domain.size();
        if n == 1 << var.bits(frame).len() {
            return self.bdd.one;
        }
        self.bdd.apply_or_many((0..n).map(|i| self.code(var, frame, i)))
    }

    pub fn all_valid(&self, frame: Frame) -> Ref {
        self.bdd
            .apply_and_many(self.vars.vars.iter().map(|var| self.valid(var, frame)))
    }
}
