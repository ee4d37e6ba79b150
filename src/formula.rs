//! Temporal-logic formula trees.
//!
//! A [`Formula`] is an immutable tree produced by the model front end. The
//! same tree type carries state predicates (`INIT`, `INVAR`), transition
//! constraints (where [`Formula::Next`] reads as `next(..)`) and LTL
//! properties (where it reads as `X`).

use std::fmt;

/// Comparison operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}

/// Binary boolean connectives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Xnor,
    Implies,
    Iff,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "xor",
            BinaryOp::Xnor => "xnor",
            BinaryOp::Implies => "->",
            BinaryOp::Iff => "<->",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    True,
    False,
    /// Identifier: a variable or a symbolic constant.
    Atom(String),
    /// Integer constant.
    Number(i64),
    Comparison(CompareOp, Box<Formula>, Box<Formula>),
    Not(Box<Formula>),
    Binary(BinaryOp, Box<Formula>, Box<Formula>),
    /// `X φ` in properties, `next(φ)` in transition constraints.
    Next(Box<Formula>),
    /// `G φ`
    Global(Box<Formula>),
    /// `F φ`
    Future(Box<Formula>),
    /// `φ U ψ`
    Until(Box<Formula>, Box<Formula>),
    /// Top-level property wrapper: the module the property is stated in, and the property.
    Context(String, Box<Formula>),
}

impl Formula {
    pub fn atom(s: impl Into<String>) -> Self {
        Formula::Atom(s.into())
    }

    pub fn number(n: i64) -> Self {
        Formula::Number(n)
    }

    pub fn compare(op: CompareOp, lhs: Self, rhs: Self) -> Self {
        Formula::Comparison(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn eq(lhs: Self, rhs: Self) -> Self {
        Formula::compare(CompareOp::Eq, lhs, rhs)
    }

    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Formula::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Formula::Not(Box::new(self))
    }

    pub fn and(self, other: Self) -> Self {
        Formula::binary(BinaryOp::And, self, other)
    }

    pub fn or(self, other: Self) -> Self {
        Formula::binary(BinaryOp::Or, self, other)
    }

    pub fn implies(self, other: Self) -> Self {
        Formula::binary(BinaryOp::Implies, self, other)
    }

    pub fn iff(self, other: Self) -> Self {
        Formula::binary(BinaryOp::Iff, self, other)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(self) -> Self {
        Formula::Next(Box::new(self))
    }

    pub fn globally(self) -> Self {
        Formula::Global(Box::new(self))
    }

    pub fn finally(self) -> Self {
        Formula::Future(Box::new(self))
    }

    pub fn until(self, other: Self) -> Self {
        Formula::Until(Box::new(self), Box::new(other))
    }

    /// `G F self`
    pub fn infinitely_often(self) -> Self {
        self.finally().globally()
    }

    pub fn in_context(self, binding: impl Into<String>) -> Self {
        Formula::Context(binding.into(), Box::new(self))
    }

    /// Binding strength, used to print the minimal parentheses.
    fn precedence(&self) -> u8 {
        match self {
            Formula::Binary(BinaryOp::Iff, _, _) => 1,
            Formula::Binary(BinaryOp::Implies, _, _) => 2,
            Formula::Binary(BinaryOp::Or | BinaryOp::Xor | BinaryOp::Xnor, _, _) => 3,
            Formula::Binary(BinaryOp::And, _, _) => 4,
            Formula::Until(_, _) => 5,
            Formula::Next(_) | Formula::Global(_) | Formula::Future(_) => 6,
            Formula::Comparison(_, _, _) => 7,
            Formula::Not(_) => 8,
            Formula::Context(_, body) => body.precedence(),
            Formula::True | Formula::False | Formula::Atom(_) | Formula::Number(_) => 9,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "(")?;
            self.fmt_prec(f, 0)?;
            return write!(f, ")");
        }

        match self {
            Formula::True => write!(f, "TRUE"),
            Formula::False => write!(f, "FALSE"),
            Formula::Atom(s) => write!(f, "{}", s),
            Formula::Number(n) => write!(f, "{}", n),
            Formula::Comparison(op, l, r) => {
                l.fmt_prec(f, 8)?;
                write!(f, " {} ", op)?;
                r.fmt_prec(f, 8)
            }
            Formula::Not(phi) => {
                write!(f, "!")?;
                phi.fmt_prec(f, 8)
            }
            Formula::Binary(op, l, r) => {
                let (left, right) = match op {
                    BinaryOp::Iff => (1, 2),
                    BinaryOp::Implies => (3, 2),
                    BinaryOp::Or | BinaryOp::Xor | BinaryOp::Xnor => (3, 4),
                    BinaryOp::And => (4, 5),
                };
                l.fmt_prec(f, left)?;
                write!(f, " {} ", op)?;
                r.fmt_prec(f, right)
            }
            Formula::Next(phi) => {
                write!(f, "X ")?;
                phi.fmt_prec(f, 6)
            }
            Formula::Global(phi) => {
                write!(f, "G ")?;
                phi.fmt_prec(f, 6)
            }
            Formula::Future(phi) => {
                write!(f, "F ")?;
                phi.fmt_prec(f, 6)
            }
            Formula::Until(l, r) => {
                l.fmt_prec(f, 5)?;
                write!(f, " U ")?;
                r.fmt_prec(f, 6)
            }
            Formula::Context(_, body) => body.fmt_prec(f, min),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}
