use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};
use crate::formula::CompareOp;

/// A concrete value of a state variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Symbol(String),
}

impl Value {
    pub fn symbol(s: impl Into<String>) -> Self {
        Value::Symbol(s.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Symbol(_) => "symbolic constant",
        }
    }

    /// Evaluate `self op other`.
    ///
    /// Equality is defined between values of the same kind; the order only
    /// between integers.
    pub fn compare(&self, op: CompareOp, other: &Value) -> Result<bool> {
        let ordering = match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Bool(_), Value::Bool(_)) | (Value::Symbol(_), Value::Symbol(_)) => None,
            _ => {
                return Err(Error::Type(format!(
                    "cannot compare {} `{}` with {} `{}`",
                    self.kind(),
                    self,
                    other.kind(),
                    other
                )))
            }
        };

        match (op, ordering) {
            (CompareOp::Eq, _) => Ok(self == other),
            (CompareOp::Ne, _) => Ok(self != other),
            (CompareOp::Lt, Some(o)) => Ok(o == Ordering::Less),
            (CompareOp::Gt, Some(o)) => Ok(o == Ordering::Greater),
            (CompareOp::Le, Some(o)) => Ok(o != Ordering::Greater),
            (CompareOp::Ge, Some(o)) => Ok(o != Ordering::Less),
            (_, None) => Err(Error::Type(format!("`{}` is not defined on {} values", op, self.kind()))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => write!(f, "TRUE"),
            Value::Bool(false) => write!(f, "FALSE"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Symbol(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_order() {
        let two = Value::Int(2);
        let three = Value::Int(3);
        assert!(two.compare(CompareOp::Lt, &three).unwrap());
        assert!(three.compare(CompareOp::Ge, &two).unwrap());
        assert!(!two.compare(CompareOp::Eq, &three).unwrap());
        assert!(two.compare(CompareOp::Le, &two).unwrap());
    }

    #[test]
    fn test_symbol_equality() {
        let idle = Value::symbol("idle");
        let busy = Value::symbol("busy");
        assert!(idle.compare(CompareOp::Ne, &busy).unwrap());
        assert!(idle.compare(CompareOp::Eq, &idle.clone()).unwrap());
        assert!(idle.compare(CompareOp::Lt, &busy).is_err());
    }

    #[test]
    fn test_kind_mismatch() {
        let err = Value::Int(1).compare(CompareOp::Eq, &Value::Bool(true)).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Bool(true).to_string(), "TRUE");
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::symbol("red").to_string(), "red");
    }
}
