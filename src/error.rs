use std::path::PathBuf;

use crate::value::Value;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{line}:{column}: {message}")]
    Parse { line: usize, column: usize, message: String },

    #[error("undeclared identifier `{0}`")]
    Undeclared(String),

    #[error("variable `{0}` is declared twice")]
    Redeclared(String),

    #[error("type error: {0}")]
    Type(String),

    #[error("value `{value}` is outside the domain of `{var}`")]
    OutOfDomain { var: String, value: Value },

    /// A temporal operator where a state or transition predicate was expected.
    #[error("temporal operator in `{0}` is not allowed here")]
    Temporal(String),

    #[error("transition system has no {0}")]
    Uninitialized(&'static str),

    #[error("{fixpoint} fixpoint did not converge after {iterations} iterations")]
    Divergence { fixpoint: &'static str, iterations: u64 },
}

impl Error {
    /// Whether this error reports a broken internal invariant rather than a bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Uninitialized(_) | Error::Divergence { .. })
    }
}
