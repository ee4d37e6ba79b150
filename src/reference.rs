use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// Handle to a BDD node owned by a [`Bdd`][crate::bdd::Bdd] manager.
///
/// The sign encodes a complement edge: `-r` denotes the negation of `r` and
/// costs nothing. Index `0` never refers to a node, which makes
/// [`Ref::INVALID`] a safe placeholder for "not set yet".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Ref(i32);

impl Ref {
    pub const INVALID: Ref = Ref(0);

    pub const fn positive(index: u32) -> Self {
        Self(index as i32)
    }

    pub const fn is_negated(self) -> bool {
        self.0 < 0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// The non-negated version of this reference.
    pub const fn regular(self) -> Self {
        Self(self.0.abs())
    }

    /// Index of the referenced node in the manager storage.
    pub const fn index(self) -> usize {
        self.0.unsigned_abs() as usize
    }

    /// Injective mapping to `u32`, used as hashing input.
    pub(crate) const fn unsigned(self) -> u32 {
        (self.0.unsigned_abs() << 1) + (self.0 < 0) as u32
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", if self.is_negated() { "~" } else { "" }, self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation() {
        let r = Ref::positive(5);
        assert!(!r.is_negated());
        assert!((-r).is_negated());
        assert_eq!(-(-r), r);
        assert_eq!((-r).index(), 5);
        assert_eq!((-r).regular(), r);
    }

    #[test]
    fn test_invalid() {
        assert!(!Ref::INVALID.is_valid());
        assert!(Ref::positive(1).is_valid());
    }

    #[test]
    fn test_unsigned_is_injective() {
        let a = Ref::positive(3);
        assert_ne!(a.unsigned(), (-a).unsigned());
        assert_ne!(Ref::positive(1).unsigned(), Ref::positive(2).unsigned());
    }

    #[test]
    fn test_display() {
        let r = Ref::positive(7);
        assert_eq!(r.to_string(), "@7");
        assert_eq!((-r).to_string(), "~@7");
    }
}
