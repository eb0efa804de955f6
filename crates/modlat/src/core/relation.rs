//! Order relations, lattice operators, and element combinations.
//!
//! | Operator | Symbol | Bound relation | Dual |
//! |----------|--------|----------------|------|
//! | [`Operator::Meet`] | `*` | [`Relation::Lower`] | Join |
//! | [`Operator::Join`] | `+` | [`Relation::Higher`] | Meet |
//!
//! The bound relation is the relation of a combination's result to each of
//! its operands: `a+b` is higher than `a`.
//!
//! # Examples
//!
//! ```
//! use modlat::{Combination, Operator, Relation};
//!
//! let c = Combination::new(5, 2, Operator::Join);
//! assert_eq!((c.e1, c.e2), (2, 5));
//! assert_eq!(c.to_string(), "2+5");
//! assert_eq!(Operator::Join.relation(), Relation::Higher);
//! assert_eq!(-Relation::Higher, Relation::Lower);
//! ```

use core::fmt;
use core::ops::Neg;

use serde::{Deserialize, Serialize};

/// Order relation of one element to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i8)]
pub enum Relation {
    /// The first element lies below the second.
    Lower = -1,
    /// The elements are not (yet) known to be comparable.
    #[default]
    Undef = 0,
    /// The first element lies above the second.
    Higher = 1,
}

impl Relation {
    /// Returns the relation seen from the other element.
    #[inline]
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Relation::Lower => Relation::Higher,
            Relation::Undef => Relation::Undef,
            Relation::Higher => Relation::Lower,
        }
    }

    /// Returns true unless the relation is [`Relation::Undef`].
    #[inline]
    #[must_use]
    pub const fn is_defined(self) -> bool {
        !matches!(self, Relation::Undef)
    }

    /// Symbol used in dumps and error messages.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Relation::Lower => "<",
            Relation::Undef => "undef",
            Relation::Higher => ">",
        }
    }

    /// Merges two relations: equal values or a one-sided `Undef` yield the
    /// defined value; two different defined values yield `None`.
    #[must_use]
    pub const fn merge(self, other: Relation) -> Option<Relation> {
        match (self, other) {
            (r, Relation::Undef) => Some(r),
            (Relation::Undef, r) => Some(r),
            (Relation::Lower, Relation::Lower) => Some(Relation::Lower),
            (Relation::Higher, Relation::Higher) => Some(Relation::Higher),
            _ => None,
        }
    }
}

impl Neg for Relation {
    type Output = Relation;

    #[inline]
    fn neg(self) -> Relation {
        self.inverse()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl From<modlat_catalog::SeedOrder> for Relation {
    fn from(order: modlat_catalog::SeedOrder) -> Self {
        match order {
            modlat_catalog::SeedOrder::Lower => Relation::Lower,
            modlat_catalog::SeedOrder::Higher => Relation::Higher,
        }
    }
}

/// Binary lattice operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    /// Infimum (greatest lower bound).
    Meet,
    /// Supremum (least upper bound).
    Join,
}

impl Operator {
    /// Both operators in scan order.
    pub const ALL: [Operator; 2] = [Operator::Meet, Operator::Join];

    /// Relation of a combination's result to its operands.
    #[inline]
    #[must_use]
    pub const fn relation(self) -> Relation {
        match self {
            Operator::Meet => Relation::Lower,
            Operator::Join => Relation::Higher,
        }
    }

    /// The order-dual operator.
    #[inline]
    #[must_use]
    pub const fn dual(self) -> Operator {
        match self {
            Operator::Meet => Operator::Join,
            Operator::Join => Operator::Meet,
        }
    }

    /// Expression symbol: `*` for meet, `+` for join.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Operator::Meet => '*',
            Operator::Join => '+',
        }
    }

    /// Parses an expression symbol.
    #[must_use]
    pub const fn from_symbol(c: char) -> Option<Operator> {
        match c {
            '*' => Some(Operator::Meet),
            '+' => Some(Operator::Join),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unordered operand pair plus operator, normalized so `e1 <= e2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination {
    /// Smaller operand index.
    pub e1: usize,
    /// Larger operand index.
    pub e2: usize,
    /// Operator applied to the operands.
    pub op: Operator,
}

impl Combination {
    /// Creates a normalized combination.
    #[inline]
    #[must_use]
    pub const fn new(a: usize, b: usize, op: Operator) -> Self {
        if a <= b {
            Self { e1: a, e2: b, op }
        } else {
            Self { e1: b, e2: a, op }
        }
    }

    /// Returns true if `no` is one of the operands.
    #[inline]
    #[must_use]
    pub const fn has_operand(&self, no: usize) -> bool {
        self.e1 == no || self.e2 == no
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.e1, self.op.symbol(), self.e2)
    }
}

/// Formats a combination list as `[0+1, 2*3]`.
#[must_use]
pub fn format_combinations(combs: &[Combination]) -> String {
    let items: Vec<String> = combs.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
