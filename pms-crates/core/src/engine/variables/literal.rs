use std::fmt::Debug;
use std::fmt::Display;
use std::num::NonZeroI32;
use std::ops::Not;

use super::Variable;

/// A [`Variable`] with a polarity.
///
/// The literal is stored as the single integer `2 * variable + polarity_bit`, where a polarity bit
/// of `0` means the variable occurs positively and `1` means it occurs negated. Mixed-polarity
/// clauses are therefore plain integer sequences.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    code: u32,
}

impl Literal {
    pub fn new(variable: Variable, is_positive: bool) -> Literal {
        Literal {
            code: (variable.get_index() << 1) | u32::from(!is_positive),
        }
    }

    /// Convert a DIMACS literal (a 1-based variable index, negative when negated).
    pub fn from_dimacs(dimacs_code: NonZeroI32) -> Literal {
        let variable = Variable::new(dimacs_code.unsigned_abs().get() - 1);
        Literal::new(variable, dimacs_code.get().is_positive())
    }

    /// The DIMACS representation of the literal; the inverse of [`Literal::from_dimacs`].
    pub fn to_dimacs(self) -> i64 {
        let index = i64::from(self.get_variable().get_index()) + 1;
        if self.is_positive() {
            index
        } else {
            -index
        }
    }

    pub fn get_variable(&self) -> Variable {
        Variable::new(self.code >> 1)
    }

    pub fn is_positive(&self) -> bool {
        self.code & 1 == 0
    }

    pub fn is_negative(&self) -> bool {
        !self.is_positive()
    }

    /// The raw `2 * variable + polarity_bit` code.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Whether the literal evaluates to true when its variable takes `value`.
    pub fn is_satisfied_by(&self, value: bool) -> bool {
        self.is_positive() == value
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

impl Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_positive() {
            write!(f, "{}", self.get_variable())
        } else {
            write!(f, "~{}", self.get_variable())
        }
    }
}
