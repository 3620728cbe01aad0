//! Helpers for building small formulas in unit tests from DIMACS literals.
use std::num::NonZeroI32;

use super::Formula;
use crate::basic_types::Weight;
use crate::variables::Literal;

pub(crate) fn lit(dimacs_code: i32) -> Literal {
    Literal::from_dimacs(NonZeroI32::new(dimacs_code).expect("test literals are non-zero"))
}

pub(crate) fn formula(
    num_variables: usize,
    hard_clauses: &[&[i32]],
    soft_clauses: &[(&[i32], Weight)],
) -> Formula {
    let mut formula = Formula::initialize(num_variables);

    for clause in hard_clauses {
        formula.push_hard_clause(clause.iter().map(|&code| lit(code)));
    }

    for (clause, cost) in soft_clauses {
        formula
            .push_soft_clause(clause.iter().map(|&code| lit(code)), *cost)
            .expect("test weights do not overflow");
    }

    formula
}
