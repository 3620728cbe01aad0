use std::cmp::Reverse;

use super::Brancher;
use crate::formula::Formula;
use crate::variables::Variable;

/// Branches on the unassigned variable which occurs in the most remaining clauses, preferring the
/// lowest index on ties. The value which satisfies the majority of its occurrences is tried first,
/// and `true` when both polarities occur equally often.
#[derive(Clone, Copy, Debug, Default)]
pub struct MostFrequentBrancher;

impl Brancher for MostFrequentBrancher {
    fn select_variable(&mut self, formula: &Formula) -> Option<Variable> {
        formula
            .variables()
            .filter(|&variable| !formula.is_assigned(variable))
            .max_by_key(|&variable| (formula.frequency(variable), Reverse(variable)))
    }

    fn value_order(&mut self, formula: &Formula, variable: Variable) -> [bool; 2] {
        if formula.polarity_balance(variable) >= 0 {
            [true, false]
        } else {
            [false, true]
        }
    }
}
