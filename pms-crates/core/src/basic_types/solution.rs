use super::Weight;
use crate::containers::KeyedVec;
use crate::engine::Formula;
use crate::variables::Literal;
use crate::variables::Variable;

/// A feasible assignment found by the search, together with the weight of the soft clauses it
/// satisfies.
///
/// The assignment is partial: variables which the search never had to decide are unassigned. They
/// can take either value without changing [`Solution::cost`], and are reported as `true`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    assignment: KeyedVec<Variable, Option<bool>>,
    cost: Weight,
}

impl Solution {
    /// Capture the assignment and satisfied weight of a formula whose clauses have all been
    /// removed.
    pub(crate) fn from_satisfied_formula(formula: &Formula) -> Solution {
        Solution {
            assignment: formula.assignment.clone(),
            cost: formula.accumulated_satisfied_cost(),
        }
    }

    /// The total weight of the satisfied soft clauses.
    pub fn cost(&self) -> Weight {
        self.cost
    }

    pub fn num_variables(&self) -> usize {
        self.assignment.len()
    }

    /// Whether the search assigned `variable`, as opposed to leaving it free.
    pub fn is_assigned(&self, variable: Variable) -> bool {
        self.assignment[variable].is_some()
    }

    /// The value of `variable` in the completed assignment.
    pub fn value(&self, variable: Variable) -> bool {
        self.assignment[variable].unwrap_or(true)
    }

    pub fn is_literal_true(&self, literal: Literal) -> bool {
        literal.is_satisfied_by(self.value(literal.get_variable()))
    }

    /// The completed assignment as one literal per variable, in variable order.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.assignment
            .keys()
            .map(|variable| Literal::new(variable, self.value(variable)))
    }
}
