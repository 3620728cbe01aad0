//! Contains the [`Brancher`], which decides on which variable the search splits next and in which
//! order the two truth values are explored.
//!
//! The default is the [`MostFrequentBrancher`].
mod most_frequent_brancher;

pub use most_frequent_brancher::MostFrequentBrancher;

use crate::formula::Formula;
use crate::variables::Variable;

/// A strategy for choosing the decisions of the branch-and-bound search.
pub trait Brancher {
    /// Select an unassigned variable of `formula` to branch on.
    ///
    /// Only called when `formula` still has clauses left, in which case an unassigned variable
    /// occurs in one of them; returning [`None`] there is a bug in the brancher.
    fn select_variable(&mut self, formula: &Formula) -> Option<Variable>;

    /// The order in which the two values of `variable` are explored.
    fn value_order(&mut self, formula: &Formula, variable: Variable) -> [bool; 2];
}
