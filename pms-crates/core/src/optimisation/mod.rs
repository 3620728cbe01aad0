//! Contains the branch-and-bound search which proves the optimum, and the [`SolutionCallback`]
//! through which it reports every improving solution.
pub(crate) mod branch_and_bound;
pub mod solution_callback;

pub use solution_callback::SolutionCallback;
