//! # PMS
//! An exact solver for the partial weighted maximum satisfiability problem. A formula is split into
//! hard clauses, which every accepted assignment must satisfy, and soft clauses, which carry a
//! weight. The solver computes the largest total weight of soft clauses that can be satisfied
//! together with all hard clauses.
//!
//! The search is a depth-first branch-and-bound over a [`formula::Formula`] which is copied at
//! every decision. Each branch simplifies its own copy through unit propagation and literal
//! application, and prunes itself as soon as the weight it can still reach does not exceed the best
//! weight found so far.
//!
//! # Using the solver
//! A formula is usually read from one of the supported text formats:
//! ```rust
//! # use pms_core::formula::Formula;
//! let source = "p pms 2 1 2\n5 3\n1 2 0\n1 0\n-1 0\n";
//! let formula = Formula::load(source.as_bytes()).expect("valid instance");
//!
//! assert_eq!(formula.total_soft_weight(), 8);
//! ```
//!
//! It is then handed to the [`Solver`] together with a [`termination::TerminationCondition`]:
//! ```rust
//! # use pms_core::formula::Formula;
//! # use pms_core::results::OptimisationResult;
//! # use pms_core::results::Solution;
//! # use pms_core::termination::Indefinite;
//! # use pms_core::Solver;
//! # let source = "p pms 2 1 2\n5 3\n1 2 0\n1 0\n-1 0\n";
//! # let formula = Formula::load(source.as_bytes()).expect("valid instance");
//! let mut solver = Solver::default();
//! let result = solver.optimise(formula, &mut Indefinite, &|_: &Solution| {});
//!
//! let OptimisationResult::Optimal { solution } = result else {
//!     panic!("the instance is feasible");
//! };
//! assert_eq!(solution.cost(), 5);
//! ```
pub(crate) mod basic_types;
pub(crate) mod containers;
pub(crate) mod engine;
pub(crate) mod pms_asserts;

pub mod branching;
pub mod optimisation;
pub mod parsers;
pub mod statistics;

pub use convert_case;

// We declare a private module with public use, so that all exports from API are exports directly
// from the crate.
//
// Example:
// `use pms_core::Solver;`
// vs.
// `use pms_core::api::Solver;`
mod api;

pub use api::*;

pub use crate::api::solver::Solver;
pub use crate::basic_types::Weight;
