//! # pms
//! An exact solver for partial weighted MaxSAT. The solving itself lives in [`core`]; this crate
//! provides the `pms-solver` command line interface on top of it.
//!
//! ```rust
//! # use pms_solver::core::formula::Formula;
//! # use pms_solver::core::results::Solution;
//! # use pms_solver::core::termination::Indefinite;
//! # use pms_solver::Solver;
//! let formula = Formula::load("p pms 1 0 2\n1 5\n1 0\n-1 0\n".as_bytes()).expect("valid instance");
//!
//! let mut solver = Solver::default();
//! let result = solver.optimise(formula, &mut Indefinite, &|_: &Solution| {});
//!
//! assert_eq!(result.cost(), Some(5));
//! ```
pub use pms_core as core;
pub use pms_core::Solver;
