pub(crate) mod formula;
pub(crate) mod propagation;
pub(crate) mod solver_statistics;
pub(crate) mod termination;
pub(crate) mod transform;
pub(crate) mod variables;

pub use formula::Formula;
pub use formula::SoftClause;
pub use formula::WeightOverflow;
pub use propagation::propagate;
pub(crate) use propagation::propagate_and_count;
pub(crate) use solver_statistics::SolverStatistics;
pub use transform::apply_transform;
pub use transform::FormulaStatus;

#[cfg(test)]
pub(crate) mod test_formula;
