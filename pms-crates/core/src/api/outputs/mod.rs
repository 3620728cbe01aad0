use crate::basic_types::Solution;
use crate::basic_types::Weight;
#[cfg(doc)]
use crate::termination::TerminationCondition;
#[cfg(doc)]
use crate::Solver;

/// The result of a call to [`Solver::optimise`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimisationResult {
    /// Indicates that the search ran to completion. It provides the [`Solution`] with the largest
    /// satisfied soft weight, which is proven to be optimal.
    Optimal { solution: Solution },
    /// Indicates that the [`TerminationCondition`] stopped the search after at least one feasible
    /// solution was found. It provides the best known solution, which is not proven to be optimal.
    Satisfiable { best_solution: Solution },
    /// Indicates that the search ran to completion without finding an assignment which satisfies
    /// every hard clause.
    Infeasible,
    /// Indicates that it is not known whether a feasible solution exists. This is due to the
    /// [`TerminationCondition`] triggering before any solution was found.
    Unknown,
}

impl OptimisationResult {
    /// The best solution found, if any.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            OptimisationResult::Optimal { solution } => Some(solution),
            OptimisationResult::Satisfiable { best_solution } => Some(best_solution),
            OptimisationResult::Infeasible | OptimisationResult::Unknown => None,
        }
    }

    /// The weight of the best solution found; [`None`] stands for minus infinity.
    pub fn cost(&self) -> Option<Weight> {
        self.solution().map(Solution::cost)
    }

    /// Whether the search was allowed to explore the whole search tree.
    pub fn is_proven(&self) -> bool {
        matches!(
            self,
            OptimisationResult::Optimal { .. } | OptimisationResult::Infeasible
        )
    }
}
