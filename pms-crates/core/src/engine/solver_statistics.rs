use crate::create_statistics_struct;

create_statistics_struct!(
    /// Structure responsible for storing several statistics of the branch-and-bound search of the
    /// [`crate::Solver`].
    SolverStatistics {
        /// The number of child nodes created by assigning a branching variable
        num_decisions: u64,
        /// The number of literals forced by unit propagation
        num_propagations: u64,
        /// The number of subtrees cut off because their upper bound did not exceed the lower bound
        num_pruned_subtrees: u64,
        /// The number of branches which falsified a hard clause
        num_infeasible_branches: u64,
        /// The number of solutions which improved on the best solution known at the time
        num_improving_solutions: u64,
        /// The amount of time (in milliseconds) which is spent in the solver
        time_spent_in_solver: u64,
});
