use log::debug;

use super::results::OptimisationResult;
use crate::asserts::PMS_ASSERT_LEVEL_DEFINITION;
use crate::asserts::PMS_ASSERT_MODERATE;
use crate::basic_types::Solution;
use crate::basic_types::Stopwatch;
use crate::basic_types::Weight;
use crate::branching::Brancher;
use crate::branching::MostFrequentBrancher;
use crate::engine::Formula;
use crate::engine::SolverStatistics;
use crate::optimisation::branch_and_bound::BranchAndBound;
use crate::optimisation::SolutionCallback;
use crate::pms_assert_moderate;
use crate::pms_assert_simple;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::TerminationCondition;

/// The main interaction point, which searches for an assignment of a [`Formula`] that satisfies
/// every hard clause while maximising the total weight of the satisfied soft clauses.
///
/// The solver is generic over the [`Brancher`] which decides on the variable and value order of
/// the search; by default the [`MostFrequentBrancher`] is used. Statistics are accumulated over all
/// calls to [`Solver::optimise`].
///
/// # Example
/// ```rust
/// # use pms_core::formula::Formula;
/// # use pms_core::results::OptimisationResult;
/// # use pms_core::results::Solution;
/// # use pms_core::termination::Indefinite;
/// # use pms_core::variables::Literal;
/// # use pms_core::Solver;
/// # use std::num::NonZeroI32;
/// let x1 = Literal::from_dimacs(NonZeroI32::new(1).unwrap());
///
/// let mut formula = Formula::initialize(1);
/// formula.push_soft_clause([x1], 1).unwrap();
/// formula.push_soft_clause([!x1], 5).unwrap();
///
/// let mut solver = Solver::default();
/// let result = solver.optimise(formula, &mut Indefinite, &|_: &Solution| {});
///
/// assert!(matches!(
///     result,
///     OptimisationResult::Optimal { solution } if solution.cost() == 5 && !solution.is_literal_true(x1)
/// ));
/// ```
#[derive(Debug)]
pub struct Solver<B = MostFrequentBrancher> {
    brancher: B,
    statistics: SolverStatistics,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::with_brancher(MostFrequentBrancher)
    }
}

impl<B: Brancher> Solver<B> {
    /// Creates a solver which makes its decisions with the provided [`Brancher`].
    pub fn with_brancher(brancher: B) -> Self {
        Solver {
            brancher,
            statistics: SolverStatistics::default(),
        }
    }

    /// Search for an assignment of `formula` which satisfies all hard clauses and has the largest
    /// satisfied soft weight.
    ///
    /// Every solution which improves on the best one found so far is handed to `callback`, so the
    /// reported costs are strictly increasing. The `termination` condition is polled at every node
    /// of the search tree; once it triggers, the best known solution is returned as
    /// [`OptimisationResult::Satisfiable`] instead of [`OptimisationResult::Optimal`].
    pub fn optimise(
        &mut self,
        formula: Formula,
        termination: &mut impl TerminationCondition,
        callback: &impl SolutionCallback,
    ) -> OptimisationResult {
        let stopwatch = Stopwatch::starting_now();

        let root = (PMS_ASSERT_LEVEL_DEFINITION >= PMS_ASSERT_MODERATE).then(|| formula.clone());

        debug!(
            "Starting search over {} variables, {} hard and {} soft clauses with total weight {}",
            formula.num_variables(),
            formula.hard_clauses().len(),
            formula.soft_clauses().len(),
            formula.total_soft_weight()
        );

        let mut search = BranchAndBound::new(&mut self.brancher, &mut self.statistics);
        let best = search.solve(formula, None, termination, callback);
        let interrupted = search.was_interrupted();
        let incumbent = search.into_incumbent();

        self.statistics.time_spent_in_solver += stopwatch.elapsed().as_millis() as u64;

        pms_assert_simple!(
            best == incumbent.as_ref().map(Solution::cost),
            "the returned bound must be witnessed by the recorded solution"
        );
        if let (Some(root), Some(solution)) = (root.as_ref(), incumbent.as_ref()) {
            pms_assert_moderate!(root.is_satisfied_by(solution));
            pms_assert_moderate!(root.evaluate(solution) == solution.cost());
        }

        match (incumbent, interrupted) {
            (Some(solution), false) => OptimisationResult::Optimal { solution },
            (Some(best_solution), true) => OptimisationResult::Satisfiable { best_solution },
            (None, false) => OptimisationResult::Infeasible,
            (None, true) => OptimisationResult::Unknown,
        }
    }

    /// Logs the statistics currently present in the solver.
    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.statistics.log(StatisticLogger::default());
            log_statistic_postfix();
        }
    }

    /// Logs the statistics currently present in the solver with the provided cost.
    pub fn log_statistics_with_cost(&self, cost: Option<Weight>) {
        if let Some(cost) = cost {
            log_statistic("cost", cost);
        }
        self.log_statistics();
    }

    /// The number of decisions made over all calls to [`Solver::optimise`].
    pub fn num_decisions(&self) -> u64 {
        self.statistics.num_decisions
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::engine::test_formula::formula;
    use crate::engine::test_formula::lit;
    use crate::termination::DecisionBudget;
    use crate::termination::Indefinite;
    use crate::variables::Variable;

    #[test]
    fn feasible_formula_is_solved_to_optimality() {
        let mut solver = Solver::default();

        let result = solver.optimise(
            formula(2, &[&[1]], &[(&[-1], 10), (&[2], 3)]),
            &mut Indefinite,
            &|_: &Solution| {},
        );

        assert!(result.is_proven());
        assert_eq!(Some(3), result.cost());
        assert!(result
            .solution()
            .is_some_and(|solution| solution.is_literal_true(lit(1))));
    }

    #[test]
    fn infeasible_formula_is_reported() {
        let mut solver = Solver::default();

        let result = solver.optimise(
            formula(2, &[&[1, 2], &[-1], &[-2]], &[(&[1], 3)]),
            &mut Indefinite,
            &|_: &Solution| {},
        );

        assert_eq!(OptimisationResult::Infeasible, result);
    }

    #[test]
    fn formula_without_soft_clauses_has_zero_cost() {
        let mut solver = Solver::default();

        let result = solver.optimise(
            formula(3, &[&[1, 2], &[-1, 3]], &[]),
            &mut Indefinite,
            &|_: &Solution| {},
        );

        assert!(matches!(result, OptimisationResult::Optimal { ref solution } if solution.cost() == 0));
    }

    #[test]
    fn formula_without_clauses_is_trivially_optimal() {
        let mut solver = Solver::default();

        let result = solver.optimise(formula(0, &[], &[]), &mut Indefinite, &|_: &Solution| {});

        assert_eq!(Some(0), result.cost());
        assert!(result.is_proven());
        assert_eq!(0, solver.num_decisions());
    }

    #[test]
    fn interrupted_search_without_solution_is_unknown() {
        let mut solver = Solver::default();

        let result = solver.optimise(
            formula(2, &[&[1, 2]], &[(&[-1], 1), (&[-2], 1)]),
            &mut DecisionBudget::new(0),
            &|_: &Solution| {},
        );

        assert_eq!(OptimisationResult::Unknown, result);
    }

    #[test]
    fn interrupted_search_keeps_best_solution() {
        let mut solver = Solver::default();

        let result = solver.optimise(
            formula(
                4,
                &[&[1, 2, 3, 4]],
                &[(&[-1], 1), (&[-2], 1), (&[-3], 1), (&[-4], 1)],
            ),
            &mut DecisionBudget::new(4),
            &|_: &Solution| {},
        );

        assert!(matches!(result, OptimisationResult::Satisfiable { .. }));
        assert!(!result.is_proven());
    }

    #[test]
    fn callback_receives_every_improving_solution() {
        let costs = RefCell::new(vec![]);
        let mut solver = Solver::default();

        let result = solver.optimise(
            formula(2, &[&[1, 2]], &[(&[-1], 2), (&[-2], 2), (&[1], 3), (&[2], 1)]),
            &mut Indefinite,
            &|solution: &Solution| costs.borrow_mut().push(solution.cost()),
        );

        assert_eq!(result.cost(), costs.borrow().last().copied());
        assert_eq!(
            costs.borrow().len() as u64,
            solver.statistics.num_improving_solutions
        );
    }

    #[test]
    fn custom_brancher_reaches_the_same_optimum() {
        #[derive(Debug)]
        struct LowestIndexFalseFirst;

        impl Brancher for LowestIndexFalseFirst {
            fn select_variable(&mut self, formula: &Formula) -> Option<Variable> {
                formula
                    .variables()
                    .find(|&variable| !formula.is_assigned(variable))
            }

            fn value_order(
                &mut self,
                _formula: &Formula,
                _variable: Variable,
            ) -> [bool; 2] {
                [false, true]
            }
        }

        let instance = formula(
            3,
            &[&[-1, -2], &[-2, -3], &[1, 2, 3]],
            &[(&[1], 2), (&[2], 5), (&[3], 2), (&[1, 3], 1)],
        );

        let mut default_solver = Solver::default();
        let mut custom_solver = Solver::with_brancher(LowestIndexFalseFirst);

        let expected = default_solver.optimise(instance.clone(), &mut Indefinite, &|_: &Solution| {});
        let actual = custom_solver.optimise(instance, &mut Indefinite, &|_: &Solution| {});

        assert_eq!(expected.cost(), actual.cost());
    }
}
