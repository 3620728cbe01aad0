use log::debug;
use log::trace;

use super::SolutionCallback;
use crate::basic_types::Solution;
use crate::basic_types::Weight;
use crate::branching::Brancher;
use crate::engine::apply_transform;
use crate::engine::propagate_and_count;
use crate::engine::Formula;
use crate::engine::FormulaStatus;
use crate::engine::SolverStatistics;
use crate::pms_assert_advanced;
use crate::pms_assert_simple;
use crate::termination::TerminationCondition;

/// The recursive branch-and-bound search.
///
/// Bounds are [`Option<Weight>`], where [`None`] stands for minus infinity: no feasible solution
/// is known yet. Since `None` orders below every `Some`, the pruning test and the `max` folding of
/// child results need no special case for it.
#[derive(Debug)]
pub(crate) struct BranchAndBound<'a, B> {
    brancher: &'a mut B,
    statistics: &'a mut SolverStatistics,
    incumbent: Option<Solution>,
    interrupted: bool,
}

impl<'a, B: Brancher> BranchAndBound<'a, B> {
    pub(crate) fn new(
        brancher: &'a mut B,
        statistics: &'a mut SolverStatistics,
    ) -> BranchAndBound<'a, B> {
        BranchAndBound {
            brancher,
            statistics,
            incumbent: None,
            interrupted: false,
        }
    }

    /// The best solution found, which witnesses the bound returned by [`BranchAndBound::solve`].
    pub(crate) fn into_incumbent(self) -> Option<Solution> {
        self.incumbent
    }

    /// Whether the termination condition cut the search short, in which case the result of
    /// [`BranchAndBound::solve`] is not proven optimal.
    pub(crate) fn was_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Search the subtree rooted at `formula` and return the larger of `lower_bound` and the best
    /// weight achievable within the subtree.
    pub(crate) fn solve(
        &mut self,
        mut formula: Formula,
        lower_bound: Option<Weight>,
        termination: &mut impl TerminationCondition,
        callback: &impl SolutionCallback,
    ) -> Option<Weight> {
        if self.interrupted || termination.should_stop() {
            if !self.interrupted {
                debug!("Search interrupted, the best known cost is {lower_bound:?}");
            }
            self.interrupted = true;
            return lower_bound;
        }

        pms_assert_advanced!(formula.is_cost_conserved());

        if Some(formula.upper_bound()) <= lower_bound {
            self.statistics.num_pruned_subtrees += 1;
            return lower_bound;
        }

        match propagate_and_count(&mut formula, &mut self.statistics.num_propagations) {
            FormulaStatus::Satisfied => return self.record_solution(&formula, lower_bound, callback),
            FormulaStatus::Unsatisfiable => {
                self.statistics.num_infeasible_branches += 1;
                return lower_bound;
            }
            FormulaStatus::Normal => {}
        }

        let variable = self.brancher.select_variable(&formula);
        pms_assert_simple!(
            variable.is_some_and(|variable| !formula.is_assigned(variable)),
            "the brancher must select an unassigned variable while clauses remain"
        );
        let Some(variable) = variable else {
            return lower_bound;
        };

        let mut lower_bound = lower_bound;
        for value in self.brancher.value_order(&formula, variable) {
            termination.decision_has_been_made();
            self.statistics.num_decisions += 1;
            trace!("Branching on {variable} = {value}");

            let mut child = formula.clone();
            child.assign(variable, value);

            let child_bound = match apply_transform(&mut child, variable) {
                FormulaStatus::Satisfied => self.record_solution(&child, lower_bound, callback),
                FormulaStatus::Unsatisfiable => {
                    self.statistics.num_infeasible_branches += 1;
                    lower_bound
                }
                FormulaStatus::Normal => self.solve(child, lower_bound, termination, callback),
            };

            pms_assert_simple!(
                child_bound >= lower_bound,
                "a subtree can never lower the bound it was given"
            );
            lower_bound = lower_bound.max(child_bound);
        }

        lower_bound
    }

    fn record_solution(
        &mut self,
        formula: &Formula,
        lower_bound: Option<Weight>,
        callback: &impl SolutionCallback,
    ) -> Option<Weight> {
        let cost = formula.accumulated_satisfied_cost();

        let improves_incumbent = self
            .incumbent
            .as_ref()
            .map_or(true, |incumbent| cost > incumbent.cost());

        if improves_incumbent {
            debug!("Found a solution with cost {cost}");
            self.statistics.num_improving_solutions += 1;

            let solution = Solution::from_satisfied_formula(formula);
            callback.on_solution_callback(&solution);
            self.incumbent = Some(solution);
        }

        lower_bound.max(Some(cost))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::branching::MostFrequentBrancher;
    use crate::engine::test_formula::formula;
    use crate::engine::test_formula::lit;
    use crate::termination::DecisionBudget;
    use crate::termination::Indefinite;

    fn solve(formula: Formula) -> (Option<Weight>, Option<Solution>) {
        let mut brancher = MostFrequentBrancher;
        let mut statistics = SolverStatistics::default();
        let mut search = BranchAndBound::new(&mut brancher, &mut statistics);

        let best = search.solve(formula, None, &mut Indefinite, &|_: &Solution| {});
        assert!(!search.was_interrupted());

        (best, search.into_incumbent())
    }

    #[test]
    fn scenario_single_unit_hard_clause() {
        let (best, solution) = solve(formula(1, &[&[1]], &[]));

        let solution = solution.expect("feasible");
        assert_eq!(Some(0), best);
        assert!(solution.value(lit(1).get_variable()));
        assert_eq!(0, solution.cost());
    }

    #[test]
    fn scenario_contradicting_hard_clauses() {
        let (best, solution) = solve(formula(1, &[&[1], &[-1]], &[(&[1], 3), (&[-1], 2)]));

        assert_eq!(None, best);
        assert_eq!(None, solution);
    }

    #[test]
    fn scenario_opposing_soft_clauses() {
        let (best, solution) = solve(formula(2, &[], &[(&[1], 5), (&[-1], 3)]));

        let solution = solution.expect("feasible");
        assert_eq!(Some(5), best);
        assert!(solution.value(lit(1).get_variable()));
    }

    #[test]
    fn scenario_soft_clause_falsified_by_hard_clause() {
        let (best, solution) = solve(formula(2, &[&[1]], &[(&[-1], 10), (&[2], 3)]));

        assert_eq!(Some(3), best);
        assert_eq!(Some(3), solution.map(|solution| solution.cost()));
    }

    #[test]
    fn heavier_soft_clause_wins_over_earlier_unit_soft_clause() {
        let (best, solution) = solve(formula(1, &[], &[(&[1], 1), (&[-1], 5)]));

        let solution = solution.expect("feasible");
        assert_eq!(Some(5), best);
        assert!(!solution.value(lit(1).get_variable()));
    }

    #[test]
    fn hard_clauses_restrict_the_optimum() {
        let (best, solution) = solve(formula(
            3,
            &[&[-1, -2], &[-2, -3], &[1, 2, 3]],
            &[(&[1], 2), (&[2], 5), (&[3], 2), (&[1, 3], 1)],
        ));

        let solution = solution.expect("feasible");
        assert_eq!(Some(5), best);
        assert_eq!(5, solution.cost());
        assert!(!solution.is_literal_true(lit(1)) || !solution.is_literal_true(lit(2)));
    }

    #[test]
    fn improving_solutions_are_reported_in_increasing_order() {
        let reported = RefCell::new(vec![]);
        let mut brancher = MostFrequentBrancher;
        let mut statistics = SolverStatistics::default();
        let mut search = BranchAndBound::new(&mut brancher, &mut statistics);

        let best = search.solve(
            formula(2, &[&[1, 2]], &[(&[-1], 2), (&[-2], 2), (&[1], 3), (&[2], 1)]),
            None,
            &mut Indefinite,
            &|solution: &Solution| reported.borrow_mut().push(solution.cost()),
        );

        let reported = reported.into_inner();
        assert_eq!(best, reported.last().copied());
        assert!(reported.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(Some(5), best);
    }

    #[test]
    fn given_lower_bound_is_never_decreased() {
        let mut brancher = MostFrequentBrancher;
        let mut statistics = SolverStatistics::default();
        let mut search = BranchAndBound::new(&mut brancher, &mut statistics);

        let best = search.solve(
            formula(2, &[&[1, 2]], &[(&[1], 2), (&[2], 2)]),
            Some(7),
            &mut Indefinite,
            &|_: &Solution| {},
        );

        assert_eq!(Some(7), best);
        assert!(search.into_incumbent().is_none());
        assert_eq!(1, statistics.num_pruned_subtrees);
    }

    #[test]
    fn exhausted_termination_returns_the_given_bound() {
        let mut brancher = MostFrequentBrancher;
        let mut statistics = SolverStatistics::default();
        let mut search = BranchAndBound::new(&mut brancher, &mut statistics);

        let best = search.solve(
            formula(3, &[&[1, 2, 3]], &[(&[-1], 1), (&[-2], 1), (&[-3], 1)]),
            None,
            &mut DecisionBudget::new(0),
            &|_: &Solution| {},
        );

        assert_eq!(None, best);
        assert!(search.was_interrupted());
    }

    #[test]
    fn solutions_found_before_interruption_are_kept() {
        let mut brancher = MostFrequentBrancher;
        let mut statistics = SolverStatistics::default();
        let mut search = BranchAndBound::new(&mut brancher, &mut statistics);

        let best = search.solve(
            formula(
                4,
                &[&[1, 2, 3, 4]],
                &[(&[-1], 1), (&[-2], 1), (&[-3], 1), (&[-4], 1)],
            ),
            None,
            &mut DecisionBudget::new(4),
            &|_: &Solution| {},
        );

        assert!(search.was_interrupted());
        assert_eq!(best, search.into_incumbent().map(|solution| solution.cost()));
        assert!(best.is_some());
    }

    /// Exhaustively evaluate every complete assignment; `None` when no assignment satisfies the
    /// hard clauses.
    fn brute_force_optimum(formula: &Formula) -> Option<Weight> {
        let num_variables = formula.num_variables();

        (0..1_u32 << num_variables)
            .filter_map(|bits| {
                let satisfies = |literal: &crate::variables::Literal| {
                    let value = (bits >> literal.get_variable().get_index()) & 1 == 1;
                    literal.is_satisfied_by(value)
                };

                formula
                    .hard_clauses()
                    .iter()
                    .all(|clause| clause.iter().any(satisfies))
                    .then(|| {
                        formula
                            .soft_clauses()
                            .iter()
                            .filter(|soft_clause| soft_clause.literals().iter().any(satisfies))
                            .map(|soft_clause| soft_clause.cost())
                            .sum::<Weight>()
                    })
            })
            .max()
    }

    #[test]
    fn search_agrees_with_exhaustive_enumeration() {
        let instances = [
            formula(
                3,
                &[&[1, 2], &[-1, 3]],
                &[(&[-2], 4), (&[-3], 3), (&[1], 2), (&[2, 3], 1)],
            ),
            formula(
                4,
                &[&[1, -2], &[2, -3], &[3, -4], &[-1, 4]],
                &[(&[-1], 7), (&[2], 3), (&[4], 3), (&[-3, -4], 2)],
            ),
            formula(
                4,
                &[&[1, 2, 3], &[-1, -2], &[-2, -3], &[-1, -3], &[4, -1]],
                &[(&[1], 3), (&[2], 3), (&[3], 3), (&[-4], 5), (&[1, 4], 1)],
            ),
            formula(
                5,
                &[&[1, 2], &[3, 4], &[-1, -3], &[-2, -4], &[5, -5]],
                &[(&[1, 3], 9), (&[2], 2), (&[4], 2), (&[-5], 1), (&[5, -1], 4)],
            ),
            formula(3, &[&[1], &[-1, 2], &[-2, -1]], &[(&[3], 1)]),
            formula(
                5,
                &[],
                &[(&[1, -2], 3), (&[-1, 2], 3), (&[3, 4, 5], 2), (&[-3], 1), (&[-4], 1), (&[-5], 1)],
            ),
        ];

        for instance in instances {
            let expected = brute_force_optimum(&instance);
            let (best, solution) = solve(instance.clone());

            assert_eq!(expected, best);

            if let Some(solution) = solution {
                assert!(instance.is_satisfied_by(&solution));
                assert_eq!(solution.cost(), instance.evaluate(&solution));
            }
        }
    }
}
