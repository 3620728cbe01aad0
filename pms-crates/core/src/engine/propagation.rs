use log::trace;

use super::apply_transform;
use super::Formula;
use super::FormulaStatus;
use crate::variables::Literal;

/// Perform unit propagation on `formula`.
///
/// The hard clauses are scanned for a clause with exactly one literal; that literal is forced and
/// applied with [`apply_transform`], after which the scan restarts from the first clause. This
/// repeats until no unit hard clause remains or the formula becomes
/// [`FormulaStatus::Satisfied`] or [`FormulaStatus::Unsatisfiable`].
///
/// Unit soft clauses are never forced. Satisfying one can falsify heavier soft clauses, so forcing
/// it could cut the optimum out of the search.
pub fn propagate(formula: &mut Formula) -> FormulaStatus {
    let mut num_propagations = 0;
    propagate_and_count(formula, &mut num_propagations)
}

/// [`propagate`], adding the number of forced literals to `num_propagations`.
pub(crate) fn propagate_and_count(
    formula: &mut Formula,
    num_propagations: &mut u64,
) -> FormulaStatus {
    if formula.has_empty_hard_clause() {
        return FormulaStatus::Unsatisfiable;
    }

    if formula.is_empty() {
        return FormulaStatus::Satisfied;
    }

    while let Some(literal) = find_unit_literal(formula) {
        let variable = literal.get_variable();
        formula.assign(variable, literal.is_positive());
        *num_propagations += 1;
        trace!("Propagated {literal:?}");

        let status = apply_transform(formula, variable);
        if status != FormulaStatus::Normal {
            return status;
        }
    }

    FormulaStatus::Normal
}

fn find_unit_literal(formula: &Formula) -> Option<Literal> {
    formula
        .hard_clauses
        .iter()
        .find(|clause| clause.len() == 1)
        .map(|clause| clause[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_formula::formula;
    use crate::engine::test_formula::lit;

    #[test]
    fn empty_formula_is_vacuously_satisfied() {
        let mut formula = formula(2, &[], &[]);

        assert_eq!(FormulaStatus::Satisfied, propagate(&mut formula));
        assert!(formula.variables().all(|variable| !formula.is_assigned(variable)));
    }

    #[test]
    fn empty_hard_clause_is_unsatisfiable() {
        let mut formula = formula(1, &[&[]], &[]);

        assert_eq!(FormulaStatus::Unsatisfiable, propagate(&mut formula));
    }

    #[test]
    fn single_unit_clause_is_satisfied() {
        let mut formula = formula(1, &[&[1]], &[]);

        assert_eq!(FormulaStatus::Satisfied, propagate(&mut formula));
        assert_eq!(Some(true), formula.value(lit(1).get_variable()));
        assert_eq!(0, formula.accumulated_satisfied_cost());
    }

    #[test]
    fn opposing_unit_clauses_are_unsatisfiable() {
        let mut formula = formula(1, &[&[1], &[-1]], &[(&[1], 3)]);

        assert_eq!(FormulaStatus::Unsatisfiable, propagate(&mut formula));
    }

    #[test]
    fn propagation_follows_chains() {
        let mut formula = formula(3, &[&[-1, 2], &[-2, -3], &[1]], &[(&[3, 2], 1), (&[3], 2)]);
        let mut num_propagations = 0;

        let status = propagate_and_count(&mut formula, &mut num_propagations);

        assert_eq!(FormulaStatus::Satisfied, status);
        assert_eq!(3, num_propagations);
        assert_eq!(Some(true), formula.value(lit(1).get_variable()));
        assert_eq!(Some(true), formula.value(lit(2).get_variable()));
        assert_eq!(Some(false), formula.value(lit(3).get_variable()));
        assert_eq!(1, formula.accumulated_satisfied_cost());
        assert_eq!(2, formula.accumulated_falsified_cost());
    }

    #[test]
    fn soft_clause_falsified_by_hard_propagation_is_lost() {
        let mut formula = formula(2, &[&[1]], &[(&[-1], 4), (&[2], 3)]);

        let status = propagate(&mut formula);

        assert_eq!(FormulaStatus::Normal, status);
        assert_eq!(4, formula.accumulated_falsified_cost());
        assert_eq!(3, formula.upper_bound());
        assert!(formula.is_cost_conserved());
    }

    #[test]
    fn unit_soft_clauses_are_not_forced() {
        let mut formula = formula(1, &[], &[(&[1], 1), (&[-1], 5)]);

        assert_eq!(FormulaStatus::Normal, propagate(&mut formula));
        assert!(!formula.is_assigned(lit(1).get_variable()));
        assert_eq!(2, formula.soft_clauses().len());
    }

    #[test]
    fn propagation_is_idempotent() {
        let mut formula = formula(4, &[&[1], &[-1, 2, 3], &[3, 4]], &[(&[2, 4], 2)]);

        assert_eq!(FormulaStatus::Normal, propagate(&mut formula));
        let after_first = formula.clone();
        let mut num_propagations = 0;

        assert_eq!(
            FormulaStatus::Normal,
            propagate_and_count(&mut formula, &mut num_propagations)
        );
        assert_eq!(0, num_propagations);
        assert_eq!(after_first.hard_clauses(), formula.hard_clauses());
        assert_eq!(after_first.soft_clauses(), formula.soft_clauses());
        assert_eq!(after_first.assignment, formula.assignment);
    }
}
