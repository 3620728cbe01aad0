use super::formula::OccurrenceCounts;
use super::Formula;
use crate::pms_assert_simple;
use crate::variables::Literal;
use crate::variables::Variable;

/// The state of a [`Formula`] after it has been simplified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormulaStatus {
    /// Both clause sets are empty; the branch holds a complete feasible solution.
    Satisfied,
    /// A hard clause lost all of its literals; the branch is infeasible.
    Unsatisfiable,
    /// Undecided clauses remain.
    Normal,
}

/// Simplify every clause of `formula` with the value which was just assigned to `variable`.
///
/// A clause containing the now-true literal is satisfied and removed; a satisfied soft clause moves
/// its cost to the accumulated satisfied cost. The now-false literal is deleted from every other
/// clause. A soft clause which becomes empty moves its cost to the accumulated falsified cost and
/// is removed, while a hard clause which becomes empty is removed and makes the branch
/// [`FormulaStatus::Unsatisfiable`] right away.
///
/// Every clause is visited exactly once, and [`FormulaStatus::Satisfied`] is only reported after
/// the full pass.
pub fn apply_transform(formula: &mut Formula, variable: Variable) -> FormulaStatus {
    pms_assert_simple!(
        formula.is_assigned(variable),
        "{variable} must be assigned before it is applied"
    );

    let true_literal = Literal::new(variable, formula.value(variable) == Some(true));
    let false_literal = !true_literal;

    let Formula {
        hard_clauses,
        soft_clauses,
        occurrences,
        accumulated_satisfied_cost,
        accumulated_falsified_cost,
        ..
    } = formula;

    let mut emptied_hard_clause = false;
    hard_clauses.retain_mut(|clause| {
        if emptied_hard_clause {
            return true;
        }

        if clause.contains(&true_literal) {
            occurrences.remove_clause(clause);
            return false;
        }

        delete_literal(clause, false_literal, occurrences);
        emptied_hard_clause = clause.is_empty();
        !emptied_hard_clause
    });

    if emptied_hard_clause {
        return FormulaStatus::Unsatisfiable;
    }

    soft_clauses.retain_mut(|soft_clause| {
        if soft_clause.literals.contains(&true_literal) {
            occurrences.remove_clause(&soft_clause.literals);
            *accumulated_satisfied_cost += soft_clause.cost;
            return false;
        }

        delete_literal(&mut soft_clause.literals, false_literal, occurrences);
        if soft_clause.literals.is_empty() {
            *accumulated_falsified_cost += soft_clause.cost;
            return false;
        }

        true
    });

    if hard_clauses.is_empty() && soft_clauses.is_empty() {
        FormulaStatus::Satisfied
    } else {
        FormulaStatus::Normal
    }
}

fn delete_literal(clause: &mut Vec<Literal>, literal: Literal, occurrences: &mut OccurrenceCounts) {
    clause.retain(|&other| {
        if other == literal {
            occurrences.remove(other);
            false
        } else {
            true
        }
    });
}
