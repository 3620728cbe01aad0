use std::io::Read;

use thiserror::Error;

use crate::basic_types::Solution;
use crate::basic_types::Weight;
use crate::containers::KeyedVec;
use crate::parsers::dimacs::parse_pms;
use crate::parsers::dimacs::MalformedInputError;
use crate::pms_assert_simple;
use crate::variables::Literal;
use crate::variables::Variable;

/// Returned when adding a soft clause would make the total soft weight exceed [`Weight::MAX`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("the total weight of the soft clauses exceeds {}", Weight::MAX)]
pub struct WeightOverflow;

/// A soft clause together with the weight gained by satisfying it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoftClause {
    pub(crate) literals: Vec<Literal>,
    pub(crate) cost: Weight,
}

impl SoftClause {
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn cost(&self) -> Weight {
        self.cost
    }
}

/// The working state of one branch of the search.
///
/// Besides the partial assignment, the formula holds the hard and soft clauses which are not yet
/// decided on this branch. Clauses shrink as their literals become false and disappear once they
/// are satisfied or, for soft clauses, once they become empty. The weight of every soft clause is
/// therefore always accounted for exactly once: either it is still in [`Formula::soft_clauses`], or
/// it has moved to [`Formula::accumulated_satisfied_cost`] or
/// [`Formula::accumulated_falsified_cost`].
///
/// A formula is never shared between branches; the search clones it at every decision.
#[derive(Clone, Debug, Default)]
pub struct Formula {
    pub(crate) assignment: KeyedVec<Variable, Option<bool>>,
    pub(crate) occurrences: OccurrenceCounts,
    pub(crate) hard_clauses: Vec<Vec<Literal>>,
    pub(crate) soft_clauses: Vec<SoftClause>,
    /// Set when an empty hard clause was added; such a formula has no model.
    pub(crate) has_empty_hard_clause: bool,
    pub(crate) total_soft_weight: Weight,
    pub(crate) accumulated_satisfied_cost: Weight,
    pub(crate) accumulated_falsified_cost: Weight,
}

impl Formula {
    /// Create a formula over `num_variables` unassigned variables without any clauses.
    pub fn initialize(num_variables: usize) -> Formula {
        Formula {
            assignment: KeyedVec::filled(num_variables, None),
            occurrences: OccurrenceCounts::new(num_variables),
            hard_clauses: vec![],
            soft_clauses: vec![],
            has_empty_hard_clause: false,
            total_soft_weight: 0,
            accumulated_satisfied_cost: 0,
            accumulated_falsified_cost: 0,
        }
    }

    /// Read a formula in the PMS format; see [`crate::parsers::dimacs`] for the format itself.
    pub fn load(source: impl Read) -> Result<Formula, MalformedInputError> {
        parse_pms::<Formula>(source, ())
    }

    /// Add a hard clause while constructing the formula.
    pub fn push_hard_clause(&mut self, literals: impl IntoIterator<Item = Literal>) {
        let clause = self.count_occurrences(literals);

        if clause.is_empty() {
            self.has_empty_hard_clause = true;
        } else {
            self.hard_clauses.push(clause);
        }
    }

    /// Add a soft clause while constructing the formula. An empty soft clause can never be
    /// satisfied, so its cost is directly accounted as falsified.
    pub fn push_soft_clause(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
        cost: Weight,
    ) -> Result<(), WeightOverflow> {
        self.total_soft_weight = self
            .total_soft_weight
            .checked_add(cost)
            .ok_or(WeightOverflow)?;

        let literals = self.count_occurrences(literals);

        if literals.is_empty() {
            self.accumulated_falsified_cost += cost;
        } else {
            self.soft_clauses.push(SoftClause { literals, cost });
        }

        Ok(())
    }

    fn count_occurrences(&mut self, literals: impl IntoIterator<Item = Literal>) -> Vec<Literal> {
        let clause = literals.into_iter().collect::<Vec<_>>();

        for &literal in &clause {
            pms_assert_simple!(
                self.contains_variable(literal.get_variable()),
                "literal {literal} refers to a variable outside of the formula"
            );
            self.occurrences.add(literal);
        }

        clause
    }

    pub fn num_variables(&self) -> usize {
        self.assignment.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        self.assignment.keys()
    }

    pub fn contains_variable(&self, variable: Variable) -> bool {
        (variable.get_index() as usize) < self.num_variables()
    }

    /// Assign `variable` on this branch. An assigned variable is no longer a candidate for
    /// branching.
    pub fn assign(&mut self, variable: Variable, value: bool) {
        pms_assert_simple!(
            !self.is_assigned(variable),
            "{variable} is already assigned on this branch"
        );
        self.assignment[variable] = Some(value);
    }

    pub fn value(&self, variable: Variable) -> Option<bool> {
        self.assignment[variable]
    }

    pub fn is_assigned(&self, variable: Variable) -> bool {
        self.assignment[variable].is_some()
    }

    /// The number of occurrences of `variable`, in either polarity, in the clauses which remain.
    pub fn frequency(&self, variable: Variable) -> usize {
        self.occurrences.frequency[variable]
    }

    /// The number of positive minus the number of negative occurrences of `variable` in the
    /// clauses which remain.
    pub fn polarity_balance(&self, variable: Variable) -> i64 {
        self.occurrences.polarity_balance[variable]
    }

    pub fn hard_clauses(&self) -> &[Vec<Literal>] {
        &self.hard_clauses
    }

    pub fn soft_clauses(&self) -> &[SoftClause] {
        &self.soft_clauses
    }

    /// Whether both clause sets are empty.
    pub fn is_empty(&self) -> bool {
        self.hard_clauses.is_empty() && self.soft_clauses.is_empty()
    }

    pub fn has_empty_hard_clause(&self) -> bool {
        self.has_empty_hard_clause
    }

    pub fn total_soft_weight(&self) -> Weight {
        self.total_soft_weight
    }

    pub fn accumulated_satisfied_cost(&self) -> Weight {
        self.accumulated_satisfied_cost
    }

    pub fn accumulated_falsified_cost(&self) -> Weight {
        self.accumulated_falsified_cost
    }

    /// The weight of the soft clauses which are still undecided.
    pub fn remaining_soft_weight(&self) -> Weight {
        self.soft_clauses.iter().map(SoftClause::cost).sum()
    }

    /// The largest weight any completion of this branch could still achieve.
    pub fn upper_bound(&self) -> Weight {
        self.total_soft_weight - self.accumulated_falsified_cost
    }

    /// Whether satisfied, falsified and remaining soft weight add up to the total soft weight.
    pub fn is_cost_conserved(&self) -> bool {
        self.accumulated_satisfied_cost
            .checked_add(self.accumulated_falsified_cost)
            .and_then(|decided| decided.checked_add(self.remaining_soft_weight()))
            == Some(self.total_soft_weight)
    }

    /// Whether every remaining hard clause is satisfied by `solution`.
    pub fn is_satisfied_by(&self, solution: &Solution) -> bool {
        !self.has_empty_hard_clause
            && self.hard_clauses.iter().all(|clause| {
                clause
                    .iter()
                    .any(|&literal| solution.is_literal_true(literal))
            })
    }

    /// The weight already satisfied on this branch plus the weight of the remaining soft clauses
    /// which `solution` satisfies.
    pub fn evaluate(&self, solution: &Solution) -> Weight {
        self.accumulated_satisfied_cost
            + self
                .soft_clauses
                .iter()
                .filter(|soft_clause| {
                    soft_clause
                        .literals
                        .iter()
                        .any(|&literal| solution.is_literal_true(literal))
                })
                .map(SoftClause::cost)
                .sum::<Weight>()
    }
}

/// Per-variable occurrence statistics which drive the branching heuristic.
#[derive(Clone, Debug, Default)]
pub(crate) struct OccurrenceCounts {
    frequency: KeyedVec<Variable, usize>,
    polarity_balance: KeyedVec<Variable, i64>,
}

impl OccurrenceCounts {
    fn new(num_variables: usize) -> OccurrenceCounts {
        OccurrenceCounts {
            frequency: KeyedVec::filled(num_variables, 0),
            polarity_balance: KeyedVec::filled(num_variables, 0),
        }
    }

    fn add(&mut self, literal: Literal) {
        let variable = literal.get_variable();
        self.frequency[variable] += 1;
        self.polarity_balance[variable] += polarity_sign(literal);
    }

    pub(crate) fn remove(&mut self, literal: Literal) {
        let variable = literal.get_variable();
        pms_assert_simple!(
            self.frequency[variable] > 0,
            "removed an occurrence of {variable} which was never counted"
        );
        self.frequency[variable] -= 1;
        self.polarity_balance[variable] -= polarity_sign(literal);
    }

    pub(crate) fn remove_clause(&mut self, clause: &[Literal]) {
        for &literal in clause {
            self.remove(literal);
        }
    }
}

fn polarity_sign(literal: Literal) -> i64 {
    if literal.is_positive() {
        1
    } else {
        -1
    }
}
