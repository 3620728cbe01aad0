mod outputs;
pub(crate) mod solver;

pub mod results {
    //! Contains the outputs of solving using the [`Solver`].
    //!
    //! The [`OptimisationResult`] distinguishes between a search which ran to completion (either
    //! [`OptimisationResult::Optimal`] or [`OptimisationResult::Infeasible`]) and a search which was
    //! stopped by its [`TerminationCondition`] (either [`OptimisationResult::Satisfiable`] or
    //! [`OptimisationResult::Unknown`]).
    pub use crate::api::outputs::OptimisationResult;
    pub use crate::basic_types::Solution;
    #[cfg(doc)]
    use crate::termination::TerminationCondition;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod variables {
    //! Contains the variables and literals which make up a [`Formula`].
    //!
    //! A [`Variable`] is identified by its 0-based index. A [`Literal`] is a [`Variable`] together
    //! with a polarity, encoded as `2 * variable + polarity_bit` where a polarity bit of `1` denotes
    //! the negated literal.
    pub use crate::engine::variables::Literal;
    pub use crate::engine::variables::Variable;
    #[cfg(doc)]
    use crate::formula::Formula;
}

pub mod formula {
    //! Contains the [`Formula`], the mutable working state of one branch of the search, and the two
    //! operations which simplify it: [`apply_transform`] and [`propagate`].
    pub use crate::engine::apply_transform;
    pub use crate::engine::propagate;
    pub use crate::engine::Formula;
    pub use crate::engine::FormulaStatus;
    pub use crate::engine::SoftClause;
    pub use crate::engine::WeightOverflow;
}

pub mod termination {
    //! Contains the conditions which are used to determine when the [`Solver`] should terminate
    //! even when the optimum has not been proven yet.
    //!
    //! The main [`TerminationCondition`] is a condition which is polled by the [`Solver`] at every
    //! node of the search tree. Once it triggers, the search unwinds and reports the best solution
    //! it has found, flagged as not proven optimal.
    //!
    //! The most common example would be [`TimeBudget`], which terminates the [`Solver`] whenever
    //! the time budget is exceeded.
    pub use crate::engine::termination::combinator::*;
    pub use crate::engine::termination::decision_budget::*;
    pub use crate::engine::termination::indefinite::*;
    pub use crate::engine::termination::time_budget::*;
    pub use crate::engine::termination::TerminationCondition;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod asserts {
    //! Assertions which are enabled based on the assert level of the crate.
    pub use crate::pms_asserts::PMS_ASSERT_ADVANCED;
    pub use crate::pms_asserts::PMS_ASSERT_LEVEL_DEFINITION;
    pub use crate::pms_asserts::PMS_ASSERT_MODERATE;
    pub use crate::pms_asserts::PMS_ASSERT_SIMPLE;
}
