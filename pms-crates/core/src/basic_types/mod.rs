mod solution;
mod stopwatch;

pub use solution::Solution;
pub(crate) use stopwatch::Stopwatch;

/// The weight of a soft clause, and of any sum of soft clause weights.
pub type Weight = u64;
