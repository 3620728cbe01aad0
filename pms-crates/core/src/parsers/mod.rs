//! Readers for the text formats in which formulas are stored.
pub mod dimacs;
