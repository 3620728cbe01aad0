use std::io::Write;

use pms_solver::core::results::OptimisationResult;
use pms_solver::core::results::Solution;

/// Write the outcome of the search in the output format of the solver.
///
/// A solution is reported as `SAT`, a line with one DIMACS literal per variable terminated by
/// `0`, and a line with the satisfied soft weight. A solution which is not proven optimal is
/// preceded by a comment saying so.
pub(crate) fn write_result(
    writer: &mut impl Write,
    result: &OptimisationResult,
) -> std::io::Result<()> {
    match result {
        OptimisationResult::Optimal { solution } => write_solution(writer, solution),
        OptimisationResult::Satisfiable { best_solution } => {
            writeln!(writer, "c search interrupted, cost not proven optimal")?;
            write_solution(writer, best_solution)
        }
        OptimisationResult::Infeasible => writeln!(writer, "UNSAT"),
        OptimisationResult::Unknown => writeln!(writer, "UNKNOWN"),
    }
}

fn write_solution(writer: &mut impl Write, solution: &Solution) -> std::io::Result<()> {
    writeln!(writer, "SAT")?;
    writeln!(writer, "{}", stringify_solution(solution))?;
    writeln!(writer, "{}", solution.cost())
}

fn stringify_solution(solution: &Solution) -> String {
    solution
        .literals()
        .map(|literal| format!("{literal} "))
        .chain(std::iter::once(String::from("0")))
        .collect::<String>()
}
