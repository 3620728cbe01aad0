//! Helpers to run the solver binary in integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use pms_solver::core::formula::Formula;
use pms_solver::core::parsers::dimacs::parse_pms;
use pms_solver::core::parsers::dimacs::parse_wcnf;
use pms_solver::core::Weight;
use regex::Regex;
use wait_timeout::ChildExt;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The captured output of one run of the solver.
#[derive(Debug)]
pub(crate) struct SolverRun {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

/// The outcome reported by the solver, as read back from its output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Solution {
        literals: Vec<i64>,
        cost: Weight,
        proven: bool,
    },
    Unsatisfiable,
    Unknown,
}

pub(crate) fn instance_path(file_name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/tests/instances/{file_name}",
        env!("CARGO_MANIFEST_DIR")
    ))
}

pub(crate) fn run_solver(instance_path: impl AsRef<Path>) -> SolverRun {
    run_solver_with_options(Some(instance_path.as_ref()), std::iter::empty(), None)
}

/// Run the solver binary, either on the given instance path or with `stdin_file` piped to its
/// standard input.
pub(crate) fn run_solver_with_options(
    instance_path: Option<&Path>,
    args: impl IntoIterator<Item = String>,
    stdin_file: Option<&Path>,
) -> SolverRun {
    let solver = PathBuf::from(env!("CARGO_BIN_EXE_pms-solver"));
    let output_dir = std::env::temp_dir();
    let run_name = format!(
        "pms-solver-{}-{:?}",
        std::process::id(),
        std::thread::current().id()
    )
    .replace(['(', ')'], "");

    let log_file_path = output_dir.join(format!("{run_name}.log"));
    let err_file_path = output_dir.join(format!("{run_name}.err"));

    let mut command = Command::new(solver);

    for arg in args {
        let _ = command.arg(arg);
    }

    if let Some(instance_path) = instance_path {
        let _ = command.arg(instance_path);
    }

    let stdin = match stdin_file {
        Some(path) => Stdio::from(File::open(path).expect("Failed to open the stdin file.")),
        None => Stdio::null(),
    };

    let mut child = command
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(File::create(&err_file_path).expect("Failed to create error file."))
        .stdin(stdin)
        .spawn()
        .expect("Failed to run solver.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => {
            let _ = child.kill();
            panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs())
        }
        Ok(Some(status)) => status,
        Err(e) => panic!("error starting solver: {e}"),
    };

    let stdout = std::fs::read_to_string(&log_file_path).expect("Failed to read solver output");
    let stderr = std::fs::read_to_string(&err_file_path).expect("Failed to read solver errors");

    std::fs::remove_file(log_file_path).expect("Failed to remove log file");
    std::fs::remove_file(err_file_path).expect("Failed to remove error file");

    SolverRun {
        status,
        stdout,
        stderr,
    }
}

/// Read the reported outcome from the output of the solver.
pub(crate) fn parse_outcome(stdout: &str) -> Outcome {
    let solution = Regex::new(
        r"(?m)^(?P<interrupted>c search interrupted, cost not proven optimal\n)?SAT\n(?P<literals>(?:-?\d+ )*0)\n(?P<cost>\d+)$",
    )
    .expect("valid regex");

    if let Some(captures) = solution.captures(stdout) {
        let literals = captures["literals"]
            .split_whitespace()
            .map(|code| code.parse::<i64>().expect("literals are integers"))
            .take_while(|&code| code != 0)
            .collect();

        return Outcome::Solution {
            literals,
            cost: captures["cost"].parse().expect("cost is an integer"),
            proven: captures.name("interrupted").is_none(),
        };
    }

    if stdout.lines().any(|line| line == "UNSAT") {
        Outcome::Unsatisfiable
    } else if stdout.lines().any(|line| line == "UNKNOWN") {
        Outcome::Unknown
    } else {
        panic!("the solver did not report an outcome:\n{stdout}")
    }
}

/// Read the instance with the parser matching its extension.
pub(crate) fn load_instance(instance_path: &Path) -> Formula {
    let file = File::open(instance_path).expect("Failed to open instance");

    match instance_path.extension().and_then(|ext| ext.to_str()) {
        Some("wcnf") => parse_wcnf::<Formula>(file, ()).expect("valid wcnf instance"),
        _ => parse_pms::<Formula>(file, ()).expect("valid pms instance"),
    }
}

/// Check the reported assignment against the instance: every hard clause must be satisfied and
/// the satisfied soft weight must equal the reported cost.
pub(crate) fn verify_solution(instance_path: &Path, literals: &[i64], cost: Weight) {
    let formula = load_instance(instance_path);

    assert_eq!(
        formula.num_variables(),
        literals.len(),
        "one literal per variable is reported"
    );

    let is_true = |literal: i64| literals.contains(&literal);

    for clause in formula.hard_clauses() {
        assert!(
            clause.iter().any(|literal| is_true(literal.to_dimacs())),
            "hard clause {clause:?} is violated"
        );
    }

    let satisfied_weight = formula
        .soft_clauses()
        .iter()
        .filter(|soft_clause| {
            soft_clause
                .literals()
                .iter()
                .any(|literal| is_true(literal.to_dimacs()))
        })
        .map(|soft_clause| soft_clause.cost())
        .sum::<Weight>();

    assert_eq!(cost, satisfied_weight, "the reported cost is achieved");
}
