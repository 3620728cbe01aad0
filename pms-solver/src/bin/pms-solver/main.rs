mod file_format;
mod os_signal_termination;
mod report;
mod result;

use std::fs::File;
use std::io::stdout;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use file_format::FileFormat;
use log::error;
use log::info;
use log::warn;
use log::Level;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use pms_solver::core::formula::Formula;
use pms_solver::core::parsers::dimacs::parse_pms;
use pms_solver::core::parsers::dimacs::parse_wcnf;
use pms_solver::core::results::Solution;
use pms_solver::core::statistics::configure_statistic_logging;
use pms_solver::core::termination::Combinator;
use pms_solver::core::termination::DecisionBudget;
use pms_solver::core::termination::TimeBudget;
use pms_solver::Solver;
use result::PmsError;
use result::PmsResult;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about
)]
struct Args {
    /// The instance to solve. The file should have one of the following extensions:
    ///  - '*.pms' for instances in the PMS format,
    ///  - '*.wcnf' for MaxSAT instances, given in the WDIMACS format.
    ///
    /// When no instance is given, an instance in the PMS format is read from standard input.
    #[clap(verbatim_doc_comment)]
    instance_path: Option<PathBuf>,

    /// The time budget for the solver, given in milliseconds.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// The maximum number of decisions the search is allowed to make.
    ///
    /// Possible values: u64 (Optional)
    #[arg(long = "decision-limit", verbatim_doc_comment)]
    decision_limit: Option<u64>,

    /// Enables log message output from the solver.
    ///
    /// For printing statistics see the option "--log-statistics", and for printing the cost of
    /// solutions of increasing quality see the option "--all-solutions".
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,

    /// Instructs the solver to print the cost of every solution which improves on the best one
    /// found so far, as a line of the form 'o <cost>'.
    ///
    /// Possible values: bool
    #[arg(short = 'a', long = "all-solutions", verbatim_doc_comment)]
    all_solutions: bool,

    /// If `--verbose` is enabled then this option removes the timestamp information from the log
    /// messages.
    ///
    /// Possible values: bool
    #[arg(long = "omit-timestamp", verbatim_doc_comment)]
    omit_timestamp: bool,

    /// If `--verbose` is enabled then this option removes the call site information from the log
    /// messages. The call site is the file and line from which the message originated.
    ///
    /// Possible values: bool
    #[arg(long = "omit-call-site", default_value_t = false, verbatim_doc_comment)]
    omit_call_site: bool,
}

fn configure_logging(
    verbose: bool,
    log_statistics: bool,
    omit_timestamp: bool,
    omit_call_site: bool,
) -> std::io::Result<()> {
    if log_statistics {
        configure_statistic_logging("c stat", None, None, None);
    }

    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "c ")?;
            if record.level() != Level::Info && !omit_timestamp {
                write!(buf, "{} ", buf.timestamp())?;
            }
            write!(buf, "{} ", record.level())?;
            if record.level() != Level::Info && !omit_call_site {
                write!(
                    buf,
                    "[{}:{}] ",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )?;
            }
            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn configure_logging_unknown() -> std::io::Result<()> {
    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "c {}", record.args()))
        .filter_level(LevelFilter::Trace)
        .target(env_logger::Target::Stdout)
        .init();
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> PmsResult<()> {
    let args = Args::parse();

    let file_format = match args.instance_path.as_ref() {
        None => FileFormat::Pms,
        Some(path) => match path.extension().and_then(|ext| ext.to_str()) {
            Some("pms") => FileFormat::Pms,
            Some("wcnf") => FileFormat::Wcnf,
            _ => {
                configure_logging_unknown()?;
                return Err(PmsError::invalid_instance(path.display()));
            }
        },
    };

    configure_logging(
        args.verbose,
        args.log_statistics,
        args.omit_timestamp,
        args.omit_call_site,
    )?;

    if pms_solver::core::asserts::PMS_ASSERT_LEVEL_DEFINITION
        >= pms_solver::core::asserts::PMS_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            pms_solver::core::asserts::PMS_ASSERT_LEVEL_DEFINITION
        );
    };

    let formula = read_formula(args.instance_path.as_deref(), file_format)?;
    info!(
        "Read a formula with {} variables, {} hard and {} soft clauses",
        formula.num_variables(),
        formula.hard_clauses().len(),
        formula.soft_clauses().len()
    );

    let mut termination = Combinator::new(
        OsSignal::install(),
        Combinator::new(
            args.time_limit
                .map(|limit| TimeBudget::starting_now(Duration::from_millis(limit))),
            args.decision_limit.map(DecisionBudget::new),
        ),
    );

    let callback = args
        .all_solutions
        .then_some(|solution: &Solution| println!("o {}", solution.cost()));

    let mut solver = Solver::default();
    let result = solver.optimise(formula, &mut termination, &callback);

    report::write_result(&mut stdout().lock(), &result)?;
    solver.log_statistics_with_cost(result.cost());

    Ok(())
}

fn read_formula(instance_path: Option<&Path>, file_format: FileFormat) -> PmsResult<Formula> {
    let formula = match instance_path {
        None => parse_pms::<Formula>(std::io::stdin().lock(), ())?,
        Some(path) => {
            let instance_file = File::open(path)?;

            match file_format {
                FileFormat::Pms => parse_pms::<Formula>(instance_file, ())?,
                FileFormat::Wcnf => parse_wcnf::<Formula>(instance_file, ())?,
            }
        }
    };

    Ok(formula)
}
