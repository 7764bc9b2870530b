//! Command line surface: `u-cvrp solve --input <path> [options]`.
//!
//! Exit codes: `0` when every stop is served, `1` when the instance is valid
//! but some demand cannot be served, `2` when the input cannot be read or
//! fails validation.

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use clap::{Arg, ArgMatches, Command};
use tracing::info;

use crate::constructive::ConstructionStrategy;
use crate::error::CvrpError;
use crate::io::{InstanceData, SolveReport};
use crate::solver::{Solver, SolverConfig};

pub const SOLVE_COMMAND: &str = "solve";

const INPUT_ARG_NAME: &str = "input";
const TIME_LIMIT_ARG_NAME: &str = "time-limit";
const SEED_ARG_NAME: &str = "seed";
const WORKERS_ARG_NAME: &str = "workers";
const STRATEGY_ARG_NAME: &str = "strategy";
const OUT_ARG_NAME: &str = "out";

/// Every stop was served.
pub const EXIT_FEASIBLE: i32 = 0;
/// The instance is valid but some demand was left unassigned.
pub const EXIT_INFEASIBLE: i32 = 1;
/// The input could not be read, parsed or validated.
pub const EXIT_INVALID: i32 = 2;

/// Root command with all subcommands.
pub fn get_app() -> Command {
    Command::new("u-cvrp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Capacitated vehicle routing solver")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(get_solve_app())
}

pub fn get_solve_app() -> Command {
    Command::new(SOLVE_COMMAND)
        .about("Solves a CVRP instance and prints the routes as JSON")
        .arg(
            Arg::new(INPUT_ARG_NAME)
                .help("Path to the JSON instance file")
                .short('i')
                .long(INPUT_ARG_NAME)
                .required(true),
        )
        .arg(
            Arg::new(TIME_LIMIT_ARG_NAME)
                .help("Wall-clock limit in seconds")
                .short('t')
                .long(TIME_LIMIT_ARG_NAME)
                .default_value("10"),
        )
        .arg(
            Arg::new(SEED_ARG_NAME)
                .help("Seed for the perturbed attempts")
                .short('s')
                .long(SEED_ARG_NAME),
        )
        .arg(
            Arg::new(WORKERS_ARG_NAME)
                .help("Number of independent attempts run in parallel")
                .short('w')
                .long(WORKERS_ARG_NAME)
                .default_value("1"),
        )
        .arg(
            Arg::new(STRATEGY_ARG_NAME)
                .help("Construction heuristic")
                .long(STRATEGY_ARG_NAME)
                .value_parser(ConstructionStrategy::ALL.map(|s| s.name()))
                .default_value(ConstructionStrategy::default().name()),
        )
        .arg(
            Arg::new(OUT_ARG_NAME)
                .help("Writes the report to this file instead of stdout")
                .short('o')
                .long(OUT_ARG_NAME),
        )
}

/// Reads the solver settings from parsed `solve` arguments.
pub fn solve_config(matches: &ArgMatches) -> Result<SolverConfig, CvrpError> {
    let mut config = SolverConfig::default();

    if let Some(seconds) = parse_value::<f64>(matches, TIME_LIMIT_ARG_NAME)? {
        let limit = Duration::try_from_secs_f64(seconds).map_err(|err| {
            CvrpError::InvalidArgument(format!(
                "{TIME_LIMIT_ARG_NAME} must be a non-negative number of seconds, got {seconds}: {err}"
            ))
        })?;
        config = config.with_time_limit(limit);
    }
    if let Some(seed) = parse_value::<u64>(matches, SEED_ARG_NAME)? {
        config = config.with_seed(seed);
    }
    if let Some(workers) = parse_value::<usize>(matches, WORKERS_ARG_NAME)? {
        config = config.with_workers(workers);
    }
    if let Some(strategy) = matches.get_one::<String>(STRATEGY_ARG_NAME) {
        let strategy = ConstructionStrategy::from_str(strategy).map_err(CvrpError::InvalidArgument)?;
        config = config.with_strategy(strategy);
    }

    Ok(config)
}

/// Runs `solve`: reads the instance, solves it and writes the report.
pub fn run_solve(matches: &ArgMatches) -> Result<SolveReport, CvrpError> {
    let config = solve_config(matches)?;
    let input = matches
        .get_one::<String>(INPUT_ARG_NAME)
        .ok_or_else(|| CvrpError::InvalidArgument(format!("--{INPUT_ARG_NAME} is required")))?;
    info!(input = %input, "reading instance");

    let data = InstanceData::read(Path::new(input))?;
    let outcome = Solver::new(config).solve(&data)?;
    let report = SolveReport::for_data(&data, &outcome);

    let out_file = matches.get_one::<String>(OUT_ARG_NAME).map(File::create).transpose()?;
    let mut writer = create_write_buffer(out_file);
    report.write_to(&mut writer)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(report)
}

/// Maps the result of [`run_solve`] to the process exit code.
pub fn exit_code(result: &Result<SolveReport, CvrpError>) -> i32 {
    match result {
        Ok(report) if report.feasible => EXIT_FEASIBLE,
        Ok(_) => EXIT_INFEASIBLE,
        Err(_) => EXIT_INVALID,
    }
}

fn create_write_buffer(out_file: Option<File>) -> BufWriter<Box<dyn Write>> {
    match out_file {
        Some(file) => BufWriter::new(Box::new(file)),
        None => BufWriter::new(Box::new(stdout())),
    }
}

fn parse_value<T>(matches: &ArgMatches, arg_name: &str) -> Result<Option<T>, CvrpError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    matches
        .get_one::<String>(arg_name)
        .map(|arg| {
            arg.parse::<T>()
                .map_err(|err| CvrpError::InvalidArgument(format!("cannot parse {arg_name} '{arg}': {err}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::Termination;

    fn solve_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["u-cvrp", SOLVE_COMMAND];
        argv.extend_from_slice(args);
        let matches = get_app().try_get_matches_from(argv).expect("valid arguments");
        match matches.subcommand() {
            Some((SOLVE_COMMAND, sub)) => sub.clone(),
            other => panic!("unexpected subcommand {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = solve_config(&solve_matches(&["--input", "x.json"])).expect("config");
        assert_eq!(config.time_limit(), Duration::from_secs(10));
        assert_eq!(config.workers(), 1);
        assert_eq!(config.seed(), None);
        assert_eq!(config.strategy(), ConstructionStrategy::CheapestInsertion);
    }

    #[test]
    fn test_all_flags() {
        let matches = solve_matches(&[
            "-i", "x.json", "-t", "0.5", "-s", "42", "-w", "4", "--strategy", "savings",
        ]);
        let config = solve_config(&matches).expect("config");
        assert_eq!(config.time_limit(), Duration::from_millis(500));
        assert_eq!(config.seed(), Some(42));
        assert_eq!(config.workers(), 4);
        assert_eq!(config.strategy(), ConstructionStrategy::Savings);
    }

    #[test]
    fn test_bad_values() {
        let matches = solve_matches(&["-i", "x.json", "--seed", "abc"]);
        assert!(matches!(solve_config(&matches), Err(CvrpError::InvalidArgument(_))));

        for limit in ["--time-limit=-1", "--time-limit=1e20", "--time-limit=inf", "--time-limit=NaN"] {
            let matches = solve_matches(&["-i", "x.json", limit]);
            assert!(matches!(solve_config(&matches), Err(CvrpError::InvalidArgument(_))), "{limit}");
        }

        let matches = solve_matches(&["-i", "x.json", "-t", "1e9"]);
        let config = solve_config(&matches).expect("large but representable");
        assert_eq!(config.time_limit(), Duration::from_secs(1_000_000_000));

        let unknown = get_app().try_get_matches_from(["u-cvrp", "solve", "-i", "x.json", "--strategy", "sweep"]);
        assert!(unknown.is_err());
    }

    #[test]
    fn test_input_required() {
        assert!(get_app().try_get_matches_from(["u-cvrp", "solve"]).is_err());
    }

    #[test]
    fn test_missing_file_is_invalid_input() {
        let result = run_solve(&solve_matches(&["-i", "/nonexistent/instance.json"]));
        assert!(matches!(result, Err(CvrpError::Io(_))));
        assert_eq!(exit_code(&result), EXIT_INVALID);
    }

    #[test]
    fn test_exit_codes() {
        let report = |feasible| SolveReport {
            routes: Vec::new(),
            total_distance: 0.0,
            total_load: 0,
            feasible,
            unassigned: Vec::new(),
            termination: Termination::Converged,
            infeasibility: None,
            initial_distance: 0.0,
            elapsed_ms: 0,
            coordinates: None,
            prices: None,
        };
        assert_eq!(exit_code(&Ok(report(true))), EXIT_FEASIBLE);
        assert_eq!(exit_code(&Ok(report(false))), EXIT_INFEASIBLE);
        assert_eq!(
            exit_code(&Err(CvrpError::InvalidArgument("x".to_string()))),
            EXIT_INVALID
        );
    }
}
