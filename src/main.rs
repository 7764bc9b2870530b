//! Command line entry point. Logs go to stderr; stdout carries only the
//! JSON report.

use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;
use u_cvrp::cli::{exit_code, get_app, run_solve, EXIT_INVALID, SOLVE_COMMAND};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("u_cvrp=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = get_app().get_matches();
    let code = match matches.subcommand() {
        Some((SOLVE_COMMAND, solve_matches)) => {
            let result = run_solve(solve_matches);
            if let Err(err) = &result {
                error!(%err, "solve failed");
            }
            exit_code(&result)
        }
        _ => {
            eprintln!("No subcommand was used. Use -h to print help information.");
            EXIT_INVALID
        }
    };

    process::exit(code);
}
