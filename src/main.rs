mod cli;

use anyhow::{Context, Result};
use cli::Cli;
use colored::Colorize;
use gpclient_mock::control::{self, LockStatus};
use gpclient_mock::signals::install_termination_listener;
use gpclient_mock::{Console, MockClient};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status of `--status` when no instance holds the lock.
const EXIT_INACTIVE: u8 = 3;

fn main() -> ExitCode {
    let (cli, ignored_flags) = Cli::parse_lenient(std::env::args_os());
    init_logging(cli.verbose);
    for flag in &ignored_flags {
        tracing::debug!(flag = %flag, "ignoring unrecognized flag");
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "gpclient_mock=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    if cli.stop {
        return stop(cli);
    }
    if cli.status {
        return status(cli);
    }

    let mut client = MockClient::new(cli.to_config());
    let mut console = Console {
        out: io::stdout(),
        err: io::stderr(),
    };

    let outcome = client.run(io::stdin().lock(), install_termination_listener, &mut console)?;
    tracing::debug!(?outcome, "mock client finished");

    Ok(ExitCode::SUCCESS)
}

fn status(cli: &Cli) -> Result<ExitCode> {
    let status = control::status(&cli.lock_file)
        .with_context(|| format!("Failed to inspect {}", cli.lock_file.display()))?;

    println!("{}: {status}", cli.lock_file.display());
    Ok(match status {
        LockStatus::Active { .. } => ExitCode::SUCCESS,
        LockStatus::Inactive => ExitCode::from(EXIT_INACTIVE),
    })
}

fn stop(cli: &Cli) -> Result<ExitCode> {
    match control::stop(&cli.lock_file)? {
        Some(pid) => println!("Sent SIGTERM to PID {pid}"),
        None => println!("No lock file at {}", cli.lock_file.display()),
    }
    Ok(ExitCode::SUCCESS)
}
