// EN: src/bin/virtbench.rs

//! The `virtbench` command-line entry point.

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use virtbench::{
    cli::{self, GlobalArgs, dispatcher},
    config,
    constants::INTERRUPTED_EXIT_CODE,
    core::paths,
    system::executor::{Dispatcher, ExecutionError, StreamPolicy, SystemSpawner},
};

/// The main entry point of the `virtbench` application.
/// It sets up logging, parses arguments, dispatches to the selected workload,
/// and performs centralized error handling.
fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();

    // Ctrl+C also reaches the executor, which shares our process group.
    // virtbench only records it and waits for the executor to finish.
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        eprintln!("{}: could not install the Ctrl+C handler: {}", "Warning".yellow(), e);
    }

    env_logger::init();

    // Usage errors (unknown flags, a missing required flag) are reported by clap,
    // which exits with a non-zero code before any workload logic runs.
    let matches = cli::build_cli().get_matches();
    log::debug!("CLI args parsed: {:?}", matches);

    if let Err(e) = run_cli(&matches) {
        // --- Centralized Error Handling ---
        let code = exit_code_for(&e, interrupted.load(Ordering::SeqCst));
        if code == INTERRUPTED_EXIT_CODE {
            println!("\nOperation cancelled.");
        } else {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        }
        std::process::exit(code);
    }
}

/// Maps a failed run to the process exit code.
///
/// An interruption gives 130, an executor's own non-zero exit code is passed
/// through, and everything else gives 1.
fn exit_code_for(error: &anyhow::Error, interrupted: bool) -> i32 {
    let exec_err = error.downcast_ref::<ExecutionError>();
    if interrupted || exec_err.is_some_and(ExecutionError::is_interrupted) {
        return INTERRUPTED_EXIT_CODE;
    }
    exec_err.and_then(ExecutionError::exit_code).unwrap_or(1)
}

fn run_cli(matches: &ArgMatches) -> Result<()> {
    let globals: GlobalArgs = clap::FromArgMatches::from_arg_matches(matches)?;
    let file_settings = config::load_file_settings(globals.config.as_deref())?;
    let settings = config::Settings::layer(globals.overrides(), file_settings)?;

    let root = paths::resolve_root().context("Failed to locate the repository root")?;
    log::debug!("Repository root: {}", root.display());

    let executor_dispatcher = Dispatcher::new(
        root,
        settings.interpreter.clone(),
        SystemSpawner::new(StreamPolicy::Inherit),
    );

    dispatcher::dispatch(matches, &settings, &executor_dispatcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_zero(code: i32) -> anyhow::Error {
        anyhow::Error::new(ExecutionError::NonZeroExit {
            command: "python3 run.py".to_string(),
            code,
        })
        .context("VM Migration Benchmark failed")
    }

    #[test]
    fn test_executor_exit_code_is_passed_through() {
        assert_eq!(exit_code_for(&non_zero(7), false), 7);
    }

    #[test]
    fn test_ctrl_c_during_run_gives_130() {
        // A Python executor stopped by Ctrl+C usually exits 1 with a traceback.
        assert_eq!(exit_code_for(&non_zero(1), true), INTERRUPTED_EXIT_CODE);
    }

    #[test]
    fn test_executor_killed_by_sigint_gives_130() {
        let err = anyhow::Error::new(ExecutionError::Terminated {
            command: "python3 run.py".to_string(),
            signal: Some(2),
        });
        assert_eq!(exit_code_for(&err, false), INTERRUPTED_EXIT_CODE);
    }

    #[test]
    fn test_other_failures_give_1() {
        let err = anyhow::anyhow!("Failed to locate the repository root");
        assert_eq!(exit_code_for(&err, false), 1);

        let killed = anyhow::Error::new(ExecutionError::Terminated {
            command: "python3 run.py".to_string(),
            signal: Some(9),
        });
        assert_eq!(exit_code_for(&killed, false), 1);
    }
}
