// EN: src/system/executor.rs

//! Locating, launching and awaiting workload executor scripts.

use crate::constants::BANNER_WIDTH;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

/// Signal number of SIGINT (Ctrl+C) on every Unix we run on.
const SIGINT: i32 = 2;

/// Why a workload executor did not complete successfully.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Nothing exists at the executor path. Raised before any spawn attempt.
    #[error("Executor not found: {}", .path.display())]
    ExecutorNotFound {
        /// Absolute path that was checked.
        path: PathBuf,
    },
    /// The interpreter could not be started.
    #[error("Command '{command}' could not be executed: {source}")]
    Spawn {
        /// The shell-quoted command line.
        command: String,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The executor ran and exited with a non-zero code.
    #[error("Command '{command}' exited with code {code}.")]
    NonZeroExit {
        /// The shell-quoted command line.
        command: String,
        /// The executor's exit code.
        code: i32,
    },
    /// The executor was killed by a signal.
    #[error("Command '{command}' was terminated by {}.", describe_signal(.signal))]
    Terminated {
        /// The shell-quoted command line.
        command: String,
        /// Signal number, when the platform reports one.
        signal: Option<i32>,
    },
}

fn describe_signal(signal: &Option<i32>) -> String {
    match signal {
        Some(number) => format!("signal {}", number),
        None => "an unknown signal".to_string(),
    }
}

impl ExecutionError {
    /// The executor's exit code, when it exited on its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the executor was stopped with Ctrl+C.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Terminated { signal: Some(SIGINT), .. })
    }
}

// --- Spawn abstraction ---

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamPolicy {
    /// stdin, stdout and stderr are the parent's own streams.
    #[default]
    Inherit,
    /// stdin is closed, stdout and stderr are collected and returned.
    Capture,
}

/// A fully prepared subprocess launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Interpreter to run.
    pub program: String,
    /// Script path followed by the marshalled flags.
    pub args: Vec<String>,
    /// Directory containing the script.
    pub working_dir: PathBuf,
    /// Variables added on top of the inherited environment.
    pub env_overlay: BTreeMap<String, String>,
}

impl Invocation {
    /// The invocation as a shell-quoted line that can be pasted back into a terminal.
    pub fn command_line(&self) -> String {
        let parts = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(parts.clone()).unwrap_or_else(|_| parts.collect::<Vec<_>>().join(" "))
    }
}

/// Output collected under [`StreamPolicy::Capture`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Everything written to stdout, lossily decoded.
    pub stdout: String,
    /// Everything written to stderr, lossily decoded.
    pub stderr: String,
}

/// How a finished subprocess ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Exit code, absent when the process was killed by a signal.
    pub code: Option<i32>,
    /// Terminating signal, Unix only.
    pub signal: Option<i32>,
    /// Present under [`StreamPolicy::Capture`].
    pub captured: Option<CapturedOutput>,
}

impl Outcome {
    /// A process that exited on its own with `code`.
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    fn from_status(status: ExitStatus, captured: Option<CapturedOutput>) -> Self {
        Self {
            code: status.code(),
            signal: exit_signal(status),
            captured,
        }
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

/// Starts a subprocess and blocks until it exits.
pub trait Spawner {
    /// Runs `invocation` to completion.
    fn spawn(&self, invocation: &Invocation) -> io::Result<Outcome>;
}

/// Spawns real operating-system processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner {
    streams: StreamPolicy,
}

impl SystemSpawner {
    /// A spawner wiring the child's streams according to `streams`.
    pub fn new(streams: StreamPolicy) -> Self {
        Self { streams }
    }
}

impl Spawner for SystemSpawner {
    fn spawn(&self, invocation: &Invocation) -> io::Result<Outcome> {
        let mut command = StdCommand::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(dunce::simplified(&invocation.working_dir))
            .envs(&invocation.env_overlay);

        match self.streams {
            StreamPolicy::Inherit => {
                let status = command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()?;
                Ok(Outcome::from_status(status, None))
            }
            StreamPolicy::Capture => {
                let output = command.stdin(Stdio::null()).output()?;
                let captured = CapturedOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                Ok(Outcome::from_status(output.status, Some(captured)))
            }
        }
    }
}

// --- Dispatcher ---

/// Runs a workload executor located beneath the repository root.
pub trait Dispatch {
    /// The repository root that executor and workload file paths are relative to.
    fn root(&self) -> &Path;

    /// Runs `executor` (relative to the root) with `args`, adding `extra_env`
    /// to the inherited environment. Blocks until the executor exits.
    fn dispatch(
        &self,
        executor: &str,
        args: Vec<String>,
        extra_env: &BTreeMap<String, String>,
    ) -> Result<(), ExecutionError>;
}

/// The production [`Dispatch`] implementation.
#[derive(Debug, Clone)]
pub struct Dispatcher<S: Spawner> {
    root: PathBuf,
    interpreter: String,
    spawner: S,
}

impl<S: Spawner> Dispatcher<S> {
    /// Runs executors under `root` through `interpreter`.
    pub fn new(root: impl Into<PathBuf>, interpreter: impl Into<String>, spawner: S) -> Self {
        Self {
            root: root.into(),
            interpreter: interpreter.into(),
            spawner,
        }
    }

    /// Builds the invocation for `executor` without running it.
    /// Fails when nothing exists at the executor path.
    pub fn prepare(
        &self,
        executor: &str,
        args: Vec<String>,
        extra_env: &BTreeMap<String, String>,
    ) -> Result<Invocation, ExecutionError> {
        let script_path = self.root.join(executor);
        if !script_path.exists() {
            return Err(ExecutionError::ExecutorNotFound { path: script_path });
        }

        let working_dir = script_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        let env_overlay = extra_env
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(script_path.display().to_string());
        full_args.extend(args);

        Ok(Invocation {
            program: self.interpreter.clone(),
            args: full_args,
            working_dir,
            env_overlay,
        })
    }

    /// Like [`Dispatch::dispatch`], announcing the command line on `out`
    /// before the executor is spawned.
    pub fn dispatch_to(
        &self,
        out: &mut impl Write,
        executor: &str,
        args: Vec<String>,
        extra_env: &BTreeMap<String, String>,
    ) -> Result<(), ExecutionError> {
        let invocation = self.prepare(executor, args, extra_env)?;
        let command_line = invocation.command_line();

        if let Err(e) = announce(out, &command_line) {
            log::warn!("Could not print the command line: {}", e);
        }
        log::debug!(
            "Spawning in '{}' with env overlay {:?}",
            invocation.working_dir.display(),
            invocation.env_overlay.keys().collect::<Vec<_>>()
        );

        let outcome = self
            .spawner
            .spawn(&invocation)
            .map_err(|e| ExecutionError::Spawn {
                command: command_line.clone(),
                source: e,
            })?;

        match outcome.code {
            Some(0) => Ok(()),
            Some(code) => Err(ExecutionError::NonZeroExit {
                command: command_line,
                code,
            }),
            None => Err(ExecutionError::Terminated {
                command: command_line,
                signal: outcome.signal,
            }),
        }
    }
}

impl<S: Spawner> Dispatch for Dispatcher<S> {
    fn root(&self) -> &Path {
        &self.root
    }

    fn dispatch(
        &self,
        executor: &str,
        args: Vec<String>,
        extra_env: &BTreeMap<String, String>,
    ) -> Result<(), ExecutionError> {
        self.dispatch_to(&mut io::stdout().lock(), executor, args, extra_env)
    }
}

fn announce(out: &mut impl Write, command_line: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "Running:".bold(), command_line)?;
    writeln!(out, "{}", "=".repeat(BANNER_WIDTH))?;
    out.flush()
}

// MARK: --- UNIT TESTS ---
