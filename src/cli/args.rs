// EN: src/cli/args.rs

//! Global options and the translation between workload descriptors and clap.

use crate::config::{Overrides, Settings};
use crate::constants::{CONFIG_PATH_ENV, INTERPRETER_ENV, LOG_LEVELS};
use crate::core::log_name::make_log_name;
use crate::core::paths::{PathError, resolve_repo_file};
use crate::models::{ConfigMap, ConfigValue, FlagKind, FlagSpec, WorkloadDescriptor};
use clap::builder::PossibleValuesParser;
use clap::parser::MatchesError;
use clap::{Arg, ArgAction, ArgMatches, Args, Command, value_parser};
use std::path::{Path, PathBuf};

/// Options accepted before or after any workload subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Log level forwarded to the benchmark script.
    #[arg(
        long,
        global = true,
        ignore_case = true,
        value_name = "LEVEL",
        value_parser = PossibleValuesParser::new(LOG_LEVELS.iter().copied())
    )]
    pub log_level: Option<String>,

    /// Log file name for the benchmark script. Generated from the workload name if omitted.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<String>,

    /// Path to the kubeconfig file used for cluster access.
    #[arg(long, global = true, value_name = "PATH")]
    pub kubeconfig: Option<String>,

    /// Interpreter used to run benchmark scripts [default: python3].
    #[arg(long, global = true, env = INTERPRETER_ENV, value_name = "PROGRAM")]
    pub python: Option<String>,

    /// Settings file [default: <config dir>/virtbench/config.toml].
    #[arg(long, global = true, env = CONFIG_PATH_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// The subset of options that feed [`crate::config::Settings`].
    pub fn overrides(&self) -> Overrides {
        Overrides {
            python: self.python.clone(),
            kubeconfig: self.kubeconfig.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

/// Builds the clap subcommand for a workload from its descriptor.
pub fn workload_command(workload: &'static WorkloadDescriptor) -> Command {
    let mut command = Command::new(workload.name)
        .about(workload.about)
        .long_about(workload.long_about)
        .after_help(workload.examples);

    for (heading, spec) in workload.flags() {
        command = command.arg(flag_arg(spec, heading, workload.is_required(spec.name)));
    }
    command
}

fn flag_arg(spec: &'static FlagSpec, heading: &'static str, required: bool) -> Arg {
    let mut arg = Arg::new(spec.name)
        .long(spec.name)
        .help(spec.help)
        .help_heading(heading)
        .required(required);

    if let Some(short) = spec.short {
        arg = arg.short(short);
    }

    match spec.kind {
        FlagKind::Text(default) => {
            arg = arg.action(ArgAction::Set).value_name("TEXT");
            if let Some(default) = default {
                arg = arg.default_value(default);
            }
            arg
        }
        FlagKind::Integer(default) => arg
            .action(ArgAction::Set)
            .value_name("N")
            .value_parser(value_parser!(i64))
            .default_value(default.to_string()),
        FlagKind::Boolean => arg.action(ArgAction::SetTrue),
        FlagKind::TextList => arg.action(ArgAction::Append).value_name("TEXT"),
        FlagKind::RepoFile { default, .. } => arg
            .action(ArgAction::Set)
            .value_name("PATH")
            .default_value(default),
    }
}

/// Assembles the configuration map for one run of `workload`.
///
/// Contains every declared flag that has a value, plus `log-level` and
/// `log-file`. An explicit log file wins over the generated one.
pub fn config_from_matches(
    workload: &WorkloadDescriptor,
    matches: &ArgMatches,
    settings: &Settings,
) -> Result<ConfigMap, MatchesError> {
    let mut config = ConfigMap::new();

    for (_, spec) in workload.flags() {
        let name = spec.name;
        match spec.kind {
            FlagKind::Text(_) | FlagKind::RepoFile { .. } => {
                if let Some(value) = matches.try_get_one::<String>(name)? {
                    config.insert(name, value.clone());
                }
            }
            FlagKind::Integer(_) => {
                if let Some(value) = matches.try_get_one::<i64>(name)? {
                    config.insert(name, *value);
                }
            }
            FlagKind::Boolean => {
                let enabled = matches.try_get_one::<bool>(name)?.copied().unwrap_or(false);
                config.insert(name, enabled);
            }
            FlagKind::TextList => {
                let items: Vec<String> = matches
                    .try_get_many::<String>(name)?
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
                config.insert(name, items);
            }
        }
    }

    config.insert("log-level", settings.log_level.clone());
    let log_file = settings
        .log_file
        .clone()
        .unwrap_or_else(|| make_log_name(workload.log_prefix));
    config.insert("log-file", log_file);

    Ok(config)
}

/// Rewrites every repository-file flag of `workload` to an absolute path
/// under `root`, and fails if a file that is needed does not exist.
pub fn resolve_repo_files(
    workload: &WorkloadDescriptor,
    config: &mut ConfigMap,
    root: &Path,
) -> Result<(), PathError> {
    for (_, spec) in workload.flags() {
        let FlagKind::RepoFile { checked_when, .. } = spec.kind else {
            continue;
        };
        let Some(ConfigValue::Text(value)) = config.get(spec.name) else {
            continue;
        };

        let path = resolve_repo_file(root, value);
        let needed = checked_when.is_none_or(|switch| config.is_enabled(switch));
        if needed && !path.is_file() {
            return Err(PathError::FileNotFound {
                flag: spec.name.to_string(),
                path,
            });
        }
        config.insert(spec.name, path.display().to_string());
    }
    Ok(())
}
