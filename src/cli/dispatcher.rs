//! Routes a parsed command line to its workload and hands the result to a [`Dispatch`].

use anyhow::{Context, Result, anyhow};
use clap::{ArgMatches, FromArgMatches};
use std::ffi::OsString;

use crate::{
    cli::{GlobalArgs, args, build_cli, print_banner},
    config::{FileSettings, Settings},
    core::marshal::marshal,
    models::WorkloadDescriptor,
    system::executor::Dispatch,
    workloads::find_workload,
};

/// Resolves the effective settings from parsed global options and the settings file.
pub fn settings_from_matches(matches: &ArgMatches, file: FileSettings) -> Result<Settings> {
    let globals = GlobalArgs::from_arg_matches(matches)?;
    Ok(Settings::layer(globals.overrides(), file)?)
}

/// Routes parsed arguments to the selected workload.
pub fn dispatch(
    matches: &ArgMatches,
    settings: &Settings,
    dispatcher: &impl Dispatch,
) -> Result<()> {
    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("No workload specified. Run 'virtbench --help' for the list."))?;
    let workload =
        find_workload(name).ok_or_else(|| anyhow!("Unknown workload '{}'.", name))?;

    run_workload(workload, sub_matches, settings, dispatcher)
}

/// Runs one workload: builds its configuration, marshals it and hands it to the dispatcher.
///
/// Repository files named by the workload's flags are resolved against the
/// dispatcher's root and checked before anything is printed or spawned.
pub fn run_workload(
    workload: &WorkloadDescriptor,
    matches: &ArgMatches,
    settings: &Settings,
    dispatcher: &impl Dispatch,
) -> Result<()> {
    let mut config = args::config_from_matches(workload, matches, settings)
        .with_context(|| format!("Failed to read options for '{}'", workload.name))?;
    args::resolve_repo_files(workload, &mut config, dispatcher.root())?;
    log::debug!("Configuration for '{}': {:?}", workload.name, config);

    let executor_args = marshal(&config);

    print_banner(workload.banner);

    dispatcher
        .dispatch(workload.executor, executor_args, &settings.extra_env())
        .with_context(|| format!("{} failed", workload.banner))
}

/// Parses `argv` and runs the selected workload.
///
/// Usage errors (such as a missing required flag) are returned before the
/// dispatcher is touched.
pub fn run_from<I, T>(argv: I, file: FileSettings, dispatcher: &impl Dispatch) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli().try_get_matches_from(argv)?;
    let settings = settings_from_matches(&matches, file)?;
    dispatch(&matches, &settings, dispatcher)
}
