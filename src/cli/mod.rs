//! The `virtbench` command line: the clap tree, workload routing and banners.

use crate::constants::BANNER_WIDTH;
use crate::workloads::WORKLOADS;
use clap::{Args, Command, crate_version};
use colored::Colorize;
use std::io::{self, Write};

pub mod args;
pub mod dispatcher;

pub use args::GlobalArgs;

/// Builds the full `virtbench` command tree: global options plus one
/// subcommand per registered workload.
pub fn build_cli() -> Command {
    let root = Command::new("virtbench")
        .version(crate_version!())
        .about("KubeVirt Benchmark Suite - performance testing toolkit for KubeVirt VMs")
        .long_about(
            "KubeVirt Benchmark Suite - performance testing toolkit for KubeVirt VMs.\n\n\
             Each subcommand runs one benchmark workload. The measurement itself is done \
             by the workload's script, which receives the options below as command-line flags.",
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .disable_help_subcommand(true)
        .styles(
            clap::builder::Styles::styled()
                .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
                .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
                .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
                .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
        );

    WORKLOADS
        .iter()
        .fold(GlobalArgs::augment_args(root), |cli, workload| {
            cli.subcommand(args::workload_command(workload))
        })
}

/// Prints a workload title between two `=` rules on stdout.
pub fn print_banner(title: &str) {
    if let Err(e) = write_banner(&mut io::stdout().lock(), title) {
        log::warn!("Could not print the banner: {}", e);
    }
}

/// Writes a workload title between two `=` rules, padded by blank lines.
pub fn write_banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "  {}", title.bold())?;
    writeln!(out, "{}", rule)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_every_workload_is_a_subcommand() {
        let cli = build_cli();
        for workload in WORKLOADS {
            assert!(cli.find_subcommand(workload.name).is_some(), "{}", workload.name);
        }
    }

    #[test]
    fn test_missing_required_flag_is_a_usage_error() {
        let err = build_cli()
            .try_get_matches_from(["virtbench", "datasource-clone", "--vms", "3"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults_are_applied() {
        let matches = build_cli()
            .try_get_matches_from(["virtbench", "migration", "--storage-class", "sc"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "migration");
        assert_eq!(sub.get_one::<i64>("namespaces"), Some(&10));
        assert_eq!(sub.get_one::<String>("namespace-prefix").map(String::as_str), Some("migration-test"));
        assert_eq!(sub.get_one::<String>("source-node"), None);
        assert!(!sub.get_flag("cleanup"));
    }

    #[test]
    fn test_global_flags_accepted_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from([
                "virtbench",
                "capacity-benchmark",
                "--storage-class",
                "sc",
                "--log-level",
                "debug",
                "--log-file",
                "capacity.log",
            ])
            .unwrap();
        let globals = <GlobalArgs as clap::FromArgMatches>::from_arg_matches(&matches).unwrap();
        assert_eq!(globals.log_level.as_deref(), Some("debug"));
        assert_eq!(globals.log_file.as_deref(), Some("capacity.log"));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let err = build_cli()
            .try_get_matches_from(["virtbench", "--log-level", "chatty", "migration", "--storage-class", "sc"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_banner_layout() {
        let mut out = Vec::new();
        write_banner(&mut out, "VM Migration Benchmark").unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        let rule = "=".repeat(BANNER_WIDTH);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines.first(), Some(&""));
        assert_eq!(lines.get(1), Some(&rule.as_str()));
        assert!(lines.get(2).is_some_and(|l| l.starts_with("  ") && l.contains("VM Migration Benchmark")));
        assert_eq!(lines.get(3), Some(&rule.as_str()));
        assert_eq!(lines.get(4), Some(&""));
    }

    #[test]
    fn test_non_numeric_integer_is_rejected() {
        let err = build_cli()
            .try_get_matches_from(["virtbench", "datasource-clone", "--storage-class", "sc", "--vms", "many"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
