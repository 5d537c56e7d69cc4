//! Patient record reconciliation CLI.

use clap::{ColorChoice, Parser};
use recon_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::run_reconcile;
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Reconcile(args) => match run_reconcile(&args) {
            Ok(result) => {
                print_summary(&result);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["recon"];
        full.extend_from_slice(args);
        full.extend_from_slice(&[
            "reconcile",
            "epic",
            "--target",
            "registry.csv",
            "--mapping",
            "mapping.csv",
            "--cross-reference",
            "id_log.csv",
        ]);
        Cli::try_parse_from(full).expect("parse cli")
    }

    fn try_parse_reconcile(extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut full = vec![
            "recon",
            "reconcile",
            "epic",
            "--target",
            "registry.csv",
            "--mapping",
            "mapping.csv",
            "--cross-reference",
            "id_log.csv",
        ];
        full.extend_from_slice(extra);
        Cli::try_parse_from(full)
    }

    #[test]
    fn default_level_is_warn_with_env_override_allowed() {
        let config = log_config_from_cli(&parse(&[]));
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
    }

    #[test]
    fn verbosity_flags_disable_env_override() {
        let config = log_config_from_cli(&parse(&["-vv"]));
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn explicit_level_beats_verbosity() {
        let config = log_config_from_cli(&parse(&["-v", "--log-level", "trace"]));
        assert_eq!(config.level_filter, LevelFilter::TRACE);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn month_flags_reject_out_of_range_values() {
        assert!(try_parse_reconcile(&["--month-start", "0"]).is_err());
        assert!(try_parse_reconcile(&["--month-end", "13"]).is_err());
        assert!(try_parse_reconcile(&["--month-start", "1", "--month-end", "12"]).is_ok());
    }

    #[test]
    fn inverted_month_range_is_rejected() {
        let cli = try_parse_reconcile(&["--month-start", "9", "--month-end", "4"]).expect("parse");
        let Command::Reconcile(args) = cli.command;
        let error = run_reconcile(&args).expect_err("must fail");
        assert!(error.to_string().contains("month range"));
    }

    #[test]
    fn log_format_and_file_are_carried_over() {
        let config = log_config_from_cli(&parse(&["--log-format", "json", "--log-file", "run.log"]));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file.as_deref(), Some(std::path::Path::new("run.log")));
    }
}
