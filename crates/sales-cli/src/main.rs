//! Sales dashboard CLI.

use clap::{ColorChoice, Parser};
use sales_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal, Write};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, SummaryFormatArg};
use crate::commands::{run_export, run_options, run_rows, run_summary, run_yoy};
use crate::summary::{print_export, print_options, print_rows, print_summary, print_yoy};
use crate::types::ExportOutcome;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match cli.command {
        Command::Summary(args) => run_summary(&args).and_then(|report| match args.format {
            SummaryFormatArg::Table => {
                print_summary(&report);
                Ok(())
            }
            SummaryFormatArg::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(())
            }
        }),
        Command::Options(args) => run_options(&args).map(|report| print_options(&report)),
        Command::Rows(args) => run_rows(&args).map(|preview| print_rows(&preview)),
        Command::Export(args) => run_export(&args).and_then(|outcome| {
            if let ExportOutcome::Stdout { bytes } = &outcome {
                io::stdout().lock().write_all(bytes)?;
            }
            print_export(&outcome);
            Ok(())
        }),
        Command::Yoy(args) => run_yoy(&args).map(|report| print_yoy(&report)),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level_filter(level_filter)
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_format(format)
        .with_ansi(with_ansi)
        .with_timestamps(cli.log_file.is_some())
        .with_target(level_filter >= LevelFilter::DEBUG)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data)
}
