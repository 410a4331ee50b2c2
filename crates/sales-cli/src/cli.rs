//! CLI argument definitions for the sales dashboard.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sales-dashboard",
    version,
    about = "Sales dashboard - KPIs, segment and distributor breakdowns from sales exports",
    long_about = "Load a sales workbook sheet or delimited export, filter it by year and\n\
                  market segment, and report KPI totals, weekly sales and top\n\
                  distributors. Filtered rows can be exported as <dataset>_output.csv."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v info, -vv debug, -vvv trace, -q errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow customer names and other row-level values in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print KPI totals and the dashboard breakdowns for a selection.
    Summary(SummaryArgs),

    /// List the years and market segments available for filtering.
    Options(SourceArgs),

    /// Preview the filtered rows in display column order.
    Rows(RowsArgs),

    /// Write the filtered rows to <dataset>_output.csv.
    Export(ExportArgs),

    /// Compare dollar totals between two years.
    Yoy(YoyArgs),
}

/// Where the dataset comes from.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Workbook (.xlsx, .xlsm, .xlsb, .xls, .ods) or delimited file (.csv, .tsv, .txt).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Worksheet to read (default: first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Worksheet column range, e.g. A:AH.
    #[arg(long = "columns", value_name = "RANGE")]
    pub columns: Option<String>,

    /// Maximum number of data rows to read from a worksheet.
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,

    /// Field delimiter for delimited files (default: tab for .tsv, comma otherwise).
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// JSON file with additional schema profiles.
    #[arg(long = "profiles", value_name = "FILE")]
    pub profiles: Option<PathBuf>,
}

/// Year and segment filters. Omitted filters select every value present.
#[derive(Args, Clone, Default)]
pub struct SelectionArgs {
    /// Invoice year to include (repeatable).
    #[arg(long = "year", value_name = "YEAR", conflicts_with = "no_years")]
    pub years: Vec<i32>,

    /// Market segment to include (repeatable).
    #[arg(long = "segment", value_name = "SEGMENT", conflicts_with = "no_segments")]
    pub segments: Vec<String>,

    /// Select no years (empty result).
    #[arg(long = "no-years")]
    pub no_years: bool,

    /// Select no segments (empty result).
    #[arg(long = "no-segments")]
    pub no_segments: bool,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: SummaryFormatArg,

    /// Number of distributors in the top distributors table.
    #[arg(long = "top-distributors", value_name = "N", default_value_t = 20)]
    pub top_distributors: usize,

    /// Number of parent and segment pairs in the top parents table.
    #[arg(long = "top-parents", value_name = "N", default_value_t = 15)]
    pub top_parents: usize,

    /// First day of the week for weekly sales.
    #[arg(long = "week-start", value_enum, default_value = "mon")]
    pub week_start: WeekStartArg,
}

#[derive(Args)]
pub struct RowsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Maximum number of rows to print.
    #[arg(long = "limit", value_name = "N", default_value_t = 25)]
    pub limit: usize,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Directory for the export file (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR", conflicts_with = "stdout")]
    pub output_dir: Option<PathBuf>,

    /// Write the CSV to stdout instead of a file.
    #[arg(long = "stdout")]
    pub stdout: bool,
}

#[derive(Args)]
pub struct YoyArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Restrict the comparison to one market segment.
    #[arg(long = "segment", value_name = "SEGMENT")]
    pub segment: Option<String>,

    /// Prior year.
    #[arg(long = "from", value_name = "YEAR")]
    pub from: i32,

    /// Current year.
    #[arg(long = "to", value_name = "YEAR")]
    pub to: i32,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SummaryFormatArg {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WeekStartArg {
    Mon,
    Sun,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
