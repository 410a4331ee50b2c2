use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Weekday;
use tracing::{debug, info, info_span, warn};

use sales_cli::logging::redact_value;
use sales_cli::pipeline::DashboardSession;
use sales_ingest::{ColumnRange, DatasetCache, SourceKind, SourceLocator, load_profiles};
use sales_model::{DashboardOptions, FilterSelection, SalesTable, SchemaProfile};
use sales_transform::display_frame;

use crate::cli::{
    ExportArgs, RowsArgs, SelectionArgs, SourceArgs, SummaryArgs, WeekStartArg, YoyArgs,
};
use crate::types::{
    DatasetInfo, ExportOutcome, OptionsReport, RowsPreview, SummaryReport, YoyReport,
};

pub fn run_summary(args: &SummaryArgs) -> Result<SummaryReport> {
    let session = open_session(&args.source)?;
    let span = info_span!("summary", dataset = %session.table().name());
    let _guard = span.enter();
    let start = Instant::now();

    let selection = resolve_selection(&args.selection, session.table());
    let options = DashboardOptions::default()
        .with_distributor_limit(args.top_distributors)
        .with_parent_limit(args.top_parents)
        .with_week_start(week_start(args.week_start));
    let summary = session.summary(&selection, &options);
    if let Some(top) = summary.top_distributors.first() {
        debug!(
            customer = redact_value(&top.key),
            dollars = top.value,
            "top distributor"
        );
    }
    info!(
        rows = summary.totals.row_count,
        weeks = summary.weekly_sales.len(),
        duration_ms = start.elapsed().as_millis(),
        "summary computed"
    );
    Ok(SummaryReport {
        dataset: dataset_info(&session),
        selection,
        summary,
    })
}

pub fn run_options(args: &SourceArgs) -> Result<OptionsReport> {
    let session = open_session(args)?;
    Ok(OptionsReport {
        dataset: dataset_info(&session),
        options: session.filter_options(),
    })
}

pub fn run_rows(args: &RowsArgs) -> Result<RowsPreview> {
    let session = open_session(&args.source)?;
    let selection = resolve_selection(&args.selection, session.table());
    let subset = session.subset(&selection);
    let frame = display_frame(&subset, Some(args.limit)).context("build display table")?;
    Ok(RowsPreview {
        dataset: dataset_info(&session),
        matched: subset.len(),
        frame,
    })
}

pub fn run_export(args: &ExportArgs) -> Result<ExportOutcome> {
    let session = open_session(&args.source)?;
    let span = info_span!("export", dataset = %session.table().name());
    let _guard = span.enter();

    let selection = resolve_selection(&args.selection, session.table());
    let payload = session.export(&selection)?;
    if args.stdout {
        return Ok(ExportOutcome::Stdout {
            bytes: payload.bytes,
        });
    }
    let dir = args.output_dir.as_deref().unwrap_or(Path::new("."));
    let path = payload
        .write_to_dir(dir)
        .with_context(|| format!("write {}", payload.file_name))?;
    Ok(ExportOutcome::Written {
        path,
        rows: payload.rows,
    })
}

pub fn run_yoy(args: &YoyArgs) -> Result<YoyReport> {
    let session = open_session(&args.source)?;
    let comparison = session.year_over_year(args.segment.as_deref(), args.from, args.to);
    Ok(YoyReport {
        dataset: dataset_info(&session),
        comparison,
    })
}

fn open_session(args: &SourceArgs) -> Result<DashboardSession> {
    let profiles = match &args.profiles {
        Some(path) => load_profiles(path)
            .with_context(|| format!("load schema profiles from {}", path.display()))?,
        None => SchemaProfile::builtin(),
    };
    let locator = build_locator(args)?;
    DashboardSession::open(Arc::new(DatasetCache::new(profiles)), locator)
}

/// Builds the source locator from the path and reader options.
pub fn build_locator(args: &SourceArgs) -> Result<SourceLocator> {
    let path = args.source.clone();
    match SourceKind::from_extension(&path) {
        Some(SourceKind::Workbook) => {
            let columns = args
                .columns
                .as_deref()
                .map(str::parse::<ColumnRange>)
                .transpose()?;
            if args.delimiter.is_some() {
                warn!("--delimiter ignored for workbook sources");
            }
            Ok(SourceLocator::Workbook {
                path,
                sheet: args.sheet.clone(),
                columns,
                max_rows: args.max_rows,
            })
        }
        _ => {
            if args.sheet.is_some() || args.columns.is_some() || args.max_rows.is_some() {
                warn!("worksheet options ignored for delimited sources");
            }
            match args.delimiter {
                Some(delimiter) if delimiter.is_ascii() => Ok(SourceLocator::Delimited {
                    path,
                    delimiter: delimiter as u8,
                }),
                Some(delimiter) => bail!("delimiter must be a single ASCII character: {delimiter:?}"),
                None => Ok(SourceLocator::delimited(path)),
            }
        }
    }
}

/// Omitted filters select every value present; `--no-*` selects none.
pub fn resolve_selection(args: &SelectionArgs, table: &SalesTable) -> FilterSelection {
    let all = FilterSelection::all(table);
    let years = if args.no_years {
        Default::default()
    } else if args.years.is_empty() {
        all.years
    } else {
        args.years.iter().copied().collect()
    };
    let segments = if args.no_segments {
        Default::default()
    } else if args.segments.is_empty() {
        all.segments
    } else {
        args.segments.iter().cloned().collect()
    };
    FilterSelection { years, segments }
}

fn dataset_info(session: &DashboardSession) -> DatasetInfo {
    let table = session.table();
    DatasetInfo {
        dataset: table.name().to_string(),
        source: session.locator().display_name(),
        profile: table.profile().to_string(),
        rows: table.len(),
    }
}

fn week_start(arg: WeekStartArg) -> Weekday {
    match arg {
        WeekStartArg::Mon => Weekday::Mon,
        WeekStartArg::Sun => Weekday::Sun,
    }
}
