//! Command handlers for Country Registry CLI
//!
//! This module implements the one-shot command handlers that coordinate
//! between CLI arguments and the record engine. Handlers write to any
//! `Write` so they can be exercised against in-memory buffers.

use std::io::Write;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::{
    filter_by_continent, filter_by_range, parse_integer, sort, summary, AutoSave, MatchMode,
    NumericField, RawRecord, Record, Session, SkipReason,
};
use crate::cli::display::Renderer;
use crate::cli::{
    AddArgs, ConfigAction, ConfigArgs, FilterArgs, FilterTarget, SearchArgs, SortArgs, StatsArgs,
    UpdateArgs,
};
use crate::config::AppConfig;
use crate::errors::{AppError, Result, ValidationError};

/// Create a session and load the configured data file
pub fn open_session(config: &AppConfig) -> Result<Session> {
    let mut session = Session::new(config.data.auto_save);
    let summary = session.load(&config.data.path)?;
    if summary.rejected_count() > 0 {
        warn!(
            "{} rows in {} were rejected",
            summary.rejected_count(),
            config.data.path.display()
        );
    }
    debug!("Session ready with {} records", summary.accepted);
    Ok(session)
}

/// Handle the count command
pub fn handle_count<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    writeln!(out, "{}", session.store().count())?;
    Ok(())
}

/// Handle the search command
pub fn handle_search<W: Write>(
    session: &Session,
    args: &SearchArgs,
    renderer: &Renderer,
    out: &mut W,
) -> Result<()> {
    let mode = if args.exact {
        MatchMode::Exact
    } else {
        MatchMode::Partial
    };
    let results = session.store().find_by_name(&args.query, mode);
    info!("Search '{}' ({:?}) matched {}", args.query, mode, results.len());
    print_records(&results, args.json, renderer, out)
}

/// Handle the filter command
pub fn handle_filter<W: Write>(
    session: &Session,
    args: &FilterArgs,
    renderer: &Renderer,
    out: &mut W,
) -> Result<()> {
    let store = session.store();
    let results = match &args.target {
        FilterTarget::Continent { value } => filter_by_continent(store, value),
        FilterTarget::Population { range } => {
            filter_by_range(store, NumericField::Population, *range)
        }
        FilterTarget::Area { range } => filter_by_range(store, NumericField::Area, *range),
    };
    print_records(&results, args.json, renderer, out)
}

/// Handle the sort command
pub fn handle_sort<W: Write>(
    session: &Session,
    args: &SortArgs,
    renderer: &Renderer,
    out: &mut W,
) -> Result<()> {
    let sorted = sort(session.store(), args.field, args.desc);
    print_records(&sorted, args.json, renderer, out)
}

/// Handle the stats command
pub fn handle_stats<W: Write>(
    session: &Session,
    args: &StatsArgs,
    renderer: &Renderer,
    out: &mut W,
) -> Result<()> {
    let Some(stats) = summary(session.store()) else {
        writeln!(out, "No records loaded.")?;
        return Ok(());
    };

    if args.json {
        write_json(out, &stats)?;
    } else {
        renderer.write_summary(out, &stats)?;
    }
    Ok(())
}

/// Handle the add command
pub fn handle_add<W: Write>(session: &mut Session, args: &AddArgs, out: &mut W) -> Result<()> {
    let raw = RawRecord::new(
        args.name.as_str(),
        args.population.as_str(),
        args.area.as_str(),
        args.continent.as_str(),
    );
    let outcome = session.add(&raw)?;
    writeln!(out, "Added {} ({})", args.name.trim(), args.continent.trim())?;
    report_auto_save(outcome, out)
}

/// Handle the update command
pub fn handle_update<W: Write>(
    session: &mut Session,
    args: &UpdateArgs,
    renderer: &Renderer,
    out: &mut W,
) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let population = args.population.as_deref().map(parse_field).transpose()?;
    let area = args.area.as_deref().map(parse_field).transpose()?;

    let index = session.resolve_single(&args.name)?;
    let outcome = session.update(index, population, area)?;
    if let Some(record) = session.record(index) {
        writeln!(out, "Updated:")?;
        writeln!(out, "{}", renderer.record_line(record))?;
    }
    report_auto_save(outcome, out)
}

/// Handle the config command
pub fn handle_config<W: Write>(args: &ConfigArgs, config: &AppConfig, out: &mut W) -> Result<()> {
    match args.action {
        ConfigAction::Init { force } => {
            let (path, written) = AppConfig::initialize(force)?;
            if written {
                writeln!(out, "Wrote default configuration to {}", path.display())?;
            } else {
                writeln!(
                    out,
                    "Configuration already exists at {} (use --force to overwrite)",
                    path.display()
                )?;
            }
        }
        ConfigAction::Show => {
            write!(out, "{}", config.to_toml()?)?;
        }
    }
    Ok(())
}

fn parse_field(text: &str) -> Result<i64> {
    parse_integer(text).ok_or_else(|| ValidationError::NotNumeric.into())
}

fn print_records<W: Write>(
    records: &[&Record],
    json: bool,
    renderer: &Renderer,
    out: &mut W,
) -> Result<()> {
    if json {
        return write_json(out, &records);
    }
    if records.is_empty() {
        writeln!(out, "No matching countries.")?;
        return Ok(());
    }
    writeln!(out, "{} result(s):", records.len())?;
    renderer.write_records(out, records)?;
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn report_auto_save<W: Write>(outcome: AutoSave, out: &mut W) -> Result<()> {
    match outcome {
        AutoSave::Saved(path) => {
            writeln!(out, "Saved to {}", path.display())?;
            Ok(())
        }
        AutoSave::Skipped(SkipReason::Disabled) => {
            writeln!(out, "Auto-save is disabled; the data file was not changed.")?;
            Ok(())
        }
        AutoSave::Skipped(SkipReason::NoSource) => {
            writeln!(out, "No data file associated; nothing was saved.")?;
            Ok(())
        }
        AutoSave::Failed(e) => Err(e.into()),
    }
}
