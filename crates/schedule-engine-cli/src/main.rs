//! schedule - inspect free time and friend overlaps from class schedules
//!
//! Usage:
//!   schedule week <file>        Busy/free time for every weekday
//!   schedule overlaps <file>    Where friends' free time meets yours
//!   schedule today <file>       Today's timeline from now on
//!
//! `<file>` is a JSON schedule document (see `input.rs`); `-` reads stdin.
//! Output is JSON on stdout; diagnostics go to stderr (`RUST_LOG=debug`).

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use schedule_engine::clock::MINUTES_PER_DAY;
use schedule_engine::days::WEEK;
use schedule_engine::{
    build_today, clock, compute_overlaps, count_overlaps_for_block, people_free_during,
    project_with_options, DayWindow, FreeMap, Interval, Minute, ProjectOptions, ProjectionWarning,
};
use serde::Serialize;

mod input;

use input::{Payload, ScheduleDocument};

#[derive(Parser)]
#[command(name = "schedule")]
#[command(about = "Free time, friend overlaps, and daily timelines from class schedules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print busy and free time for every weekday
    Week {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print overlaps with friends and who is free in each of your free blocks
    Overlaps {
        #[command(flatten)]
        common: CommonArgs,

        /// Only report this weekday (e.g. "mon", "Thursday")
        #[arg(long, value_parser = parse_weekday)]
        day: Option<Weekday>,
    },
    /// Print today's timeline from now until the end of the day window
    Today {
        #[command(flatten)]
        common: CommonArgs,

        /// Current instant as RFC 3339 (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,

        /// IANA timezone used to find the local weekday and time
        #[arg(long, default_value = "UTC")]
        tz: String,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Schedule document (JSON), or "-" for stdin
    file: PathBuf,

    /// Start of the day window (e.g. "6:00", "7 AM"); overrides the document
    #[arg(long, value_parser = parse_clock)]
    window_start: Option<Minute>,

    /// End of the day window (e.g. "23:00", "10 PM", "24:00"); overrides the document
    #[arg(long, value_parser = parse_window_end)]
    window_end: Option<Minute>,

    /// Warn about characters in day patterns that name no weekday
    #[arg(long)]
    report_unknown_days: bool,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn parse_clock(s: &str) -> std::result::Result<Minute, String> {
    clock::parse_time(s).map_err(|e| e.to_string())
}

/// Like [`parse_clock`], but also takes `24:00` for a window that runs to midnight.
fn parse_window_end(s: &str) -> std::result::Result<Minute, String> {
    match s.trim() {
        "24" | "24:00" => Ok(MINUTES_PER_DAY),
        _ => parse_clock(s),
    }
}

fn parse_weekday(s: &str) -> std::result::Result<Weekday, String> {
    s.parse::<Weekday>()
        .map_err(|_| format!("unknown weekday '{s}'"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Week { common } => cmd_week(&common),
        Commands::Overlaps { common, day } => cmd_overlaps(&common, day),
        Commands::Today { common, now, tz } => cmd_today(&common, now.as_deref(), &tz),
    }
}

// ── Shared setup ────────────────────────────────────────────────────────────

struct Loaded {
    doc: ScheduleDocument,
    options: ProjectOptions,
}

fn load(common: &CommonArgs) -> Result<Loaded> {
    let doc = input::load(&common.file)?;
    let base = doc.window.unwrap_or_default();
    let window = DayWindow::new(
        common.window_start.unwrap_or(base.start()),
        common.window_end.unwrap_or(base.end()),
    )?;
    let options = ProjectOptions {
        window,
        report_unknown_day_tokens: common.report_unknown_days,
    };
    Ok(Loaded { doc, options })
}

fn report_warnings(who: &str, warnings: &[ProjectionWarning]) {
    let skipped = warnings
        .iter()
        .filter(|w| matches!(w, ProjectionWarning::SkippedEntry { .. }))
        .count();
    if skipped > 0 {
        tracing::warn!("{who}: {skipped} schedule item(s) could not be read");
    }
    for warning in warnings {
        tracing::debug!("{who}: {warning}");
    }
}

/// Free maps for every friend, keyed by name, plus their projection warnings.
fn friend_free_maps(
    loaded: &Loaded,
) -> (Vec<&str>, Vec<FreeMap>, BTreeMap<&str, Vec<ProjectionWarning>>) {
    let mut names = Vec::with_capacity(loaded.doc.friends.len());
    let mut maps = Vec::with_capacity(loaded.doc.friends.len());
    let mut warnings = BTreeMap::new();

    for (name, meetings) in &loaded.doc.friends {
        let projection = project_with_options(meetings, &loaded.options);
        report_warnings(name, &projection.warnings);
        names.push(name.as_str());
        maps.push(projection.week.free_map());
        if !projection.warnings.is_empty() {
            warnings.insert(name.as_str(), projection.warnings);
        }
    }

    (names, maps, warnings)
}

fn emit<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}

// ── week ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WeekReport<'a> {
    window: DayWindow,
    schedule: &'a schedule_engine::WeekSchedule,
    warnings: &'a [ProjectionWarning],
}

fn cmd_week(common: &CommonArgs) -> Result<()> {
    let loaded = load(common)?;
    let projection = project_with_options(&loaded.doc.me, &loaded.options);
    report_warnings("me", &projection.warnings);

    emit(
        &WeekReport {
            window: loaded.options.window,
            schedule: &projection.week,
            warnings: &projection.warnings,
        },
        common.compact,
    )
}

// ── overlaps ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct BlockReport<'a> {
    label: String,
    #[serde(flatten)]
    interval: Interval,
    overlap_count: usize,
    free_friends: Vec<&'a str>,
}

#[derive(Serialize)]
struct DayBlocks<'a> {
    day: Weekday,
    blocks: Vec<BlockReport<'a>>,
}

#[derive(Serialize)]
struct OverlapReport<'a> {
    overlaps: schedule_engine::WeekIntervals,
    days: Vec<DayBlocks<'a>>,
    warnings: BTreeMap<&'a str, Vec<ProjectionWarning>>,
}

fn cmd_overlaps(common: &CommonArgs, only: Option<Weekday>) -> Result<()> {
    let loaded = load(common)?;
    let mine = project_with_options(&loaded.doc.me, &loaded.options);
    report_warnings("me", &mine.warnings);
    let (names, others, mut warnings) = friend_free_maps(&loaded);

    let my_free = mine.week.free_map();
    let overlaps = compute_overlaps(&my_free, &others);

    let mut days = Vec::new();
    for day in WEEK {
        if only.is_some_and(|d| d != day) {
            continue;
        }
        let blocks = my_free
            .day(day)
            .iter()
            .map(|&block| {
                let free_friends: Vec<&str> = people_free_during(block, day, &others)
                    .into_iter()
                    .map(|i| names[i])
                    .collect();
                BlockReport {
                    label: clock::format_range(block),
                    interval: block,
                    overlap_count: count_overlaps_for_block(block, day, &others),
                    free_friends,
                }
            })
            .collect();
        days.push(DayBlocks { day, blocks });
    }

    if !mine.warnings.is_empty() {
        warnings.insert("me", mine.warnings.clone());
    }

    emit(
        &OverlapReport {
            overlaps,
            days,
            warnings,
        },
        common.compact,
    )
}

// ── today ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TodayReport<'a> {
    day: Weekday,
    now: String,
    timeline: Vec<schedule_engine::TimelineEntry<'a, Payload>>,
}

fn cmd_today(common: &CommonArgs, now: Option<&str>, tz: &str) -> Result<()> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow!("Invalid timezone: '{tz}'"))?;
    let instant = match now {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("Invalid --now datetime: '{s}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let local = instant.with_timezone(&tz).naive_local();

    let loaded = load(common)?;
    let mine = project_with_options(&loaded.doc.me, &loaded.options);
    report_warnings("me", &mine.warnings);
    let (_, others, _) = friend_free_maps(&loaded);

    let timeline = build_today(&mine, &others, local);
    tracing::debug!(entries = timeline.len(), "built timeline");

    emit(
        &TodayReport {
            day: local.weekday(),
            now: clock::format_time(clock::minute_of(&local.time())),
            timeline,
        },
        common.compact,
    )
}
