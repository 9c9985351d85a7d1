//! Project a person's meeting list onto the week: busy and free time per day.
//!
//! Projection is partial-failure tolerant. A meeting whose time range cannot
//! be read is dropped and reported as a [`ProjectionWarning`]; the rest of the
//! schedule is still projected. Only an invalid [`DayWindow`] is fatal, and
//! that is rejected when the window is built, before any projection runs.

use chrono::Weekday;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::clock::{self, Minute, MINUTES_PER_DAY};
use crate::days::{self, weekday_index, WEEK};
use crate::error::{ProjectionWarning, ScheduleError};
use crate::interval::{self, Interval};
use crate::overlap::FreeMap;

// ── Inputs ──────────────────────────────────────────────────────────────────

/// One recurring meeting as read from an external schedule source.
///
/// `payload` carries whatever the caller attaches (course name, room,
/// instructor) and is handed back untouched in timelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingEntry<P> {
    /// Compact weekday pattern, e.g. `"MWF"` or `"TTh"`.
    pub day_pattern: String,
    /// Time range, e.g. `"8:00-8:50"` or `"2:00 PM - 3:15 PM"`.
    pub time_range: String,
    #[serde(flatten)]
    pub payload: P,
}

impl<P> MeetingEntry<P> {
    pub fn new(day_pattern: impl Into<String>, time_range: impl Into<String>, payload: P) -> Self {
        Self {
            day_pattern: day_pattern.into(),
            time_range: time_range.into(),
            payload,
        }
    }
}

/// The part of the day considered for scheduling, `[start, end]` in minutes.
///
/// Always satisfies `start < end <= 1440`; the constructor and the serde
/// impl both enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDayWindow")]
pub struct DayWindow {
    start: Minute,
    end: Minute,
}

#[derive(Deserialize)]
struct RawDayWindow {
    start: Minute,
    end: Minute,
}

impl TryFrom<RawDayWindow> for DayWindow {
    type Error = ScheduleError;

    fn try_from(raw: RawDayWindow) -> Result<Self, Self::Error> {
        DayWindow::new(raw.start, raw.end)
    }
}

impl DayWindow {
    /// 6:00 AM.
    pub const DEFAULT_START: Minute = 6 * 60;
    /// 11:00 PM.
    pub const DEFAULT_END: Minute = 23 * 60;

    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidWindow`] if `start >= end` or `end`
    /// lies past midnight.
    pub fn new(start: Minute, end: Minute) -> Result<Self, ScheduleError> {
        if start >= end {
            return Err(ScheduleError::InvalidWindow(format!(
                "start {start} is not before end {end}"
            )));
        }
        if end > MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidWindow(format!(
                "end {end} is past midnight ({MINUTES_PER_DAY})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Minute {
        self.start
    }

    pub fn end(&self) -> Minute {
        self.end
    }

    /// The whole window as a single interval.
    pub fn as_interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }
}

impl Default for DayWindow {
    fn default() -> Self {
        Self {
            start: Self::DEFAULT_START,
            end: Self::DEFAULT_END,
        }
    }
}

/// Options for [`project_with_options`].
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub window: DayWindow,
    /// Report characters in day patterns that name no weekday as
    /// [`ProjectionWarning::UnrecognizedDayToken`]. Off by default; such
    /// characters are always skipped either way.
    pub report_unknown_day_tokens: bool,
}

// ── Outputs ─────────────────────────────────────────────────────────────────

/// Busy and free time for one weekday.
///
/// `busy` is sorted by start and may contain overlapping meetings; `free` is
/// its exact complement within the day window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub busy: Vec<Interval>,
    pub free: Vec<Interval>,
}

impl DaySchedule {
    /// Build a day from unsorted busy intervals already clipped to `window`.
    pub fn from_busy(busy: &[Interval], window: &DayWindow) -> Self {
        let busy = interval::sort_by_start(busy);
        let free = interval::complement(&busy, window.start, window.end);
        Self { busy, free }
    }
}

/// A [`DaySchedule`] for each day of the week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekSchedule {
    days: [DaySchedule; 7],
}

impl WeekSchedule {
    pub fn day(&self, day: Weekday) -> &DaySchedule {
        &self.days[weekday_index(day)]
    }

    /// Days in Sunday-first order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        WEEK.into_iter().zip(self.days.iter())
    }

    /// The free intervals of every day, detached from the busy side.
    pub fn free_map(&self) -> FreeMap {
        FreeMap::from_days(self.days.each_ref().map(|d| d.free.clone()))
    }
}

impl Serialize for WeekSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, schedule) in self.iter() {
            map.serialize_entry(&day, schedule)?;
        }
        map.end()
    }
}

/// A busy interval paired with the payload of the meeting that produced it.
#[derive(Debug, Serialize)]
pub struct BusySlot<'a, P> {
    pub interval: Interval,
    pub payload: &'a P,
}

impl<P> Clone for BusySlot<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for BusySlot<'_, P> {}

/// Everything [`project`] derives from one person's meeting list.
#[derive(Debug)]
pub struct Projection<'a, P> {
    pub week: WeekSchedule,
    /// Entries that were dropped or partly ignored, in input order.
    pub warnings: Vec<ProjectionWarning>,
    slots: [Vec<BusySlot<'a, P>>; 7],
}

impl<'a, P> Projection<'a, P> {
    /// The day's busy intervals with their originating payloads, sorted by start.
    pub fn busy_slots(&self, day: Weekday) -> &[BusySlot<'a, P>] {
        &self.slots[weekday_index(day)]
    }
}

// ── project ─────────────────────────────────────────────────────────────────

/// Project meetings onto the week using `window` and default options.
pub fn project<'a, P>(entries: &'a [MeetingEntry<P>], window: &DayWindow) -> Projection<'a, P> {
    project_with_options(
        entries,
        &ProjectOptions {
            window: *window,
            ..ProjectOptions::default()
        },
    )
}

/// Project meetings onto the week.
///
/// For each entry the day pattern and time range are decoded, the range is
/// clipped to the window, and the result is added to each named day's busy
/// list. Meetings that fall entirely outside the window vanish without a
/// warning; meetings with an unreadable range are reported. Every day's free
/// list is then the complement of its busy list.
pub fn project_with_options<'a, P>(
    entries: &'a [MeetingEntry<P>],
    options: &ProjectOptions,
) -> Projection<'a, P> {
    let window = options.window;
    let mut slots: [Vec<BusySlot<'a, P>>; 7] = Default::default();
    let mut warnings = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let decoded = days::decode_with_unknown(&entry.day_pattern);
        if options.report_unknown_day_tokens {
            for token in &decoded.unrecognized {
                tracing::debug!(entry = index, %token, "unrecognized day token");
                warnings.push(ProjectionWarning::UnrecognizedDayToken {
                    entry: index,
                    token: *token,
                });
            }
        }

        let parsed = match clock::parse_range(&entry.time_range) {
            Ok(iv) => iv,
            Err(error) => {
                tracing::debug!(entry = index, %error, "skipping meeting entry");
                warnings.push(ProjectionWarning::SkippedEntry {
                    entry: index,
                    error,
                });
                continue;
            }
        };

        let Some(clipped) = parsed.clip(window.start, window.end) else {
            continue;
        };

        for day in decoded.days.iter() {
            slots[weekday_index(day)].push(BusySlot {
                interval: clipped,
                payload: &entry.payload,
            });
        }
    }

    let mut week = WeekSchedule::default();
    for (day, day_slots) in WEEK.into_iter().zip(slots.iter_mut()) {
        // Stable, so meetings sharing an interval keep input order.
        day_slots.sort_by_key(|slot| slot.interval);
        let busy: Vec<Interval> = day_slots.iter().map(|slot| slot.interval).collect();
        let free = interval::complement(&busy, window.start, window.end);
        tracing::trace!(?day, busy = busy.len(), free = free.len(), "projected day");
        week.days[weekday_index(day)] = DaySchedule { busy, free };
    }

    Projection {
        week,
        warnings,
        slots,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
