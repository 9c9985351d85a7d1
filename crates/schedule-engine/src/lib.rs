//! # schedule-engine
//!
//! Deterministic class-schedule computation for a student meetup app.
//!
//! Takes recurring meetings written the way course catalogs write them
//! (`"MWF"`, `"2:00 PM - 3:15 PM"`), derives each person's free time for every
//! weekday, finds where friends' free time overlaps, and builds a "today from
//! now" timeline. Every function is pure: callers pass in the day window, the
//! friends' schedules and the current time, and nothing is cached between calls.
//!
//! ## Modules
//!
//! - [`clock`] — Clock-time strings ↔ minute-of-day
//! - [`days`] — Weekday patterns (`"TTh"`) → day sets
//! - [`interval`] — Sort, merge, complement and intersect minute intervals
//! - [`projector`] — Meeting list → per-weekday busy/free schedule
//! - [`overlap`] — Free-time overlap across people
//! - [`timeline`] — Single-day chronological timeline from now on
//! - [`error`] — Error and warning types

pub mod clock;
pub mod days;
pub mod error;
pub mod interval;
pub mod overlap;
pub mod projector;
pub mod timeline;

pub use clock::{format_time, parse_range, parse_time, Minute};
pub use days::{decode, DaySet};
pub use error::{ProjectionWarning, ScheduleError};
pub use interval::{complement, intersect, Interval};
pub use overlap::{
    annotate_day, compute_overlaps, count_overlaps_for_block, people_free_during, FreeMap,
    OverlapAnnotatedBlock, WeekIntervals,
};
pub use projector::{
    project, project_with_options, BusySlot, DaySchedule, DayWindow, MeetingEntry, ProjectOptions,
    Projection, WeekSchedule,
};
pub use timeline::{build_timeline, build_today, TimelineEntry};
