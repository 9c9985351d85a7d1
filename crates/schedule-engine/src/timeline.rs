//! "Today from now" timeline: one day's classes and free blocks in order.
//!
//! Busy slots and free intervals are merged by start time, everything that
//! already ended is dropped, and the entry in progress is clipped to start at
//! `now`. Overlapping classes are trimmed against each other. Because busy and
//! free partition the day window, the output covers
//! `[max(window start, now), window end]` without gaps or overlaps.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::clock::{self, Minute};
use crate::interval::Interval;
use crate::overlap::{self, FreeMap};
use crate::projector::{BusySlot, DaySchedule, Projection};

/// One row of a day's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEntry<'a, P> {
    /// A scheduled meeting, carrying the payload it was read with.
    Class { interval: Interval, payload: &'a P },
    /// Free time and the number of other people also free during it.
    Free {
        interval: Interval,
        overlap_count: usize,
    },
}

impl<P> TimelineEntry<'_, P> {
    pub fn interval(&self) -> Interval {
        match self {
            Self::Class { interval, .. } | Self::Free { interval, .. } => *interval,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free { .. })
    }
}

// ── build_timeline ──────────────────────────────────────────────────────────

/// Merge a day's busy slots and free intervals into a timeline starting at `now`.
///
/// `busy` must be sorted by start (as [`Projection::busy_slots`] returns it)
/// and `day.free` is taken as its complement. Classes may overlap: each one
/// is trimmed to start where the classes before it end, and a class wholly
/// inside earlier ones is dropped, so entries never overlap. When a class and
/// a free block share a start the class comes first. `overlap_count` is asked
/// once per free block, with the block already clipped to `now`.
///
/// # Examples
///
/// ```
/// use schedule_engine::interval::Interval;
/// use schedule_engine::projector::DaySchedule;
/// use schedule_engine::timeline::{build_timeline, TimelineEntry};
///
/// let day = DaySchedule {
///     busy: vec![],
///     free: vec![Interval::new(720, 900).unwrap()],
/// };
/// let timeline = build_timeline::<()>(&day, &[], 800, |_| 0);
/// assert_eq!(
///     timeline,
///     vec![TimelineEntry::Free { interval: Interval::new(800, 900).unwrap(), overlap_count: 0 }]
/// );
/// ```
pub fn build_timeline<'a, P>(
    day: &DaySchedule,
    busy: &[BusySlot<'a, P>],
    now: Minute,
    overlap_count: impl Fn(Interval) -> usize,
) -> Vec<TimelineEntry<'a, P>> {
    let free = &day.free;
    let mut timeline = Vec::with_capacity(busy.len() + free.len());
    let (mut b, mut f) = (0, 0);
    let mut covered_until: Minute = 0;

    while b < busy.len() || f < free.len() {
        let take_busy = match (busy.get(b), free.get(f)) {
            (Some(slot), Some(gap)) => slot.interval.start <= gap.start,
            (Some(_), None) => true,
            _ => false,
        };

        if take_busy {
            let slot = busy[b];
            b += 1;
            // Overlapping classes: later ones start where the earlier ones end.
            let start = slot.interval.start.max(covered_until);
            covered_until = covered_until.max(slot.interval.end);
            if let Some(interval) = Interval::new(start, slot.interval.end)
                .and_then(|interval| from_now(interval, now))
            {
                timeline.push(TimelineEntry::Class {
                    interval,
                    payload: slot.payload,
                });
            }
        } else {
            let gap = free[f];
            f += 1;
            if let Some(interval) = from_now(gap, now) {
                timeline.push(TimelineEntry::Free {
                    interval,
                    overlap_count: overlap_count(interval),
                });
            }
        }
    }

    timeline
}

/// The part of `interval` at or after `now`.
fn from_now(interval: Interval, now: Minute) -> Option<Interval> {
    if interval.end <= now {
        return None;
    }
    Interval::new(interval.start.max(now), interval.end)
}

/// Timeline for the weekday of `now`, annotated against `others`' free time.
pub fn build_today<'a, P>(
    projection: &Projection<'a, P>,
    others: &[FreeMap],
    now: NaiveDateTime,
) -> Vec<TimelineEntry<'a, P>> {
    let day = now.weekday();
    let minute = clock::minute_of(&now.time());
    build_timeline(
        projection.week.day(day),
        projection.busy_slots(day),
        minute,
        |block| overlap::count_overlaps_for_block(block, day, others),
    )
}

// ── Tests ───────────────────────────────────────────────────────────────────
