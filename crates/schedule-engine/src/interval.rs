//! Half-open minute intervals and the set operations built on them.
//!
//! Every [`Interval`] satisfies `start < end`; constructors refuse empty or
//! inverted ranges instead of storing them. The set operations take plain
//! slices and return fresh vectors, so nothing here holds state between calls.

use serde::Serialize;

use crate::clock::Minute;

/// A half-open range `[start, end)` of minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Interval {
    pub start: Minute,
    pub end: Minute,
}

impl Interval {
    /// Build an interval, or `None` when `end <= start`.
    pub fn new(start: Minute, end: Minute) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Length in minutes.
    pub fn duration(&self) -> Minute {
        self.end - self.start
    }

    /// Restrict to `[lo, hi]`, or `None` if nothing remains.
    pub fn clip(&self, lo: Minute, hi: Minute) -> Option<Self> {
        Self::new(self.start.max(lo), self.end.min(hi))
    }

    /// Whether the two intervals share at least one minute.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ── sort ────────────────────────────────────────────────────────────────────

/// Sort intervals by start, then end.
///
/// Overlapping intervals are kept as they are; [`complement`] tolerates them
/// because it only tracks the running maximum end.
pub fn sort_by_start(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_unstable();
    sorted
}

/// Sort and coalesce intervals that overlap or touch.
///
/// ```
/// use schedule_engine::interval::{merge, Interval};
///
/// let iv = |s, e| Interval::new(s, e).unwrap();
/// assert_eq!(merge(&[iv(60, 90), iv(0, 30), iv(30, 45)]), vec![iv(0, 45), iv(60, 90)]);
/// ```
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in sort_by_start(intervals) {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end => last.end = last.end.max(iv.end),
            _ => merged.push(iv),
        }
    }
    merged
}

// ── complement ──────────────────────────────────────────────────────────────

/// Free time: the gaps in `busy` within `[window_start, window_end]`.
///
/// `busy` must be sorted by start (see [`sort_by_start`]) but may contain
/// overlaps. Busy time outside the window is ignored. The result is sorted,
/// pairwise disjoint, and together with `busy` covers the whole window.
///
/// ```
/// use schedule_engine::interval::{complement, Interval};
///
/// let busy = [Interval::new(540, 590).unwrap()];
/// let free = complement(&busy, 360, 1380);
/// assert_eq!(free, vec![Interval::new(360, 540).unwrap(), Interval::new(590, 1380).unwrap()]);
/// ```
pub fn complement(busy: &[Interval], window_start: Minute, window_end: Minute) -> Vec<Interval> {
    let mut free = Vec::with_capacity(busy.len() + 1);
    let mut prev_end = window_start;

    for iv in busy {
        if iv.start > prev_end {
            if let Some(gap) = Interval::new(prev_end, iv.start.min(window_end)) {
                free.push(gap);
            }
        }
        prev_end = prev_end.max(iv.end);
        if prev_end >= window_end {
            return free;
        }
    }

    if let Some(tail) = Interval::new(prev_end, window_end) {
        free.push(tail);
    }
    free
}

// ── intersect ───────────────────────────────────────────────────────────────

/// Two-pointer intersection of two sorted, internally disjoint interval sets.
///
/// Output is sorted and disjoint. Inputs that are unsorted or self-overlapping
/// give unspecified results.
pub fn intersect(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end.min(b[j].end);
        if let Some(iv) = Interval::new(start, end) {
            out.push(iv);
        }
        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}

/// Whether any interval of `a` overlaps any interval of `b`.
///
/// Same preconditions as [`intersect`], but stops at the first hit.
pub fn intersects(a: &[Interval], b: &[Interval]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].overlaps(&b[j]) {
            return true;
        }
        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}

// ── Tests ───────────────────────────────────────────────────────────────────
