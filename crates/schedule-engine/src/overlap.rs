//! Overlap detection between one person's free time and other people's.
//!
//! Each person is represented by a [`FreeMap`]. Counting is per person, not
//! per interval: someone with three free gaps inside a block still counts
//! once. Cost is `O(people × blocks × intervals per day)`, which is fine at
//! friend-list scale.

use chrono::Weekday;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::days::{weekday_index, WEEK};
use crate::interval::{self, Interval};

/// One sorted, disjoint interval list per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekIntervals {
    days: [Vec<Interval>; 7],
}

/// A person's free time for each weekday.
pub type FreeMap = WeekIntervals;

impl WeekIntervals {
    /// Build from per-day lists indexed Sunday = 0.
    ///
    /// Each list is sorted and coalesced, so arbitrary input satisfies the
    /// sorted/disjoint precondition of [`interval::intersect`].
    pub fn from_days(days: [Vec<Interval>; 7]) -> Self {
        Self {
            days: days.map(|d| interval::merge(&d)),
        }
    }

    pub fn day(&self, day: Weekday) -> &[Interval] {
        &self.days[weekday_index(day)]
    }

    /// Days in Sunday-first order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[Interval])> {
        WEEK.into_iter().zip(self.days.iter().map(Vec::as_slice))
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }
}

impl Serialize for WeekIntervals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, intervals) in self.iter() {
            map.serialize_entry(&day, intervals)?;
        }
        map.end()
    }
}

/// A free interval annotated with how many other people are also free in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlapAnnotatedBlock {
    #[serde(flatten)]
    pub interval: Interval,
    pub overlap_count: usize,
}

// ── compute_overlaps ────────────────────────────────────────────────────────

/// Union of every pairwise overlap between `self_free` and each of `others`.
///
/// The result marks, per day, the minutes where the caller and at least one
/// other person are both free. Overlaps contributed by different people are
/// coalesced into a sorted, disjoint list.
pub fn compute_overlaps(self_free: &FreeMap, others: &[FreeMap]) -> WeekIntervals {
    let days = WEEK.map(|day| {
        let mine = self_free.day(day);
        others
            .iter()
            .flat_map(|other| interval::intersect(mine, other.day(day)))
            .collect::<Vec<_>>()
    });
    let overlaps = WeekIntervals::from_days(days);
    tracing::trace!(
        people = others.len(),
        days_with_overlap = overlaps.days.iter().filter(|d| !d.is_empty()).count(),
        "computed overlaps"
    );
    overlaps
}

// ── per-block counting ──────────────────────────────────────────────────────

/// Number of people in `others` with any free time overlapping `block` on `day`.
///
/// Each person counts at most once, so the result never exceeds `others.len()`.
///
/// ```
/// use chrono::Weekday;
/// use schedule_engine::interval::Interval;
/// use schedule_engine::overlap::{count_overlaps_for_block, FreeMap};
///
/// let iv = |s, e| Interval::new(s, e).unwrap();
/// let on_monday = |v: Vec<Interval>| {
///     let mut days: [Vec<Interval>; 7] = Default::default();
///     days[1] = v;
///     FreeMap::from_days(days)
/// };
/// let friends = [on_monday(vec![iv(650, 700)]), on_monday(vec![iv(1000, 1100)])];
/// assert_eq!(count_overlaps_for_block(iv(600, 720), Weekday::Mon, &friends), 1);
/// ```
pub fn count_overlaps_for_block(block: Interval, day: Weekday, others: &[FreeMap]) -> usize {
    others
        .iter()
        .filter(|other| interval::intersects(&[block], other.day(day)))
        .count()
}

/// Positions in `others` of the people counted by [`count_overlaps_for_block`].
pub fn people_free_during(block: Interval, day: Weekday, others: &[FreeMap]) -> Vec<usize> {
    others
        .iter()
        .enumerate()
        .filter(|(_, other)| interval::intersects(&[block], other.day(day)))
        .map(|(i, _)| i)
        .collect()
}

/// Annotate each of the caller's free blocks on `day` with its overlap count.
pub fn annotate_day(
    self_free: &FreeMap,
    day: Weekday,
    others: &[FreeMap],
) -> Vec<OverlapAnnotatedBlock> {
    self_free
        .day(day)
        .iter()
        .map(|&block| OverlapAnnotatedBlock {
            interval: block,
            overlap_count: count_overlaps_for_block(block, day, others),
        })
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Minute;

    fn iv(start: Minute, end: Minute) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn on(day: Weekday, free: Vec<Interval>) -> FreeMap {
        let mut days: [Vec<Interval>; 7] = Default::default();
        days[weekday_index(day)] = free;
        FreeMap::from_days(days)
    }

    // ── FreeMap tests ───────────────────────────────────────────────────

    #[test]
    fn test_from_days_normalizes() {
        let map = on(Weekday::Tue, vec![iv(700, 800), iv(600, 650), iv(640, 660)]);
        assert_eq!(map.day(Weekday::Tue), &[iv(600, 660), iv(700, 800)]);
        assert!(map.day(Weekday::Mon).is_empty());
        assert!(!map.is_empty());
        assert!(FreeMap::default().is_empty());
    }

    #[test]
    fn test_free_map_serializes_by_day_name() {
        let map = on(Weekday::Fri, vec![iv(600, 660)]);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["Fri"][0]["end"], 660);
        assert_eq!(json["Sat"].as_array().unwrap().len(), 0);
    }

    // ── compute_overlaps tests ──────────────────────────────────────────

    #[test]
    fn test_compute_overlaps_unions_people() {
        let me = on(Weekday::Mon, vec![iv(600, 720), iv(900, 1000)]);
        let a = on(Weekday::Mon, vec![iv(650, 700)]);
        let b = on(Weekday::Mon, vec![iv(680, 950)]);
        let overlaps = compute_overlaps(&me, &[a, b]);
        assert_eq!(overlaps.day(Weekday::Mon), &[iv(650, 720), iv(900, 950)]);
        assert!(overlaps.day(Weekday::Tue).is_empty());
    }

    #[test]
    fn test_compute_overlaps_no_friends() {
        let me = on(Weekday::Mon, vec![iv(600, 720)]);
        assert!(compute_overlaps(&me, &[]).is_empty());
    }

    #[test]
    fn test_compute_overlaps_is_per_day() {
        let me = on(Weekday::Mon, vec![iv(600, 720)]);
        let friend = on(Weekday::Tue, vec![iv(600, 720)]);
        assert!(compute_overlaps(&me, &[friend]).is_empty());
    }

    // ── counting tests ──────────────────────────────────────────────────

    #[test]
    fn test_count_only_matching_friend() {
        let a = on(Weekday::Mon, vec![iv(650, 700)]);
        let b = on(Weekday::Mon, vec![iv(1000, 1100)]);
        assert_eq!(count_overlaps_for_block(iv(600, 720), Weekday::Mon, &[a, b]), 1);
    }

    #[test]
    fn test_count_person_once_despite_many_gaps() {
        let a = on(Weekday::Mon, vec![iv(600, 610), iv(630, 640), iv(700, 710)]);
        assert_eq!(count_overlaps_for_block(iv(600, 720), Weekday::Mon, &[a]), 1);
    }

    #[test]
    fn test_count_touching_does_not_overlap() {
        let a = on(Weekday::Mon, vec![iv(720, 800)]);
        assert_eq!(count_overlaps_for_block(iv(600, 720), Weekday::Mon, &[a]), 0);
    }

    #[test]
    fn test_people_free_during_lists_indices() {
        let others = [
            on(Weekday::Wed, vec![iv(1000, 1100)]),
            on(Weekday::Wed, vec![iv(650, 700)]),
            on(Weekday::Wed, vec![iv(300, 1400)]),
        ];
        assert_eq!(people_free_during(iv(600, 720), Weekday::Wed, &others), vec![1, 2]);
    }

    #[test]
    fn test_annotate_day() {
        let me = on(Weekday::Thu, vec![iv(360, 540), iv(600, 900)]);
        let others = [
            on(Weekday::Thu, vec![iv(500, 620)]),
            on(Weekday::Thu, vec![iv(800, 820)]),
        ];
        let blocks = annotate_day(&me, Weekday::Thu, &others);
        assert_eq!(
            blocks,
            vec![
                OverlapAnnotatedBlock {
                    interval: iv(360, 540),
                    overlap_count: 1
                },
                OverlapAnnotatedBlock {
                    interval: iv(600, 900),
                    overlap_count: 2
                },
            ]
        );
    }
}
