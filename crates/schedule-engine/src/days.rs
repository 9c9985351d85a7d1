//! Compact weekday-pattern decoding (`"MWF"`, `"TTh"`, `"TR"`, `"SaSu"`).
//!
//! Decoding is permissive: characters that name no weekday are skipped, so a
//! pattern like `"XYZ"` decodes to an empty [`DaySet`] and the meeting lands on
//! no day. [`decode_with_unknown`] also returns the skipped characters for
//! callers that want to surface them.

use chrono::Weekday;
use serde::{Serialize, Serializer};

/// All weekdays in canonical Sunday-first order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Sunday = 0 .. Saturday = 6.
pub fn weekday_index(day: Weekday) -> usize {
    day.num_days_from_sunday() as usize
}

// ── DaySet ──────────────────────────────────────────────────────────────────

/// A set of weekdays, iterated Sunday first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << weekday_index(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << weekday_index(day)) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = DaySet::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

// ── decode ──────────────────────────────────────────────────────────────────

/// Result of decoding a pattern, keeping track of what was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedPattern {
    pub days: DaySet,
    /// Alphanumeric characters that matched no day token, in input order.
    pub unrecognized: Vec<char>,
}

/// Decode a weekday pattern into a set of days.
///
/// Two-letter tokens `TH`, `SA` and `SU` are matched before the single
/// letters `M`, `T`, `W`, `R` (Thursday), `F` and `S` (Saturday). Matching is
/// case-insensitive. Anything else is ignored.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use schedule_engine::days::decode;
///
/// let days: Vec<Weekday> = decode("TTh").iter().collect();
/// assert_eq!(days, vec![Weekday::Tue, Weekday::Thu]);
/// assert!(decode("XYZ").is_empty());
/// ```
pub fn decode(pattern: &str) -> DaySet {
    decode_with_unknown(pattern).days
}

/// Like [`decode`], but also reports characters that were skipped.
///
/// Whitespace and the separators `,` `/` `-` `.` are dropped without being
/// reported.
pub fn decode_with_unknown(pattern: &str) -> DecodedPattern {
    let chars: Vec<char> = pattern.to_uppercase().chars().collect();
    let mut decoded = DecodedPattern::default();

    let mut i = 0;
    while i < chars.len() {
        let pair = chars.get(i + 1).map(|next| (chars[i], *next));
        let two_letter = match pair {
            Some(('T', 'H')) => Some(Weekday::Thu),
            Some(('S', 'A')) => Some(Weekday::Sat),
            Some(('S', 'U')) => Some(Weekday::Sun),
            _ => None,
        };
        if let Some(day) = two_letter {
            decoded.days.insert(day);
            i += 2;
            continue;
        }

        match chars[i] {
            'M' => decoded.days.insert(Weekday::Mon),
            'T' => decoded.days.insert(Weekday::Tue),
            'W' => decoded.days.insert(Weekday::Wed),
            'R' => decoded.days.insert(Weekday::Thu),
            'F' => decoded.days.insert(Weekday::Fri),
            'S' => decoded.days.insert(Weekday::Sat),
            c if c.is_whitespace() || matches!(c, ',' | '/' | '-' | '.') => {}
            c => decoded.unrecognized.push(c),
        }
        i += 1;
    }

    decoded
}

// ── Tests ───────────────────────────────────────────────────────────────────
