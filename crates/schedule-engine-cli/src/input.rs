//! Schedule documents read by the CLI.
//!
//! ```json
//! {
//!   "window": { "start": 360, "end": 1380 },
//!   "me": [{ "day_pattern": "MWF", "time_range": "9:00-9:50", "course": "CS 101" }],
//!   "friends": {
//!     "alice": [{ "day_pattern": "TTh", "time_range": "2:00 PM - 3:15 PM" }]
//!   }
//! }
//! ```
//!
//! `window` and `friends` are optional. Any field besides `day_pattern` and
//! `time_range` is kept as the meeting's payload and echoed in timelines.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use schedule_engine::{DayWindow, MeetingEntry};
use serde::Deserialize;
use serde_json::{Map, Value};

pub type Payload = Map<String, Value>;

pub type Meetings = Vec<MeetingEntry<Payload>>;

#[derive(Debug, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default)]
    pub window: Option<DayWindow>,
    pub me: Meetings,
    #[serde(default)]
    pub friends: BTreeMap<String, Meetings>,
}

/// Read a document from `path`, or from stdin when `path` is `-`.
pub fn load(path: &Path) -> Result<ScheduleDocument> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read schedule from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule file: {}", path.display()))?
    };
    parse(&text).with_context(|| format!("Invalid schedule document: {}", path.display()))
}

fn parse(text: &str) -> Result<ScheduleDocument> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let doc = parse(r#"{"me": []}"#).unwrap();
        assert!(doc.me.is_empty());
        assert!(doc.friends.is_empty());
        assert!(doc.window.is_none());
    }

    #[test]
    fn test_parse_keeps_payload_fields() {
        let doc = parse(
            r#"{"me": [{"day_pattern": "MWF", "time_range": "9:00-9:50", "course": "CS 101", "room": "B12"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.me[0].payload["course"], "CS 101");
        assert_eq!(doc.me[0].payload["room"], "B12");
    }

    #[test]
    fn test_parse_rejects_bad_window() {
        assert!(parse(r#"{"window": {"start": 900, "end": 600}, "me": []}"#).is_err());
    }

    #[test]
    fn test_parse_friends_sorted_by_name() {
        let doc = parse(r#"{"me": [], "friends": {"zoe": [], "alice": []}}"#).unwrap();
        let names: Vec<_> = doc.friends.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["alice", "zoe"]);
    }
}
