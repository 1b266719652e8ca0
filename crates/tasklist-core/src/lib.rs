//! Domain types for tasklist: tasks, filters and task text rules.

/// Identifier types.
pub mod id;
/// Task text validation and sanitization.
pub mod text;

use crate::id::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;

pub use crate::text::{MAX_TASK_LENGTH, ValidationError, sanitize, unescape, validate_text};

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier, unique within a collection.
    pub id: TaskId,
    /// Sanitized, non-empty text.
    pub text: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Creation time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub created_at: Option<OffsetDateTime>,
    /// Time of the latest transition to completed; cleared when re-activated.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub completed_at: Option<OffsetDateTime>,
}

impl Task {
    /// Build an active task with the given already-validated text.
    #[must_use]
    pub const fn new(id: TaskId, text: String, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: Some(created_at),
            completed_at: None,
        }
    }

    /// Flip the completion flag, stamping or clearing `completed_at`.
    pub fn toggle(&mut self, now: OffsetDateTime) {
        self.completed = !self.completed;
        self.completed_at = self.completed.then_some(now);
    }
}

/// View restriction over the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Tasks not yet completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl Filter {
    /// Every filter in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether the task passes this filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Wire name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Next filter in display order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    /// Parse a filter name, falling back to [`Filter::All`] on anything unknown.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a filter name is not one of `all`, `active`, `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == normalized)
            .ok_or_else(|| UnknownFilter(s.to_owned()))
    }
}

/// Optional timestamps written as RFC 3339 text.
///
/// Reading also accepts integer Unix milliseconds, which older payloads used.
mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
    }

    // serde's `with` passes `&Option<T>` for serialization.
    #[allow(clippy::ref_option)]
    pub(super) fn serialize<S>(value: &Option<OffsetDateTime>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => {
                let text = ts.format(&Rfc3339).map_err(ser::Error::custom)?;
                s.serialize_str(&text)
            }
            None => s.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(d: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ts = match Option::<Raw>::deserialize(d)? {
            None => return Ok(None),
            Some(Raw::Text(text)) => {
                OffsetDateTime::parse(&text, &Rfc3339).map_err(de::Error::custom)?
            }
            Some(Raw::Millis(millis)) => {
                OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                    .map_err(de::Error::custom)?
            }
        };
        // RFC 3339 can only write four-digit, non-negative years.
        if !(0..=9999).contains(&ts.year()) {
            return Err(de::Error::custom(format!(
                "timestamp year {} cannot be stored",
                ts.year()
            )));
        }
        Ok(Some(ts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn task(id: u64, completed: bool) -> Task {
        Task {
            id: TaskId(id),
            text: format!("task {id}"),
            completed,
            created_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn toggle_stamps_and_clears_completion_time() {
        let now = datetime!(2024-05-01 08:30:00 UTC);
        let mut t = Task::new(TaskId(1), "Buy milk".into(), now);
        t.toggle(now);
        assert!(t.completed);
        assert_eq!(t.completed_at, Some(now));
        t.toggle(now);
        assert!(!t.completed);
        assert_eq!(t.completed_at, None);
        assert_eq!(t.created_at, Some(now));
    }

    #[test]
    fn filter_matches_completion_state() {
        let active = task(1, false);
        let done = task(2, true);
        assert!(Filter::All.matches(&active) && Filter::All.matches(&done));
        assert!(Filter::Active.matches(&active) && !Filter::Active.matches(&done));
        assert!(!Filter::Completed.matches(&active) && Filter::Completed.matches(&done));
    }

    #[test]
    fn filter_parsing_is_case_insensitive_and_lenient() {
        assert_eq!("Active".parse::<Filter>(), Ok(Filter::Active));
        assert_eq!(" COMPLETED ".parse::<Filter>(), Ok(Filter::Completed));
        assert_eq!("done".parse::<Filter>(), Err(UnknownFilter("done".into())));
        assert_eq!(Filter::parse_or_default("done"), Filter::All);
        assert_eq!(Filter::parse_or_default("active"), Filter::Active);
    }

    #[test]
    fn filter_next_cycles_through_all() {
        let mut filter = Filter::default();
        for expected in [Filter::Active, Filter::Completed, Filter::All] {
            filter = filter.next();
            assert_eq!(filter, expected);
        }
    }

    #[test]
    fn task_json_uses_camel_case_and_omits_missing_timestamps() {
        let mut t = task(5, true);
        t.completed_at = Some(datetime!(2024-05-01 08:30:00.5 UTC));
        let json = serde_json::to_value(&t).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(
            json,
            serde_json::json!({
                "id": 5,
                "text": "task 5",
                "completed": true,
                "completedAt": "2024-05-01T08:30:00.5Z"
            })
        );
    }

    #[test]
    fn task_json_accepts_minimal_and_millisecond_entries() {
        let minimal: Task = serde_json::from_str(r#"{"id":1,"text":"x"}"#)
            .unwrap_or_else(|err| panic!("minimal entry: {err}"));
        assert!(!minimal.completed);
        assert!(minimal.created_at.is_none());

        let millis: Task =
            serde_json::from_str(r#"{"id":2,"text":"y","completed":false,"createdAt":1714552200000}"#)
                .unwrap_or_else(|err| panic!("millisecond entry: {err}"));
        assert_eq!(millis.created_at, Some(datetime!(2024-05-01 08:30:00 UTC)));
    }

    #[test]
    fn task_json_rejects_timestamps_outside_storable_years() {
        let negative_year = r#"{"id":1,"text":"old","createdAt":-70000000000000}"#;
        assert!(serde_json::from_str::<Task>(negative_year).is_err());
        let far_future = r#"{"id":1,"text":"new","completedAt":253402300800000}"#;
        assert!(serde_json::from_str::<Task>(far_future).is_err());
        let last_storable = r#"{"id":1,"text":"ok","completedAt":253402300799999}"#;
        assert!(serde_json::from_str::<Task>(last_storable).is_ok());
    }

    #[test]
    fn task_json_requires_id_and_string_text() {
        assert!(serde_json::from_str::<Task>(r#"{"text":"x"}"#).is_err());
        assert!(serde_json::from_str::<Task>(r#"{"id":1}"#).is_err());
        assert!(serde_json::from_str::<Task>(r#"{"id":1,"text":3}"#).is_err());
    }
}
