use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};
use time::OffsetDateTime;

/// Identifier of a task.
///
/// Serialized as a bare JSON number so that ids written by earlier
/// millisecond-timestamp based versions load unchanged.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Derive an identifier not present in `taken`.
    ///
    /// The id is the Unix time in milliseconds unless that would not exceed the
    /// largest taken id, in which case it is that id plus one. When the largest
    /// id is `u64::MAX`, the smallest free value is used instead.
    #[must_use]
    pub fn generate(now: OffsetDateTime, taken: &[Self]) -> Self {
        let millis = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or_default();
        let candidate = match taken.iter().copied().max() {
            Some(Self(max)) if max >= millis => max.checked_add(1),
            _ => Some(millis),
        };
        candidate.map_or_else(|| Self::lowest_free(taken), Self)
    }

    fn lowest_free(taken: &[Self]) -> Self {
        let mut ids: Vec<u64> = taken.iter().map(|id| id.0).collect();
        ids.sort_unstable();
        let mut next = 0_u64;
        for id in ids {
            if id > next {
                break;
            }
            if id == next {
                next = next.saturating_add(1);
            }
        }
        Self(next)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
