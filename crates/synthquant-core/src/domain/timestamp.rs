use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// RFC 3339 timestamp pinned to UTC.
///
/// Every timestamp that crosses a serialization boundary goes through this
/// wrapper so offsets cannot leak into stored or emitted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn from_unix_timestamp(secs: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(secs)
            .map(Self)
            .map_err(|_| ValidationError::TimestampNotUtc {
                value: secs.to_string(),
            })
    }

    /// Parse an RFC 3339 string, rejecting any non-UTC offset.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parsed =
            OffsetDateTime::parse(input, &Rfc3339).map_err(|_| ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            })?;
        if parsed.offset() != UtcOffset::UTC {
            return Err(ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            });
        }
        Ok(Self(parsed))
    }

    pub fn unix_timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }

    pub fn format_rfc3339(&self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.to_string())
    }

    #[must_use]
    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }

    #[must_use]
    pub fn minus(&self, duration: Duration) -> Self {
        Self(self.0 - duration)
    }

    /// Truncate to the start of the minute.
    #[must_use]
    pub fn floor_to_minute(&self) -> Self {
        let truncated = self
            .0
            .replace_second(0)
            .and_then(|dt| dt.replace_nanosecond(0))
            .unwrap_or(self.0);
        Self(truncated)
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl TryFrom<String> for UtcDateTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UtcDateTime> for String {
    fn from(value: UtcDateTime) -> Self {
        value.format_rfc3339()
    }
}

impl From<OffsetDateTime> for UtcDateTime {
    fn from(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_rfc3339() {
        let ts = UtcDateTime::parse("2026-01-02T00:00:00Z").expect("should parse");
        assert_eq!(ts.format_rfc3339(), "2026-01-02T00:00:00Z");
    }

    #[test]
    fn rejects_offset_timestamps() {
        let err = UtcDateTime::parse("2026-01-02T00:00:00+05:30").expect_err("must fail");
        assert!(matches!(err, ValidationError::TimestampNotUtc { .. }));
    }

    #[test]
    fn advances_by_duration() {
        let start = UtcDateTime::parse("2026-01-01T00:00:00Z").expect("should parse");
        let next = start.plus(Duration::hours(1));
        assert_eq!(next.format_rfc3339(), "2026-01-01T01:00:00Z");
    }
}
