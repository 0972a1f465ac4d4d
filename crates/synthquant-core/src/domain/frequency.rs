use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::ValidationError;

/// Sampling cadence of a generated or fetched price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Frequency::OneMinute,
        Frequency::FiveMinutes,
        Frequency::FifteenMinutes,
        Frequency::ThirtyMinutes,
        Frequency::OneHour,
        Frequency::FourHours,
        Frequency::OneDay,
    ];

    /// Number of sampling steps in one calendar day at this cadence.
    pub fn steps_per_day(&self) -> u32 {
        match self {
            Frequency::OneMinute => 1440,
            Frequency::FiveMinutes => 288,
            Frequency::FifteenMinutes => 96,
            Frequency::ThirtyMinutes => 48,
            Frequency::OneHour => 24,
            Frequency::FourHours => 6,
            Frequency::OneDay => 1,
        }
    }

    /// Wall-clock spacing between consecutive points.
    pub fn step_duration(&self) -> Duration {
        match self {
            Frequency::OneMinute => Duration::minutes(1),
            Frequency::FiveMinutes => Duration::minutes(5),
            Frequency::FifteenMinutes => Duration::minutes(15),
            Frequency::ThirtyMinutes => Duration::minutes(30),
            Frequency::OneHour => Duration::hours(1),
            Frequency::FourHours => Duration::hours(4),
            Frequency::OneDay => Duration::days(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::OneMinute => "1m",
            Frequency::FiveMinutes => "5m",
            Frequency::FifteenMinutes => "15m",
            Frequency::ThirtyMinutes => "30m",
            Frequency::OneHour => "1h",
            Frequency::FourHours => "4h",
            Frequency::OneDay => "1d",
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Frequency::OneMinute),
            "5m" => Ok(Frequency::FiveMinutes),
            "15m" => Ok(Frequency::FifteenMinutes),
            "30m" => Ok(Frequency::ThirtyMinutes),
            "1h" => Ok(Frequency::OneHour),
            "4h" => Ok(Frequency::FourHours),
            "1d" => Ok(Frequency::OneDay),
            other => Err(ValidationError::InvalidFrequency {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_frequencies() {
        assert_eq!("1h".parse::<Frequency>().unwrap(), Frequency::OneHour);
        assert_eq!("1D".parse::<Frequency>().unwrap(), Frequency::OneDay);
    }

    #[test]
    fn rejects_unknown_frequency() {
        let err = "2h".parse::<Frequency>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidFrequency { .. }));
    }

    #[test]
    fn step_counts_cover_a_day() {
        for freq in Frequency::ALL {
            let total = freq.step_duration() * freq.steps_per_day() as i32;
            assert_eq!(total, Duration::days(1), "cadence {freq}");
        }
    }
}
