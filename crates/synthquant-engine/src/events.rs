//! Shock-event injection.
//!
//! Events are pure transforms over an already-generated series. Applying a
//! list is a fold: each event sees the output of the previous one, in the
//! order the caller supplied. An event whose trigger lies beyond the series
//! is skipped; later events in the list still apply.

use serde::{Deserialize, Serialize};

use synthquant_core::{AssetSeries, PricePoint};

use crate::error::EngineError;

/// Crash ramp length when the request omits one.
pub const DEFAULT_CRASH_DURATION: usize = 5;

fn default_crash_duration() -> usize {
    DEFAULT_CRASH_DURATION
}

/// One shock event, tagged by type on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventSpec {
    /// Suppress every point before `trigger_step`, simulating a listing date.
    Ipo { trigger_step: usize },
    /// Ramp prices linearly down to `1 - magnitude` over `duration` steps,
    /// then hold the reduced level permanently.
    Crash {
        trigger_step: usize,
        magnitude: f64,
        #[serde(default = "default_crash_duration")]
        duration: usize,
    },
    /// Instant permanent gap of `1 + magnitude` from `trigger_step` onward.
    Earnings { trigger_step: usize, magnitude: f64 },
}

impl EventSpec {
    pub fn validate(&self) -> Result<(), EngineError> {
        match self {
            EventSpec::Ipo { .. } => Ok(()),
            EventSpec::Crash {
                magnitude,
                duration,
                ..
            } => {
                if !magnitude.is_finite() || *magnitude <= 0.0 || *magnitude > 1.0 {
                    return Err(EngineError::InvalidCrashMagnitude { value: *magnitude });
                }
                if *duration == 0 {
                    return Err(EngineError::ZeroCrashDuration);
                }
                Ok(())
            }
            EventSpec::Earnings { magnitude, .. } => {
                if !magnitude.is_finite() || *magnitude <= -1.0 {
                    return Err(EngineError::InvalidEarningsMagnitude { value: *magnitude });
                }
                Ok(())
            }
        }
    }

    pub const fn trigger_step(&self) -> usize {
        match self {
            EventSpec::Ipo { trigger_step }
            | EventSpec::Crash { trigger_step, .. }
            | EventSpec::Earnings { trigger_step, .. } => *trigger_step,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            EventSpec::Ipo { .. } => "ipo",
            EventSpec::Crash { .. } => "crash",
            EventSpec::Earnings { .. } => "earnings",
        }
    }

    /// Apply this event to one series, returning the transformed snapshot.
    pub fn apply(&self, series: &AssetSeries) -> AssetSeries {
        let len = series.len();
        if self.trigger_step() >= len {
            return series.clone();
        }

        let points = match self {
            EventSpec::Ipo { trigger_step } => series
                .points
                .iter()
                .enumerate()
                .map(|(index, point)| {
                    if index < *trigger_step {
                        PricePoint::suppressed(point.ts)
                    } else {
                        *point
                    }
                })
                .collect(),
            EventSpec::Crash {
                trigger_step,
                magnitude,
                duration,
            } => series
                .points
                .iter()
                .enumerate()
                .map(|(index, point)| scale_point(point, crash_factor(index, *trigger_step, *magnitude, *duration)))
                .collect(),
            EventSpec::Earnings {
                trigger_step,
                magnitude,
            } => series
                .points
                .iter()
                .enumerate()
                .map(|(index, point)| {
                    let factor = if index >= *trigger_step {
                        1.0 + magnitude
                    } else {
                        1.0
                    };
                    scale_point(point, factor)
                })
                .collect(),
        };

        AssetSeries::new(series.symbol.clone(), points)
    }
}

/// Multiplier applied to one step by a crash event.
///
/// Within the ramp the factor moves from `1 - magnitude/duration` at the
/// trigger down to exactly `1 - magnitude` at the last ramp step; past the
/// ramp it stays at the terminal level.
fn crash_factor(index: usize, trigger_step: usize, magnitude: f64, duration: usize) -> f64 {
    if index < trigger_step {
        1.0
    } else if index < trigger_step + duration {
        let progress = (index - trigger_step + 1) as f64 / duration as f64;
        1.0 - magnitude * progress
    } else {
        1.0 - magnitude
    }
}

fn scale_point(point: &PricePoint, factor: f64) -> PricePoint {
    PricePoint {
        ts: point.ts,
        price: point.price.map(|price| price * factor),
    }
}

/// Fold a list of validated events over a series, in order.
pub fn apply_events(series: &AssetSeries, events: &[EventSpec]) -> AssetSeries {
    events
        .iter()
        .fold(series.clone(), |current, event| event.apply(&current))
}
