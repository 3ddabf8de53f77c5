//! Date range presets and the calculator collaborator.
//!
//! The filter manager tracks one of a fixed set of presets. Turning a preset into
//! concrete bounds needs the current time and is delegated to a
//! [`DateRangeCalculator`] so hosts can align ranges with their backend's notion
//! of time.

use super::error::TableError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relative date range offered by the date filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRangePreset {
    #[default]
    #[serde(rename = "24h")]
    Last24Hours,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "all")]
    All,
}

impl DateRangePreset {
    /// Every preset, in menu order.
    pub const ALL: [Self; 4] = [Self::Last24Hours, Self::Last7Days, Self::Last30Days, Self::All];

    /// The wire key: `24h`, `7d`, `30d` or `all`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Last24Hours => "24h",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::All => "all",
        }
    }

    /// Icon name shown next to the range selector.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Last24Hours => "schedule",
            Self::Last7Days => "date_range",
            Self::Last30Days => "calendar_month",
            Self::All => "all_inclusive",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Last24Hours => "Last 24 hours",
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::All => "All time",
        }
    }

    /// Length of the window, `None` for [`DateRangePreset::All`].
    #[must_use]
    pub fn duration(self) -> Option<Duration> {
        match self {
            Self::Last24Hours => Some(Duration::hours(24)),
            Self::Last7Days => Some(Duration::days(7)),
            Self::Last30Days => Some(Duration::days(30)),
            Self::All => None,
        }
    }
}

impl fmt::Display for DateRangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DateRangePreset {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.key() == s.trim())
            .ok_or_else(|| TableError::InvalidDateRange(s.to_string()))
    }
}

/// Concrete bounds of a range; both ends are open for "all time".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Change descriptor returned when the date range changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeSelection {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub preset: DateRangePreset,
}

/// Computes concrete bounds for a preset.
pub trait DateRangeCalculator {
    /// Returns the bounds of `preset` as seen at `now`.
    fn compute(&self, preset: DateRangePreset, now: DateTime<Utc>) -> DateRange;
}

/// Rolling windows ending at `now`: the last 24 hours, 7 days or 30 days.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingDateRangeCalculator;

impl DateRangeCalculator for RollingDateRangeCalculator {
    fn compute(&self, preset: DateRangePreset, now: DateTime<Utc>) -> DateRange {
        preset.duration().map_or_else(DateRange::default, |window| DateRange {
            start: Some(now - window),
            end: Some(now),
        })
    }
}
