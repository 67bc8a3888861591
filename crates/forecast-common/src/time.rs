//! Model runs, cycles and lead-time helpers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Model run cycles (GFS runs 4x daily).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelCycle {
    /// 00Z run
    #[serde(rename = "00")]
    Z00,
    /// 06Z run
    #[serde(rename = "06")]
    Z06,
    /// 12Z run
    #[serde(rename = "12")]
    Z12,
    /// 18Z run
    #[serde(rename = "18")]
    Z18,
}

impl ModelCycle {
    pub fn from_hour(hour: u32) -> Option<Self> {
        match hour {
            0 => Some(ModelCycle::Z00),
            6 => Some(ModelCycle::Z06),
            12 => Some(ModelCycle::Z12),
            18 => Some(ModelCycle::Z18),
            _ => None,
        }
    }

    pub fn hour(&self) -> u32 {
        match self {
            ModelCycle::Z00 => 0,
            ModelCycle::Z06 => 6,
            ModelCycle::Z12 => 12,
            ModelCycle::Z18 => 18,
        }
    }
}

impl fmt::Display for ModelCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.hour())
    }
}

impl FromStr for ModelCycle {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches(|c: char| c == 'z' || c == 'Z');
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(ModelCycle::from_hour)
            .ok_or_else(|| TimeParseError::InvalidCycle(s.to_string()))
    }
}

/// One initialization of the forecast model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastRun {
    pub date: NaiveDate,
    pub cycle: ModelCycle,
}

impl ForecastRun {
    pub fn new(date: NaiveDate, cycle: ModelCycle) -> Self {
        Self { date, cycle }
    }

    /// Parse a run from a `YYYYMMDD` (or `YYYY-MM-DD`) date and a cycle hour.
    pub fn parse(date: &str, cycle: &str) -> Result<Self, TimeParseError> {
        let date = NaiveDate::parse_from_str(date, "%Y%m%d")
            .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"))
            .map_err(|_| TimeParseError::InvalidDate(date.to_string()))?;
        Ok(Self::new(date, cycle.parse()?))
    }

    /// Initialization time of the run.
    pub fn init_time(&self) -> DateTime<Utc> {
        let naive = self
            .date
            .and_hms_opt(self.cycle.hour(), 0, 0)
            .unwrap_or_default();
        Utc.from_utc_datetime(&naive)
    }

    /// Nominal valid time for a lead time expressed in hours.
    pub fn valid_time_for_lead(&self, hours: u32) -> DateTime<Utc> {
        self.init_time() + Duration::hours(hours as i64)
    }

    /// Dataset address: `{provider}/gfs{YYYYMMDD}/gfs_0p25_1hr_{HH}z`.
    pub fn dataset_url(&self, provider: &str) -> String {
        format!(
            "{}/gfs{}/gfs_0p25_1hr_{}z",
            provider.trim_end_matches('/'),
            self.date.format("%Y%m%d"),
            self.cycle
        )
    }

    /// Whether the run could still be inside its publication window at `now`.
    pub fn may_be_unpublished(&self, now: DateTime<Utc>, publish_delay: Duration) -> bool {
        now < self.init_time() + publish_delay
    }

    /// Most recent run expected to be published at `now`.
    pub fn latest_expected(now: DateTime<Utc>, publish_delay: Duration) -> Self {
        let ready = now - publish_delay;
        let cycle_hour = ready.hour() - ready.hour() % 6;
        let cycle = ModelCycle::from_hour(cycle_hour).unwrap_or(ModelCycle::Z00);
        Self::new(ready.date_naive(), cycle)
    }

    /// The run immediately before this one.
    pub fn previous(&self) -> Self {
        let prev = self.init_time() - Duration::hours(6);
        let cycle = ModelCycle::from_hour(prev.hour()).unwrap_or(ModelCycle::Z00);
        Self::new(prev.date_naive(), cycle)
    }
}

impl fmt::Display for ForecastRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gfs {} {}z", self.date.format("%Y%m%d"), self.cycle)
    }
}

/// Ascending lead-time indices from `start` to `end` inclusive.
///
/// A zero `step` yields only `start`.
pub fn lead_indices(start: i64, end: i64, step: usize) -> Vec<i64> {
    if step == 0 {
        return if start <= end { vec![start] } else { Vec::new() };
    }
    (start..=end).step_by(step).collect()
}

/// Lead-time tag as drawn in map titles, e.g. `t+003`.
pub fn lead_tag(hours: i64) -> String {
    format!("t+{:03}", hours)
}

/// Valid time as drawn in map titles, e.g. `12UTC Wed 15 Jan 2025`.
pub fn format_valid_time(dt: &DateTime<Utc>) -> String {
    dt.format("%HUTC %a %d %b %Y").to_string()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid run date: {0}. Expected YYYYMMDD")]
    InvalidDate(String),

    #[error("Invalid model cycle: {0}. Expected one of 00, 06, 12, 18")]
    InvalidCycle(String),
}
