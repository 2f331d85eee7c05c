//! Profile analytics domain types
//!
//! Visits to public profiles, bucketed by day and by how the visitor arrived.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SUMMARY_DAYS: u32 = 30;
pub const MAX_SUMMARY_DAYS: u32 = 365;

/// How a visitor reached the profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViewSource {
    Nfc,
    Qr,
    Link,
    Direct,
}

impl Default for ViewSource {
    fn default() -> Self {
        Self::Direct
    }
}

impl ViewSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nfc => "nfc",
            Self::Qr => "qr",
            Self::Link => "link",
            Self::Direct => "direct",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "nfc" => Self::Nfc,
            "qr" => Self::Qr,
            "link" => Self::Link,
            _ => Self::Direct,
        }
    }
}

/// Request DTO for recording a profile view
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordViewRequest {
    #[serde(default)]
    pub source: ViewSource,
    #[serde(default)]
    pub referrer: Option<String>,
}

/// Query parameters for the analytics summary
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryParams {
    pub days: Option<u32>,
}

impl SummaryParams {
    pub fn days(&self) -> Result<u32, String> {
        let days = self.days.unwrap_or(DEFAULT_SUMMARY_DAYS);
        if !(1..=MAX_SUMMARY_DAYS).contains(&days) {
            return Err(format!("days must be between 1 and {}", MAX_SUMMARY_DAYS));
        }
        Ok(days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub views: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceCount {
    pub source: ViewSource,
    pub views: i64,
}

/// Response DTO for the analytics dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub days: u32,
    pub total_views: i64,
    pub total_leads: i64,
    pub views_by_source: Vec<SourceCount>,
    pub daily: Vec<DailyCount>,
}

/// First day included in a window of `days` days ending on `now`'s date
pub fn window_start(now: DateTime<Utc>, days: u32) -> NaiveDate {
    now.date_naive() - Duration::days(i64::from(days) - 1)
}

/// Dense per-day series: every day in the window is present, missing days count 0
pub fn fill_daily_series(start: NaiveDate, days: u32, counts: &[(NaiveDate, i64)]) -> Vec<DailyCount> {
    let by_day: HashMap<NaiveDate, i64> = counts.iter().copied().collect();
    (0..i64::from(days))
        .map(|offset| {
            let date = start + Duration::days(offset);
            DailyCount {
                date,
                views: by_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn summary_days_bounds() {
        assert_eq!(SummaryParams::default().days().unwrap(), 30);
        assert!(SummaryParams { days: Some(0) }.days().is_err());
        assert!(SummaryParams { days: Some(366) }.days().is_err());
        assert_eq!(SummaryParams { days: Some(7) }.days().unwrap(), 7);
    }

    #[test]
    fn window_includes_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
        assert_eq!(window_start(now, 1), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(window_start(now, 7), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn daily_series_fills_gaps_with_zero() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let counts = [(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 4)];

        let series = fill_daily_series(start, 3, &counts);

        let views: Vec<i64> = series.iter().map(|d| d.views).collect();
        assert_eq!(views, [0, 0, 4]);
        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
