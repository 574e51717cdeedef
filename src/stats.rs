use anyhow::Result;

use crate::api::{self, ApiError, BackendClient, StatsSnapshot};

/// Year offered by the year filter even when the backend knows no data yet.
pub const BASELINE_YEAR: i32 = 2025;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Optional year/month filter for `GET /api/stats`.
///
/// The same pair is the target of a save when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub year: Option<i32>,
    /// 1-indexed.
    pub month: Option<u32>,
}

impl StatsQuery {
    pub fn new(year: Option<i32>, month: Option<u32>) -> Self {
        Self { year, month }
    }

    /// Query-string pairs for the filters that are set, year first.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(month) = self.month {
            pairs.push(("month", month.to_string()));
        }
        pairs
    }

    /// Heading for a stats listing, e.g. "March 2024" or "all time".
    pub fn describe(&self) -> String {
        match (self.year, self.month) {
            (None, None) => "all time".into(),
            (Some(y), None) => y.to_string(),
            (None, Some(m)) => format!("{} (all years)", month_name(m)),
            (Some(y), Some(m)) => format!("{} {}", month_name(m), y),
        }
    }
}

/// English month name for 1..=12; anything else is shown as the number.
pub fn month_name(month: u32) -> String {
    match month {
        1..=12 => MONTH_NAMES[month as usize - 1].to_string(),
        _ => month.to_string(),
    }
}

/// Turn a stats fetch into the snapshot to display.
///
/// Any failure degrades to zero totals and an empty breakdown so the
/// previous numbers never linger on screen.
pub fn resolve_stats(result: Result<StatsSnapshot, ApiError>) -> StatsSnapshot {
    match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "stats load failed, showing zeros");
            StatsSnapshot::default()
        }
    }
}

/// Turn a years fetch into the ascending list for the year filter.
///
/// `baseline` is always present; a failed fetch leaves only the baseline.
pub fn resolve_years(result: Result<Vec<i32>, ApiError>, baseline: i32) -> Vec<i32> {
    let mut years = match result {
        Ok(years) => years,
        Err(e) => {
            tracing::warn!(error = %e, "years load failed, using baseline");
            Vec::new()
        }
    };
    years.push(baseline);
    years.sort_unstable();
    years.dedup();
    years
}

/// Fetch stats from synchronous code. Never fails on backend trouble; only
/// runtime construction can error.
pub fn load_stats_blocking(client: &BackendClient, query: &StatsQuery) -> Result<StatsSnapshot> {
    let rt = api::runtime()?;
    Ok(resolve_stats(rt.block_on(client.fetch_stats(query))))
}

pub fn load_years_blocking(client: &BackendClient, baseline: i32) -> Result<Vec<i32>> {
    let rt = api::runtime()?;
    Ok(resolve_years(rt.block_on(client.fetch_years()), baseline))
}
