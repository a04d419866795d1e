//! Monthly usage accounting.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::plan::Plan;

/// Plan and consumption as shown to the user ("3/10 analyses this month").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub plan: Plan,
    /// `None` means unlimited.
    pub monthly_limit: Option<u32>,
    pub used_this_month: u32,
    pub max_screenshots: usize,
}

impl UsageSummary {
    pub fn new(plan: Plan, used_this_month: u32) -> Self {
        let limits = plan.limits();
        Self {
            plan,
            monthly_limit: limits.monthly_analyses,
            used_this_month,
            max_screenshots: limits.max_screenshots,
        }
    }

    pub fn remaining(&self) -> Option<u32> {
        self.monthly_limit
            .map(|limit| limit.saturating_sub(self.used_this_month))
    }
}

/// Midnight UTC on the first day of `now`'s month.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0));
    match first {
        Some(naive) => Utc.from_utc_datetime(&naive),
        // Unreachable for valid timestamps; fall back to the instant itself.
        None => now,
    }
}
