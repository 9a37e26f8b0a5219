use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Calls made in one UTC calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub month: String,
    pub count: u64,
}

impl UsageRecord {
    pub fn empty(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            count: 0,
        }
    }
}

/// `YYYY-MM` of `now` in UTC.
pub fn month_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}
