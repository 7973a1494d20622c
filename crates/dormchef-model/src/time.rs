// SPDX-License-Identifier: Apache-2.0
use chrono::{DateTime, SecondsFormat, Utc};

pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically.
#[must_use]
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}
