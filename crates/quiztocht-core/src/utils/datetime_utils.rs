/*
Copyright 2024, Zep Software, Inc.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Date and time utilities

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Get current UTC time
pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a creation instant the way messages store it: RFC 3339, milliseconds, `Z` suffix
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
///
/// Accepts full RFC 3339 timestamps and bare `YYYY-MM-DD` dates, the latter
/// taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Calendar date used in export file names
pub fn format_export_date(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}
