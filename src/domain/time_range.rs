// Query window shared by the proxy and the dashboard
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;

/// Longest window the security statistics API accepts.
pub const SECURITY_MAX_SPAN_DAYS: i64 = 14;
/// Clock-skew allowance on top of the security window.
pub const SECURITY_SPAN_TOLERANCE_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    #[serde(rename = "startTime", serialize_with = "serialize_upstream")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endTime", serialize_with = "serialize_upstream")]
    pub end: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TimeWindowError {
    #[error("Invalid {field}: {value}")]
    Unparsable { field: &'static str, value: String },
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The 24 hours before `now`.
    pub fn last_day(now: DateTime<Utc>) -> Self {
        Self::new(now - Duration::hours(24), now)
    }

    /// Parse optional RFC 3339 bounds, defaulting to the last 24 hours.
    pub fn from_query(
        start: Option<&str>,
        end: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, TimeWindowError> {
        let default = Self::last_day(now);
        let start = match start.filter(|s| !s.is_empty()) {
            Some(s) => parse_instant("startTime", s)?,
            None => default.start,
        };
        let end = match end.filter(|s| !s.is_empty()) {
            Some(s) => parse_instant("endTime", s)?,
            None => default.end,
        };
        Ok(Self::new(start, end))
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Whether the window is too long for the security statistics API.
    pub fn exceeds_security_limit(&self) -> bool {
        self.span()
            > Duration::days(SECURITY_MAX_SPAN_DAYS) + Duration::seconds(SECURITY_SPAN_TOLERANCE_SECS)
    }
}

fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>, TimeWindowError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| TimeWindowError::Unparsable {
            field,
            value: value.to_string(),
        })
}

/// Second-precision UTC timestamp in the form the upstream API expects.
pub fn format_upstream(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn serialize_upstream<S: serde::Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_upstream(instant))
}
