use crate::error::{invalid_time_error, EventResult};
use crate::utils::time::{format_instant, local_midnight, parse_bare_date, parse_datetime};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde_json::Value;
use std::fmt;

/// Seconds in one calendar day
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A stored start or end time.
///
/// Timed events keep a UTC instant. All-day events keep a bare calendar
/// date which renders as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeValue {
    Instant(DateTime<Utc>),
    AllDayDate(NaiveDate),
}

impl TimeValue {
    /// Parse a wire value. Bare dates stay all-day dates, anything else goes
    /// through the permissive parser and is normalized to UTC.
    pub fn parse(value: &str) -> EventResult<Self> {
        if let Some(date) = parse_bare_date(value) {
            return Ok(TimeValue::AllDayDate(date));
        }
        parse_datetime(value)
            .map(|dt| TimeValue::Instant(dt.with_timezone(&Utc)))
            .ok_or_else(|| invalid_time_error(&format!("Unparsable date/time string: {:?}", value)))
    }

    /// Resolve to an instant; all-day dates are read as local midnight
    pub fn to_instant(&self) -> DateTime<Utc> {
        match self {
            TimeValue::Instant(instant) => *instant,
            TimeValue::AllDayDate(date) => local_midnight(*date).with_timezone(&Utc),
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Instant(instant) => f.write_str(&format_instant(instant)),
            TimeValue::AllDayDate(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Anything a caller may hand to a time setter.
///
/// `Json` exists for values coming out of untyped sources; only JSON strings
/// are accepted from it.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    Timestamp(DateTime<FixedOffset>),
    Date(NaiveDate),
    Text(String),
    Json(Value),
}

impl TimeInput {
    /// Normalize into a UTC instant
    pub fn to_instant(&self) -> EventResult<DateTime<Utc>> {
        Ok(self.to_timestamp()?.with_timezone(&Utc))
    }

    /// The calendar date of the input, in the offset it was written in
    pub fn to_date(&self) -> EventResult<NaiveDate> {
        match self {
            TimeInput::Date(date) => Ok(*date),
            _ => {
                if let Some(date) = self.as_text().and_then(parse_bare_date) {
                    return Ok(date);
                }
                Ok(self.to_timestamp()?.date_naive())
            }
        }
    }

    fn to_timestamp(&self) -> EventResult<DateTime<FixedOffset>> {
        match self {
            TimeInput::Timestamp(dt) => Ok(*dt),
            TimeInput::Date(date) => {
                let midnight = local_midnight(*date);
                Ok(midnight.with_timezone(&midnight.offset().fix()))
            }
            TimeInput::Text(_) | TimeInput::Json(Value::String(_)) => {
                let text = self.as_text().unwrap_or_default();
                parse_datetime(text).ok_or_else(|| {
                    invalid_time_error(&format!("Unparsable date/time string: {:?}", text))
                })
            }
            TimeInput::Json(other) => Err(invalid_time_error(&format!(
                "Expected a timestamp or a string, got {}",
                other
            ))),
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            TimeInput::Text(text) => Some(text),
            TimeInput::Json(Value::String(text)) => Some(text),
            _ => None,
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimeInput {
    fn from(dt: DateTime<Tz>) -> Self {
        let offset = dt.offset().fix();
        TimeInput::Timestamp(dt.with_timezone(&offset))
    }
}

impl From<NaiveDate> for TimeInput {
    fn from(date: NaiveDate) -> Self {
        TimeInput::Date(date)
    }
}

impl From<&str> for TimeInput {
    fn from(text: &str) -> Self {
        TimeInput::Text(text.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(text: String) -> Self {
        TimeInput::Text(text)
    }
}

impl From<Value> for TimeInput {
    fn from(value: Value) -> Self {
        TimeInput::Json(value)
    }
}

/// Start time used when none has been set
pub fn default_start(now: DateTime<Utc>) -> TimeValue {
    TimeValue::Instant(now)
}

/// End time used when none has been set: one hour after `now`
pub fn default_end(now: DateTime<Utc>) -> TimeValue {
    TimeValue::Instant(now + Duration::hours(1))
}

/// Signed span from `start` to `end` in whole seconds
pub fn duration_seconds(start: &TimeValue, end: &TimeValue) -> i64 {
    end.to_instant()
        .signed_duration_since(start.to_instant())
        .num_seconds()
}

/// Whether a span covers whole days starting at local midnight
pub fn spans_whole_days(start: &TimeValue, end: &TimeValue) -> bool {
    if duration_seconds(start, end) % SECONDS_PER_DAY != 0 {
        return false;
    }
    let start = start.to_instant();
    let local_date = start.with_timezone(&chrono::Local).date_naive();
    local_midnight(local_date).with_timezone(&Utc) == start
}
