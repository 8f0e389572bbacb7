use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

/// Formats carrying an explicit UTC offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M%z",
];

/// Formats without an offset, read as local wall-clock time
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M",
];

/// Date-only formats, read as local midnight
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse a bare `YYYY-MM-DD` calendar date
pub fn parse_bare_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse a date in any of the accepted date-only formats
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Parse a date/time string permissively, keeping the offset it was written in.
///
/// Accepts RFC 3339 / ISO-8601, RFC 2822 and a handful of common layouts.
/// Strings without an offset are taken as local time, and date-only strings
/// resolve to local midnight.
pub fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt);
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
    {
        return Some(dt);
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(local_to_fixed(&naive));
    }

    let date = parse_date(value)?;
    Some(local_to_fixed(&date.and_time(NaiveTime::MIN)))
}

/// Local midnight of a calendar date.
///
/// Falls back to the earliest candidate when midnight is ambiguous and to UTC
/// midnight when the local clock skips it.
pub fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    resolve_local(&date.and_time(NaiveTime::MIN))
}

/// Format an instant the way the calendar service expects it
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

fn resolve_local(naive: &NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(naive) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => naive.and_utc().with_timezone(&Local),
    }
}

fn local_to_fixed(naive: &NaiveDateTime) -> DateTime<FixedOffset> {
    let local = resolve_local(naive);
    local.with_timezone(&local.offset().fix())
}
