pub mod codec;
pub mod models;
pub mod time;

pub use models::{Attendee, EventOptions, ReminderOverride, Reminders, Transparency};
pub use time::{TimeInput, TimeValue};

use crate::error::{Error, EventResult};
use crate::google_calendar::Calendar;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// A single calendar event.
///
/// Start and end are optional: while unset they read as "now" and
/// "now + 1 hour", evaluated on every read and never written back.
#[derive(Clone, Default)]
pub struct Event {
    id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    start: Option<TimeValue>,
    end: Option<TimeValue>,
    pub transparency: Option<Transparency>,
    pub attendees: Vec<Attendee>,
    pub reminders: Reminders,
    /// Calendar the event is saved to and deleted from
    pub calendar: Option<Arc<dyn Calendar>>,
    raw: Option<Value>,
    html_link: Option<String>,
    published_time: Option<String>,
    updated_time: Option<String>,
}

impl Event {
    /// Build an event from options, normalizing any start/end input
    pub fn new(mut options: EventOptions) -> EventResult<Self> {
        let start_time = options.start_time.take();
        let end_time = options.end_time.take();

        let mut event = Self::without_times(options);
        if let Some(start) = start_time {
            event.set_start_time(start)?;
        }
        if let Some(end) = end_time {
            event.set_end_time(end)?;
        }
        Ok(event)
    }

    /// Build events from a feed response (`{ "items": [...] }` or a single item)
    pub fn build_from_google_feed(
        response: &Value,
        calendar: Option<Arc<dyn Calendar>>,
    ) -> Vec<Event> {
        codec::from_feed(response, calendar)
    }

    fn without_times(options: EventOptions) -> Self {
        Self {
            id: options.id.filter(|id| !id.is_empty()),
            title: options.title,
            description: options.description,
            location: options.location,
            start: None,
            end: None,
            transparency: options.transparency,
            attendees: options.attendees,
            reminders: options.reminders,
            calendar: options.calendar,
            raw: options.raw,
            html_link: options.html_link,
            published_time: options.published_time,
            updated_time: options.updated_time,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Last service representation of this event
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn html_link(&self) -> Option<&str> {
        self.html_link.as_deref()
    }

    pub fn published_time(&self) -> Option<&str> {
        self.published_time.as_deref()
    }

    pub fn updated_time(&self) -> Option<&str> {
        self.updated_time.as_deref()
    }

    /// True until the service has assigned an id
    pub fn is_new_event(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_transparent(&self) -> bool {
        self.transparency == Some(Transparency::Transparent)
    }

    pub fn is_opaque(&self) -> bool {
        self.transparency == Some(Transparency::Opaque)
    }

    // Time model

    /// The stored start, if one has been set
    pub fn start_value(&self) -> Option<&TimeValue> {
        self.start.as_ref()
    }

    /// The stored end, if one has been set
    pub fn end_value(&self) -> Option<&TimeValue> {
        self.end.as_ref()
    }

    /// Start as sent to the service: ISO-8601 UTC, or `YYYY-MM-DD` for all-day events
    pub fn start_time(&self) -> String {
        self.start_time_at(Utc::now())
    }

    /// End as sent to the service: ISO-8601 UTC, or `YYYY-MM-DD` for all-day events
    pub fn end_time(&self) -> String {
        self.end_time_at(Utc::now())
    }

    pub fn start_time_at(&self, now: DateTime<Utc>) -> String {
        self.start_or_default(now).to_string()
    }

    pub fn end_time_at(&self, now: DateTime<Utc>) -> String {
        self.end_or_default(now).to_string()
    }

    pub fn set_start_time(&mut self, value: impl Into<TimeInput>) -> EventResult<()> {
        self.start = Some(TimeValue::Instant(value.into().to_instant()?));
        Ok(())
    }

    pub fn set_end_time(&mut self, value: impl Into<TimeInput>) -> EventResult<()> {
        self.end = Some(TimeValue::Instant(value.into().to_instant()?));
        Ok(())
    }

    /// Seconds from start to end. Negative when the end precedes the start.
    pub fn duration(&self) -> i64 {
        self.duration_at(Utc::now())
    }

    pub fn duration_at(&self, now: DateTime<Utc>) -> i64 {
        time::duration_seconds(&self.start_or_default(now), &self.end_or_default(now))
    }

    /// Whole days starting at local midnight
    pub fn is_all_day(&self) -> bool {
        self.is_all_day_at(Utc::now())
    }

    pub fn is_all_day_at(&self, now: DateTime<Utc>) -> bool {
        time::spans_whole_days(&self.start_or_default(now), &self.end_or_default(now))
    }

    /// Turn this into a one-day all-day event on the date of `value`.
    ///
    /// Any time of day previously stored is discarded.
    pub fn set_all_day(&mut self, value: impl Into<TimeInput>) -> EventResult<()> {
        let date = value.into().to_date()?;
        let next = date
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| Error::InvalidTimeInput(format!("No day after {}", date)))?;

        self.start = Some(TimeValue::AllDayDate(date));
        self.end = Some(TimeValue::AllDayDate(next));
        Ok(())
    }

    fn start_or_default(&self, now: DateTime<Utc>) -> TimeValue {
        self.start.unwrap_or_else(|| time::default_start(now))
    }

    fn end_or_default(&self, now: DateTime<Utc>) -> TimeValue {
        self.end.unwrap_or_else(|| time::default_end(now))
    }

    // Wire format

    /// Create/update body for the service
    pub fn to_json(&self) -> EventResult<String> {
        Ok(codec::to_payload(self, Utc::now())?.to_string())
    }

    // Lifecycle

    /// Save through the owning calendar.
    ///
    /// On the first save the service response becomes the source of `raw`,
    /// `id` and `html_link`.
    pub async fn save(&mut self) -> EventResult<()> {
        let calendar = self.calendar.clone().ok_or(Error::MissingCollaborator)?;

        debug!("Saving event {:?}", self.id);
        let response = calendar.save_event(self).await?;

        if self.is_new_event() {
            let identity = codec::saved_identity(&response.body)?;
            info!("Event created with id {}", identity.id);
            self.raw = Some(identity.raw);
            self.id = Some(identity.id);
            self.html_link = identity.html_link;
        }

        Ok(())
    }

    /// Delete through the owning calendar and forget the id.
    ///
    /// Collaborator errors are returned before the id is cleared.
    pub async fn delete(&mut self) -> EventResult<()> {
        let calendar = self.calendar.clone().ok_or(Error::MissingCollaborator)?;

        debug!("Deleting event {:?}", self.id);
        calendar.delete_event(self).await?;
        self.id = None;

        Ok(())
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("location", &self.location)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("transparency", &self.transparency)
            .field("attendees", &self.attendees)
            .field("reminders", &self.reminders)
            .field("has_calendar", &self.calendar.is_some())
            .field("html_link", &self.html_link)
            .field("published_time", &self.published_time)
            .field("updated_time", &self.updated_time)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Event Id '{}'", self.id.as_deref().unwrap_or_default())?;
        writeln!(f, "\tTitle: {}", self.title.as_deref().unwrap_or_default())?;
        writeln!(f, "\tStarts: {}", self.start_time())?;
        writeln!(f, "\tEnds: {}", self.end_time())?;
        writeln!(f, "\tLocation: {}", self.location.as_deref().unwrap_or_default())?;
        writeln!(f, "\tDescription: {}", self.description.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, TimeZone};
    use serde_json::json;

    #[test]
    fn test_set_start_time_from_timestamp() {
        let mut event = Event::default();
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        event.set_start_time(start).unwrap();

        assert_eq!(event.start_time(), "2024-01-02T09:00:00Z");
        assert_eq!(event.start_value(), Some(&TimeValue::Instant(start)));
    }

    #[test]
    fn test_set_start_time_from_string_normalizes_to_utc() {
        let mut event = Event::default();
        event.set_start_time("2024-01-02T11:30:00+02:00").unwrap();
        assert_eq!(event.start_time(), "2024-01-02T09:30:00Z");
    }

    #[test]
    fn test_set_start_time_from_local_string() {
        let mut event = Event::default();
        event.set_start_time("2024-01-02 09:30").unwrap();

        let expected = Local.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        assert_eq!(
            event.start_time(),
            crate::utils::time::format_instant(&expected.with_timezone(&Utc))
        );
    }

    #[test]
    fn test_set_end_time_rejects_non_time_values() {
        let mut event = Event::default();
        assert!(matches!(
            event.set_end_time(json!(42)),
            Err(Error::InvalidTimeInput(_))
        ));
        assert!(matches!(
            event.set_end_time("next-ish week"),
            Err(Error::InvalidTimeInput(_))
        ));
        assert!(event.end_value().is_none());
    }

    #[test]
    fn test_unset_times_default_lazily() {
        let event = Event::default();
        let before = Utc::now();
        let start = DateTime::parse_from_rfc3339(&event.start_time())
            .unwrap()
            .with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339(&event.end_time())
            .unwrap()
            .with_timezone(&Utc);
        let after = Utc::now();

        assert!(start >= before && start <= after);
        assert!(end >= before + Duration::hours(1) && end <= after + Duration::hours(1));
        assert!(event.start_value().is_none());
        assert!(event.end_value().is_none());
    }

    #[test]
    fn test_unset_times_use_supplied_clock() {
        let event = Event::default();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        assert_eq!(event.start_time_at(now), "2024-06-01T12:00:00Z");
        assert_eq!(event.end_time_at(now), "2024-06-01T13:00:00Z");
        assert_eq!(event.duration_at(now), 3600);
        assert_eq!(event.duration(), 3600);
    }

    #[test]
    fn test_duration() {
        let mut event = Event::default();
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        event.set_start_time(start).unwrap();
        event.set_end_time(start + Duration::seconds(3600)).unwrap();
        assert_eq!(event.duration(), 3600);

        event.set_end_time(start - Duration::minutes(30)).unwrap();
        assert_eq!(event.duration(), -1800);
    }

    #[test]
    fn test_set_all_day() {
        let mut event = Event::default();
        event.set_start_time("2024-01-02T09:30:00Z").unwrap();
        event.set_all_day("2024-01-15").unwrap();

        assert_eq!(event.start_time(), "2024-01-15");
        assert_eq!(event.end_time(), "2024-01-16");
        assert_eq!(event.duration(), 86400);
        assert!(event.is_all_day());
    }

    #[test]
    fn test_set_all_day_from_timestamp_discards_time_of_day() {
        let mut event = Event::default();
        let when = Utc.with_ymd_and_hms(2024, 2, 28, 17, 45, 0).unwrap();
        event.set_all_day(when).unwrap();

        assert_eq!(event.start_time(), "2024-02-28");
        assert_eq!(event.end_time(), "2024-02-29");
        assert!(event.is_all_day());

        event.set_all_day(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()).unwrap();
        assert_eq!(event.end_time(), "2024-01-01");
    }

    #[test]
    fn test_is_all_day_for_instants() {
        let mut event = Event::default();
        let midnight = Local.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        event.set_start_time(midnight).unwrap();
        event.set_end_time(midnight + Duration::days(2)).unwrap();
        assert!(event.is_all_day());

        event.set_start_time(midnight + Duration::hours(1)).unwrap();
        event.set_end_time(midnight + Duration::hours(25)).unwrap();
        assert!(!event.is_all_day());

        event.set_start_time(midnight).unwrap();
        event.set_end_time(midnight + Duration::hours(3)).unwrap();
        assert!(!event.is_all_day());
    }

    #[test]
    fn test_new_with_options() {
        let event = Event::new(EventOptions {
            id: Some("evt-1".to_string()),
            title: Some("Retro".to_string()),
            start_time: Some("2024-01-02T09:00:00Z".into()),
            end_time: Some("2024-01-02T10:30:00Z".into()),
            transparency: Some(Transparency::Opaque),
            published_time: Some("2023-12-01T00:00:00Z".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(event.id(), Some("evt-1"));
        assert!(!event.is_new_event());
        assert!(event.is_opaque());
        assert!(!event.is_transparent());
        assert_eq!(event.duration(), 5400);
        assert_eq!(event.published_time(), Some("2023-12-01T00:00:00Z"));
    }

    #[test]
    fn test_empty_id_counts_as_new() {
        let event = Event::new(EventOptions {
            id: Some(String::new()),
            ..Default::default()
        })
        .unwrap();

        assert!(event.is_new_event());
        assert_eq!(event.id(), None);
    }

    #[test]
    fn test_new_rejects_bad_time_option() {
        let result = Event::new(EventOptions {
            start_time: Some(json!([2024, 1, 2]).into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidTimeInput(_))));
    }

    #[test]
    fn test_to_json_is_valid_json() {
        let mut event = Event::default();
        event.title = Some("Say \"hi\"".to_string());
        let body: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(body["summary"], "Say \"hi\"");
    }

    #[test]
    fn test_display() {
        let mut event = Event::default();
        event.title = Some("Standup".to_string());
        event.set_all_day("2024-01-02").unwrap();

        let rendered = event.to_string();
        assert!(rendered.starts_with("Event Id ''\n"));
        assert!(rendered.contains("\tTitle: Standup\n"));
        assert!(rendered.contains("\tStarts: 2024-01-02\n"));
        assert!(rendered.contains("\tEnds: 2024-01-03\n"));
    }
}
