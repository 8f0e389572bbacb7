//! Mapping between [`Event`] and the calendar service's JSON.

use super::models::{Attendee, ReminderOverride, Reminders, Transparency};
use super::time::TimeValue;
use super::{Event, EventOptions};
use crate::error::{malformed_response_error, EventResult};
use crate::google_calendar::Calendar;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

#[derive(Serialize)]
struct EventPayload<'a> {
    summary: &'a str,
    description: &'a str,
    location: &'a str,
    start: DateTimePayload,
    end: DateTimePayload,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<AttendeePayload<'a>>,
    reminders: Reminders,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DateTimePayload {
    date_time: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttendeePayload<'a> {
    display_name: &'a str,
    email: &'a str,
    response_status: &'a str,
}

/// Build the create/update body for an event.
///
/// Unset text fields go out as empty strings and unset times as their
/// defaults relative to `now`.
pub fn to_payload(event: &Event, now: DateTime<Utc>) -> EventResult<Value> {
    let reminders = match &event.reminders.overrides {
        Some(overrides) => Reminders::with_overrides(overrides.clone()),
        None => Reminders::default(),
    };

    let payload = EventPayload {
        summary: event.title.as_deref().unwrap_or_default(),
        description: event.description.as_deref().unwrap_or_default(),
        location: event.location.as_deref().unwrap_or_default(),
        start: DateTimePayload {
            date_time: event.start_time_at(now),
        },
        end: DateTimePayload {
            date_time: event.end_time_at(now),
        },
        attendees: event
            .attendees
            .iter()
            .map(|attendee| AttendeePayload {
                display_name: attendee.display_name.as_deref().unwrap_or_default(),
                email: &attendee.email,
                response_status: attendee.response_status.as_deref().unwrap_or_default(),
            })
            .collect(),
        reminders,
    };

    Ok(serde_json::to_value(payload)?)
}

/// Build events from a feed response: either `{ "items": [...] }` or a single item
pub fn from_feed(response: &Value, calendar: Option<Arc<dyn Calendar>>) -> Vec<Event> {
    match response.get("items") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| from_item(item, calendar.clone()))
            .collect(),
        Some(_) => Vec::new(),
        None => vec![from_item(response, calendar)],
    }
}

/// Build one event from one feed item. Missing keys fall back to empty values.
pub fn from_item(item: &Value, calendar: Option<Arc<dyn Calendar>>) -> Event {
    let options = EventOptions {
        id: string_field(item, "id"),
        title: string_field(item, "summary"),
        description: string_field(item, "description"),
        location: string_field(item, "location"),
        transparency: item
            .get("transparency")
            .and_then(|t| serde_json::from_value::<Transparency>(t.clone()).ok()),
        attendees: item
            .get("attendees")
            .map(|a| list_field::<Attendee>(a, "attendee"))
            .unwrap_or_default(),
        reminders: item.get("reminders").map(reminders_field).unwrap_or_default(),
        calendar,
        raw: Some(item.clone()),
        html_link: string_field(item, "htmlLink"),
        updated_time: string_field(item, "updated"),
        ..Default::default()
    };

    let mut event = Event::without_times(options);
    event.start = time_field(item, "start");
    event.end = time_field(item, "end");
    event
}

/// Identity fields read back from a create response
pub struct SavedIdentity {
    pub raw: Value,
    pub id: String,
    pub html_link: Option<String>,
}

/// Read `id` and `htmlLink` out of a save response body
pub fn saved_identity(body: &str) -> EventResult<SavedIdentity> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|e| malformed_response_error(&format!("Response is not JSON: {}", e)))?;
    if !raw.is_object() {
        return Err(malformed_response_error("Response is not a JSON object"));
    }
    let id = string_field(&raw, "id")
        .ok_or_else(|| malformed_response_error("Response has no event id"))?;
    let html_link = string_field(&raw, "htmlLink");

    Ok(SavedIdentity { raw, id, html_link })
}

fn string_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Decode a list one element at a time, dropping only the elements that fail
fn list_field<T: DeserializeOwned>(value: &Value, what: &str) -> Vec<T> {
    let Some(elements) = value.as_array() else {
        warn!("Ignoring {} list on feed item: not an array", what);
        return Vec::new();
    };

    elements
        .iter()
        .filter_map(|element| match serde_json::from_value::<T>(element.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Dropping {} {} on feed item: {}", what, element, e);
                None
            }
        })
        .collect()
}

fn reminders_field(value: &Value) -> Reminders {
    let Some(reminders) = value.as_object() else {
        warn!("Ignoring reminders on feed item: not an object");
        return Reminders::default();
    };

    let use_default = reminders
        .get("useDefault")
        .and_then(|u| u.as_bool())
        .unwrap_or(true);
    let overrides = reminders
        .get("overrides")
        .map(|o| list_field::<ReminderOverride>(o, "reminder override"));

    Reminders {
        use_default,
        overrides,
    }
}

fn time_field(item: &Value, key: &str) -> Option<TimeValue> {
    let time = item.get(key).and_then(|t| t.as_object())?;
    let raw = time
        .get("dateTime")
        .and_then(|dt| dt.as_str())
        .filter(|s| !s.is_empty())
        .or_else(|| time.get("date").and_then(|d| d.as_str()))
        .filter(|s| !s.is_empty())?;

    match TimeValue::parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {} time on feed item: {}", key, e);
            None
        }
    }
}
