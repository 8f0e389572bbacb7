use super::time::TimeInput;
use crate::google_calendar::Calendar;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Whether an event blocks time on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    Opaque,
    Transparent,
}

/// One invited guest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

impl Attendee {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: i64,
}

/// Reminder settings as the service models them.
///
/// With no overrides the calendar's default reminders apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    #[serde(default = "default_use_default")]
    pub use_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Vec<ReminderOverride>>,
}

fn default_use_default() -> bool {
    true
}

impl Default for Reminders {
    fn default() -> Self {
        Self {
            use_default: true,
            overrides: None,
        }
    }
}

impl Reminders {
    /// Custom reminders replacing the calendar defaults
    pub fn with_overrides(overrides: Vec<ReminderOverride>) -> Self {
        Self {
            use_default: false,
            overrides: Some(overrides),
        }
    }
}

/// Every option an [`Event`](super::Event) can be built with
#[derive(Clone, Default)]
pub struct EventOptions {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<TimeInput>,
    pub end_time: Option<TimeInput>,
    pub location: Option<String>,
    pub transparency: Option<Transparency>,
    pub attendees: Vec<Attendee>,
    pub reminders: Reminders,
    pub calendar: Option<Arc<dyn Calendar>>,
    pub raw: Option<Value>,
    pub html_link: Option<String>,
    pub published_time: Option<String>,
    pub updated_time: Option<String>,
}
