mod client;

pub use client::GoogleCalendar;

use crate::error::EventResult;
use crate::event::Event;
use async_trait::async_trait;

/// What the calendar service answered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalendarResponse {
    pub status: u16,
    pub body: String,
}

/// Persistence for events.
///
/// Events hold an `Arc<dyn Calendar>` and delegate `save`/`delete` to it.
/// Timeouts and retries are the implementor's business.
#[async_trait]
pub trait Calendar: Send + Sync {
    /// Create the event if it has no id, otherwise update it
    async fn save_event(&self, event: &Event) -> EventResult<CalendarResponse>;

    /// Remove the event; the response body is not used
    async fn delete_event(&self, event: &Event) -> EventResult<CalendarResponse>;
}
