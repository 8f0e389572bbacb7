use super::{Calendar, CalendarResponse};
use crate::config::Config;
use crate::error::{google_calendar_error, EventResult};
use crate::event::{codec, Event};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Google Calendar REST client for a single calendar
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    config: Config,
    client: Client,
}

impl GoogleCalendar {
    pub fn new(config: Config) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Use a preconfigured reqwest client (timeouts, proxies)
    pub fn with_client(config: Config, client: Client) -> Self {
        Self { config, client }
    }

    pub fn calendar_id(&self) -> &str {
        &self.config.calendar_id
    }

    /// Events from now until the configured lookahead, expanded and ordered by start
    pub async fn upcoming_events(self: &Arc<Self>) -> EventResult<Vec<Event>> {
        let (time_min, time_max) = self.lookahead_window(Utc::now())?;

        let mut url = self.events_url(None)?;
        url.query_pairs_mut()
            .append_pair("timeMin", &time_min)
            .append_pair("timeMax", &time_max)
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self.send(self.client.get(url), "fetch events").await?;
        let feed = parse_body(&response.body)?;

        let calendar: Arc<dyn Calendar> = self.clone();
        let events = Event::build_from_google_feed(&feed, Some(calendar));
        info!("Fetched {} upcoming events", events.len());
        Ok(events)
    }

    /// Fetch one event by its id
    pub async fn find_event_by_id(self: &Arc<Self>, id: &str) -> EventResult<Event> {
        let url = self.events_url(Some(id))?;
        let response = self.send(self.client.get(url), "fetch event").await?;
        let item = parse_body(&response.body)?;

        let calendar: Arc<dyn Calendar> = self.clone();
        Ok(codec::from_item(&item, Some(calendar)))
    }

    /// `timeMin`/`timeMax` for a listing starting at `now`
    fn lookahead_window(&self, now: DateTime<Utc>) -> EventResult<(String, String)> {
        let days = self.config.lookahead_days;
        let time_max = Duration::try_days(days)
            .and_then(|lookahead| now.checked_add_signed(lookahead))
            .ok_or_else(|| {
                google_calendar_error(&format!("Lookahead of {} days is out of range", days))
            })?;

        Ok((now.to_rfc3339(), time_max.to_rfc3339()))
    }

    fn events_url(&self, event_id: Option<&str>) -> EventResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| google_calendar_error("API base URL cannot take a path"))?;
            segments
                .pop_if_empty()
                .extend(["calendars", self.config.calendar_id.as_str(), "events"]);
            if let Some(id) = event_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> EventResult<CalendarResponse> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to {}: {}", action, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(google_calendar_error(&format!(
                "Failed to {}: HTTP {} - {}",
                action, status, body
            )));
        }

        Ok(CalendarResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Calendar for GoogleCalendar {
    async fn save_event(&self, event: &Event) -> EventResult<CalendarResponse> {
        let payload = codec::to_payload(event, Utc::now())?;

        let request = match event.id() {
            None => {
                debug!("Creating event on calendar {}", self.config.calendar_id);
                self.client.post(self.events_url(None)?)
            }
            Some(id) => {
                debug!("Updating event {} on calendar {}", id, self.config.calendar_id);
                self.client.put(self.events_url(Some(id))?)
            }
        };

        self.send(request.json(&payload), "save event").await
    }

    async fn delete_event(&self, event: &Event) -> EventResult<CalendarResponse> {
        let id = event
            .id()
            .ok_or_else(|| google_calendar_error("Cannot delete an event without an id"))?;

        debug!("Deleting event {} from calendar {}", id, self.config.calendar_id);
        self.send(self.client.delete(self.events_url(Some(id))?), "delete event")
            .await
    }
}

fn parse_body(body: &str) -> EventResult<Value> {
    serde_json::from_str(body)
        .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))
}
