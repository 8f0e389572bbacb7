use gcal_event::google_calendar::GoogleCalendar;
use gcal_event::startup;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    let config = startup::load_config()?;
    let calendar = Arc::new(GoogleCalendar::new(config));
    info!("Listing upcoming events for calendar {}", calendar.calendar_id());

    let events = calendar.upcoming_events().await?;

    if events.is_empty() {
        println!("No upcoming events");
    }
    for event in &events {
        print!("{}", event);
    }

    Ok(())
}
