use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use gcal_event::error::Error;
use gcal_event::event::{Attendee, Event, ReminderOverride, Reminders};
use serde_json::{json, Value};

/// Setting a start time reads back as the same instant in UTC
#[test]
fn test_start_time_reads_back() {
    let instants = [
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap(),
        Utc.with_ymd_and_hms(2030, 7, 15, 0, 0, 0).unwrap() + Duration::milliseconds(250),
    ];

    for instant in instants {
        let mut event = Event::default();
        event.set_start_time(instant).unwrap();
        assert_eq!(
            event.start_time(),
            instant.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
        );

        let mut event = Event::default();
        event.set_start_time(instant.to_rfc3339()).unwrap();
        let parsed = DateTime::parse_from_rfc3339(&event.start_time()).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), instant);
    }
}

#[test]
fn test_set_all_day_is_all_day() {
    let dates = [
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    ];

    for date in dates {
        let mut event = Event::default();
        event.set_all_day(date).unwrap();
        assert!(event.is_all_day(), "{date}");

        let mut event = Event::default();
        event.set_all_day(date.format("%Y-%m-%d").to_string()).unwrap();
        assert!(event.is_all_day(), "{date}");
    }
}

#[test]
fn test_one_hour_duration() {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
    let mut event = Event::default();
    event.set_start_time(start).unwrap();
    event.set_end_time(start + Duration::seconds(3600)).unwrap();
    assert_eq!(event.duration(), 3600);
}

#[test]
fn test_encode_decode_round_trip() {
    let mut event = Event::default();
    event.title = Some("Design review".to_string());
    event.description = Some("Walk through the new layout".to_string());
    event.location = Some("Room 2".to_string());
    event.attendees = vec![
        Attendee {
            email: "ada@example.com".to_string(),
            display_name: Some("Ada".to_string()),
            response_status: Some("accepted".to_string()),
        },
        Attendee {
            email: "grace@example.com".to_string(),
            display_name: Some("Grace".to_string()),
            response_status: Some("tentative".to_string()),
        },
    ];
    event.reminders = Reminders::with_overrides(vec![ReminderOverride {
        method: "email".to_string(),
        minutes: 30,
    }]);

    let encoded: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
    let decoded = Event::build_from_google_feed(&encoded, None);

    assert_eq!(decoded.len(), 1);
    let decoded = &decoded[0];
    assert_eq!(decoded.title, event.title);
    assert_eq!(decoded.description, event.description);
    assert_eq!(decoded.location, event.location);
    assert_eq!(decoded.attendees, event.attendees);
    assert_eq!(decoded.reminders.overrides, event.reminders.overrides);
}

#[test]
fn test_decode_standup_feed() {
    let feed = json!({
        "items": [{
            "id": "e1",
            "summary": "Standup",
            "start": { "dateTime": "2024-01-02T09:00:00Z" },
            "end": { "dateTime": "2024-01-02T09:15:00Z" }
        }]
    });

    let events = Event::build_from_google_feed(&feed, None);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title.as_deref(), Some("Standup"));
    assert_eq!(events[0].duration(), 900);
}

#[tokio::test]
async fn test_save_without_calendar_fails() {
    let mut event = Event::default();
    assert!(matches!(event.save().await, Err(Error::MissingCollaborator)));
}

#[test]
fn test_non_time_input_rejected() {
    let mut event = Event::default();
    assert!(matches!(
        event.set_end_time(json!(42)),
        Err(Error::InvalidTimeInput(_))
    ));
}

#[test]
fn test_fresh_event_defaults_near_now() {
    let event = Event::default();

    let start = DateTime::parse_from_rfc3339(&event.start_time())
        .unwrap()
        .with_timezone(&Utc);
    let end = DateTime::parse_from_rfc3339(&event.end_time())
        .unwrap()
        .with_timezone(&Utc);

    let now = Utc::now();
    assert!((now - start).num_seconds().abs() <= 5);
    assert!((now + Duration::hours(1) - end).num_seconds().abs() <= 5);
}
