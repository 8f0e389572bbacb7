use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Invalid time input: {0}")]
    #[diagnostic(
        code(gcal_event::invalid_time_input),
        help("pass a timestamp or a parsable date/time string")
    )]
    InvalidTimeInput(String),

    #[error("Event has no calendar to delegate to")]
    #[diagnostic(code(gcal_event::missing_collaborator))]
    MissingCollaborator,

    #[error("Malformed response: {0}")]
    #[diagnostic(code(gcal_event::malformed_response))]
    MalformedResponse(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(gcal_event::google_calendar))]
    GoogleCalendar(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(gcal_event::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gcal_event::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(gcal_event::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(gcal_event::serialization))]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type EventResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create time input errors
pub fn invalid_time_error(message: &str) -> Error {
    Error::InvalidTimeInput(message.to_string())
}

/// Helper to create malformed response errors
pub fn malformed_response_error(message: &str) -> Error {
    Error::MalformedResponse(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}
