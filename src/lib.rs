pub mod config;
pub mod error;
pub mod event;
pub mod google_calendar;
pub mod startup;
pub mod utils;

pub use error::{Error, EventResult};
pub use event::Event;
