pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{CalendarEvent, DoctorRef, EventKind, DEFAULT_EVENT_COLOR};
pub use services::merge::merge;
pub use services::CalendarService;
