pub mod calendar;
pub mod merge;

pub use calendar::CalendarService;
