pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Availability, CreateAvailabilityRequest, UpdateAvailabilityRequest};
pub use services::AvailabilityService;
