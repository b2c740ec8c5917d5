pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{CreatePatientRequest, Patient, UpdatePatientRequest};
pub use services::PatientService;
