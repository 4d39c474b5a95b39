pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::{patient_routes, user_routes};
pub use services::{PatientRecordService, ProfileService};
