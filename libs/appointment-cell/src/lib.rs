pub mod handlers;
pub mod models;
pub mod policy;
pub mod router;
pub mod services;

pub use router::appointment_routes;
pub use services::AppointmentService;
