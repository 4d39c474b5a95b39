pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::{assistant_routes, doctor_routes};
