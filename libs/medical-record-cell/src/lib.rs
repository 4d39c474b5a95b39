pub mod handlers;
pub mod models;
pub mod policy;
pub mod router;
pub mod services;

pub use router::{diagnostic_routes, medical_history_routes, template_routes, treatment_routes};
pub use services::{DiagnosticService, MedicalHistoryService, TemplateService, TreatmentService};
