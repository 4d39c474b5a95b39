pub mod diagnostic;
pub mod history;
pub mod template;
pub mod treatment;

pub use diagnostic::DiagnosticService;
pub use history::MedicalHistoryService;
pub use template::TemplateService;
pub use treatment::TreatmentService;
