pub mod assistant;
pub mod doctor;
pub mod scheduling;

pub use assistant::AssistantService;
pub use doctor::DoctorService;
pub use scheduling::ScheduleService;
