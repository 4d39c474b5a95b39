pub mod profile;
pub mod records;

pub use profile::ProfileService;
pub use records::PatientRecordService;
