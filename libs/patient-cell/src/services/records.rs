use appointment_cell::handlers::to_app_error;
use appointment_cell::models::Appointment;
use appointment_cell::AppointmentService;
use medical_record_cell::models::{MedicalHistoryView, PatientDiagnostic};
use medical_record_cell::policy::ensure_patient_scope;
use medical_record_cell::{DiagnosticService, MedicalHistoryService};
use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::ensure_owner;

/// Read-only views over one patient's records.
pub struct PatientRecordService {
    appointments: AppointmentService,
    diagnostics: DiagnosticService,
    histories: MedicalHistoryService,
}

impl PatientRecordService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            appointments: AppointmentService::new(config),
            diagnostics: DiagnosticService::new(config),
            histories: MedicalHistoryService::new(config),
        }
    }

    pub async fn appointments(
        &self,
        caller: &AuthUser,
        patient_id: i64,
    ) -> Result<Vec<Appointment>, AppError> {
        ensure_owner(caller, patient_id, "You can only view your own appointments.")?;

        self.appointments
            .for_patient(patient_id)
            .await
            .map_err(to_app_error)
    }

    pub async fn diagnostics(
        &self,
        caller: &AuthUser,
        patient_id: i64,
    ) -> Result<Vec<PatientDiagnostic>, AppError> {
        ensure_patient_scope(caller, patient_id, "You can only view your own diagnostics.")?;
        self.diagnostics.for_patient(patient_id).await
    }

    pub async fn medical_history(
        &self,
        caller: &AuthUser,
        patient_id: i64,
    ) -> Result<MedicalHistoryView, AppError> {
        ensure_patient_scope(caller, patient_id, "You can only view your own medical history.")?;

        self.histories
            .aggregate(patient_id)
            .await
            .map_err(|err| match err {
                AppError::NotFound(_) => AppError::NotFound(
                    "Medical history not found for the specified patient.".to_string(),
                ),
                other => other,
            })
    }
}
