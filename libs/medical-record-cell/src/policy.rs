use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_utils::extractor::ensure_owner;

/// Patients only see their own records. Every other role that got past the
/// role gate sees any patient.
pub fn ensure_patient_scope(
    user: &AuthUser,
    patient_id: i64,
    message: &str,
) -> Result<(), AppError> {
    if user.is(Role::Patient) {
        ensure_owner(user, patient_id, message)
    } else {
        Ok(())
    }
}
