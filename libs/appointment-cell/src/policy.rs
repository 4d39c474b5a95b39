use shared_models::auth::{AuthUser, Role};

use crate::models::Appointment;

/// Owning doctor, or an assistant linked to that doctor.
pub fn can_update(user: &AuthUser, appointment: &Appointment, assistant_linked: bool) -> bool {
    match user.role {
        Role::Doctor => appointment.doctor_id == user.id,
        Role::Assistant => assistant_linked,
        Role::Patient => false,
    }
}

/// As `can_update`, plus the patient the appointment was booked for.
pub fn can_cancel(user: &AuthUser, appointment: &Appointment, assistant_linked: bool) -> bool {
    match user.role {
        Role::Patient => appointment.patient_id == user.id,
        _ => can_update(user, appointment, assistant_linked),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment() -> Appointment {
        Appointment {
            id: 1,
            appointment_date: "2025-03-10T09:30:00Z".parse().unwrap(),
            doctor_id: 10,
            patient_id: 20,
            notes: None,
        }
    }

    fn user(id: i64, role: Role) -> AuthUser {
        AuthUser {
            id,
            email: String::new(),
            role,
        }
    }

    #[test]
    fn test_update_rules() {
        let appt = appointment();
        assert!(can_update(&user(10, Role::Doctor), &appt, false));
        assert!(!can_update(&user(11, Role::Doctor), &appt, false));
        assert!(can_update(&user(30, Role::Assistant), &appt, true));
        assert!(!can_update(&user(30, Role::Assistant), &appt, false));
        assert!(!can_update(&user(20, Role::Patient), &appt, false));
    }

    #[test]
    fn test_cancel_rules() {
        let appt = appointment();
        assert!(can_cancel(&user(20, Role::Patient), &appt, false));
        assert!(!can_cancel(&user(21, Role::Patient), &appt, false));
        assert!(can_cancel(&user(10, Role::Doctor), &appt, false));
        assert!(can_cancel(&user(30, Role::Assistant), &appt, true));
        assert!(!can_cancel(&user(30, Role::Assistant), &appt, false));
    }
}
