use anyhow::Result;
use tracing::debug;

use shared_models::auth::Role;
use shared_models::user::User;

use crate::postgrest::{in_list, DbClient};

/// Lookups on the `users` table needed by more than one cell.
impl DbClient {
    pub async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        self.select_one("users", &format!("id=eq.{}", user_id)).await
    }

    /// E-mails are stored lower-cased, so lookups are case-insensitive.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        let query = format!("email=eq.{}", urlencoding::encode(&email));
        self.select_one("users", &query).await
    }

    /// Returns the user only when it exists and carries `role`.
    pub async fn find_user_with_role(&self, user_id: i64, role: Role) -> Result<Option<User>> {
        let code: u8 = role.into();
        let query = format!("id=eq.{}&role=eq.{}", user_id, code);
        let user = self.select_one("users", &query).await?;
        if user.is_none() {
            debug!("No {} with id {}", role, user_id);
        }
        Ok(user)
    }

    pub async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select("users", &format!("id={}", in_list(ids))).await
    }

    pub async fn users_with_role(&self, role: Role) -> Result<Vec<User>> {
        let code: u8 = role.into();
        self.select("users", &format!("role=eq.{}&order=id.asc", code)).await
    }

    /// Whether a `doctor_assistants` row links the pair.
    pub async fn assistant_is_linked(&self, doctor_id: i64, assistant_id: i64) -> Result<bool> {
        let query = format!("doctor_id=eq.{}&assistant_id=eq.{}", doctor_id, assistant_id);
        self.exists("doctor_assistants", &query).await
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
