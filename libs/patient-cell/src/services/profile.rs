use serde_json::Value;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_models::user::{User, UserDto};

use crate::models::UpdateUserRequest;

pub struct ProfileService {
    db: DbClient,
}

impl ProfileService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
        }
    }

    pub async fn get(&self, user_id: i64) -> Result<UserDto, AppError> {
        self.db
            .find_user(user_id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
    }

    /// A user edits their own profile; doctors may edit anyone's.
    pub async fn update(
        &self,
        caller: &AuthUser,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> Result<(), AppError> {
        if caller.id != user_id && !caller.is(Role::Doctor) {
            return Err(AppError::Unauthorized(
                "You can only update your own profile.".to_string(),
            ));
        }

        if self.db.find_user(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found.".to_string()));
        }

        let changes = request.changes();
        if changes.is_empty() {
            debug!("No profile changes for user {}", user_id);
            return Ok(());
        }

        let _: Vec<User> = self
            .db
            .update("users", &format!("id=eq.{}", user_id), Value::Object(changes))
            .await?;

        info!("User {} updated by {}", user_id, caller.id);
        Ok(())
    }
}
