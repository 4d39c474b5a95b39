pub mod auth;
pub mod error;
pub mod user;

pub use auth::{AuthUser, JwtClaims, Role};
pub use error::{AppError, ValidationErrors};
pub use user::{User, UserDto, UserSummary};
