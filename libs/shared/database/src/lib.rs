pub mod postgrest;
pub mod users;

pub use postgrest::{in_list, DbClient};
pub use users::normalize_email;
