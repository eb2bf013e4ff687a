pub mod auth;

pub use auth::{authenticate, AuthUser, Authentication, RequireAdmin, RequireUser};
