pub mod auth;
pub mod gates;

pub use auth::{load_identity, require_admin, require_auth, AuthUser};
