// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints that do not require authentication.

pub mod login; // POST /api/login - authenticate and get JWT
pub mod register; // POST /api/users - create new account

pub use login::{login_post, TokenResponse};
pub use register::register_post;
