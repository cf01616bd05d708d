// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth)

pub mod protected; // JWT authentication required
pub mod public; // No authentication required (/api/users, /api/login)

pub use protected::*;
pub use public::*;
