// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/*
// Middleware: `jwt_auth_middleware` validates the bearer token and inserts
// `AuthUser`, whose id is the owner scope for every store call below.

pub mod auth; // POST /api/refresh
pub mod folders; // /api/folders
pub mod notes; // /api/notes
pub mod tags; // /api/tags

pub use auth::*;
pub use folders::*;
pub use notes::*;
pub use tags::*;
