// handlers/protected/auth/mod.rs - Token management for authenticated users

pub mod refresh; // POST /api/refresh

pub use refresh::refresh_post;
