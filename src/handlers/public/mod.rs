// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account registration and token acquisition. Everything else lives under
// `protected` and sits behind the JWT middleware.

pub mod auth;

pub use auth::*;
