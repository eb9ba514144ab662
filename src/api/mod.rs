//! API Module
//!
//! HTTP handlers and routing for inspecting and administering the shared
//! cache store at runtime.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
