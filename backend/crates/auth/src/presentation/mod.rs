//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the access guard.

pub mod dto;
pub mod extract;
pub mod guard;
pub mod handlers;
pub mod router;

pub use guard::{AuthGuard, require_access};
pub use handlers::AuthAppState;
pub use router::auth_routes;
