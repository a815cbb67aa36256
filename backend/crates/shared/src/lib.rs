//! Shared Kernel - vocabulary every exam-office domain agrees on
//!
//! This crate holds only what has the same meaning in every domain crate:
//! - Error kinds, the unified `AppError`, and its HTTP rendering
//! - Typed UUID identifiers
//! - Roles, the authenticated `Principal`, and route access levels
//! - Pagination and the small summaries inlined into responses
//!
//! Domain crates never depend on each other; they meet here and in the
//! relational store.

#[cfg(feature = "axum")]
pub mod extract;
pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod pagination;
pub mod principal;
pub mod role;
#[cfg(feature = "axum")]
pub mod routing;
pub mod summary;
