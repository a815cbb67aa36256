//! Value Object Module

pub mod points;
pub mod user_ref;

pub use points::Points;
pub use user_ref::UserRef;
