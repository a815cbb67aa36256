//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no exam-office vocabulary:
//! - Password hashing (Argon2id with optional pepper)
//! - HMAC-SHA256 signing and URL-safe Base64
//! - Request metadata: bearer tokens, client IP, User-Agent

pub mod client;
pub mod crypto;
pub mod password;
