//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod bootstrap;
pub mod config;
pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod token;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use bootstrap::{BootstrapAdminInput, BootstrapAdminUseCase, BootstrapOutcome};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use profile::{GetProfileUseCase, UpdateProfileInput, UpdateProfileUseCase};
pub use register::{RegisterInput, RegisterUseCase};
