//! # sso-api
//!
//! Shared API types for the sso service and the url-shortener.
//! Nothing in here depends on a server framework, so the crate can be used by
//! both services and by clients.
//!
//! ## Contents
//!
//! - Request DTOs (`RegisterRequest`, `LoginRequest`, ...)
//! - Response DTOs (`TokenPairResponse`, `UrlResponse`, ...)
//! - Error response format (`ErrorResponse`)
//! - The access-token claims contract (`Claims`, `Role`)
//!
//! ## Example
//!
//! ```rust
//! use sso_api::{LoginRequest, Role};
//!
//! let request = LoginRequest {
//!     email: "user@example.com".to_string(),
//!     password: "password123".to_string(),
//! };
//! assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
//! ```

pub mod claims;
pub mod error;
pub mod requests;
pub mod responses;

// Re-exports for convenient access
pub use claims::{Claims, Role, UnknownRole};
pub use error::ErrorResponse;
pub use requests::*;
pub use responses::*;
