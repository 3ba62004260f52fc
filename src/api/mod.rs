/// Client side of the photo API
///
/// - HTTP client with endpoint resolution and bearer auth (client.rs)
/// - Typed failures and the server-message rule (error.rs)

pub mod client;
pub mod error;

pub use client::{ApiClient, LoginRequest, RegisterRequest};
pub use error::ApiError;
