pub mod extractors;
pub mod middleware;
pub mod password;
pub mod store;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use store::{AuthStore, Session};
pub use token::generate_token;

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password.
    /// Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
    /// Optional display name; falls back to the email address when omitted.
    #[validate(length(max = 120))]
    pub name: Option<String>,
}

/// Response structure after successful authentication (login or registration).
/// Contains the opaque session token and the authenticated user.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// The opaque session token to present as a bearer credential.
    pub token: String,
    /// The authenticated user record.
    pub user: User,
}
