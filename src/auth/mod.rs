pub mod cookie;
pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserView;

pub use cookie::{AuthCookie, AUTH_COOKIE};
pub use extractors::AuthenticatedUser;
pub use guard::{Admission, PublicRoutes, RequestGuard, API_PREFIX};
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{Claims, TokenCodec};

lazy_static! {
    static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email address"))]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email address"))]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Display name, 2 to 255 characters.
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: String,
}

/// Response after a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserView,
    /// The signed session token, also set as the `auth-token` cookie.
    pub token: String,
}
