use std::sync::Arc;

use log::{info, warn};

use super::password::PasswordHasher;
use super::token::{Claims, TokenCodec};
use super::AuthResponse;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UserView};
use crate::store::UserStore;

/// Registration, login and identity lookups.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenCodec) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates an account and issues its first token.
    ///
    /// The up-front lookup gives the common case a clean `DuplicateEmail`; a
    /// concurrent registration that slips past it still hits the store's
    /// unique constraint, which maps to the same error.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> AppResult<AuthResponse> {
        if self.users.find_user_by_email(email).await?.is_some() {
            warn!("Registration refused: email already in use");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(password).await?;
        let user = self
            .users
            .insert_user(NewUser {
                email: email.to_owned(),
                password_hash,
                name: name.to_owned(),
            })
            .await?;
        info!("Registered user {}", user.id);

        let user = UserView::from(&user);
        let token = self.tokens.issue(&user)?;
        Ok(AuthResponse { user, token })
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthResponse> {
        let Some(user) = self.users.find_user_by_email(email).await? else {
            warn!("Login failed");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            warn!("Login failed for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }
        info!("User {} logged in", user.id);

        let user = UserView::from(&user);
        let token = self.tokens.issue(&user)?;
        Ok(AuthResponse { user, token })
    }

    /// Re-reads the user behind a verified token.
    pub async fn current_user(&self, user_id: i32) -> AppResult<UserView> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .map(|user| UserView::from(&user))
            .ok_or(AppError::UserNotFound)
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }
}
