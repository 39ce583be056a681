use crate::{
    auth::{AuthCookie, AuthService, AuthenticatedUser, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates the account, answers with the user and a token, and sets the
/// signed session cookie.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    cookie: web::Data<AuthCookie>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let response = auth
        .register(
            &register_data.email,
            &register_data.password,
            &register_data.name,
        )
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(cookie.issue(&response.token))
        .json(response))
}

/// Login user
///
/// Authenticates a user, answers with the user and a token, and sets the
/// signed session cookie.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    cookie: web::Data<AuthCookie>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let response = auth.login(&login_data.email, &login_data.password).await?;

    Ok(HttpResponse::Ok()
        .cookie(cookie.issue(&response.token))
        .json(response))
}

/// Clears the session cookie. Tokens are stateless, so nothing is revoked.
#[post("/logout")]
pub async fn logout(cookie: web::Data<AuthCookie>) -> impl Responder {
    HttpResponse::Ok().cookie(cookie.removal()).json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}

/// The user behind the presented token, re-read from storage.
#[get("/me")]
pub async fn me(
    auth: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let current = auth.current_user(user.id()).await?;
    Ok(HttpResponse::Ok().json(current))
}
