//! Application assembly: shared state, route table and CORS policy.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{error, http::header, web, HttpResponse};
use serde_json::json;

use crate::auth::{
    AuthCookie, AuthMiddleware, AuthService, PasswordHasher, PublicRoutes, RequestGuard,
    TokenCodec, API_PREFIX,
};
use crate::config::Config;
use crate::repository::{ProjectRepository, TaskRepository};
use crate::routes;
use crate::store::{ProjectStore, TaskStore, UserStore};

/// Everything a worker needs, built once and cloned into each `App`.
#[derive(Clone)]
pub struct AppState {
    pub auth: web::Data<AuthService>,
    pub projects: web::Data<ProjectRepository>,
    pub tasks: web::Data<TaskRepository>,
    pub cookie: web::Data<AuthCookie>,
    guard: Arc<RequestGuard>,
}

impl AppState {
    pub fn new<S>(config: &Config, store: S) -> Self
    where
        S: UserStore + ProjectStore + TaskStore + 'static,
    {
        let store = Arc::new(store);
        let tokens = TokenCodec::new(&config.jwt_secret, config.token_ttl());
        let cookie = AuthCookie::new(
            &config.cookie_secret,
            config.cookie_secure,
            config.token_ttl_days,
        );

        Self {
            auth: web::Data::new(AuthService::new(
                store.clone(),
                PasswordHasher::new(config.bcrypt_cost),
                tokens.clone(),
            )),
            projects: web::Data::new(ProjectRepository::new(store.clone())),
            tasks: web::Data::new(TaskRepository::new(store)),
            cookie: web::Data::new(cookie.clone()),
            guard: Arc::new(RequestGuard::new(tokens, cookie, PublicRoutes::default())),
        }
    }

    /// Registers shared data and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.projects.clone())
            .app_data(self.tasks.clone())
            .app_data(self.cookie.clone())
            .app_data(json_config())
            .service(routes::health::health)
            .service(
                web::scope(API_PREFIX)
                    .wrap(AuthMiddleware::new(self.guard.clone()))
                    .configure(routes::config),
            );
    }
}

/// Malformed bodies answer 400 with the same `{"error": ...}` shape as `AppError`.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = json!({ "error": err.to_string() });
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// CORS for the browser client. Credentials are allowed so the session
/// cookie travels with cross-origin requests.
pub fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}
