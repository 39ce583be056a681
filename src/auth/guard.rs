//! Per-request authentication decision, independent of the middleware plumbing.

use actix_web::cookie::Cookie;
use actix_web::http::Method;
use log::debug;

use super::cookie::AuthCookie;
use super::token::{Claims, TokenCodec};
use crate::error::AppError;

/// Prefix of every versioned API route.
pub const API_PREFIX: &str = "/api/v1";

/// Routes reachable without a token.
#[derive(Debug, Clone)]
pub struct PublicRoutes {
    routes: Vec<(Method, String)>,
}

impl PublicRoutes {
    pub fn new<I, P>(routes: I) -> Self
    where
        I: IntoIterator<Item = (Method, P)>,
        P: Into<String>,
    {
        Self {
            routes: routes
                .into_iter()
                .map(|(method, path)| (method, path.into()))
                .collect(),
        }
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        self.routes
            .iter()
            .any(|(public_method, public_path)| public_method == method && public_path == path)
    }
}

impl Default for PublicRoutes {
    fn default() -> Self {
        Self::new([
            (Method::GET, "/health".to_string()),
            (Method::POST, format!("{}/auth/register", API_PREFIX)),
            (Method::POST, format!("{}/auth/login", API_PREFIX)),
            (Method::POST, format!("{}/auth/logout", API_PREFIX)),
        ])
    }
}

/// Outcome of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Public,
    Authenticated(Claims),
}

/// The single checkpoint deciding whether a request may proceed.
#[derive(Clone)]
pub struct RequestGuard {
    tokens: TokenCodec,
    cookie: AuthCookie,
    public: PublicRoutes,
}

impl RequestGuard {
    pub fn new(tokens: TokenCodec, cookie: AuthCookie, public: PublicRoutes) -> Self {
        Self {
            tokens,
            cookie,
            public,
        }
    }

    /// Public routes pass untouched. Otherwise the signed cookie wins over the
    /// bearer header; a cookie with a bad signature counts as absent.
    pub fn check(
        &self,
        method: &Method,
        path: &str,
        cookie: Option<Cookie<'static>>,
        authorization: Option<&str>,
    ) -> Result<Admission, AppError> {
        if self.public.contains(method, path) {
            return Ok(Admission::Public);
        }

        let token = cookie
            .and_then(|cookie| self.cookie.read(cookie))
            .or_else(|| bearer(authorization).map(str::to_owned));

        let Some(token) = token else {
            debug!("Rejected {} {}: no token", method, path);
            return Err(AppError::MissingToken);
        };

        self.tokens
            .verify(&token)
            .map(Admission::Authenticated)
            .map_err(|e| {
                debug!("Rejected {} {}: {}", method, path, e);
                e
            })
    }
}

fn bearer(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
