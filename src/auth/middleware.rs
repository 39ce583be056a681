use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use super::cookie::AUTH_COOKIE;
use super::guard::{Admission, RequestGuard};

/// Runs [`RequestGuard`] in front of the wrapped scope and attaches the
/// verified [`Claims`](super::Claims) to the request extensions.
#[derive(Clone)]
pub struct AuthMiddleware {
    guard: Arc<RequestGuard>,
}

impl AuthMiddleware {
    pub fn new(guard: Arc<RequestGuard>) -> Self {
        Self { guard }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            guard: self.guard.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    guard: Arc<RequestGuard>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let admission = {
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok());
            self.guard
                .check(req.method(), req.path(), req.cookie(AUTH_COOKIE), authorization)
        };

        match admission {
            Ok(Admission::Public) => Box::pin(self.service.call(req)),
            Ok(Admission::Authenticated(claims)) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}
