#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};

use projectforge::auth::AUTH_COOKIE;
use projectforge::config::Config;
use projectforge::store::MemoryStore;
use projectforge::AppState;

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        jwt_secret: "integration-jwt-secret".to_string(),
        cookie_secret: "integration-cookie-secret".to_string(),
        cookie_secure: false,
        token_ttl_days: 7,
        bcrypt_cost: 4,
        cors_origins: vec!["http://localhost:5173".to_string()],
    }
}

pub async fn init_app(
    store: MemoryStore,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let state = AppState::new(&test_config(), store);
    test::init_service(App::new().configure(|cfg| state.configure(cfg))).await
}

/// Status, JSON body and cookies of a response, whether the app answered
/// normally or the auth middleware short-circuited with an error.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub cookies: Vec<Cookie<'static>>,
}

impl Reply {
    pub fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.cookies.iter().find(|cookie| cookie.name() == name).cloned()
    }
}

pub async fn send<S, B>(app: &S, req: Request) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            let cookies = resp
                .response()
                .cookies()
                .map(|cookie| cookie.into_owned())
                .collect();
            let bytes = test::read_body(resp).await;
            Reply {
                status,
                body: parse(&bytes),
                cookies,
            }
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
            Reply {
                status,
                body: parse(&bytes),
                cookies: Vec::new(),
            }
        }
    }
}

fn parse(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap_or(Value::Null)
    }
}

/// A registered user and the credentials the server handed back.
pub struct Session {
    pub id: i32,
    pub token: String,
    pub cookie: Cookie<'static>,
}

impl Session {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub async fn register<S, B>(app: &S, email: &str, name: &str, password: &str) -> Session
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": email, "name": name, "password": password }))
        .to_request();
    let reply = send(app, req).await;
    assert_eq!(reply.status, StatusCode::OK, "register failed: {}", reply.body);

    Session {
        id: reply.body["user"]["id"].as_i64().unwrap() as i32,
        token: reply.body["token"].as_str().unwrap().to_string(),
        cookie: reply.cookie(AUTH_COOKIE).expect("auth cookie set on register"),
    }
}

pub async fn create_project<S, B>(app: &S, session: &Session, name: &str) -> i32
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(session.bearer())
        .set_json(json!({ "name": name }))
        .to_request();
    let reply = send(app, req).await;
    assert_eq!(reply.status, StatusCode::CREATED, "create project failed: {}", reply.body);
    reply.body["id"].as_i64().unwrap() as i32
}

pub async fn create_task<S, B>(
    app: &S,
    session: &Session,
    project_id: i32,
    title: &str,
    status: &str,
    priority: &str,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{}/tasks", project_id))
        .insert_header(session.bearer())
        .set_json(json!({ "title": title, "status": status, "priority": priority }))
        .to_request();
    let reply = send(app, req).await;
    assert_eq!(reply.status, StatusCode::CREATED, "create task failed: {}", reply.body);
    reply.body
}
