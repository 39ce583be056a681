mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{init_app, register, send};
use projectforge::auth::AUTH_COOKIE;
use projectforge::store::MemoryStore;

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let app = init_app(MemoryStore::new()).await;

    let session = register(&app, "integration@example.com", "Integration", "Password123!").await;
    assert!(session.id > 0);
    assert_eq!(session.cookie.http_only(), Some(true));
    assert_eq!(session.cookie.path(), Some("/"));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": "integration@example.com",
            "name": "Someone Else",
            "password": "Password123!"
        }))
        .to_request();
    let conflict = send(&app, req).await;
    assert_eq!(conflict.status, StatusCode::CONFLICT);
    assert_eq!(conflict.body["error"], "User with this email already exists");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({
            "email": "integration@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let login = send(&app, req).await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["user"]["id"], session.id);
    assert_eq!(login.body["user"]["name"], "Integration");
    assert!(login.body["user"].get("passwordHash").is_none());
    assert!(login.body["token"].is_string());
    assert!(login.cookie(AUTH_COOKIE).is_some());
}

#[actix_rt::test]
async fn test_login_failures_look_the_same() {
    let app = init_app(MemoryStore::new()).await;
    register(&app, "known@example.com", "Known", "Password123!").await;

    let attempt = |email: &str, password: &str| {
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request()
    };

    let unknown = send(&app, attempt("unknown@example.com", "Password123!")).await;
    let wrong = send(&app, attempt("known@example.com", "WrongPassword")).await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, wrong.body);
}

#[actix_rt::test]
async fn test_register_validation() {
    let app = init_app(MemoryStore::new()).await;

    for payload in [
        json!({ "email": "invalid-email", "name": "Test", "password": "password123" }),
        json!({ "email": "test@example.com", "name": "Test", "password": "short" }),
        json!({ "email": "test@example.com", "name": "T", "password": "password123" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(&payload)
            .to_request();
        let reply = send(&app, req).await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY, "payload {}", payload);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let reply = send(&app, req).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["error"].is_string());
}

#[actix_rt::test]
async fn test_me_with_cookie_or_bearer() {
    let app = init_app(MemoryStore::new()).await;
    let session = register(&app, "me@example.com", "Me Myself", "Password123!").await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .cookie(session.cookie.clone())
        .to_request();
    let via_cookie = send(&app, req).await;
    assert_eq!(via_cookie.status, StatusCode::OK);
    assert_eq!(via_cookie.body["email"], "me@example.com");

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(session.bearer())
        .to_request();
    let via_bearer = send(&app, req).await;
    assert_eq!(via_bearer.status, StatusCode::OK);
    assert_eq!(via_bearer.body, via_cookie.body);
}

#[actix_rt::test]
async fn test_protected_routes_reject_missing_or_bad_tokens() {
    let app = init_app(MemoryStore::new()).await;

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let missing = send(&app, req).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "No authentication token provided");

    let req = test::TestRequest::get()
        .uri("/api/v1/projects")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let invalid = send(&app, req).await;
    assert_eq!(invalid.status, StatusCode::UNAUTHORIZED);
    assert_eq!(invalid.body["error"], "Invalid authentication token");

    let req = test::TestRequest::get()
        .uri("/api/v1/projects")
        .cookie(actix_web::cookie::Cookie::new(AUTH_COOKIE, "unsigned"))
        .to_request();
    let forged = send(&app, req).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.body["error"], "No authentication token provided");
}

#[actix_rt::test]
async fn test_me_for_deleted_subject() {
    let app = init_app(MemoryStore::new()).await;
    let session = register(&app, "ghost@example.com", "Ghost", "Password123!").await;

    // Same secret, fresh store: the token verifies but its subject is gone.
    let empty = init_app(MemoryStore::new()).await;
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(session.bearer())
        .to_request();
    let reply = send(&empty, req).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "User not found");
}

#[actix_rt::test]
async fn test_logout_clears_cookie_and_is_public() {
    let app = init_app(MemoryStore::new()).await;

    let req = test::TestRequest::post().uri("/api/v1/auth/logout").to_request();
    let reply = send(&app, req).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
    let cleared = reply.cookie(AUTH_COOKIE).expect("removal cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_rt::test]
async fn test_health_is_public() {
    let app = init_app(MemoryStore::new()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let reply = send(&app, req).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
}
