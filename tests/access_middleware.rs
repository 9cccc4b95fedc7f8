mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

#[tokio::test]
async fn no_header_on_public_path_is_anonymous() {
    let router = app_router(&config(&[]));

    let res = send(router, "/api/v1/me", None).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({"anonymous": true}));
}

#[tokio::test]
async fn valid_token_with_required_role_is_allowed() {
    let router = app_router(&config(&[]));
    let admin = user(&["admin"]);

    let res = send(
        router,
        "/api/v1/admin",
        Some(("authorization", bearer(&admin).as_str())),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["id"], admin.id.to_string());
    assert_eq!(body["authorities"], json!(["admin"]));
}

#[tokio::test]
async fn valid_token_without_required_role_is_denied() {
    let router = app_router(&config(&[]));
    let reader = user(&["reader"]);

    let res = send(
        router,
        "/api/v1/admin",
        Some(("authorization", bearer(&reader).as_str())),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(res).await["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn garbage_token_on_protected_path_is_unauthorized() {
    let router = app_router(&config(&[]));

    let res = send(router, "/api/v1/admin", Some(("authorization", "Bearer garbage"))).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn garbage_token_on_public_path_degrades_to_anonymous() {
    let router = app_router(&config(&[]));

    let res = send(router, "/api/v1/me", Some(("authorization", "Bearer garbage"))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({"anonymous": true}));
}

#[tokio::test]
async fn wrong_issuer_on_protected_path_is_unauthorized() {
    let router = app_router(&config(&[]));
    let admin = user(&["admin"]);
    let header = format!("Bearer {}", token_for(&admin, "https://someone-else.test"));

    let res = send(router, "/api/v1/admin", Some(("authorization", header.as_str()))).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn missing_header_on_protected_path_is_unauthorized() {
    let router = app_router(&config(&[]));

    let res = send(router, "/api/v1/admin", None).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn wrong_scheme_follows_invalid_token_path() {
    let admin = user(&["admin"]);
    let header = format!("Basic {}", token_for(&admin, ISSUER));

    let res = send(
        app_router(&config(&[])),
        "/api/v1/admin",
        Some(("authorization", header.as_str())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send(
        app_router(&config(&[])),
        "/api/v1/me",
        Some(("authorization", header.as_str())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({"anonymous": true}));
}

#[tokio::test]
async fn valid_token_on_public_path_attaches_principal() {
    let router = app_router(&config(&[]));
    let reader = user(&["reader"]);

    let res = send(router, "/api/v1/me", Some(("authorization", bearer(&reader).as_str()))).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["anonymous"], false);
    assert_eq!(body["principal"]["username"], "alice");
}

#[tokio::test]
async fn expired_token_is_invalid() {
    let router = app_router(&config(&[]));
    let admin = user(&["admin"]);
    let token = sign(json!({
        "iss": ISSUER,
        "sub": serde_json::to_string(&admin).unwrap(),
        "exp": chrono::Utc::now().timestamp() - 600,
    }));

    let res = send(
        router,
        "/api/v1/admin",
        Some(("authorization", format!("Bearer {token}").as_str())),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn undecodable_subject_is_invalid() {
    let router = app_router(&config(&[]));
    let token = sign(json!({
        "iss": ISSUER,
        "sub": "alice",
        "exp": chrono::Utc::now().timestamp() + 300,
    }));

    let res = send(
        router,
        "/api/v1/admin",
        Some(("authorization", format!("Bearer {token}").as_str())),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn custom_header_and_prefix_are_honoured() {
    let config = config(&[
        ("AUTH_HEADER_NAME", "X-Access-Token"),
        ("AUTH_TOKEN_PREFIX", "Token"),
    ]);
    let admin = user(&["admin"]);
    let header = format!("Token {}", token_for(&admin, ISSUER));

    let res = send(
        app_router(&config),
        "/api/v1/admin",
        Some(("x-access-token", header.as_str())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // The standard header is ignored once another one is configured.
    let res = send(
        app_router(&config),
        "/api/v1/admin",
        Some(("authorization", bearer(&admin).as_str())),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn rejected_requests_still_get_request_id() {
    let router = app_router(&config(&[]));

    let res = send(router, "/api/v1/admin", None).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn audience_claim_is_accepted_without_configured_audience() {
    let router = app_router(&config(&[]));
    let admin = user(&["admin"]);
    let token = sign(json!({
        "iss": ISSUER,
        "sub": serde_json::to_string(&admin).unwrap(),
        "aud": "orders-api",
        "exp": chrono::Utc::now().timestamp() + 300,
    }));
    let header = format!("Bearer {token}");

    let res = send(router, "/api/v1/admin", Some(("authorization", header.as_str()))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["id"], admin.id.to_string());
}

#[tokio::test]
async fn audience_is_enforced_when_configured() {
    let router = app_router(&config(&[("AUTH_AUDIENCE", "billing-api")]));
    let admin = user(&["admin"]);
    let token = sign(json!({
        "iss": ISSUER,
        "sub": serde_json::to_string(&admin).unwrap(),
        "aud": "orders-api",
        "exp": chrono::Utc::now().timestamp() + 300,
    }));
    let header = format!("Bearer {token}");

    let res = send(router, "/api/v1/admin", Some(("authorization", header.as_str()))).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn health_is_public_json() {
    let router = app_router(&config(&[]));

    let res = send(router, "/api/v1/health", None).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({"status": "ok"}));
}
