#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;
use token_guard::{Config, UserDetails, app};
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";
pub const ISSUER: &str = "https://auth.example.test";

pub const RULES: &str =
    "/api/v1/health=public,/api/v1/me=public,/api/v1/admin=role:admin,/api/v1/**=authenticated";

pub fn config(extra: &[(&str, &str)]) -> Config {
    let mut map: HashMap<String, String> = [
        ("AUTH_ISSUER", ISSUER),
        ("AUTH_JWT_SECRET", SECRET),
        ("AUTH_LEEWAY_SECONDS", "0"),
        ("AUTH_RULES", RULES),
        ("AUTH_DEFAULT_RULE", "deny"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in extra {
        map.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| map.get(key).cloned()).unwrap()
}

pub fn app_router(config: &Config) -> Router {
    let state = app::build_state(config).unwrap();
    app::build_router(state, config.http)
}

pub fn user(authorities: &[&str]) -> UserDetails {
    authorities
        .iter()
        .fold(UserDetails::new(Uuid::new_v4(), "alice"), |u, a| {
            u.with_authority(*a)
        })
}

pub fn sign(claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn token_for(user: &UserDetails, issuer: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 300;
    sign(json!({
        "iss": issuer,
        "sub": serde_json::to_string(user).unwrap(),
        "exp": exp,
    }))
}

pub fn bearer(user: &UserDetails) -> String {
    format!("Bearer {}", token_for(user, ISSUER))
}

pub async fn send(router: Router, path: &str, header: Option<(&str, &str)>) -> Response<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some((name, value)) = header {
        builder = builder.header(name, value);
    }
    router
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(res: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
