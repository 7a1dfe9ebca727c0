#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use cabinet_api::auth::jwt::{generate_access_token, JwtConfig};
use cabinet_api::auth::password::hash_password;
use cabinet_api::config::{RatesConfig, ServerConfig};
use cabinet_api::rates::{RateProvider, RateProviderError};
use cabinet_api::router::build_app_router;
use cabinet_api::state::AppState;
use cabinet_core::currency::provider::{DailyRates, NumberOrText, Valute};
use cabinet_core::invite::EventStatus;
use cabinet_db::models::event::{CreateEvent, Event};
use cabinet_db::models::user::{CreateUser, User};
use cabinet_db::repositories::{EventRepo, UserRepo};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        avatar_base_url: "https://cdn.test/uploads".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
        },
        rates: RatesConfig {
            provider_url: "http://rates.invalid/daily_json.js".to_string(),
            base_currency: "RUB".to_string(),
            refresh_enabled: false,
            refresh_interval_secs: 3600,
        },
    }
}

/// Rate provider returning a canned payload for every date.
pub struct FixedRates(pub Vec<(&'static str, &'static str, &'static str)>);

#[async_trait]
impl RateProvider for FixedRates {
    async fn daily_rates(&self, _date: NaiveDate) -> Result<DailyRates, RateProviderError> {
        Ok(DailyRates {
            date: None,
            valute: self
                .0
                .iter()
                .map(|(code, nominal, value)| Valute {
                    char_code: Some(code.to_string()),
                    nominal: Some(NumberOrText::Text(nominal.to_string())),
                    value: Some(NumberOrText::Text(value.to_string())),
                })
                .collect(),
        })
    }
}

/// Rate provider that always fails like an unreachable upstream.
pub struct DownRates;

#[async_trait]
impl RateProvider for DownRates {
    async fn daily_rates(&self, _date: NaiveDate) -> Result<DailyRates, RateProviderError> {
        Err(RateProviderError::ApiError {
            status: 503,
            body: "maintenance".to_string(),
        })
    }
}

pub fn default_rates() -> FixedRates {
    FixedRates(vec![
        ("USD", "1", "92,5101"),
        ("EUR", "1", "99,9"),
        ("JPY", "100", "61,5"),
        ("AUD", "1", "60,1"),
    ])
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(default_rates()))
}

pub fn build_test_app_with(pool: PgPool, rate_provider: Arc<dyn RateProvider>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        rate_provider,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create a user with the `user` role and return it with a bearer token.
pub async fn user_with_token(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, "user").await;
    let token = token_for(&user);
    (user, token)
}

pub async fn create_event(pool: &PgPool, header: &str, status: EventStatus) -> Event {
    EventRepo::create(
        pool,
        &CreateEvent {
            header: header.to_string(),
            status,
            starts_at: None,
        },
    )
    .await
    .expect("event creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
