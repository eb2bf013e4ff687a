#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use tower::ServiceExt;

use autos_api::config::{AppConfig, UserCredential};
use autos_api::auth::Role;
use autos_api::database::MemoryGateway;
use autos_api::state::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<MemoryGateway>,
}

pub enum Auth<'a> {
    None,
    Admin,
    User,
    Basic(&'a str, &'a str),
    Bearer(&'a str),
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).with_context(|| format!("body is not JSON: {}", self.body))
    }
}

/// Router backed by a fresh in-memory store with `admin`/`user` logins.
pub fn spawn_app() -> TestApp {
    spawn_app_with(|_| {})
}

/// Same as [`spawn_app`], with a chance to adjust the config first.
pub fn spawn_app_with(configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.security.users = vec![
        UserCredential::new("admin", "admin", Role::Admin),
        UserCredential::new("user", "user", Role::User),
    ];
    configure(&mut config);

    let gateway = Arc::new(MemoryGateway::new());
    let state = AppState::new(gateway.clone(), config.security.clone());
    let router = autos_api::app(state, &config);

    TestApp { router, gateway }
}

impl TestApp {
    pub async fn send(&self, method: Method, uri: &str, auth: Auth<'_>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);

        let authorization = match auth {
            Auth::None => None,
            Auth::Admin => Some(basic("admin", "admin")),
            Auth::User => Some(basic("user", "user")),
            Auth::Basic(user, password) => Some(basic(user, password)),
            Auth::Bearer(token) => Some(format!("Bearer {}", token)),
        };
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse {
            status,
            body: String::from_utf8(bytes.to_vec())?,
        })
    }

    pub async fn get(&self, uri: &str, auth: Auth<'_>) -> Result<TestResponse> {
        self.send(Method::GET, uri, auth, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, uri, Auth::Admin, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, uri, Auth::Admin, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Result<TestResponse> {
        self.send(Method::DELETE, uri, Auth::Admin, None).await
    }
}

fn basic(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}
