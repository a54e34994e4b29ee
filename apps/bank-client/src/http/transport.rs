// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network seam: one request in, one terminal response out.
//!
//! [`Transport`] performs no retries and knows nothing about sessions.
//! Any status code the server produces, including 4xx/5xx, is a successful
//! transport outcome; only failures to obtain a response at all (DNS,
//! connection refused, timeout) surface as [`TransportError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<String>,
    /// Send `content-type: application/json`.
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("failed to read response body: {0}")]
    Body(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport.
///
/// Keeps a cookie store so the `refresh` cookie set by the login endpoint is
/// presented to the refresh endpoint, the way a browser tab would.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Connect(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.http.request(request.method.clone(), request.url.clone());
        if request.json {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Connect(format!("{} {} failed: {e}", request.method, request.url.path()))
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header::SET_COOKIE, HeaderMap},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn login() -> impl IntoResponse {
        (
            [(SET_COOKIE, "refresh=r-1; Path=/; HttpOnly")],
            Json(json!({ "token": "t1" })),
        )
    }

    async fn refresh(headers: HeaderMap) -> impl IntoResponse {
        let has_cookie = headers
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("refresh=r-1"));
        if has_cookie {
            (StatusCode::OK, Json(json!({ "token": "t2" })))
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": "no cookie" })))
        }
    }

    async fn echo(headers: HeaderMap, body: String) -> impl IntoResponse {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        Json(json!({ "contentType": content_type, "body": body }))
    }

    async fn spawn_stub() -> Url {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/refresh", get(refresh))
            .route("/echo", post(echo));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn request(method: Method, base: &Url, path: &str, body: Option<&str>, json: bool) -> HttpRequest {
        HttpRequest {
            method,
            url: base.join(path).unwrap(),
            body: body.map(str::to_string),
            json,
        }
    }

    #[tokio::test]
    async fn refresh_cookie_from_login_is_sent_back() {
        let base = spawn_stub().await;
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

        let before = transport
            .send(request(Method::GET, &base, "/api/auth/refresh", None, false))
            .await
            .unwrap();
        assert_eq!(before.status, StatusCode::UNAUTHORIZED);

        let login = transport
            .send(request(Method::POST, &base, "/api/auth/login", Some("{}"), true))
            .await
            .unwrap();
        assert!(login.is_ok());

        let after = transport
            .send(request(Method::GET, &base, "/api/auth/refresh", None, false))
            .await
            .unwrap();
        assert!(after.is_ok());
        let body: Value = after.json().unwrap();
        assert_eq!(body["token"], "t2");
    }

    #[tokio::test]
    async fn json_flag_sets_content_type() {
        let base = spawn_stub().await;
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

        let response = transport
            .send(request(Method::POST, &base, "/echo", Some(r#"{"a":1}"#), true))
            .await
            .unwrap();
        let body: Value = response.json().unwrap();
        assert_eq!(body["contentType"], "application/json");
        assert_eq!(body["body"], r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let base = Url::parse(&format!("http://{addr}")).unwrap();
        let err = transport
            .send(request(Method::GET, &base, "/api/auth/refresh", None, false))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_) | TransportError::Timeout));
    }
}
