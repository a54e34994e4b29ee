// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request layer on top of a [`Transport`].
//!
//! Plain `get`/`post` issue exactly one request. `authenticated_post`
//! attaches the session token to the JSON body (`token` field, not a header)
//! and recovers from a single 401 through [`TokenRefreshPolicy`].

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use super::refresh::{RefreshOutcome, TokenRefreshPolicy};
use super::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::SessionStore;

/// Terminal outcome of an authenticated call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedResponse {
    /// The retry's response after a successful refresh, the original
    /// response otherwise.
    pub response: HttpResponse,
    /// The token could not be refreshed after a 401. `response` is then the
    /// original 401 and no retry was sent.
    pub refresh_failed: bool,
}

#[derive(Clone)]
pub struct HttpClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(base_url: Url, transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self {
            base_url,
            transport,
            session,
        }
    }

    /// Client over the reqwest transport configured from `config`.
    pub fn from_config(config: &ClientConfig, session: SessionStore) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(config.http_timeout)?;
        Ok(Self::new(config.base_url.clone(), Arc::new(transport), session))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{path}: {e}")))
    }

    /// Endpoint with URL-encoded query parameters.
    pub fn endpoint_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    /// Issue one request. No retry happens at this layer.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
        json: bool,
    ) -> Result<HttpResponse, ClientError> {
        debug!(method = %method, path = %url.path(), "Sending request");
        let response = self
            .transport
            .send(HttpRequest {
                method: method.clone(),
                url: url.clone(),
                body,
                json,
            })
            .await
            .inspect_err(|e| warn!(method = %method, path = %url.path(), error = %e, "Request failed"))?;
        debug!(method = %method, path = %url.path(), status = %response.status, "Request completed");
        Ok(response)
    }

    pub async fn get(&self, url: Url) -> Result<HttpResponse, ClientError> {
        self.request(Method::GET, url, None, false).await
    }

    /// POST `data` serialized as JSON.
    pub async fn post<T: Serialize + ?Sized>(&self, url: Url, data: &T) -> Result<HttpResponse, ClientError> {
        let body = serde_json::to_string(data).map_err(|e| ClientError::InvalidPayload(e.to_string()))?;
        self.request(Method::POST, url, Some(body), true).await
    }

    /// POST a pre-encoded body, optionally flagged as JSON.
    pub async fn post_raw(&self, url: Url, body: String, as_json: bool) -> Result<HttpResponse, ClientError> {
        self.request(Method::POST, url, Some(body), as_json).await
    }

    /// POST `payload` merged with `{token}` of the current session.
    ///
    /// Fails with [`ClientError::NotLoggedIn`] before touching the network
    /// when no session is active. `payload` must serialize to a JSON object
    /// or to `null`.
    pub async fn authenticated_post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<AuthenticatedResponse, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotLoggedIn)?;
        let fields = payload_fields(payload)?;
        let url = self.endpoint(path)?;

        let response = self.post_with_token(url.clone(), &fields, &token).await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(AuthenticatedResponse {
                response,
                refresh_failed: false,
            });
        }

        debug!(path = %path, "Token rejected, attempting refresh");
        match TokenRefreshPolicy::refresh(self).await {
            RefreshOutcome::Refreshed(new_token) => {
                let retry = self.post_with_token(url, &fields, &new_token).await?;
                debug!(path = %path, status = %retry.status, "Retried after refresh");
                Ok(AuthenticatedResponse {
                    response: retry,
                    refresh_failed: false,
                })
            }
            RefreshOutcome::Failed => Ok(AuthenticatedResponse {
                response,
                refresh_failed: true,
            }),
        }
    }

    async fn post_with_token(
        &self,
        url: Url,
        fields: &Map<String, Value>,
        token: &str,
    ) -> Result<HttpResponse, ClientError> {
        let mut body = fields.clone();
        body.insert("token".to_string(), Value::String(token.to_string()));
        self.post(url, &Value::Object(body)).await
    }
}

fn payload_fields<T: Serialize + ?Sized>(payload: &T) -> Result<Map<String, Value>, ClientError> {
    match serde_json::to_value(payload).map_err(|e| ClientError::InvalidPayload(e.to_string()))? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ClientError::InvalidPayload(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
