// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-shot token refresh.
//!
//! On a 401 from an authenticated call the client asks the refresh endpoint
//! for a new token exactly once. The endpoint authenticates through the
//! `refresh` cookie set at login, so the request carries no body. There is
//! no backoff and no loop: a failed refresh ends the session from the UI's
//! point of view.

use tracing::{info, warn};

use super::client::HttpClient;
use crate::models::RefreshResponse;

pub const REFRESH_PATH: &str = "/api/auth/refresh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The session now holds this token.
    Refreshed(String),
    Failed,
}

pub struct TokenRefreshPolicy;

impl TokenRefreshPolicy {
    pub async fn refresh(http: &HttpClient) -> RefreshOutcome {
        let url = match http.endpoint(REFRESH_PATH) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Token refresh: invalid endpoint");
                return RefreshOutcome::Failed;
            }
        };

        let response = match http.get(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token refresh: request failed");
                return RefreshOutcome::Failed;
            }
        };

        if !response.is_ok() {
            warn!(status = %response.status, "Token refresh: rejected");
            return RefreshOutcome::Failed;
        }

        let token = match response.json::<RefreshResponse>() {
            Ok(body) if !body.token.trim().is_empty() => body.token,
            Ok(_) => {
                warn!("Token refresh: response carried an empty token");
                return RefreshOutcome::Failed;
            }
            Err(e) => {
                warn!(error = %e, "Token refresh: invalid response");
                return RefreshOutcome::Failed;
            }
        };

        if !http.session().replace_token(token.clone()) {
            return RefreshOutcome::Failed;
        }

        info!("Token refreshed");
        RefreshOutcome::Refreshed(token)
    }
}
