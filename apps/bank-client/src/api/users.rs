// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User lookup endpoints. Neither requires a session.

use reqwest::StatusCode;
use tracing::debug;

use super::{rejection, Dispatcher};
use crate::error::ClientError;

pub const USER_BY_ID_PATH: &str = "/api/user/byId";
pub const USER_BY_USERNAME_PATH: &str = "/api/user/byUsername";

pub const USER_NOT_FOUND: &str = "Unable to find user with the specified ID";

/// Result of the duplicate-username probe used during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameStatus {
    /// No user has this username (404).
    Available,
    /// A user already has this username (200).
    Taken,
    /// The backend refused the username itself (400).
    Invalid,
    /// Any other status.
    Unknown,
}

impl Dispatcher {
    /// Existence check; resolves to the id that was looked up.
    pub async fn user_by_id(&self, user_id: &str) -> Result<String, ClientError> {
        let url = self
            .http()
            .endpoint_with_query(USER_BY_ID_PATH, &[("id", user_id)])?;
        let response = self.http().get(url).await?;
        if response.status == StatusCode::OK {
            Ok(user_id.to_string())
        } else {
            Err(rejection(USER_BY_ID_PATH, &response, USER_NOT_FOUND))
        }
    }

    pub async fn check_username(&self, username: &str) -> Result<UsernameStatus, ClientError> {
        let url = self
            .http()
            .endpoint_with_query(USER_BY_USERNAME_PATH, &[("username", username)])?;
        let response = self.http().get(url).await?;
        let status = match response.status {
            StatusCode::OK => UsernameStatus::Taken,
            StatusCode::NOT_FOUND => UsernameStatus::Available,
            StatusCode::BAD_REQUEST => UsernameStatus::Invalid,
            _ => UsernameStatus::Unknown,
        };
        if status != UsernameStatus::Taken && status != UsernameStatus::Available {
            debug!(status = %response.status, body = %response.body, "Username check inconclusive");
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{client, ScriptedTransport};
    use crate::session::SessionStore;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn user_by_id_works_without_session() {
        let transport = ScriptedTransport::new();
        transport
            .reply(USER_BY_ID_PATH, StatusCode::OK, json!({ "type": "OK" }))
            .reply(USER_BY_ID_PATH, StatusCode::NOT_FOUND, json!({}));
        let dispatcher = Dispatcher::new(client(transport.clone(), SessionStore::new()));

        assert_eq!(dispatcher.user_by_id("u7").await.unwrap(), "u7");
        let err = dispatcher.user_by_id("ghost").await.unwrap_err();
        assert_eq!(err.user_message(), USER_NOT_FOUND);

        let sent = transport.sent_to(USER_BY_ID_PATH);
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].url.query(), Some("id=u7"));
        assert_eq!(sent[0].body, None);
    }

    #[tokio::test]
    async fn username_status_follows_status_code() {
        let transport = ScriptedTransport::new();
        transport
            .reply(USER_BY_USERNAME_PATH, StatusCode::OK, json!({ "userId": "u1" }))
            .reply(USER_BY_USERNAME_PATH, StatusCode::NOT_FOUND, json!({}))
            .reply(USER_BY_USERNAME_PATH, StatusCode::BAD_REQUEST, json!({}))
            .reply(USER_BY_USERNAME_PATH, StatusCode::SERVICE_UNAVAILABLE, json!({}));
        let dispatcher = Dispatcher::new(client(transport, SessionStore::new()));

        let expected = [
            UsernameStatus::Taken,
            UsernameStatus::Available,
            UsernameStatus::Invalid,
            UsernameStatus::Unknown,
        ];
        for status in expected {
            assert_eq!(dispatcher.check_username("alice").await.unwrap(), status);
        }
    }
}
