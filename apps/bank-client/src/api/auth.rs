// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, logout and registration.
//!
//! Login stores the token and user in the [`SessionStore`] as one step; the
//! backend also sets the `refresh` cookie that the refresh endpoint reads.
//!
//! [`SessionStore`]: crate::session::SessionStore

use reqwest::StatusCode;
use serde_json::json;
use tracing::{info, warn};

use super::{rejection, Dispatcher};
use crate::error::ClientError;
use crate::models::{LoginRequest, LoginResponse, RegistrationRequest};
use crate::session::Session;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const REGISTER_PATH: &str = "/api/users";

pub const INVALID_FIELDS: &str = "Please check that the fields contain valid information";
pub const WRONG_CREDENTIALS: &str = "Wrong username or password";
pub const USERNAME_TAKEN: &str = "A username with the requested username already exists";
pub const REQUEST_FAILED: &str =
    "We weren't able to process your request, please try again later";

impl Dispatcher {
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let url = self.http().endpoint(LOGIN_PATH)?;
        let request = LoginRequest {
            username: username.to_string(),
            clear_password: password.to_string(),
        };
        let response = self.http().post(url, &request).await?;
        let message = match response.status {
            StatusCode::OK => {
                let body: LoginResponse = response.json()?;
                self.session()
                    .login(body.token.clone(), &body.user)
                    .map_err(|e| ClientError::Decode(e.to_string()))?;
                return Ok(Session {
                    token: body.token,
                    user: body.user,
                });
            }
            StatusCode::BAD_REQUEST => INVALID_FIELDS,
            StatusCode::NOT_FOUND | StatusCode::CONFLICT | StatusCode::UNAUTHORIZED => {
                WRONG_CREDENTIALS
            }
            _ => REQUEST_FAILED,
        };
        Err(rejection(LOGIN_PATH, &response, message))
    }

    /// End the session. The local session is cleared whatever the backend
    /// answers; an error only reports that the refresh cookie may survive.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let outcome = match self.http().endpoint(LOGOUT_PATH) {
            Ok(url) => self.http().post(url, &json!({})).await,
            Err(e) => Err(e),
        };
        self.session().logout();

        let response = outcome.inspect_err(|e| warn!(error = %e, "Logout request failed"))?;
        if response.status == StatusCode::OK {
            info!("Logged out");
            Ok(())
        } else {
            Err(rejection(LOGOUT_PATH, &response, REQUEST_FAILED))
        }
    }

    pub async fn register(&self, request: &RegistrationRequest) -> Result<(), ClientError> {
        let url = self.http().endpoint(REGISTER_PATH)?;
        let response = self.http().post(url, request).await?;
        let message = match response.status {
            StatusCode::OK => {
                info!(username = %request.username, "User registered");
                return Ok(());
            }
            StatusCode::BAD_REQUEST => INVALID_FIELDS,
            StatusCode::CONFLICT => USERNAME_TAKEN,
            _ => REQUEST_FAILED,
        };
        Err(rejection(REGISTER_PATH, &response, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::accounts::ACCOUNTS_OF_USER_PATH;
    use crate::http::testing::{client, ScriptedTransport};
    use crate::session::{sample_user, SessionStore, TOKEN_KEY, USER_KEY};
    use std::sync::Arc;

    fn dispatcher(transport: Arc<ScriptedTransport>, session: SessionStore) -> Dispatcher {
        Dispatcher::new(client(transport, session))
    }

    #[tokio::test]
    async fn login_populates_session_and_later_calls_carry_token() {
        let transport = ScriptedTransport::new();
        transport
            .reply(
                LOGIN_PATH,
                StatusCode::OK,
                json!({ "token": "t1", "user": { "id": "u1", "username": "alice" } }),
            )
            .reply(ACCOUNTS_OF_USER_PATH, StatusCode::OK, json!({ "accounts": [] }));
        let session = SessionStore::new();
        let dispatcher = dispatcher(transport.clone(), session.clone());

        let started = dispatcher.login("alice", "pw").await.unwrap();
        assert_eq!(started.token, "t1");
        assert_eq!(session.current().unwrap().user.id, "u1");

        let login_body = &transport.bodies_sent_to(LOGIN_PATH)[0];
        assert_eq!(login_body, &json!({ "username": "alice", "clearPassword": "pw" }));
        assert!(login_body.get("token").is_none());

        dispatcher.fetch_account_list("u1", true).await.unwrap();
        assert_eq!(transport.bodies_sent_to(ACCOUNTS_OF_USER_PATH)[0]["token"], "t1");
    }

    #[tokio::test]
    async fn failed_login_leaves_session_empty() {
        let transport = ScriptedTransport::new();
        transport
            .reply(LOGIN_PATH, StatusCode::NOT_FOUND, json!({}))
            .reply(LOGIN_PATH, StatusCode::BAD_REQUEST, json!({}))
            .reply(LOGIN_PATH, StatusCode::OK, json!({ "token": "t1" }));
        let session = SessionStore::new();
        let dispatcher = dispatcher(transport, session.clone());

        let err = dispatcher.login("alice", "bad").await.unwrap_err();
        assert_eq!(err.user_message(), WRONG_CREDENTIALS);
        let err = dispatcher.login("", "").await.unwrap_err();
        assert_eq!(err.user_message(), INVALID_FIELDS);
        // A 200 without a user is undecodable and must not half-populate the session.
        let err = dispatcher.login("alice", "pw").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));

        assert_eq!(session.get_raw(TOKEN_KEY), None);
        assert_eq!(session.get_raw(USER_KEY), None);
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_backend_fails() {
        let transport = ScriptedTransport::new();
        transport.fail(LOGOUT_PATH, "offline");
        let session = SessionStore::new();
        session.login("t1", &sample_user("u1")).unwrap();
        let dispatcher = dispatcher(transport, session.clone());

        assert!(dispatcher.logout().await.is_err());
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn register_maps_conflict_and_validation_errors() {
        let transport = ScriptedTransport::new();
        transport
            .reply(REGISTER_PATH, StatusCode::OK, json!({}))
            .reply(REGISTER_PATH, StatusCode::CONFLICT, json!({}))
            .reply(REGISTER_PATH, StatusCode::BAD_REQUEST, json!({}))
            .reply(REGISTER_PATH, StatusCode::INTERNAL_SERVER_ERROR, json!({}));
        let dispatcher = dispatcher(transport.clone(), SessionStore::new());
        let request = RegistrationRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            surname: "Liddell".into(),
            clear_password: "pw".into(),
            repeat_password: "pw".into(),
        };

        dispatcher.register(&request).await.unwrap();
        assert_eq!(transport.bodies_sent_to(REGISTER_PATH)[0]["repeatPassword"], "pw");
        for expected in [USERNAME_TAKEN, INVALID_FIELDS, REQUEST_FAILED] {
            let err = dispatcher.register(&request).await.unwrap_err();
            assert_eq!(err.user_message(), expected);
        }
    }
}
