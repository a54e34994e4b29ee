// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration form checks: duplicate username and password repeat.

use super::{FieldId, FieldReport};
use crate::api::{Dispatcher, UsernameStatus};
use crate::error::ClientError;
use crate::models::RegistrationRequest;

pub const USERNAME_EXISTS: &str = "A user with this username already exists";
pub const USERNAME_INVALID: &str = "The username is invalid";
pub const USERNAME_UNVERIFIED: &str = "Could not verify username";
pub const PASSWORDS_DIFFER: &str = "The passwords do not match";

#[derive(Debug)]
pub enum RegistrationFailure {
    /// A field check failed; nothing was posted.
    Field(FieldReport),
    /// The backend refused the registration.
    Rejected(ClientError),
}

impl RegistrationFailure {
    pub fn message(&self) -> String {
        match self {
            RegistrationFailure::Field(report) => report.message.clone().unwrap_or_default(),
            RegistrationFailure::Rejected(err) => err.user_message(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationValidator {
    dispatcher: Dispatcher,
}

impl RegistrationValidator {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn check_username(&self, username: &str) -> FieldReport {
        match self.dispatcher.check_username(username).await {
            Ok(UsernameStatus::Available) => FieldReport::valid(FieldId::Username),
            Ok(UsernameStatus::Taken) => FieldReport::invalid(FieldId::Username, USERNAME_EXISTS),
            Ok(UsernameStatus::Invalid) => FieldReport::invalid(FieldId::Username, USERNAME_INVALID),
            Ok(UsernameStatus::Unknown) | Err(_) => {
                FieldReport::invalid(FieldId::Username, USERNAME_UNVERIFIED)
            }
        }
    }

    pub fn check_passwords(clear: &str, repeat: &str) -> FieldReport {
        if clear == repeat {
            FieldReport::valid(FieldId::RepeatPassword)
        } else {
            FieldReport::invalid(FieldId::RepeatPassword, PASSWORDS_DIFFER)
        }
    }

    /// Username check, then password check, then the POST.
    pub async fn submit(&self, request: &RegistrationRequest) -> Result<(), RegistrationFailure> {
        let username = self.check_username(&request.username).await;
        if !username.is_valid() {
            return Err(RegistrationFailure::Field(username));
        }
        let passwords = Self::check_passwords(&request.clear_password, &request.repeat_password);
        if !passwords.is_valid() {
            return Err(RegistrationFailure::Field(passwords));
        }
        self.dispatcher
            .register(request)
            .await
            .map_err(RegistrationFailure::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::{REGISTER_PATH, USERNAME_TAKEN};
    use crate::api::users::USER_BY_USERNAME_PATH;
    use crate::http::testing::{client, ScriptedTransport};
    use crate::session::SessionStore;
    use reqwest::StatusCode;
    use serde_json::json;

    fn request(repeat: &str) -> RegistrationRequest {
        RegistrationRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            surname: "Liddell".into(),
            clear_password: "hunter22".into(),
            repeat_password: repeat.into(),
        }
    }

    fn validator(transport: std::sync::Arc<ScriptedTransport>) -> RegistrationValidator {
        RegistrationValidator::new(Dispatcher::new(client(transport, SessionStore::new())))
    }

    #[tokio::test]
    async fn username_messages() {
        let transport = ScriptedTransport::new();
        transport
            .reply(USER_BY_USERNAME_PATH, StatusCode::OK, json!({}))
            .reply(USER_BY_USERNAME_PATH, StatusCode::BAD_REQUEST, json!({}))
            .reply(USER_BY_USERNAME_PATH, StatusCode::NOT_FOUND, json!({}))
            .fail(USER_BY_USERNAME_PATH, "offline");
        let validator = validator(transport);

        let expected = [
            Some(USERNAME_EXISTS),
            Some(USERNAME_INVALID),
            None,
            Some(USERNAME_UNVERIFIED),
        ];
        for message in expected {
            let report = validator.check_username("alice").await;
            assert_eq!(report.message.as_deref(), message);
        }
    }

    #[tokio::test]
    async fn mismatched_passwords_block_submission() {
        let transport = ScriptedTransport::new();
        transport.reply(USER_BY_USERNAME_PATH, StatusCode::NOT_FOUND, json!({}));
        let validator = validator(transport.clone());

        let failure = validator.submit(&request("other")).await.unwrap_err();
        assert_eq!(failure.message(), PASSWORDS_DIFFER);
        assert!(transport.sent_to(REGISTER_PATH).is_empty());
    }

    #[tokio::test]
    async fn valid_form_is_posted_and_conflict_is_reported() {
        let transport = ScriptedTransport::new();
        transport
            .reply(USER_BY_USERNAME_PATH, StatusCode::NOT_FOUND, json!({}))
            .reply(REGISTER_PATH, StatusCode::OK, json!({}))
            .reply(USER_BY_USERNAME_PATH, StatusCode::NOT_FOUND, json!({}))
            .reply(REGISTER_PATH, StatusCode::CONFLICT, json!({}));
        let validator = validator(transport.clone());

        validator.submit(&request("hunter22")).await.unwrap();
        let failure = validator.submit(&request("hunter22")).await.unwrap_err();
        assert_eq!(failure.message(), USERNAME_TAKEN);
        assert_eq!(transport.sent_to(REGISTER_PATH).len(), 2);
    }
}
