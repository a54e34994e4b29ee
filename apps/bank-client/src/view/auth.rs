// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login page: switches between the login and registration forms.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::api::Dispatcher;
use crate::forms::{FieldId, FieldReport, RegistrationFailure, RegistrationValidator};
use crate::models::RegistrationRequest;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    Login,
    Register,
}

/// Text of the link that switches to the other form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitcherText {
    pub flavour: &'static str,
    pub link: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFrame {
    pub view: AuthView,
    pub switcher: SwitcherText,
    /// Form-level message of the active form.
    pub error_message: Option<String>,
    pub field_errors: BTreeMap<FieldId, String>,
}

#[derive(Debug)]
pub struct AuthViewSwitcher {
    dispatcher: Dispatcher,
    registration: RegistrationValidator,
    view: AuthView,
    error_message: Option<String>,
    field_errors: BTreeMap<FieldId, String>,
}

impl AuthViewSwitcher {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            registration: RegistrationValidator::new(dispatcher.clone()),
            dispatcher,
            view: AuthView::Login,
            error_message: None,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn view(&self) -> AuthView {
        self.view
    }

    pub fn switcher_text(&self) -> SwitcherText {
        match self.view {
            AuthView::Login => SwitcherText {
                flavour: "Don't have an account? ",
                link: "Register",
            },
            AuthView::Register => SwitcherText {
                flavour: "Already have an account? ",
                link: "Login",
            },
        }
    }

    /// Toggle forms. Messages belong to the form that produced them.
    pub fn switch_views(&mut self) -> SwitcherText {
        self.view = match self.view {
            AuthView::Login => AuthView::Register,
            AuthView::Register => AuthView::Login,
        };
        self.error_message = None;
        self.field_errors.clear();
        debug!(view = ?self.view, "Switched auth view");
        self.switcher_text()
    }

    pub fn show_error_message(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    fn record(&mut self, report: FieldReport) {
        match report.message {
            Some(message) => {
                self.field_errors.insert(report.field, message);
            }
            None => {
                self.field_errors.remove(&report.field);
            }
        }
    }

    pub fn frame(&self) -> AuthFrame {
        AuthFrame {
            view: self.view,
            switcher: self.switcher_text(),
            error_message: self.error_message.clone(),
            field_errors: self.field_errors.clone(),
        }
    }

    pub async fn submit_login(&mut self, username: &str, password: &str) -> Option<Session> {
        self.error_message = None;
        match self.dispatcher.login(username, password).await {
            Ok(session) => Some(session),
            Err(err) => {
                self.show_error_message(err.user_message());
                None
            }
        }
    }

    /// Inline check of the username field.
    pub async fn username_changed(&mut self, username: &str) {
        let report = self.registration.check_username(username).await;
        self.record(report);
    }

    pub fn repeat_password_changed(&mut self, clear: &str, repeat: &str) {
        self.record(RegistrationValidator::check_passwords(clear, repeat));
    }

    /// Register and, on success, go back to the login form.
    pub async fn submit_registration(&mut self, request: &RegistrationRequest) -> bool {
        self.error_message = None;
        match self.registration.submit(request).await {
            Ok(()) => {
                info!(username = %request.username, "Registration complete");
                self.switch_views();
                true
            }
            Err(RegistrationFailure::Field(report)) => {
                self.record(report);
                false
            }
            Err(failure @ RegistrationFailure::Rejected(_)) => {
                self.show_error_message(failure.message());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::{LOGIN_PATH, REGISTER_PATH, WRONG_CREDENTIALS};
    use crate::api::users::USER_BY_USERNAME_PATH;
    use crate::forms::registration::{PASSWORDS_DIFFER, USERNAME_EXISTS};
    use crate::http::testing::{client, ScriptedTransport};
    use crate::session::SessionStore;
    use reqwest::StatusCode;
    use serde_json::json;

    fn switcher(transport: std::sync::Arc<ScriptedTransport>) -> AuthViewSwitcher {
        AuthViewSwitcher::new(Dispatcher::new(client(transport, SessionStore::new())))
    }

    fn request(repeat: &str) -> RegistrationRequest {
        RegistrationRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            surname: "Liddell".into(),
            clear_password: "pw".into(),
            repeat_password: repeat.into(),
        }
    }

    #[test]
    fn switching_toggles_text_and_clears_messages() {
        let mut auth = switcher(ScriptedTransport::new());
        assert_eq!(auth.switcher_text().link, "Register");
        auth.show_error_message("boom");

        let text = auth.switch_views();
        assert_eq!(text.flavour, "Already have an account? ");
        assert_eq!(text.link, "Login");
        assert_eq!(auth.frame().error_message, None);

        auth.switch_views();
        assert_eq!(auth.view(), AuthView::Login);
    }

    #[tokio::test]
    async fn failed_login_shows_message_on_login_form() {
        let transport = ScriptedTransport::new();
        transport.reply(LOGIN_PATH, StatusCode::NOT_FOUND, json!({}));
        let mut auth = switcher(transport);

        assert!(auth.submit_login("alice", "bad").await.is_none());
        let frame = auth.frame();
        assert_eq!(frame.view, AuthView::Login);
        assert_eq!(frame.error_message.as_deref(), Some(WRONG_CREDENTIALS));
    }

    #[tokio::test]
    async fn registration_reports_fields_then_switches_to_login() {
        let transport = ScriptedTransport::new();
        transport
            .reply(USER_BY_USERNAME_PATH, StatusCode::OK, json!({}))
            .reply(USER_BY_USERNAME_PATH, StatusCode::NOT_FOUND, json!({}))
            .reply(USER_BY_USERNAME_PATH, StatusCode::NOT_FOUND, json!({}))
            .reply(REGISTER_PATH, StatusCode::OK, json!({}));
        let mut auth = switcher(transport.clone());
        auth.switch_views();

        auth.username_changed("alice").await;
        assert_eq!(
            auth.frame().field_errors.get(&FieldId::Username).map(String::as_str),
            Some(USERNAME_EXISTS)
        );

        assert!(!auth.submit_registration(&request("other")).await);
        let errors = auth.frame().field_errors;
        assert_eq!(errors.get(&FieldId::RepeatPassword).map(String::as_str), Some(PASSWORDS_DIFFER));
        assert!(transport.sent_to(REGISTER_PATH).is_empty());

        assert!(auth.submit_registration(&request("pw")).await);
        assert_eq!(auth.view(), AuthView::Login);
        assert!(auth.frame().field_errors.is_empty());
    }
}
