// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use reqwest::StatusCode;

use crate::http::TransportError;

/// Generic message for transport failures and unexpected statuses.
pub const TRY_AGAIN_LATER: &str =
    "The server could not process your request, please try again later.";

/// Modal title and body shown when the token could not be refreshed.
pub const SESSION_EXPIRED_TITLE: &str = "Session expired";
pub const SESSION_EXPIRED_MESSAGE: &str = "We were unable to refresh your token";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (DNS, offline, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// A 401 could not be recovered by refreshing the token.
    #[error("session expired")]
    SessionExpired,

    /// An authenticated operation was invoked without an active session.
    #[error("user is not logged in")]
    NotLoggedIn,

    /// The backend answered with a status the operation treats as failure.
    #[error("{message} (status {status})")]
    Rejected { status: StatusCode, message: String },

    #[error("response could not be decoded: {0}")]
    Decode(String),

    #[error("invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("invalid endpoint {0}")]
    InvalidEndpoint(String),

    /// A view-bound fetch was superseded or its view was left.
    #[error("fetch cancelled")]
    Cancelled,

    #[error("fetch timed out")]
    TimedOut,
}

impl ClientError {
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Text suitable for a modal or an inline field message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } => message.clone(),
            ClientError::SessionExpired | ClientError::NotLoggedIn => {
                SESSION_EXPIRED_MESSAGE.to_string()
            }
            ClientError::Transport(_)
            | ClientError::Decode(_)
            | ClientError::InvalidPayload(_)
            | ClientError::InvalidEndpoint(_)
            | ClientError::TimedOut => TRY_AGAIN_LATER.to_string(),
            ClientError::Cancelled => String::new(),
        }
    }

    /// Whether the only remediation is a fresh login.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ClientError::SessionExpired | ClientError::NotLoggedIn)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(value: TransportError) -> Self {
        ClientError::Transport(value.to_string())
    }
}
