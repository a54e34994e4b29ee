// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tab-scoped session state.
//!
//! The session lives in an ephemeral key/value map holding `token` (string)
//! and `user` (JSON-serialized [`User`]). Both keys are written and removed
//! under one write guard, so readers never observe a token without a user
//! or the reverse. Nothing is persisted; dropping the store ends the session.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::models::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// An authenticated session: bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Shared handle to the session key/value storage.
///
/// Cloning the store clones the handle, not the data; every collaborator
/// holding a clone sees the same session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session. Token and user are stored together or not at all.
    pub fn login(&self, token: impl Into<String>, user: &User) -> Result<(), serde_json::Error> {
        let user_json = serde_json::to_string(user)?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(TOKEN_KEY.to_string(), token.into());
        entries.insert(USER_KEY.to_string(), user_json);
        info!(user_id = %user.id, "Session started");
        Ok(())
    }

    /// Drop the session. Safe to call when already logged out.
    pub fn logout(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let had_session = entries.remove(TOKEN_KEY).is_some();
        entries.remove(USER_KEY);
        if had_session {
            info!("Session cleared");
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current().is_some()
    }

    /// Snapshot of the active session, if any.
    pub fn current(&self) -> Option<Session> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let token = entries.get(TOKEN_KEY)?.clone();
        let user = serde_json::from_str(entries.get(USER_KEY)?).ok()?;
        Some(Session { token, user })
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    pub fn user(&self) -> Option<User> {
        self.current().map(|session| session.user)
    }

    /// Overwrite the token of the active session.
    ///
    /// Returns `false` without writing anything when no session is active,
    /// e.g. the user logged out while a refresh was in flight.
    pub fn replace_token(&self, token: impl Into<String>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if !entries.contains_key(TOKEN_KEY) || !entries.contains_key(USER_KEY) {
            debug!("Token refresh landed after logout; discarding new token");
            return false;
        }
        entries.insert(TOKEN_KEY.to_string(), token.into());
        true
    }

    /// Raw key/value view, as a browser session storage would expose it.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }
}

#[cfg(test)]
pub(crate) fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        username: format!("user-{id}"),
        email: format!("{id}@example.com"),
        name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
    }
}
