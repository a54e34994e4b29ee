// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Facade
//!
//! [`Dispatcher`] turns backend endpoints into typed async operations. Each
//! operation issues one request through [`HttpClient`] and resolves to the
//! parsed payload or to a [`ClientError`] carrying a human-readable message.
//!
//! Status codes are matched exactly; only 200 counts as success.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `login` | `POST /api/auth/login` |
//! | `logout` | `POST /api/auth/logout` |
//! | `register` | `POST /api/users` |
//! | `check_username` | `GET /api/user/byUsername` |
//! | `user_by_id` | `GET /api/user/byId` |
//! | `fetch_account_list` | `POST /api/accounts/ofUser` |
//! | `fetch_account_details` | `POST /api/accounts/transfers` |
//! | `new_account` | `POST /api/accounts` |
//! | `new_transfer` | `POST /api/transfers` |
//! | `fetch_contacts` | `POST /api/contacts/ofUser` |
//! | `new_contact` | `POST /api/contacts` |

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::http::{HttpClient, HttpResponse};
use crate::session::SessionStore;

pub mod accounts;
pub mod auth;
pub mod contacts;
pub mod transfers;
pub mod users;

pub use users::UsernameStatus;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: HttpClient,
}

impl Dispatcher {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn session(&self) -> &SessionStore {
        self.http.session()
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Authenticated POST with refresh failure mapped to
    /// [`ClientError::SessionExpired`].
    async fn authenticated<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<HttpResponse, ClientError> {
        let outcome = self.http.authenticated_post(path, payload).await?;
        if outcome.refresh_failed {
            warn!(path = %path, "Session expired: token could not be refreshed");
            return Err(ClientError::SessionExpired);
        }
        Ok(outcome.response)
    }
}

/// Log the body of an unexpected response and build the rejection.
fn rejection(path: &str, response: &HttpResponse, message: &str) -> ClientError {
    debug!(path = %path, status = %response.status, body = %response.body, "Request rejected");
    ClientError::rejected(response.status, message)
}
