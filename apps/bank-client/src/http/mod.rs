// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP layer: transport seam, request client, and token refresh.

pub mod client;
pub mod refresh;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{AuthenticatedResponse, HttpClient};
pub use refresh::{RefreshOutcome, TokenRefreshPolicy, REFRESH_PATH};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
