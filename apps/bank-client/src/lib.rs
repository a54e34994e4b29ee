// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bank Client - Single-Page Banking Front End Core
//!
//! Session handling, authenticated requests with one-shot token refresh, a
//! typed facade over the banking REST API, and the view state machine that
//! drives the account list, account details, transfer form and modals.
//!
//! ## Modules
//!
//! - `session` - Tab-scoped token/user storage
//! - `http` - Transport seam (reqwest), authenticated POST, token refresh
//! - `api` - Dispatcher facade over the REST endpoints
//! - `view` - Banking view state machine, modals, login/register switcher
//! - `forms` - Transfer and registration form validation

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod models;
pub mod session;
pub mod view;
