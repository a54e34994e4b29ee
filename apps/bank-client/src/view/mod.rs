// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! View layer: the banking state machine, its modals and the login page.

pub mod auth;
pub mod fetch;
pub mod modal;
pub mod orchestrator;
pub mod surface;

pub use auth::{AuthView, AuthViewSwitcher};
pub use fetch::{FetchGuard, FetchTicket};
pub use modal::{Modal, ModalAction, ModalContent, ModalStack};
pub use orchestrator::{View, ViewOrchestrator};
pub use surface::{Frame, MainPanel, RenderSurface, TracingSurface, UserPanel};
