// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The render surface and the frame handed to it.
//!
//! The orchestrator composes a complete [`Frame`] after each transition and
//! renders it once. Surfaces decide how panels map to real widgets.

use std::collections::BTreeMap;

use crate::forms::{FieldId, TransferForm};
use crate::models::{Account, AccountDetails, User};

use super::modal::Modal;

/// Current user's details panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPanel {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

impl From<&User> for UserPanel {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.display_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MainPanel {
    AccountList {
        accounts: Vec<Account>,
        loading: bool,
    },
    AccountDetail {
        /// `None` until the account shows up in a fetched list.
        account: Option<Account>,
        details: Option<AccountDetails>,
        loading: bool,
        transfer_form: TransferForm,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub user: Option<UserPanel>,
    pub main: MainPanel,
    /// Topmost open modal.
    pub modal: Option<Modal>,
    pub modal_depth: usize,
}

impl Frame {
    pub fn transfer_form(&self) -> Option<&TransferForm> {
        match &self.main {
            MainPanel::AccountDetail { transfer_form, .. } => Some(transfer_form),
            MainPanel::AccountList { .. } => None,
        }
    }

    pub fn field_errors(&self) -> BTreeMap<FieldId, String> {
        self.transfer_form()
            .map(|form| form.errors.clone())
            .unwrap_or_default()
    }
}

pub trait RenderSurface: Send + Sync {
    fn render(&self, frame: &Frame);

    /// Leave the banking view for the login page.
    fn navigate_to_login(&self);
}

/// Surface that only logs, used by the binary.
#[derive(Debug, Default)]
pub struct TracingSurface;

impl RenderSurface for TracingSurface {
    fn render(&self, frame: &Frame) {
        match &frame.main {
            MainPanel::AccountList { accounts, loading } => {
                tracing::info!(accounts = accounts.len(), loading, "Account list");
                for account in accounts {
                    tracing::info!(account_id = %account.id, balance = ?account.balance, "Account");
                }
            }
            MainPanel::AccountDetail {
                account,
                details,
                loading,
                ..
            } => {
                tracing::info!(
                    account_id = account.as_ref().map(|a| a.id.as_str()).unwrap_or_default(),
                    incoming = details.as_ref().map(|d| d.incoming.len()).unwrap_or_default(),
                    outgoing = details.as_ref().map(|d| d.outgoing.len()).unwrap_or_default(),
                    loading,
                    "Account detail"
                );
            }
        }
        if let Some(modal) = &frame.modal {
            tracing::warn!(title = %modal.title, content = ?modal.content, "Modal shown");
        }
    }

    fn navigate_to_login(&self) {
        tracing::warn!("Re-authentication required");
    }
}
