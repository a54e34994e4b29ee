// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Modal overlay: content, actions and the stack of open modals.

use crate::error::{SESSION_EXPIRED_MESSAGE, SESSION_EXPIRED_TITLE};
use crate::models::Transfer;

pub const ERROR_TITLE: &str = "Error";
pub const TRANSFER_SUCCESS_TITLE: &str = "Transfer successful";

/// Label/value row of a structured modal body.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub value: String,
}

impl ReportRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalContent {
    Text(String),
    Structured(Vec<ReportRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    Close,
    GoToLogin,
    /// Add the payee of the reported transfer to the address book.
    SaveContact(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalButton {
    pub label: String,
    pub action: ModalAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub title: String,
    pub content: ModalContent,
    pub buttons: Vec<ModalButton>,
}

impl Modal {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            content: ModalContent::Text(message.into()),
            buttons: vec![button("Close", ModalAction::Close)],
        }
    }

    pub fn session_expired() -> Self {
        Self {
            title: SESSION_EXPIRED_TITLE.to_string(),
            content: ModalContent::Text(SESSION_EXPIRED_MESSAGE.to_string()),
            buttons: vec![button("Go to login", ModalAction::GoToLogin)],
        }
    }

    /// Receipt for a completed transfer. `save_contact` is the payee user id
    /// when the payee is not yet in the address book.
    pub fn transfer_report(transfer: &Transfer, save_contact: Option<String>) -> Self {
        let mut rows = vec![
            ReportRow::new("Id", transfer.id.as_str()),
            ReportRow::new("Payer account id", transfer.from_account_id.as_str()),
            ReportRow::new("Payee account id", transfer.to_account_id.as_str()),
            ReportRow::new("Amount", transfer.amount.to_string()),
            ReportRow::new("Causal", transfer.causal.as_str()),
        ];
        if let Some(before) = transfer.from_balance {
            rows.push(ReportRow::new(
                "Payer balance",
                format!("{before} → {}", before - transfer.amount),
            ));
        }
        if let Some(before) = transfer.to_balance {
            rows.push(ReportRow::new(
                "Payee balance",
                format!("{before} → {}", before + transfer.amount),
            ));
        }

        let mut buttons = Vec::with_capacity(2);
        if let Some(user_id) = save_contact {
            buttons.push(button("Save contact", ModalAction::SaveContact(user_id)));
        }
        buttons.push(button("Close", ModalAction::Close));

        Self {
            title: TRANSFER_SUCCESS_TITLE.to_string(),
            content: ModalContent::Structured(rows),
            buttons,
        }
    }

    pub fn offers(&self, action: &ModalAction) -> bool {
        self.buttons.iter().any(|b| &b.action == action)
    }
}

fn button(label: &str, action: ModalAction) -> ModalButton {
    ModalButton {
        label: label.to_string(),
        action,
    }
}

/// Open modals, most recent last. Only the top one is shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalStack {
    modals: Vec<Modal>,
}

impl ModalStack {
    pub fn push(&mut self, modal: Modal) {
        self.modals.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.modals.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.modals.last()
    }

    pub fn len(&self) -> usize {
        self.modals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }

    pub fn clear(&mut self) {
        self.modals.clear();
    }
}
