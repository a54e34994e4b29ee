// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Field-level validation mirroring the backend's rules.
//!
//! Validators never touch the render surface. They produce [`FieldReport`]s
//! that the owning view stores and renders next to the field, the way a
//! browser reports custom validity.

pub mod registration;
pub mod transfer;

pub use registration::{RegistrationFailure, RegistrationValidator};
pub use transfer::{SubmitCheck, TransferDraft, TransferForm, TransferFormValidator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    PayeeId,
    PayeeAccount,
    Amount,
    Causal,
    Username,
    RepeatPassword,
}

/// Validity of one field: `None` means valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    pub field: FieldId,
    pub message: Option<String>,
}

impl FieldReport {
    pub fn valid(field: FieldId) -> Self {
        Self {
            field,
            message: None,
        }
    }

    pub fn invalid(field: FieldId, message: impl Into<String>) -> Self {
        Self {
            field,
            message: Some(message.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.message.is_none()
    }
}
