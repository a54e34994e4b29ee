// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! New-transfer form: draft values, field errors and validation.
//!
//! On submit the local checks (amount bounds, causal) run first, then the
//! payee id lookup, then the payee account lookup, each awaiting the previous
//! one. The first failing check aborts the submission before any mutating
//! request is sent.

use std::collections::BTreeMap;

use tracing::debug;

use super::{FieldId, FieldReport};
use crate::api::Dispatcher;
use crate::error::ClientError;
use crate::models::{Account, NewTransferRequest};

/// Backend limit on the causal length, in characters.
pub const CAUSAL_MAX_LEN: usize = 1024;

pub const AMOUNT_NOT_A_NUMBER: &str = "Please enter a valid amount";
pub const AMOUNT_NOT_POSITIVE: &str = "The amount must be greater than zero";
pub const AMOUNT_OVER_BALANCE: &str = "The amount exceeds the account balance";
pub const CAUSAL_MISSING: &str = "Please enter a causal";
pub const CAUSAL_TOO_LONG: &str = "The causal cannot be longer than 1024 characters";
pub const PAYEE_ID_MISSING: &str = "You must specify a user ID";
pub const NO_USER_ID: &str = "No user ID was specified";
pub const SAME_ACCOUNT: &str = "You cannot transfer money to the same account";
pub const ACCOUNT_NOT_FOUND: &str = "Unable to find an account with the specified ID";

/// Raw field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferDraft {
    pub payee_id: String,
    pub payee_account: String,
    pub amount: String,
    pub causal: String,
}

impl TransferDraft {
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::PayeeId => &self.payee_id,
            FieldId::PayeeAccount => &self.payee_account,
            FieldId::Amount => &self.amount,
            FieldId::Causal => &self.causal,
            FieldId::Username | FieldId::RepeatPassword => "",
        }
    }

    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        let value = value.into();
        match field {
            FieldId::PayeeId => self.payee_id = value,
            FieldId::PayeeAccount => self.payee_account = value,
            FieldId::Amount => self.amount = value,
            FieldId::Causal => self.causal = value,
            FieldId::Username | FieldId::RepeatPassword => {
                debug!(?field, "Ignoring non-transfer field");
            }
        }
    }
}

/// Transfer form bound to the account it debits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferForm {
    pub source_account_id: String,
    pub draft: TransferDraft,
    pub errors: BTreeMap<FieldId, String>,
    /// Payee ids from the address book.
    pub contact_suggestions: Vec<String>,
    /// Accounts of the currently typed payee.
    pub payee_account_suggestions: Vec<String>,
}

impl TransferForm {
    pub fn bound_to(source_account_id: impl Into<String>) -> Self {
        Self {
            source_account_id: source_account_id.into(),
            ..Self::default()
        }
    }

    /// Store a value; editing a field clears its previous error.
    pub fn edit(&mut self, field: FieldId, value: impl Into<String>) {
        self.draft.set(field, value);
        self.errors.remove(&field);
    }

    pub fn report(&mut self, report: FieldReport) {
        match report.message {
            Some(message) => {
                self.errors.insert(report.field, message);
            }
            None => {
                self.errors.remove(&report.field);
            }
        }
    }

    /// Reset values and errors, keeping the bound account and suggestions.
    pub fn clear_fields(&mut self) {
        self.draft = TransferDraft::default();
        self.errors.clear();
    }
}

/// Outcome of the pre-submit checks.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitCheck {
    Ready(NewTransferRequest),
    Invalid(FieldReport),
}

#[derive(Debug, Clone)]
pub struct TransferFormValidator {
    dispatcher: Dispatcher,
}

impl TransferFormValidator {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// `0 < amount <= balance`. An unknown balance admits nothing.
    pub fn check_amount(raw: &str, balance: Option<f64>) -> FieldReport {
        let Some(amount) = parse_amount(raw) else {
            return FieldReport::invalid(FieldId::Amount, AMOUNT_NOT_A_NUMBER);
        };
        if amount <= 0.0 {
            return FieldReport::invalid(FieldId::Amount, AMOUNT_NOT_POSITIVE);
        }
        if amount > balance.unwrap_or(0.0) {
            return FieldReport::invalid(FieldId::Amount, AMOUNT_OVER_BALANCE);
        }
        FieldReport::valid(FieldId::Amount)
    }

    pub fn check_causal(causal: &str) -> FieldReport {
        if causal.trim().is_empty() {
            FieldReport::invalid(FieldId::Causal, CAUSAL_MISSING)
        } else if causal.chars().count() > CAUSAL_MAX_LEN {
            FieldReport::invalid(FieldId::Causal, CAUSAL_TOO_LONG)
        } else {
            FieldReport::valid(FieldId::Causal)
        }
    }

    /// The payee must exist. Only session-ending errors are returned as `Err`.
    pub async fn check_payee_id(&self, payee_id: &str) -> Result<FieldReport, ClientError> {
        let payee_id = payee_id.trim();
        if payee_id.is_empty() {
            return Ok(FieldReport::invalid(FieldId::PayeeId, PAYEE_ID_MISSING));
        }
        match self.dispatcher.user_by_id(payee_id).await {
            Ok(_) => Ok(FieldReport::valid(FieldId::PayeeId)),
            Err(e) if e.requires_reauth() => Err(e),
            Err(e) => Ok(FieldReport::invalid(FieldId::PayeeId, e.user_message())),
        }
    }

    /// The payee account must differ from the source and belong to the payee.
    pub async fn check_payee_account(
        &self,
        payee_id: &str,
        payee_account: &str,
        source_account_id: &str,
    ) -> Result<FieldReport, ClientError> {
        let payee_account = payee_account.trim();
        if payee_account == source_account_id {
            return Ok(FieldReport::invalid(FieldId::PayeeAccount, SAME_ACCOUNT));
        }
        let payee_id = payee_id.trim();
        if payee_id.is_empty() {
            return Ok(FieldReport::invalid(FieldId::PayeeAccount, NO_USER_ID));
        }
        match self.dispatcher.fetch_account_list(payee_id, false).await {
            Ok(accounts) if accounts.iter().any(|a| a.id == payee_account) => {
                Ok(FieldReport::valid(FieldId::PayeeAccount))
            }
            Ok(_) => Ok(FieldReport::invalid(FieldId::PayeeAccount, ACCOUNT_NOT_FOUND)),
            Err(e) if e.requires_reauth() => Err(e),
            Err(_) => Ok(FieldReport::invalid(FieldId::PayeeAccount, ACCOUNT_NOT_FOUND)),
        }
    }

    /// Run every check in order and build the request if all pass.
    pub async fn validate(
        &self,
        draft: &TransferDraft,
        source: &Account,
        from_user_id: &str,
    ) -> Result<SubmitCheck, ClientError> {
        let amount = Self::check_amount(&draft.amount, source.balance);
        if !amount.is_valid() {
            return Ok(SubmitCheck::Invalid(amount));
        }
        let causal = Self::check_causal(&draft.causal);
        if !causal.is_valid() {
            return Ok(SubmitCheck::Invalid(causal));
        }
        let payee = self.check_payee_id(&draft.payee_id).await?;
        if !payee.is_valid() {
            return Ok(SubmitCheck::Invalid(payee));
        }
        let account = self
            .check_payee_account(&draft.payee_id, &draft.payee_account, &source.id)
            .await?;
        if !account.is_valid() {
            return Ok(SubmitCheck::Invalid(account));
        }

        Ok(SubmitCheck::Ready(NewTransferRequest {
            from_user_id: from_user_id.to_string(),
            from_account_id: source.id.clone(),
            to_user_id: draft.payee_id.trim().to_string(),
            to_account_id: draft.payee_account.trim().to_string(),
            amount: parse_amount(&draft.amount).unwrap_or_default(),
            causal: draft.causal.clone(),
        }))
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}
