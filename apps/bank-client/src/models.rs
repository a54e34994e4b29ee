// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies exchanged with the banking REST backend.
//! All bodies are camelCase JSON. Identifiers are opaque url-safe strings;
//! the backend historically names them `base64Id`, which is accepted as an
//! alias on every identifier field.
//!
//! ## Model Categories
//!
//! - **Users**: the logged-in user and registration/login requests
//! - **Accounts**: account rows and their transfer history
//! - **Transfers**: transfer records and the new-transfer request
//! - **Contacts**: address-book entries used to prefill the payee field

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Users
// =============================================================================

/// The user owning the current session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(alias = "base64Id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

impl User {
    /// "Name Surname" as shown in the user details panel.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub clear_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Body of `GET /api/auth/refresh` on success.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub clear_password: String,
    pub repeat_password: String,
}

// =============================================================================
// Accounts
// =============================================================================

/// A bank account row.
///
/// `balance` is only present in the owner's detailed listing; payee lookups
/// (`detailed = false`) return bare identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    #[serde(alias = "base64Id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountListRequest {
    pub user_id: String,
    pub detailed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountListResponse {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsRequest {
    pub account_id: String,
}

/// Incoming and outgoing transfers of one account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountDetails {
    #[serde(default)]
    pub incoming: Vec<Transfer>,
    #[serde(default)]
    pub outgoing: Vec<Transfer>,
}

// =============================================================================
// Transfers
// =============================================================================

/// An executed money transfer. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(alias = "base64Id")]
    pub id: String,
    #[serde(alias = "fromId")]
    pub from_account_id: String,
    #[serde(alias = "toId")]
    pub to_account_id: String,
    pub amount: f64,
    #[serde(default)]
    pub causal: String,
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    /// Payer balance before the transfer, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_balance: Option<f64>,
    /// Payee balance before the transfer, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_balance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransferRequest {
    pub from_user_id: String,
    pub from_account_id: String,
    pub to_user_id: String,
    pub to_account_id: String,
    pub amount: f64,
    pub causal: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferResponse {
    pub transfer: Transfer,
}

// =============================================================================
// Contacts
// =============================================================================

/// Directed address-book entry. Not an authorization relation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(alias = "ownerBase64Id")]
    pub owner_user_id: String,
    #[serde(alias = "contactBase64Id")]
    pub contact_user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactListResponse {
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactRequest {
    pub contact_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transfer_accepts_backend_field_names() {
        let transfer: Transfer = serde_json::from_value(json!({
            "base64Id": "t-1",
            "date": "2024-03-01T10:15:00Z",
            "amount": 12.5,
            "fromId": "acc-a",
            "fromBalance": 100.0,
            "toId": "acc-b",
            "toBalance": 3.0,
            "causal": "rent"
        }))
        .unwrap();

        assert_eq!(transfer.id, "t-1");
        assert_eq!(transfer.from_account_id, "acc-a");
        assert_eq!(transfer.to_account_id, "acc-b");
        assert_eq!(transfer.from_balance, Some(100.0));
        assert_eq!(transfer.timestamp.to_rfc3339(), "2024-03-01T10:15:00+00:00");
    }

    #[test]
    fn non_detailed_account_has_no_balance() {
        let list: AccountListResponse =
            serde_json::from_value(json!({ "accounts": [{ "base64Id": "acc-1" }] })).unwrap();
        assert_eq!(list.accounts[0].id, "acc-1");
        assert_eq!(list.accounts[0].balance, None);
    }

    #[test]
    fn requests_serialize_as_camel_case() {
        let body = serde_json::to_value(NewTransferRequest {
            from_user_id: "u1".into(),
            from_account_id: "a1".into(),
            to_user_id: "u2".into(),
            to_account_id: "a2".into(),
            amount: 5.0,
            causal: "dinner".into(),
        })
        .unwrap();
        assert_eq!(body["fromAccountId"], "a1");
        assert_eq!(body["toUserId"], "u2");

        let login = serde_json::to_value(LoginRequest {
            username: "alice".into(),
            clear_password: "secret".into(),
        })
        .unwrap();
        assert_eq!(login["clearPassword"], "secret");
    }

    #[test]
    fn display_name_joins_name_and_surname() {
        let user = User {
            id: "u1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            surname: "Liddell".into(),
        };
        assert_eq!(user.display_name(), "Alice Liddell");
    }
}
