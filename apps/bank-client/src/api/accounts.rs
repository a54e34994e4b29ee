// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints.

use reqwest::StatusCode;
use serde_json::Value;

use super::{rejection, Dispatcher};
use crate::error::ClientError;
use crate::models::{
    Account, AccountDetails, AccountDetailsRequest, AccountListRequest, AccountListResponse,
};

pub const ACCOUNTS_OF_USER_PATH: &str = "/api/accounts/ofUser";
pub const ACCOUNT_TRANSFERS_PATH: &str = "/api/accounts/transfers";
pub const NEW_ACCOUNT_PATH: &str = "/api/accounts";

pub const LIST_UNEXTRACTABLE: &str = "We could not extract an account list";
pub const LIST_FAILED: &str = "We could not fetch an account list, please try again later";
pub const DETAILS_FAILED: &str = "Could not fetch details for this account";
pub const NEW_ACCOUNT_FAILED: &str = "We could not create a new account, please try again later";

impl Dispatcher {
    /// Accounts of `user_id`. Balances are only included when `detailed`
    /// is set, which the backend allows for the owner alone.
    pub async fn fetch_account_list(
        &self,
        user_id: &str,
        detailed: bool,
    ) -> Result<Vec<Account>, ClientError> {
        let request = AccountListRequest {
            user_id: user_id.to_string(),
            detailed,
        };
        let response = self.authenticated(ACCOUNTS_OF_USER_PATH, &request).await?;
        match response.status {
            StatusCode::OK => Ok(response.json::<AccountListResponse>()?.accounts),
            StatusCode::BAD_REQUEST => Err(rejection(
                ACCOUNTS_OF_USER_PATH,
                &response,
                LIST_UNEXTRACTABLE,
            )),
            _ => Err(rejection(ACCOUNTS_OF_USER_PATH, &response, LIST_FAILED)),
        }
    }

    /// Incoming and outgoing transfers of one account.
    pub async fn fetch_account_details(
        &self,
        account_id: &str,
    ) -> Result<AccountDetails, ClientError> {
        let request = AccountDetailsRequest {
            account_id: account_id.to_string(),
        };
        let response = self.authenticated(ACCOUNT_TRANSFERS_PATH, &request).await?;
        if response.status == StatusCode::OK {
            response.json()
        } else {
            Err(rejection(ACCOUNT_TRANSFERS_PATH, &response, DETAILS_FAILED))
        }
    }

    /// Open a new account for the session user.
    pub async fn new_account(&self) -> Result<(), ClientError> {
        let response = self.authenticated(NEW_ACCOUNT_PATH, &Value::Null).await?;
        if response.status == StatusCode::OK {
            Ok(())
        } else {
            Err(rejection(NEW_ACCOUNT_PATH, &response, NEW_ACCOUNT_FAILED))
        }
    }
}
