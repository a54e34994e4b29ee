// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer endpoint.

use reqwest::StatusCode;
use tracing::info;

use super::{rejection, Dispatcher};
use crate::error::ClientError;
use crate::models::{NewTransferRequest, Transfer, TransferResponse};

pub const TRANSFERS_PATH: &str = "/api/transfers";

pub const INVALID_FORM: &str =
    "The transfer form was not filled correctly, please check the data and try again.";
pub const INSUFFICIENT_FUNDS: &str =
    "The source account has not got enough funds to make the transfer.";
pub const UNKNOWN_PAYEE: &str =
    "The user-account combination could not be found, please check the data and try again.";
pub const TRANSFER_FAILED: &str =
    "The server could not process your request, please try again later.";

impl Dispatcher {
    /// Execute a money transfer.
    pub async fn new_transfer(&self, request: &NewTransferRequest) -> Result<Transfer, ClientError> {
        let response = self.authenticated(TRANSFERS_PATH, request).await?;
        let message = match response.status {
            StatusCode::OK => {
                let transfer = response.json::<TransferResponse>()?.transfer;
                info!(
                    transfer_id = %transfer.id,
                    from_account = %transfer.from_account_id,
                    to_account = %transfer.to_account_id,
                    amount = transfer.amount,
                    "Transfer executed"
                );
                return Ok(transfer);
            }
            StatusCode::BAD_REQUEST => INVALID_FORM,
            StatusCode::CONFLICT => INSUFFICIENT_FUNDS,
            StatusCode::NOT_FOUND => UNKNOWN_PAYEE,
            _ => TRANSFER_FAILED,
        };
        Err(rejection(TRANSFERS_PATH, &response, message))
    }
}
