// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address-book endpoints.

use reqwest::StatusCode;

use super::{rejection, Dispatcher};
use crate::error::ClientError;
use crate::models::{Contact, ContactListRequest, ContactListResponse, NewContactRequest};

pub const CONTACTS_OF_USER_PATH: &str = "/api/contacts/ofUser";
pub const NEW_CONTACT_PATH: &str = "/api/contacts";

pub const CONTACTS_FAILED: &str = "We could not fetch your contact list, please try again later";
pub const NEW_CONTACT_FAILED: &str = "Could not add new contact";

impl Dispatcher {
    pub async fn fetch_contacts(&self, user_id: &str) -> Result<Vec<Contact>, ClientError> {
        let request = ContactListRequest {
            user_id: user_id.to_string(),
        };
        let response = self.authenticated(CONTACTS_OF_USER_PATH, &request).await?;
        if response.status == StatusCode::OK {
            Ok(response.json::<ContactListResponse>()?.contacts)
        } else {
            Err(rejection(CONTACTS_OF_USER_PATH, &response, CONTACTS_FAILED))
        }
    }

    pub async fn new_contact(&self, contact_id: &str) -> Result<(), ClientError> {
        let request = NewContactRequest {
            contact_id: contact_id.to_string(),
        };
        let response = self.authenticated(NEW_CONTACT_PATH, &request).await?;
        if response.status == StatusCode::OK {
            Ok(())
        } else {
            Err(rejection(NEW_CONTACT_PATH, &response, NEW_CONTACT_FAILED))
        }
    }
}
