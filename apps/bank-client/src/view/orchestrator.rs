// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Banking View State Machine
//!
//! | From | Event | To | Effect |
//! |------|-------|----|--------|
//! | any | `init` | `AccountList` | detailed list fetch |
//! | `AccountList` | `select_account` | `AccountDetail` | detail fetch, form bound to the account |
//! | `AccountDetail` | `show_account_list` | `AccountList` | detail fetch cancelled, list refetched |
//! | `AccountDetail` | `refresh` | `AccountDetail` | list and detail refetched |
//! | any | transfer succeeds | `AccountDetail` | form cleared, report modal, list and detail refetched |
//!
//! The transfer form is shown exactly when in `AccountDetail`. Modals stack
//! on top of either state. Each transition renders one [`Frame`].
//!
//! State sits behind a `std::sync::Mutex` that is never held across an
//! `.await`; results of fetches are applied only through their
//! [`FetchGuard`] ticket.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::fetch::FetchGuard;
use super::modal::{Modal, ModalAction, ModalStack};
use super::surface::{Frame, MainPanel, RenderSurface, UserPanel};
use crate::api::Dispatcher;
use crate::error::ClientError;
use crate::forms::transfer::PAYEE_ID_MISSING;
use crate::forms::{FieldId, FieldReport, SubmitCheck, TransferForm, TransferFormValidator};
use crate::models::{Account, AccountDetails, Transfer, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    AccountList,
    AccountDetail { account_id: String },
}

#[derive(Debug)]
struct ViewState {
    view: View,
    accounts: Vec<Account>,
    list_loading: bool,
    details: Option<AccountDetails>,
    detail_loading: bool,
    form: TransferForm,
    contacts: Vec<String>,
    modals: ModalStack,
    reauth_required: bool,
    list_fetch: FetchGuard,
    detail_fetch: FetchGuard,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: View::AccountList,
            accounts: Vec::new(),
            list_loading: false,
            details: None,
            detail_loading: false,
            form: TransferForm::default(),
            contacts: Vec::new(),
            modals: ModalStack::default(),
            reauth_required: false,
            list_fetch: FetchGuard::default(),
            detail_fetch: FetchGuard::default(),
        }
    }
}

impl ViewState {
    fn detail_account_id(&self) -> Option<&str> {
        match &self.view {
            View::AccountDetail { account_id } => Some(account_id),
            View::AccountList => None,
        }
    }

    fn showing_form_for(&self, account_id: &str) -> bool {
        self.detail_account_id() == Some(account_id)
    }

    fn enter_detail(&mut self, account_id: &str) {
        self.list_fetch.cancel();
        self.list_loading = false;
        self.view = View::AccountDetail {
            account_id: account_id.to_string(),
        };
        self.details = None;
        self.form = TransferForm::bound_to(account_id);
        self.form.contact_suggestions = self.contacts.clone();
    }

    /// Surface an error: session loss opens the session-expired modal once,
    /// anything else opens an error modal.
    fn fail(&mut self, err: ClientError) {
        match err {
            ClientError::Cancelled => debug!("Ignoring cancelled fetch"),
            err if err.requires_reauth() => {
                warn!(error = %err, "Session lost");
                if !self.reauth_required {
                    self.reauth_required = true;
                    self.modals.push(Modal::session_expired());
                }
            }
            err => {
                warn!(error = %err, "Operation failed");
                self.modals.push(Modal::error(err.user_message()));
            }
        }
    }

    fn frame(&self, user: Option<&User>) -> Frame {
        let main = match &self.view {
            View::AccountList => MainPanel::AccountList {
                accounts: self.accounts.clone(),
                loading: self.list_loading,
            },
            View::AccountDetail { account_id } => MainPanel::AccountDetail {
                account: self.accounts.iter().find(|a| &a.id == account_id).cloned(),
                details: self.details.clone(),
                loading: self.detail_loading,
                transfer_form: self.form.clone(),
            },
        };
        Frame {
            user: user.map(UserPanel::from),
            main,
            modal: self.modals.top().cloned(),
            modal_depth: self.modals.len(),
        }
    }
}

pub struct ViewOrchestrator {
    dispatcher: Dispatcher,
    validator: TransferFormValidator,
    surface: Arc<dyn RenderSurface>,
    fetch_timeout: Duration,
    state: Mutex<ViewState>,
}

impl ViewOrchestrator {
    pub fn new(dispatcher: Dispatcher, surface: Arc<dyn RenderSurface>, fetch_timeout: Duration) -> Self {
        Self {
            validator: TransferFormValidator::new(dispatcher.clone()),
            dispatcher,
            surface,
            fetch_timeout,
            state: Mutex::new(ViewState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> View {
        self.lock().view.clone()
    }

    pub fn reauth_required(&self) -> bool {
        self.lock().reauth_required
    }

    /// Frame reflecting the current state.
    pub fn frame(&self) -> Frame {
        let user = self.dispatcher.session().user();
        self.lock().frame(user.as_ref())
    }

    fn render(&self) {
        let frame = self.frame();
        self.surface.render(&frame);
    }

    fn report(&self, err: ClientError) {
        self.lock().fail(err);
        self.render();
    }

    fn session_user(&self) -> Option<User> {
        let user = self.dispatcher.session().user();
        if user.is_none() {
            self.report(ClientError::NotLoggedIn);
        }
        user
    }

    /// Enter the banking view. Without a session the surface is sent to login.
    pub async fn init(&self) -> Result<(), ClientError> {
        if !self.dispatcher.session().is_logged_in() {
            warn!("No active session, redirecting to login");
            self.surface.navigate_to_login();
            return Err(ClientError::NotLoggedIn);
        }
        info!("Initialising account view");
        self.show_account_list().await;
        Ok(())
    }

    /// Back to the account list, dropping any detail fetch in flight.
    pub async fn show_account_list(&self) {
        {
            let mut state = self.lock();
            state.detail_fetch.cancel();
            state.detail_loading = false;
            state.details = None;
            state.form = TransferForm::default();
            state.view = View::AccountList;
        }
        self.refresh_list().await;
    }

    pub async fn select_account(&self, account_id: &str) {
        {
            let mut state = self.lock();
            if state.view != View::AccountList {
                warn!(account_id = %account_id, "Account selected outside the list view");
                return;
            }
            if !state.accounts.iter().any(|a| a.id == account_id) {
                warn!(account_id = %account_id, "Selected account is not listed");
                return;
            }
            state.enter_detail(account_id);
        }
        debug!(account_id = %account_id, "Showing account details");
        self.load_detail(false).await;
    }

    /// Refetch whatever the current view shows.
    pub async fn refresh(&self) {
        let view = self.view();
        match view {
            View::AccountList => self.refresh_list().await,
            View::AccountDetail { .. } => self.load_detail(true).await,
        }
    }

    pub async fn refresh_list(&self) {
        let Some(user) = self.session_user() else {
            return;
        };
        let ticket = {
            let mut state = self.lock();
            if state.view != View::AccountList {
                debug!("List refresh requested outside the list view");
                return;
            }
            state.list_loading = true;
            state.list_fetch.begin()
        };
        self.render();

        let outcome = ticket
            .run(self.fetch_timeout, self.dispatcher.fetch_account_list(&user.id, true))
            .await;
        {
            let mut state = self.lock();
            if !state.list_fetch.is_current(&ticket) {
                debug!(request_id = ticket.id, "Discarding stale account list");
                return;
            }
            state.list_loading = false;
            match outcome {
                Ok(accounts) => state.accounts = accounts,
                Err(err) => state.fail(err),
            }
        }
        self.render();
    }

    /// Fetch details of the shown account, and the backing list entry too
    /// when `refresh_list` is set so balances follow transfers.
    async fn load_detail(&self, refresh_list: bool) {
        let Some(user) = self.session_user() else {
            return;
        };
        let (account_id, ticket) = {
            let mut state = self.lock();
            let Some(account_id) = state.detail_account_id().map(str::to_string) else {
                debug!("Detail refresh requested outside the detail view");
                return;
            };
            state.detail_loading = true;
            (account_id, state.detail_fetch.begin())
        };
        self.render();

        let fetch = async {
            let accounts = if refresh_list {
                Some(self.dispatcher.fetch_account_list(&user.id, true).await?)
            } else {
                None
            };
            let details = self.dispatcher.fetch_account_details(&account_id).await?;
            Ok::<_, ClientError>((accounts, details))
        };
        let outcome = ticket.run(self.fetch_timeout, fetch).await;
        {
            let mut state = self.lock();
            if !state.detail_fetch.is_current(&ticket) {
                debug!(request_id = ticket.id, account_id = %account_id, "Discarding stale account details");
                return;
            }
            state.detail_loading = false;
            match outcome {
                Ok((accounts, details)) => {
                    if let Some(accounts) = accounts {
                        state.accounts = accounts;
                    }
                    state.details = Some(details);
                }
                Err(err) => state.fail(err),
            }
        }
        self.render();
    }

    pub async fn new_account(&self) {
        match self.dispatcher.new_account().await {
            Ok(()) => {
                info!("Account created");
                self.refresh().await;
            }
            Err(err) => self.report(err),
        }
    }

    /// Store a typed value. Amount and causal are checked locally on the
    /// spot; other fields lose their error until rechecked.
    pub fn edit_field(&self, field: FieldId, value: &str) {
        {
            let mut state = self.lock();
            let Some(account_id) = state.detail_account_id() else {
                return;
            };
            let balance = state
                .accounts
                .iter()
                .find(|a| a.id == account_id)
                .and_then(|a| a.balance);
            state.form.edit(field, value);
            match field {
                FieldId::Amount => state
                    .form
                    .report(TransferFormValidator::check_amount(value, balance)),
                FieldId::Causal => state.form.report(TransferFormValidator::check_causal(value)),
                _ => {}
            }
        }
        self.render();
    }

    /// Whether the form of `source_account_id` is shown and still holds the
    /// values a check was computed from.
    fn inputs_current(state: &ViewState, source_account_id: &str, inputs: &[(FieldId, &str)]) -> bool {
        state.showing_form_for(source_account_id)
            && inputs
                .iter()
                .all(|(field, value)| state.form.draft.get(*field) == *value)
    }

    /// Record a field report unless its inputs were edited meanwhile.
    fn apply_report(&self, source_account_id: &str, inputs: &[(FieldId, &str)], report: FieldReport) {
        {
            let mut state = self.lock();
            if !Self::inputs_current(&state, source_account_id, inputs) {
                debug!(field = ?report.field, "Discarding stale field report");
                return;
            }
            state.form.report(report);
        }
        self.render();
    }

    /// Address-book suggestions for the payee id field.
    pub async fn focus_payee_id(&self) {
        let Some(user) = self.session_user() else {
            return;
        };
        match self.dispatcher.fetch_contacts(&user.id).await {
            Ok(contacts) => {
                let ids: Vec<String> = contacts.into_iter().map(|c| c.contact_user_id).collect();
                {
                    let mut state = self.lock();
                    state.form.contact_suggestions = ids.clone();
                    state.contacts = ids;
                }
                self.render();
            }
            Err(err) => self.report(err),
        }
    }

    /// Account suggestions for the payee account field.
    pub async fn focus_payee_account(&self) {
        let Some((source, payee_id)) = self.form_snapshot(|form| form.draft.payee_id.clone()) else {
            return;
        };
        let inputs = [(FieldId::PayeeId, payee_id.as_str())];
        if payee_id.trim().is_empty() {
            self.apply_report(
                &source,
                &inputs,
                FieldReport::invalid(FieldId::PayeeAccount, PAYEE_ID_MISSING),
            );
            return;
        }
        match self.dispatcher.fetch_account_list(payee_id.trim(), false).await {
            Ok(accounts) => {
                {
                    let mut state = self.lock();
                    if !Self::inputs_current(&state, &source, &inputs) {
                        debug!(payee_id = %payee_id, "Discarding stale payee accounts");
                        return;
                    }
                    state.form.payee_account_suggestions =
                        accounts.into_iter().map(|a| a.id).collect();
                }
                self.render();
            }
            Err(err) if err.requires_reauth() => self.report(err),
            Err(err) => self.apply_report(
                &source,
                &inputs,
                FieldReport::invalid(FieldId::PayeeAccount, err.user_message()),
            ),
        }
    }

    pub async fn check_payee_id(&self) {
        let Some((source, payee_id)) = self.form_snapshot(|form| form.draft.payee_id.clone()) else {
            return;
        };
        let inputs = [(FieldId::PayeeId, payee_id.as_str())];
        match self.validator.check_payee_id(&payee_id).await {
            Ok(report) => self.apply_report(&source, &inputs, report),
            Err(err) => self.report(err),
        }
    }

    pub async fn check_payee_account(&self) {
        let Some((source, draft)) = self.form_snapshot(|form| form.draft.clone()) else {
            return;
        };
        match self
            .validator
            .check_payee_account(&draft.payee_id, &draft.payee_account, &source)
            .await
        {
            Ok(report) => {
                let inputs = [
                    (FieldId::PayeeId, draft.payee_id.as_str()),
                    (FieldId::PayeeAccount, draft.payee_account.as_str()),
                ];
                self.apply_report(&source, &inputs, report)
            }
            Err(err) => self.report(err),
        }
    }

    fn form_snapshot<T>(&self, read: impl FnOnce(&TransferForm) -> T) -> Option<(String, T)> {
        let state = self.lock();
        let source = state.detail_account_id()?.to_string();
        Some((source, read(&state.form)))
    }

    /// Validate the form in order and post the transfer if every check passes.
    pub async fn submit_transfer(&self) {
        let Some(user) = self.session_user() else {
            return;
        };
        let (source, draft) = {
            let state = self.lock();
            let Some(account_id) = state.detail_account_id() else {
                warn!("Transfer submitted outside the detail view");
                return;
            };
            let Some(source) = state.accounts.iter().find(|a| a.id == account_id).cloned() else {
                warn!(account_id = %account_id, "Source account not loaded");
                return;
            };
            (source, state.form.draft.clone())
        };

        let request = match self.validator.validate(&draft, &source, &user.id).await {
            Ok(SubmitCheck::Ready(request)) => request,
            Ok(SubmitCheck::Invalid(report)) => {
                debug!(field = ?report.field, "Transfer blocked by validation");
                let inputs = [
                    (FieldId::PayeeId, draft.payee_id.as_str()),
                    (FieldId::PayeeAccount, draft.payee_account.as_str()),
                    (FieldId::Amount, draft.amount.as_str()),
                    (FieldId::Causal, draft.causal.as_str()),
                ];
                self.apply_report(&source.id, &inputs, report);
                return;
            }
            Err(err) => return self.report(err),
        };

        match self.dispatcher.new_transfer(&request).await {
            Ok(transfer) => self.transfer_succeeded(transfer, &request.to_user_id).await,
            Err(err) => self.report(err),
        }
    }

    /// Show the receipt and return to the debited account with fresh data.
    pub async fn transfer_succeeded(&self, transfer: Transfer, payee_user_id: &str) {
        let me = self.dispatcher.session().user().map(|u| u.id);
        {
            let mut state = self.lock();
            let known = state.contacts.iter().any(|c| c == payee_user_id);
            let offer = (!known && me.as_deref() != Some(payee_user_id))
                .then(|| payee_user_id.to_string());
            state.modals.push(Modal::transfer_report(&transfer, offer));

            if state.showing_form_for(&transfer.from_account_id) {
                state.form.clear_fields();
            } else {
                state.enter_detail(&transfer.from_account_id);
            }
        }
        info!(transfer_id = %transfer.id, amount = transfer.amount, "Transfer completed");
        self.load_detail(true).await;
    }

    /// Handle a button of the topmost modal.
    pub async fn modal_action(&self, action: ModalAction) {
        {
            let state = self.lock();
            if !state.modals.top().is_some_and(|m| m.offers(&action)) {
                warn!(?action, "Modal action not offered by the open modal");
                return;
            }
        }
        match action {
            ModalAction::Close => {
                self.lock().modals.pop();
                self.render();
            }
            ModalAction::GoToLogin => {
                {
                    let mut state = self.lock();
                    state.reauth_required = true;
                    state.modals.clear();
                    state.list_fetch.cancel();
                    state.detail_fetch.cancel();
                }
                self.dispatcher.session().logout();
                self.render();
                self.surface.navigate_to_login();
            }
            ModalAction::SaveContact(user_id) => {
                self.lock().modals.pop();
                self.render();
                match self.dispatcher.new_contact(&user_id).await {
                    Ok(()) => {
                        {
                            let mut state = self.lock();
                            state.contacts.push(user_id.clone());
                            state.form.contact_suggestions.push(user_id);
                        }
                        self.render();
                    }
                    Err(err) => self.report(err),
                }
            }
        }
    }

    /// End the session and leave for the login page.
    pub async fn logout(&self) {
        {
            let mut state = self.lock();
            state.list_fetch.cancel();
            state.detail_fetch.cancel();
        }
        if let Err(err) = self.dispatcher.logout().await {
            warn!(error = %err, "Logout not confirmed by backend");
        }
        self.surface.navigate_to_login();
    }
}
