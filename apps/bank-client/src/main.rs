// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use bank_client::api::Dispatcher;
use bank_client::config::{json_logs_enabled, ClientConfig, ConfigError, Credentials, DEFAULT_LOG_FILTER};
use bank_client::error::ClientError;
use bank_client::http::HttpClient;
use bank_client::session::SessionStore;
use bank_client::view::{TracingSurface, ViewOrchestrator};
use tracing::{error, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("signal handler failed: {0}")]
    Signal(#[from] std::io::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json_logs_enabled() {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let run_id = Uuid::new_v4();
    match run().instrument(info_span!("bank_client", %run_id)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%run_id, error = %err, "Bank client stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = ClientConfig::from_env()?;
    let credentials = Credentials::from_env()?;
    info!(base_url = %config.base_url, "Bank client starting");

    let http = HttpClient::from_config(&config, SessionStore::new())?;
    let dispatcher = Dispatcher::new(http);
    let session = dispatcher
        .login(&credentials.username, &credentials.password)
        .await?;
    info!(user_id = %session.user.id, username = %session.user.username, "Logged in");

    let view = ViewOrchestrator::new(dispatcher, Arc::new(TracingSurface), config.fetch_timeout);
    view.init().await?;
    if view.reauth_required() {
        return Err(ClientError::SessionExpired.into());
    }

    info!("Press Ctrl-C to log out");
    tokio::signal::ctrl_c().await?;
    view.logout().await;
    Ok(())
}
