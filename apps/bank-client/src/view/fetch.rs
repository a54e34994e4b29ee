// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stale-response protection for view-bound fetches.
//!
//! Every fetch started for a view takes a [`FetchTicket`]. Starting another
//! fetch for the same view cancels the previous ticket's token, and leaving
//! the view cancels the current one. A completion is applied only while its
//! ticket is still the latest and uncancelled.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ClientError;

#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub id: u64,
    token: CancellationToken,
}

impl FetchTicket {
    /// Await `fut` unless the ticket is cancelled or `limit` elapses first.
    pub async fn run<T, F>(&self, limit: Duration, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        tokio::select! {
            _ = self.token.cancelled() => {
                debug!(request_id = self.id, "Fetch cancelled");
                Err(ClientError::Cancelled)
            }
            outcome = tokio::time::timeout(limit, fut) => {
                outcome.unwrap_or(Err(ClientError::TimedOut))
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Default)]
pub struct FetchGuard {
    latest: u64,
    token: CancellationToken,
}

impl FetchGuard {
    /// Supersede any fetch in flight and hand out the next ticket.
    pub fn begin(&mut self) -> FetchTicket {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.latest += 1;
        FetchTicket {
            id: self.latest,
            token: self.token.clone(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.id == self.latest && !ticket.is_cancelled()
    }

    /// Invalidate the fetch in flight, if any.
    pub fn cancel(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut guard = FetchGuard::default();
        let first = guard.begin();
        let second = guard.begin();

        assert!(second.id > first.id);
        assert!(!guard.is_current(&first));
        assert!(first.is_cancelled());
        assert!(guard.is_current(&second));

        guard.cancel();
        assert!(!guard.is_current(&second));
    }

    #[tokio::test]
    async fn superseded_fetch_resolves_as_cancelled() {
        let mut guard = FetchGuard::default();
        let first = guard.begin();
        let pending = tokio::spawn(async move {
            first
                .run(Duration::from_secs(5), async {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    Ok::<_, ClientError>(1)
                })
                .await
        });
        tokio::task::yield_now().await;
        let _second = guard.begin();

        assert!(matches!(pending.await.unwrap(), Err(ClientError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_fetch_times_out() {
        let mut guard = FetchGuard::default();
        let ticket = guard.begin();
        let outcome = ticket
            .run(Duration::from_secs(3), std::future::pending::<Result<(), ClientError>>())
            .await;
        assert!(matches!(outcome, Err(ClientError::TimedOut)));
    }
}
