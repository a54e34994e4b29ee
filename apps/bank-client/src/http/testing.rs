// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scripted in-memory transport for unit tests.
//!
//! Replies are queued per URL path and consumed in order. Every request is
//! recorded, including ones that found no scripted reply.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use super::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use super::HttpClient;
use crate::session::SessionStore;

enum Reply {
    Respond {
        status: StatusCode,
        body: String,
        delay: Option<Duration>,
    },
    Fail(String),
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, path: &str, status: StatusCode, body: Value) -> &Self {
        self.push(path, Reply::Respond {
            status,
            body: body.to_string(),
            delay: None,
        })
    }

    pub fn reply_after(&self, path: &str, delay: Duration, status: StatusCode, body: Value) -> &Self {
        self.push(path, Reply::Respond {
            status,
            body: body.to_string(),
            delay: Some(delay),
        })
    }

    pub fn fail(&self, path: &str, message: &str) -> &Self {
        self.push(path, Reply::Fail(message.to_string()))
    }

    fn push(&self, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, path: &str) -> Vec<HttpRequest> {
        self.sent()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }

    /// JSON bodies of every request sent to `path`, in order.
    pub fn bodies_sent_to(&self, path: &str) -> Vec<Value> {
        self.sent_to(path)
            .into_iter()
            .filter_map(|r| r.body)
            .map(|b| serde_json::from_str(&b).unwrap())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.url.path().to_string();
        self.sent.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Respond {
                status,
                body,
                delay,
            }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpResponse { status, body })
            }
            Some(Reply::Fail(message)) => Err(TransportError::Connect(message)),
            None => Err(TransportError::Connect(format!("no scripted reply for {path}"))),
        }
    }
}

pub fn base_url() -> Url {
    Url::parse("http://bank.test").unwrap()
}

pub fn client(transport: Arc<ScriptedTransport>, session: SessionStore) -> HttpClient {
    HttpClient::new(base_url(), transport, session)
}
