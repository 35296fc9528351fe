//! Stub collaborators for handler tests.

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::response::Response;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::admission::{AdmissionCounter, QuotaPolicy};
use crate::error::{GatewayError, Result};
use crate::http::state::{AppState, ChatSettings};
use crate::upstream::{ChatBackend, ChatMessage, Lead, LeadSink};

pub struct StubChat {
    reply: Option<String>,
    calls: AtomicUsize,
    last: Mutex<Option<Vec<ChatMessage>>>,
}

impl StubChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_conversation(&self) -> Option<Vec<ChatMessage>> {
        self.last.lock().clone()
    }
}

#[async_trait]
impl ChatBackend for StubChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some(messages.to_vec());
        self.reply
            .clone()
            .ok_or_else(|| GatewayError::Upstream("stub failure".to_string()))
    }
}

#[derive(Default)]
pub struct StubSink {
    pub fail: bool,
    pub received: Mutex<Vec<Lead>>,
}

#[async_trait]
impl LeadSink for StubSink {
    async fn submit(&self, lead: &Lead) -> Result<()> {
        if self.fail {
            return Err(GatewayError::Upstream("stub webhook failure".to_string()));
        }
        self.received.lock().push(lead.clone());
        Ok(())
    }
}

pub fn test_state(chat: Arc<dyn ChatBackend>, policy: QuotaPolicy) -> AppState {
    AppState::new(
        Arc::new(AdmissionCounter::new(policy)),
        chat,
        ChatSettings {
            system_prompt: "You are an English coach.".to_string(),
            history_len: 10,
        },
    )
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
