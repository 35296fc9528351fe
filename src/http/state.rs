//! Shared state handed to every request handler.

use std::sync::Arc;

use crate::admission::AdmissionCounter;
use crate::config::ChatConfig;
use crate::upstream::{ChatBackend, LeadSink};

/// Prompt settings applied to every chat request.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub system_prompt: String,
    /// Trailing history entries forwarded upstream
    pub history_len: usize,
}

impl From<&ChatConfig> for ChatSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            history_len: config.history_len,
        }
    }
}

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub admission: Arc<AdmissionCounter>,
    pub chat: Arc<dyn ChatBackend>,
    pub chat_settings: Arc<ChatSettings>,
    /// `None` when lead capture is not configured
    pub leads: Option<Arc<dyn LeadSink>>,
}

impl AppState {
    pub fn new(
        admission: Arc<AdmissionCounter>,
        chat: Arc<dyn ChatBackend>,
        chat_settings: ChatSettings,
    ) -> Self {
        Self {
            admission,
            chat,
            chat_settings: Arc::new(chat_settings),
            leads: None,
        }
    }

    pub fn with_leads(mut self, leads: Arc<dyn LeadSink>) -> Self {
        self.leads = Some(leads);
        self
    }
}
