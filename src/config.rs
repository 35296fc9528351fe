//! Configuration management for Coachgate.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::admission::{QuotaPolicy, DEFAULT_LIMIT, DEFAULT_WINDOW};
use crate::error::{GatewayError, Result};

/// Prefix for environment overrides, e.g. `COACHGATE_CHAT__API_KEY`.
pub const ENV_PREFIX: &str = "COACHGATE";

/// Main configuration for the Coachgate service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat admission limits
    #[serde(default)]
    pub admission: AdmissionConfig,

    /// Upstream chat-completion API
    #[serde(default)]
    pub chat: ChatConfig,

    /// Lead-form forwarding
    #[serde(default)]
    pub leads: LeadsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Admission limits for the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Chat requests allowed per client per window
    #[serde(default = "default_requests_per_window")]
    pub requests_per_window: u32,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            requests_per_window: default_requests_per_window(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_requests_per_window() -> u32 {
    DEFAULT_LIMIT
}

fn default_window_secs() -> u64 {
    DEFAULT_WINDOW.as_secs()
}

/// Upstream chat-completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bearer token; usually supplied through the environment
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Prompt placed ahead of every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// How many trailing history entries are forwarded
    #[serde(default = "default_history_len")]
    pub history_len: usize,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upstream request timeout in seconds
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            model: default_model(),
            system_prompt: default_system_prompt(),
            history_len: default_history_len(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_chat_timeout(),
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_system_prompt() -> String {
    "You are a friendly English conversation coach. Keep replies short and \
     natural, ask one follow-up question at a time, and when the learner makes \
     a mistake, gently show the corrected sentence before moving on."
        .to_string()
}

fn default_history_len() -> usize {
    10
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.7
}

fn default_chat_timeout() -> u64 {
    20
}

/// Lead-form forwarding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadsConfig {
    /// Google Sheets webhook; lead capture is disabled when unset
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Webhook request timeout in seconds
    #[serde(default = "default_leads_timeout")]
    pub timeout_secs: u64,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_leads_timeout(),
        }
    }
}

impl LeadsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_leads_timeout() -> u64 {
    10
}

impl GatewayConfig {
    /// Load configuration from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            info!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(config::File::from(path));
        }

        Self::build(builder, environment())
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        env: config::Environment,
    ) -> Result<Self> {
        builder
            .add_source(env)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Validate the admission settings into a policy.
    pub fn admission_policy(&self) -> Result<QuotaPolicy> {
        QuotaPolicy::new(
            self.admission.requests_per_window,
            Duration::from_secs(self.admission.window_secs),
        )
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
