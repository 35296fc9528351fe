//! Lead-capture forwarding to the Google Sheets webhook.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::LeadsConfig;
use crate::error::{GatewayError, Result};

/// Longest value kept for any single field.
const MAX_FIELD_CHARS: usize = 500;

/// A contact-form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Page or form the lead came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

fn clean(value: &str) -> String {
    let stripped: String = value
        .chars()
        .filter(|c| !c.is_control() && *c != '<' && *c != '>')
        .collect();
    stripped.trim().chars().take(MAX_FIELD_CHARS).collect()
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| clean(&v)).filter(|v| !v.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

impl Lead {
    /// Scrub every field and check the required ones.
    pub fn sanitize(self) -> Result<Self> {
        let lead = Self {
            name: clean(&self.name),
            email: clean(&self.email),
            phone: clean_optional(self.phone),
            message: clean_optional(self.message),
            source: clean_optional(self.source),
        };

        if lead.name.is_empty() {
            return Err(GatewayError::Validation("name is required".to_string()));
        }
        if !is_plausible_email(&lead.email) {
            return Err(GatewayError::Validation(
                "a valid email address is required".to_string(),
            ));
        }

        Ok(lead)
    }
}

/// Row shape posted to the webhook.
#[derive(Debug, Serialize)]
struct LeadRow<'a> {
    #[serde(flatten)]
    lead: &'a Lead,
    submitted_at: String,
}

/// Destination for captured leads.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn submit(&self, lead: &Lead) -> Result<()>;
}

/// Posts leads to a Google Apps Script webhook that appends spreadsheet rows.
pub struct SheetsWebhook {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl SheetsWebhook {
    pub fn new(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    /// Build a webhook from configuration, or `None` when no URL is set.
    pub fn from_config(client: reqwest::Client, config: &LeadsConfig) -> Option<Self> {
        config
            .webhook_url
            .as_ref()
            .map(|url| Self::new(client, url.clone(), config.timeout()))
    }
}

#[async_trait]
impl LeadSink for SheetsWebhook {
    #[instrument(skip(self, lead), fields(source = ?lead.source))]
    async fn submit(&self, lead: &Lead) -> Result<()> {
        let row = LeadRow {
            lead,
            submitted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Upstream(format!(
                "lead webhook returned {}",
                status
            )));
        }

        info!("Lead forwarded");
        Ok(())
    }
}
