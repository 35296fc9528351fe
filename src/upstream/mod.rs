//! Clients for the services the gateway fronts.

mod chat;
mod leads;

pub use chat::{ChatBackend, ChatMessage, OpenAiChat, Role};
pub use leads::{Lead, LeadSink, SheetsWebhook};
