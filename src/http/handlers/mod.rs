mod chat;
mod health;
mod leads;

pub use chat::{build_conversation, chat_handler, ChatReply, ChatRequest, FALLBACK_REPLIES};
pub use health::health_handler;
pub use leads::{leads_handler, LeadAccepted};
