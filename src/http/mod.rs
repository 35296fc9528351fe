//! HTTP surface of the gateway.

mod error;
mod extract;
mod handlers;
mod server;
mod state;

#[cfg(test)]
mod testing;

use axum::routing::{get, post};
use axum::Router;

pub use error::{ApiError, ErrorBody};
pub use extract::ClientIdentity;
pub use handlers::{
    build_conversation, chat_handler, health_handler, leads_handler, ChatReply, ChatRequest,
    LeadAccepted, FALLBACK_REPLIES,
};
pub use server::HttpServer;
pub use state::{AppState, ChatSettings};

/// Build the gateway's routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/leads", post(leads_handler))
        .with_state(state)
}
