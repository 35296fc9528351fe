//! Practice-chat endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::admission::Admission;
use crate::http::error::ApiError;
use crate::http::extract::ClientIdentity;
use crate::http::state::AppState;
use crate::upstream::{ChatMessage, Role};

/// Replies used when the chat upstream cannot answer.
pub const FALLBACK_REPLIES: [&str; 3] = [
    "Sorry, I didn't catch that. Could you say it another way?",
    "Let's pause for a second. Can you tell me a bit more about what you mean?",
    "Good effort! Try writing that sentence once more and I'll help you polish it.",
];

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// System prompt followed by the last `keep` entries of `history`.
///
/// Client-supplied system entries inside that tail are dropped.
pub fn build_conversation(
    system_prompt: &str,
    history: &[ChatMessage],
    keep: usize,
) -> Vec<ChatMessage> {
    let tail = &history[history.len().saturating_sub(keep)..];

    std::iter::once(ChatMessage::system(system_prompt))
        .chain(tail.iter().filter(|m| m.role != Role::System).cloned())
        .collect()
}

fn fallback_reply() -> &'static str {
    FALLBACK_REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_REPLIES[0])
}

pub async fn chat_handler(
    State(state): State<AppState>,
    ClientIdentity(identity): ClientIdentity,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let span = info_span!("chat", request_id = %Uuid::new_v4(), identity = %identity);

    async move {
        if let Admission::Rejected { retry_after } = state.admission.check_and_record(&identity) {
            return Err(ApiError::too_many_requests(retry_after));
        }

        let Json(request) = payload?;
        if request.messages.is_empty() {
            return Err(ApiError::bad_request("messages must not be empty"));
        }

        let settings = &state.chat_settings;
        let conversation = build_conversation(
            &settings.system_prompt,
            &request.messages,
            settings.history_len,
        );

        debug!(forwarded = conversation.len(), "Forwarding chat request");

        let reply = match state.chat.complete(&conversation).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Chat upstream failed, sending fallback reply");
                fallback_reply().to_string()
            }
        };

        Ok(Json(ChatReply { reply }))
    }
    .instrument(span)
    .await
}
