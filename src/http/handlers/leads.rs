//! Lead-capture endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::upstream::Lead;

#[derive(Debug, Serialize, Deserialize)]
pub struct LeadAccepted {
    pub success: bool,
}

#[instrument(skip_all)]
pub async fn leads_handler(
    State(state): State<AppState>,
    payload: Result<Json<Lead>, JsonRejection>,
) -> Result<Json<LeadAccepted>, ApiError> {
    let Some(sink) = state.leads.clone() else {
        warn!("Lead submitted but no webhook is configured");
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Lead capture unavailable",
            "The contact form is temporarily unavailable. Please try again later.",
        ));
    };

    let Json(lead) = payload?;
    let lead = lead.sanitize()?;

    sink.submit(&lead).await.map_err(|e| {
        warn!(error = %e, "Lead webhook failed");
        ApiError::from(e)
    })?;

    Ok(Json(LeadAccepted { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::QuotaPolicy;
    use crate::http::error::ErrorBody;
    use crate::http::router;
    use crate::http::testing::{read_json, test_state, StubChat, StubSink};
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn lead_request(body: serde_json::Value) -> Request<Body> {
        Request::post("/api/leads")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn state_with_sink(sink: Arc<StubSink>) -> AppState {
        test_state(Arc::new(StubChat::replying("ok")), QuotaPolicy::default()).with_leads(sink)
    }

    #[tokio::test]
    async fn test_lead_forwarded_sanitized() {
        let sink = Arc::new(StubSink::default());
        let app = router(state_with_sink(sink.clone()));

        let response = app
            .oneshot(lead_request(json!({
                "name": "  Maria <script>",
                "email": "maria@example.com",
                "message": "Business English, please",
                "source": "contact-page"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let accepted: LeadAccepted = read_json(response).await;
        assert!(accepted.success);

        let received = sink.received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "Maria script");
        assert_eq!(received[0].source.as_deref(), Some("contact-page"));
    }

    #[tokio::test]
    async fn test_invalid_lead_is_bad_request() {
        let sink = Arc::new(StubSink::default());
        let app = router(state_with_sink(sink.clone()));

        let response = app
            .oneshot(lead_request(json!({ "name": "Maria", "email": "not-an-email" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = read_json(response).await;
        assert_eq!(body.error, "Invalid request");
        assert!(sink.received.lock().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_failure_is_bad_gateway() {
        let sink = Arc::new(StubSink {
            fail: true,
            ..StubSink::default()
        });
        let app = router(state_with_sink(sink));

        let response = app
            .oneshot(lead_request(json!({ "name": "Maria", "email": "maria@example.com" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unconfigured_webhook_is_unavailable() {
        let app = router(test_state(Arc::new(StubChat::replying("ok")), QuotaPolicy::default()));

        let response = app
            .oneshot(lead_request(json!({ "name": "Maria", "email": "maria@example.com" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ErrorBody = read_json(response).await;
        assert_eq!(body.error, "Lead capture unavailable");
    }
}
