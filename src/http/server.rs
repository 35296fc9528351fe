//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::router;
use super::state::AppState;
use crate::error::{GatewayError, Result};

/// HTTP server for the gateway.
pub struct HttpServer {
    /// Address to bind to
    addr: SocketAddr,
    state: AppState,
}

impl HttpServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    /// Start the HTTP server with graceful shutdown.
    ///
    /// The server will shut down when the provided signal resolves. Peer
    /// addresses are recorded so clients without a forwarding header still
    /// get their own admission bucket.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr).await?;

        info!(
            addr = %listener.local_addr()?,
            "Starting HTTP server with graceful shutdown"
        );

        let app = router(self.state).into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP server failed");
                GatewayError::Io(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::QuotaPolicy;
    use crate::http::testing::{test_state, StubChat};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_server_serves_health_until_shutdown() {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = probe.local_addr().unwrap();
        drop(probe);

        let state = test_state(Arc::new(StubChat::replying("ok")), QuotaPolicy::default());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = HttpServer::new(addr, state);
        let handle = tokio::spawn(server.serve_with_shutdown(async move {
            let _ = rx.await;
        }));

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let url = format!("http://{}/health", addr);
        let mut status = None;
        for _ in 0..50 {
            if let Ok(response) = client.get(&url).send().await {
                status = Some(response.status());
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(status, Some(reqwest::StatusCode::OK));

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
