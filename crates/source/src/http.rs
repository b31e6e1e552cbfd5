use futures::future::BoxFuture;
use reqwest::header::CACHE_CONTROL;
use rtpm_core::{Result, RtpmError};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::{Acquire, SourceKind};

/// Polls a JSON metrics endpoint.
///
/// Each request carries a `_=<millis>` cache-buster. Any transport error,
/// timeout, non-2xx status or undecodable body yields `None`.
pub struct HttpSource {
    client:   reqwest::Client,
    endpoint: String,
}

impl HttpSource {
    /// Create a source for `endpoint`; every request is bounded by `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(RtpmError::Config("source.timeout_ms must be positive".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RtpmError::Source(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Endpoint URL with the cache-buster appended.
    pub fn request_url(&self, cache_buster: i64) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{sep}_={cache_buster}", self.endpoint)
    }

    /// Fetch and decode one payload.
    pub async fn fetch(&self) -> Result<Value> {
        let url = self.request_url(chrono::Utc::now().timestamp_millis());

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RtpmError::Source(format!("request to {} timed out", self.endpoint))
                } else {
                    RtpmError::Source(format!("request to {} failed: {e}", self.endpoint))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RtpmError::Source(format!("{} answered {status}", self.endpoint)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RtpmError::Decode(format!("body from {} is not JSON: {e}", self.endpoint)))
    }
}

impl Acquire for HttpSource {
    fn acquire(&mut self) -> BoxFuture<'_, Option<Value>> {
        Box::pin(async move {
            match self.fetch().await {
                Ok(payload) => Some(payload),
                Err(e) => {
                    debug!("metrics unavailable this tick: {e}");
                    None
                }
            }
        })
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve exactly one HTTP response and report the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let _ = tx.send(request.lines().next().unwrap_or_default().to_string());

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{addr}/metrics"), rx)
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = HttpSource::new("http://127.0.0.1:3000/metrics", Duration::ZERO).err();
        assert!(matches!(err, Some(RtpmError::Config(_))));
    }

    #[test]
    fn cache_buster_is_appended() {
        let source = HttpSource::new("http://h/metrics", Duration::from_secs(1)).unwrap();
        assert_eq!(source.request_url(42), "http://h/metrics?_=42");

        let source = HttpSource::new("http://h/metrics?host=a", Duration::from_secs(1)).unwrap();
        assert_eq!(source.request_url(42), "http://h/metrics?host=a&_=42");
    }

    #[tokio::test]
    async fn successful_fetch_yields_payload() {
        let (url, request) = serve_once("200 OK", r#"{"cpuPercent": 12}"#).await;
        let mut source = HttpSource::new(url, Duration::from_secs(5)).unwrap();

        let payload = source.acquire().await.unwrap();
        assert_eq!(payload["cpuPercent"], 12);

        let request_line = request.await.unwrap();
        assert!(request_line.starts_with("GET /metrics?_="), "{request_line}");
    }

    #[tokio::test]
    async fn error_status_is_unavailable() {
        let (url, _) = serve_once("503 Service Unavailable", "{}").await;
        let mut source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        assert!(source.acquire().await.is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_unavailable() {
        let (url, _) = serve_once("200 OK", "{not json").await;
        let mut source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        assert!(source.acquire().await.is_none());
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut source = HttpSource::new(format!("http://{addr}/m"), Duration::from_secs(5)).unwrap();
        assert!(source.acquire().await.is_none());
    }

    #[tokio::test]
    async fn slow_endpoint_times_out_as_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and never answer.
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let mut source = HttpSource::new(format!("http://{addr}/m"), Duration::from_millis(200)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, RtpmError::Source(ref msg) if msg.contains("timed out")), "{err}");
        assert!(source.acquire().await.is_none());
    }
}
