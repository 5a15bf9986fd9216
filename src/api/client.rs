//! reqwest-backed page source for the remote collection

use super::{ApiError, ApiResult, ArtworkPage, PageSource};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// HTTP client that fetches collection pages from a REST endpoint
#[derive(Debug, Clone)]
pub struct ArtworkClient {
    client: Client,
    endpoint: String,
    page_size: Option<u32>,
    fields: Vec<String>,
}

impl ArtworkClient {
    /// Create a client for the endpoint and request options in `config`
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            page_size: config.page_size,
            fields: config.fields.clone(),
        })
    }

    fn query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", page.to_string())];
        if let Some(limit) = self.page_size {
            query.push(("limit", limit.to_string()));
        }
        if !self.fields.is_empty() {
            query.push(("fields", self.fields.join(",")));
        }
        query
    }

    async fn request_page(&self, page: u32) -> ApiResult<ArtworkPage> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query(page))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16() });
        }

        let body = response.text().await?;
        let page: ArtworkPage = serde_json::from_str(&body)?;
        Ok(page)
    }
}

#[async_trait]
impl PageSource for ArtworkClient {
    async fn fetch_page(&self, page: u32) -> ApiResult<ArtworkPage> {
        debug!("Fetching page {} from {}", page, self.endpoint);
        match self.request_page(page).await {
            Ok(data) => {
                debug!(
                    "Page {} returned {} records ({} pages total)",
                    page,
                    data.items.len(),
                    data.pagination.total_pages
                );
                Ok(data)
            }
            Err(e) => {
                error!("Error fetching artworks page {}: {}", page, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve a single canned HTTP response and report the request line
    async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let request = String::from_utf8_lossy(&buf);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{}/api/v1/artworks", addr), rx)
    }

    fn client_for(endpoint: String) -> ArtworkClient {
        let config = Config {
            endpoint,
            ..Config::default()
        };
        ArtworkClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_decodes_success_response() {
        let body = r#"{"pagination":{"total_pages":12,"current_page":3},"data":[{"id":1,"title":"A"},{"id":2}]}"#;
        let (endpoint, request) = serve_once("200 OK", body).await;
        let client = client_for(endpoint);

        let page = client.fetch_page(3).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total_pages, 12);

        let request_line = request.await.unwrap();
        assert!(request_line.starts_with("GET /api/v1/artworks?page=3"));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_limit_and_fields() {
        let body = r#"{"pagination":{"total_pages":1},"data":[]}"#;
        let (endpoint, request) = serve_once("200 OK", body).await;
        let config = Config {
            endpoint,
            page_size: Some(25),
            fields: vec!["id".to_string(), "title".to_string()],
            ..Config::default()
        };
        let client = ArtworkClient::new(&config).unwrap();

        client.fetch_page(1).await.unwrap();
        let request_line = request.await.unwrap();
        assert!(request_line.contains("page=1"));
        assert!(request_line.contains("limit=25"));
        assert!(request_line.contains("fields=id%2Ctitle"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let (endpoint, _request) = serve_once("500 Internal Server Error", "{}").await;
        let client = client_for(endpoint);

        let err = client.fetch_page(1).await.unwrap_err();
        assert_eq!(err, ApiError::Status { status: 500 });
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_not_found_is_treated_like_any_other_status() {
        let (endpoint, _request) = serve_once("404 Not Found", "").await;
        let client = client_for(endpoint);

        let err = client.fetch_page(99).await.unwrap_err();
        assert_eq!(err, ApiError::Status { status: 404 });
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let (endpoint, _request) = serve_once("200 OK", "{\"data\": [").await;
        let client = client_for(endpoint);

        let err = client.fetch_page(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/artworks", addr));
        let err = client.fetch_page(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
