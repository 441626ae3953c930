use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::identifier::ChannelIdentifier;
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{
    ChannelInfo, ChannelSearchParams, ChatRequest, ChatResponse, Conversation, HealthStatus,
};

/// Base address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable consulted for the backend base address.
pub const BASE_URL_ENV: &str = "CHANNELCHAT_API_BASE_URL";

/// The two calls the session state machine makes against the backend.
///
/// Each call is a single attempt; implementations must not retry.
#[async_trait::async_trait]
pub trait ChannelBackend: Send + Sync {
    /// Fetches metadata for a resolved channel identifier.
    async fn fetch_channel(&self, identifier: &ChannelIdentifier) -> Result<ChannelInfo>;

    /// Sends one user message plus the prior conversation and returns the reply.
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Client for the channel chat backend.
#[derive(Debug, Clone)]
pub struct ChannelChat {
    client: ReqwestClient,
    base_url: Url,
    timeout: Option<Duration>,
}

impl ChannelChat {
    /// Create a new client.
    ///
    /// The base address can be provided directly or read from the
    /// CHANNELCHAT_API_BASE_URL environment variable, falling back to
    /// `http://localhost:8000`.  No request timeout is applied; a backend
    /// that is waking up may take a while to answer.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::url(
                format!("{base_url} cannot be used as a base address"),
                None,
            ));
        }

        let mut builder = ReqwestClient::builder().default_headers(Self::default_headers());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the base address requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Fetch metadata for a channel: `GET /api/channels/{identifier}`.
    pub async fn fetch_channel(&self, identifier: &ChannelIdentifier) -> Result<ChannelInfo> {
        let url = self.endpoint(&["api", "channels", identifier.as_str()])?;
        tracing::debug!(%url, identifier = %identifier, "fetching channel info");
        self.execute(self.client.get(url)).await
    }

    /// Send a chat turn: `POST /api/chat`.
    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint(&["api", "chat"])?;
        tracing::debug!(
            %url,
            history = request.chat_history.len(),
            "sending chat message"
        );
        self.execute(self.client.post(url).json(request)).await
    }

    /// Search channels by name or URL: `POST /api/search`.
    pub async fn search_channels(&self, params: &ChannelSearchParams) -> Result<Vec<ChannelInfo>> {
        let url = self.endpoint(&["api", "search"])?;
        tracing::debug!(%url, query = %params.query, "searching channels");
        self.execute(self.client.post(url).json(params)).await
    }

    /// Check backend health: `GET /api/health`.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["api", "health"])?;
        self.execute(self.client.get(url)).await
    }

    /// Fetch the backend's record of a conversation:
    /// `GET /api/conversations/{conversation_id}`.
    pub async fn conversation(&self, conversation_id: &str) -> Result<Conversation> {
        let url = self.endpoint(&["api", "conversations", conversation_id])?;
        self.execute(self.client.get(url)).await
    }

    /// Create and return default headers for API requests.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Appends percent-encoded path segments to the base address.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::url(format!("{} cannot be a base", self.base_url), None))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.execute_inner(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            tracing::debug!(error = %err, "request failed");
        }
        result
    }

    async fn execute_inner<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    self.timeout.map(|t| t.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let resource = response.url().path().to_string();

        // FastAPI reports failures as {"detail": "..."}.
        #[derive(Deserialize)]
        struct ErrorResponse {
            detail: Option<serde_json::Value>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let error_message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.detail)
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or(error_body);

        match status_code {
            400 => Error::bad_request(error_message),
            404 => Error::not_found(error_message, Some(resource)),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(status_code, error_message),
            _ => Error::api(status_code, error_message),
        }
    }
}

#[async_trait::async_trait]
impl ChannelBackend for ChannelChat {
    async fn fetch_channel(&self, identifier: &ChannelIdentifier) -> Result<ChannelInfo> {
        ChannelChat::fetch_channel(self, identifier).await
    }

    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        ChannelChat::send_message(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve_channel_identifier;

    #[test]
    fn test_client_creation() {
        let client = ChannelChat::new(Some("http://backend.example:9000".to_string())).unwrap();
        assert_eq!(client.base_url().as_str(), "http://backend.example:9000/");
        assert_eq!(client.timeout(), None);

        let client = ChannelChat::with_options(
            Some("https://api.example.com/prefix/".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(ChannelChat::new(Some("not a url".to_string())).is_err());
        assert!(ChannelChat::new(Some("mailto:someone@example.com".to_string())).is_err());
    }

    #[test]
    fn endpoint_encodes_identifier() {
        let client = ChannelChat::new(Some("http://localhost:8000".to_string())).unwrap();
        let id = resolve_channel_identifier("some creator/with slash").unwrap();
        let url = client
            .endpoint(&["api", "channels", id.as_str()])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/channels/some%20creator%2Fwith%20slash"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = ChannelChat::new(Some("https://host.example/prefix/".to_string())).unwrap();
        let url = client.endpoint(&["api", "chat"]).unwrap();
        assert_eq!(url.as_str(), "https://host.example/prefix/api/chat");
    }
}
