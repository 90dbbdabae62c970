//! HttpSessionService - REST client for the remote document session service.
//!
//! Every call is a single round trip; nothing is cached here. Non-2xx
//! responses are mapped onto [`PagewaveError`] with the service's message
//! kept verbatim so callers can show it to the user.

use async_trait::async_trait;
use pagewave_core::config::ServiceConfig;
use pagewave_core::document::{DocumentId, DocumentSession, PageRequest, SessionService};
use pagewave_core::{PagewaveError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

const API_PREFIX: &str = "/api/pdfs";

/// Client for the document session service.
#[derive(Clone)]
pub struct HttpSessionService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct OpenRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

#[derive(Debug, Serialize)]
struct PageChangeRequest {
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    topic: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    items: Vec<DocumentSession>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl HttpSessionService {
    /// Creates a client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PagewaveError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn document_url(&self, id: DocumentId, action: &str) -> String {
        if action.is_empty() {
            self.url(&format!("/{id}"))
        } else {
            self.url(&format!("/{id}/{action}"))
        }
    }

    /// Sends the request and returns the raw successful body.
    async fn send(
        &self,
        request: RequestBuilder,
        op: &'static str,
        id: Option<DocumentId>,
    ) -> Result<String> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "session_request",
            %request_id,
            op,
            document_id = id.map(|id| id.0)
        );

        async move {
            let response = request.send().await.map_err(|e| {
                tracing::warn!(error = %e, "session request failed before a response");
                PagewaveError::session_request(None, format!("{op} request failed: {e}"))
            })?;

            let status = response.status();
            let body = response.text().await.map_err(|e| {
                PagewaveError::session_request(
                    Some(status.as_u16()),
                    format!("Failed to read {op} response: {e}"),
                )
            })?;

            if !status.is_success() {
                let err = map_http_error(status, &body, id);
                tracing::warn!(status = status.as_u16(), error = %err, "session request rejected");
                return Err(err);
            }

            tracing::debug!(status = status.as_u16(), "session request completed");
            Ok(body)
        }
        .instrument(span)
        .await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        op: &'static str,
        id: Option<DocumentId>,
    ) -> Result<T> {
        let body = self.send(request, op, id).await?;
        serde_json::from_str(&body).map_err(|e| {
            PagewaveError::session_request(None, format!("Failed to parse {op} response: {e}"))
        })
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    async fn open(&self, id: DocumentId, page: Option<u32>) -> Result<DocumentSession> {
        let request = self
            .client
            .post(self.document_url(id, "open"))
            .json(&OpenRequest { page });
        self.send_json(request, "open", Some(id)).await
    }

    async fn close(&self, id: DocumentId) -> Result<DocumentSession> {
        let request = self.client.post(self.document_url(id, "close"));
        self.send_json(request, "close", Some(id)).await
    }

    async fn change_page(&self, id: DocumentId, page: PageRequest) -> Result<DocumentSession> {
        let request = self
            .client
            .post(self.document_url(id, "page"))
            .json(&PageChangeRequest {
                mode: page.mode(),
                page: page.value(),
            });
        self.send_json(request, "change_page", Some(id)).await
    }

    async fn classify(&self, id: DocumentId, topic: &str) -> Result<DocumentSession> {
        let request = self
            .client
            .post(self.document_url(id, "classify"))
            .json(&ClassifyRequest { topic });
        self.send_json(request, "classify", Some(id)).await
    }

    async fn delete(&self, id: DocumentId) -> Result<()> {
        let request = self.client.delete(self.document_url(id, ""));
        self.send(request, "delete", Some(id)).await.map(|_| ())
    }

    async fn get(&self, id: DocumentId) -> Result<DocumentSession> {
        let request = self.client.get(self.document_url(id, ""));
        self.send_json(request, "get", Some(id)).await
    }

    async fn list(&self, query: Option<&str>) -> Result<Vec<DocumentSession>> {
        let mut request = self.client.get(self.url("/"));
        if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
            request = request.query(&[("q", q)]);
        }
        let response: ListResponse = self.send_json(request, "list", None).await?;
        Ok(response.items)
    }
}

/// Pulls the human-readable message out of an error body.
///
/// The service answers `{"detail": "..."}`; validation errors carry a
/// structured `detail`, which is passed through as JSON text. Anything
/// else is returned as-is.
pub(crate) fn extract_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

pub(crate) fn map_http_error(status: StatusCode, body: &str, id: Option<DocumentId>) -> PagewaveError {
    let message = extract_detail(body);
    match status {
        StatusCode::NOT_FOUND => match id {
            Some(id) => PagewaveError::not_found_with_message("document", id.to_string(), message),
            None => PagewaveError::session_request(Some(status.as_u16()), message),
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PagewaveError::invalid_transition(message)
        }
        _ => PagewaveError::session_request(Some(status.as_u16()), message),
    }
}
