//! HTTP client seam.
//!
//! Every call to the Terrace API goes through [`HttpClient`]. The production
//! implementation is [`ReqwestClient`]; tests substitute a scripted client. Responses are
//! reduced to the `{ok, data}` shape the data-fetch functions work with, so callers never
//! see transport details beyond [`TerraceError`].

use crate::config::ClientConfig;
use crate::{TerraceError, TerraceResult};
use async_trait::async_trait;
use serde::Deserialize;
use terrace_types::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Send the session cookie with this request.
    pub credentials: bool,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
            credentials: false,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            credentials: false,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_credentials(mut self) -> Self {
        self.credentials = true;
        self
    }
}

/// One entry of the `errors` array of a response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorEntry {
    pub code: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The JSON body every API endpoint answers with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Option<Vec<ErrorEntry>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl Envelope {
    /// The payload, treating JSON `null` the same as an absent field.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.data.as_ref().filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub ok: bool,
    pub status: u16,
    /// `None` when the body was empty or not JSON.
    pub body: Option<Envelope>,
}

impl ApiResponse {
    /// The payload of a successful response, or `None` when the response is not usable.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        if !self.ok {
            return None;
        }
        self.body.as_ref().and_then(Envelope::payload)
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a request. Only transport failures are errors; non-2xx responses come back
    /// with `ok == false`.
    async fn request(&self, request: ApiRequest) -> TerraceResult<ApiResponse>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    cfg: ClientConfig,
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(cfg: ClientConfig) -> Self {
        Self {
            cfg,
            client: reqwest::Client::new(),
        }
    }

    fn url_for(&self, request: &ApiRequest) -> TerraceResult<url::Url> {
        let mut url = self
            .cfg
            .api_base()
            .join(request.path.trim_start_matches('/'))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    /// Turns an [`ApiRequest`] into a ready-to-send `reqwest::Request`. The session cookie
    /// is only attached to credentialed requests.
    fn build_request(&self, request: &ApiRequest) -> TerraceResult<reqwest::Request> {
        let url = self.url_for(request)?;
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if request.credentials {
            if let Some(cookie) = self.cfg.session_cookie() {
                builder = builder.header(reqwest::header::COOKIE, cookie);
            }
        }
        builder.build().map_err(|source| TerraceError::Transport {
            path: request.path.clone(),
            source,
        })
    }
}

/// Builds the `/`-separated path for `segments`, percent-encoding each one so ids cannot
/// add segments, a query or a fragment.
pub fn api_path(segments: &[&str]) -> TerraceResult<String> {
    let mut url = url::Url::parse(PATH_BASE)?;
    url.path_segments_mut()
        .map_err(|_| TerraceError::InvalidInput(format!("{PATH_BASE} cannot carry a path")))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}

const PATH_BASE: &str = "http://terrace.invalid/";

/// Decodes a response body. Empty and non-JSON bodies count as no body.
fn parse_body(bytes: &[u8]) -> Option<Envelope> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice::<Envelope>(bytes) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            tracing::warn!("ignoring non-JSON response body: {}", e);
            None
        }
    }
}

fn to_response(status: reqwest::StatusCode, bytes: &[u8]) -> ApiResponse {
    ApiResponse {
        ok: status.is_success(),
        status: status.as_u16(),
        body: parse_body(bytes),
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(&self, request: ApiRequest) -> TerraceResult<ApiResponse> {
        let http_request = self.build_request(&request)?;
        tracing::debug!("{:?} {}", request.method, http_request.url());

        let response = self.client.execute(http_request).await.map_err(|source| {
            tracing::warn!("request to {} failed: {}", request.path, source);
            TerraceError::Transport {
                path: request.path.clone(),
                source,
            }
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TerraceError::Transport {
                path: request.path.clone(),
                source,
            })?;

        if !status.is_success() {
            tracing::warn!("{} answered {}", request.path, status);
        }
        Ok(to_response(status, &bytes))
    }
}
