//! Client runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the API client and page sessions. Nothing in this crate reads environment
//! variables; the binary does that and hands the values to [`ClientConfig::new`].

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::{TerraceError, TerraceResult};
use url::Url;

/// Client configuration resolved at startup.
#[derive(Clone)]
pub struct ClientConfig {
    api_base: Url,
    session_cookie: Option<String>,
    page_size: u32,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// `api_base` must be an absolute `http` or `https` URL. A trailing slash is added if
    /// missing so that endpoint paths join underneath it rather than replacing its last
    /// segment.
    pub fn new(
        api_base: &str,
        session_cookie: Option<String>,
        page_size: u32,
    ) -> TerraceResult<Self> {
        let mut api_base = Url::parse(api_base.trim())?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(TerraceError::InvalidInput(format!(
                "api base url must use http or https, got {}",
                api_base.scheme()
            )));
        }
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        if page_size == 0 {
            return Err(TerraceError::InvalidInput(
                "page size must be greater than zero".into(),
            ));
        }

        let session_cookie = session_cookie
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            api_base,
            session_cookie,
            page_size,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base.as_str())
            .field("session_cookie", &self.session_cookie.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Parse the page size from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PAGE_SIZE`].
pub fn page_size_from_env_value(value: Option<String>) -> TerraceResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| TerraceError::InvalidInput(format!("invalid page size: {v}")))
        })
        .transpose()?;

    Ok(parsed.unwrap_or(DEFAULT_PAGE_SIZE))
}
