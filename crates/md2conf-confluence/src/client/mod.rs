//! Confluence REST API client.
//!
//! Provides sync HTTP client for the Confluence REST API v1 with basic
//! authentication.

mod convert;
mod pages;
mod search;

use std::time::Duration;

use md2conf_config::ConfluenceSettings;
use serde::de::DeserializeOwned;
use ureq::{Agent, Body, RequestBuilder};

use crate::api::ConfluenceApi;
use crate::auth::BasicAuth;
use crate::error::ConfluenceError;
use crate::types::PageRef;

/// `User-Agent` header sent with every request.
const USER_AGENT: &str = concat!("md2conf/", env!("CARGO_PKG_VERSION"));

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    api_url: String,
    auth: BasicAuth,
}

impl ConfluenceClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `url` - Confluence base URL, with or without the `/rest/api` suffix
    /// * `auth` - Basic auth credentials
    /// * `timeout` - Global timeout for each request
    #[must_use]
    pub fn new(url: &str, auth: BasicAuth, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: normalize_api_url(url),
            auth,
        }
    }

    /// Create client from validated settings.
    #[must_use]
    pub fn from_settings(settings: &ConfluenceSettings) -> Self {
        Self::new(
            &settings.url,
            BasicAuth::new(&settings.username, &settings.password),
            settings.timeout,
        )
    }

    /// REST API root (always ends in `/rest/api`).
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_url)
    }

    /// Add authentication and standard headers to a request.
    fn authorized<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("Authorization", &self.auth.header_value())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
    }
}

impl ConfluenceApi for ConfluenceClient {
    fn find_page_by_title(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<PageRef>, ConfluenceError> {
        self.find_page(space_key, title)
    }

    fn get_page(&self, page_id: &str) -> Result<PageRef, ConfluenceError> {
        self.fetch_page(page_id)
    }

    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        ancestor_id: Option<&str>,
    ) -> Result<PageRef, ConfluenceError> {
        self.post_page(space_key, title, body, ancestor_id)
    }

    fn update_page(
        &self,
        page_id: &str,
        version: u32,
        title: &str,
        body: &str,
        ancestor_id: Option<&str>,
    ) -> Result<PageRef, ConfluenceError> {
        self.put_page(page_id, version, title, body, ancestor_id)
    }

    fn convert_to_storage(&self, body: &str) -> Result<String, ConfluenceError> {
        self.convert_storage(body)
    }
}

/// Read a response body, mapping error statuses to [`ConfluenceError`].
fn read_body(response: ureq::http::Response<Body>) -> Result<String, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::from_status(status, error_body));
    }

    Ok(body_reader.read_to_string()?)
}

/// Read and deserialize a JSON response body.
fn read_json<T: DeserializeOwned>(response: ureq::http::Response<Body>) -> Result<T, ConfluenceError> {
    let text = read_body(response)?;
    Ok(serde_json::from_str(&text)?)
}

/// Accept URLs with or without the `/rest/api` suffix.
fn normalize_api_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with("/rest/api") {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/rest/api")
    }
}
