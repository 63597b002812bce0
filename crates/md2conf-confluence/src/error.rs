//! Error types for Confluence integration.

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// More than one page in the space carries the requested title.
    #[error("{} pages titled '{title}' in space {space} (ids: {})", .page_ids.len(), .page_ids.join(", "))]
    AmbiguousTitle {
        /// Space key that was searched.
        space: String,
        /// Title that matched more than once.
        title: String,
        /// IDs of all matching pages.
        page_ids: Vec<String>,
    },

    /// Credentials rejected (HTTP 401 or 403).
    #[error("authentication failed: HTTP {status} - {}", summarize_body(.body))]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    Network(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {}", summarize_body(.body))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Version conflict on update (HTTP 409).
    #[error("version conflict: HTTP 409 - {}", summarize_body(.body))]
    Conflict {
        /// Response body.
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfluenceError {
    /// Map an error status code and body to the matching variant.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth { status, body },
            409 => Self::Conflict { body },
            _ => Self::Api { status, body },
        }
    }

    /// Whether the server answered with a non-auth error status.
    #[must_use]
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Conflict { .. })
    }

    /// HTTP status code, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Conflict { .. } => Some(409),
            Self::AmbiguousTitle { .. } | Self::Network(_) | Self::Json(_) => None,
        }
    }

    /// Full response body of an error status.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Auth { body, .. } | Self::Api { body, .. } | Self::Conflict { body } => {
                Some(body)
            }
            Self::AmbiguousTitle { .. } | Self::Network(_) | Self::Json(_) => None,
        }
    }
}

/// Short form of an error body: the `message` field of a JSON body, or the
/// body itself.
fn summarize_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| body.to_owned())
}
