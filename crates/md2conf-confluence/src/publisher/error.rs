//! Error type for page publishing.

use crate::error::ConfluenceError;

/// Error during page publish.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Request rejected before any network call.
    #[error("invalid publish request: {0}")]
    Input(String),

    /// The page's version counter cannot be incremented.
    #[error("page {page_id} is at version {version} and cannot be updated further")]
    VersionExhausted {
        /// Page ID.
        page_id: String,
        /// Current version number.
        version: u32,
    },

    /// Confluence API error.
    #[error(transparent)]
    Confluence(#[from] ConfluenceError),
}
