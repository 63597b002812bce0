//! CLI error types.

use std::path::PathBuf;

use md2conf_config::ConfigError;
use md2conf_confluence::{ConfluenceError, PublishError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read markdown file {}: {source}", .path.display())]
    ReadMarkdown {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Publish(#[from] PublishError),
}

impl CliError {
    /// Full HTTP response behind a failed Confluence call, when the error
    /// message shows only part of it.
    pub(crate) fn response_details(&self) -> Option<String> {
        let Self::Publish(PublishError::Confluence(err)) = self else {
            return None;
        };
        response_details(err)
    }
}

fn response_details(err: &ConfluenceError) -> Option<String> {
    let status = err.status()?;
    let body = err.body()?.trim();
    if body.is_empty() || err.to_string().contains(body) {
        return None;
    }
    let source = if err.is_api_error() {
        "API"
    } else {
        "Authentication"
    };
    Some(format!("{source} response (HTTP {status}): {body}"))
}
