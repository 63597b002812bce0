//! Page publisher for Confluence.
//!
//! This module provides the [`Publisher`] struct that reconciles a rendered
//! document with the page of the same title in a space:
//!
//! 1. Validate the request (no network access on failure)
//! 2. Look the page up by exact title
//! 3. Create it if missing
//! 4. Otherwise compare the canonical bodies and skip if they match
//! 5. Otherwise update it to the next version
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//! use md2conf_confluence::{
//!     BasicAuth, ConfluenceClient, PageRenderer, PublishOptions, PublishOutcome,
//!     PublishRequest, Publisher,
//! };
//!
//! let client = ConfluenceClient::new(
//!     "https://wiki.example.com",
//!     BasicAuth::new("bot", "token"),
//!     Duration::from_secs(30),
//! );
//! let document = PageRenderer::new().render("# Hello\n\nWorld");
//! let request = PublishRequest::new("DOCS", document);
//!
//! let publisher = Publisher::new(&client, PublishOptions::default());
//! match publisher.publish(&request)? {
//!     PublishOutcome::Created(page) => println!("created {}", page.id),
//!     PublishOutcome::Updated(page, previous) => println!("{} -> {}", previous, page.version),
//!     PublishOutcome::Skipped(id, reason) => println!("skipped {id}: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod result;

pub use error::PublishError;
pub use executor::{Publisher, canonical_storage};
pub use result::{PublishOutcome, PublishPlan, PublishResult, SkipReason};

use crate::renderer::Document;

/// A document addressed to a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Target space key.
    pub space_key: String,
    /// Page title; identifies the page within the space.
    pub title: String,
    /// Storage-format body.
    pub body: String,
    /// Parent page for creation (also re-sent on update).
    pub ancestor_id: Option<String>,
    /// Update even when the content is unchanged.
    pub force_update: bool,
}

impl PublishRequest {
    #[must_use]
    pub fn new(space_key: &str, document: Document) -> Self {
        Self {
            space_key: space_key.to_owned(),
            title: document.title,
            body: document.body,
            ancestor_id: None,
            force_update: false,
        }
    }

    #[must_use]
    pub fn ancestor_id(mut self, ancestor_id: Option<&str>) -> Self {
        self.ancestor_id = ancestor_id.map(ToOwned::to_owned);
        self
    }

    #[must_use]
    pub fn force_update(mut self, force: bool) -> Self {
        self.force_update = force;
        self
    }
}

/// Publisher behavior settings.
#[derive(Debug, Clone, Copy)]
pub struct PublishOptions {
    /// Run the local body through the server's storage converter before
    /// comparing it with the stored body.
    pub server_normalize: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            server_normalize: true,
        }
    }
}
