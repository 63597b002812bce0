//! Confluence publishing for md2conf.
//!
//! - [`ConfluenceClient`]: sync REST API v1 client with basic auth
//! - [`ContentNormalizer`] and [`PageRenderer`]: markdown to final page body
//! - [`Publisher`]: creates, updates or skips a page found by title
//!
//! The publisher talks to Confluence through the [`ConfluenceApi`] trait.

mod api;
mod auth;
mod client;
mod error;
#[cfg(test)]
mod mock;
mod normalizer;
pub mod publisher;
mod renderer;
pub mod types;

pub use api::ConfluenceApi;
pub use auth::BasicAuth;
pub use client::ConfluenceClient;
pub use error::ConfluenceError;
pub use normalizer::ContentNormalizer;
pub use publisher::{
    PublishError, PublishOptions, PublishOutcome, PublishPlan, PublishRequest, PublishResult,
    Publisher, SkipReason, canonical_storage,
};
pub use renderer::{Document, PageRenderer};
pub use types::PageRef;
