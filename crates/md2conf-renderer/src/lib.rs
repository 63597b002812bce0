//! Markdown to Confluence storage format renderer.
//!
//! This crate provides a generic [`MarkdownRenderer`] that delegates
//! format-specific output to a [`RenderBackend`].
//!
//! # Architecture
//!
//! - [`ConfluenceBackend`]: Produces Confluence XHTML storage format (code macros,
//!   panel macros, `ac:image`)
//!
//! Shared functionality (tables, lists, inline formatting) is handled by the
//! generic renderer, while code blocks, blockquotes, alerts, admonitions and
//! images are delegated to the backend.
//!
//! # Example
//!
//! ```
//! use md2conf_renderer::{ConfluenceBackend, MarkdownRenderer};
//!
//! let result = MarkdownRenderer::<ConfluenceBackend>::new()
//!     .with_title_extraction()
//!     .render_markdown("# Hello\n\nWorld");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert_eq!(result.html, "<p>World</p>");
//! ```

mod admonition;
mod backend;
mod confluence;
mod fence;
mod renderer;
mod state;

pub use admonition::{Admonition, PanelKind};
pub use backend::{AlertKind, RenderBackend};
pub use confluence::ConfluenceBackend;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::escape_html;
