//! Markdown to page document rendering.

use md2conf_renderer::{ConfluenceBackend, MarkdownRenderer};
use tracing::debug;

use crate::normalizer::ContentNormalizer;

/// A rendered page ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Page title; empty when no override was given and the markdown has no heading.
    pub title: String,
    /// Final storage-format body.
    pub body: String,
}

/// Renders markdown into a [`Document`].
#[derive(Debug, Default)]
pub struct PageRenderer {
    title: Option<String>,
    normalizer: ContentNormalizer,
}

impl PageRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit title instead of the first heading.
    ///
    /// With an explicit title every heading is rendered.
    #[must_use]
    pub fn title(mut self, title: Option<&str>) -> Self {
        self.title = title.map(ToOwned::to_owned);
        self
    }

    #[must_use]
    pub fn normalizer(mut self, normalizer: ContentNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Render markdown to a document.
    #[must_use]
    pub fn render(&self, markdown: &str) -> Document {
        let (title, html) = match &self.title {
            Some(title) => {
                let result = MarkdownRenderer::<ConfluenceBackend>::new().render_markdown(markdown);
                (title.clone(), result.html)
            }
            None => {
                let result = MarkdownRenderer::<ConfluenceBackend>::new()
                    .with_title_extraction()
                    .render_markdown(markdown);
                (result.title.unwrap_or_default(), result.html)
            }
        };

        debug!("Rendered '{}' ({} bytes)", title, html.len());

        Document {
            title,
            body: self.normalizer.normalize(&html),
        }
    }
}
