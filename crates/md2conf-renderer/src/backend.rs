//! Render backend trait for format-specific rendering.
//!
//! The generic [`MarkdownRenderer`](crate::MarkdownRenderer) walks pulldown-cmark
//! events and delegates every element whose markup depends on the target format
//! (code blocks, callouts, images) to a [`RenderBackend`].

use pulldown_cmark::BlockQuoteKind;

use crate::admonition::Admonition;

/// GitHub-style alert kind (`> [!NOTE]`, `> [!WARNING]`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

/// Backend trait for format-specific rendering operations.
///
/// Implementations provide format-specific rendering for:
/// - Headings (storage format has no heading anchors)
/// - Code blocks (`ac:structured-macro` with a CDATA body)
/// - Blockquotes, alerts and admonitions (panel macros)
/// - Images (`ac:image`)
pub trait RenderBackend {
    /// Render a complete heading with its inline HTML content.
    fn heading(level: u8, html: &str, out: &mut String);

    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `content` - The raw code content
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Render blockquote start tag.
    fn blockquote_start(out: &mut String);

    /// Render blockquote end tag.
    fn blockquote_end(out: &mut String);

    /// Render the opening of a GitHub-style alert.
    fn alert_start(kind: AlertKind, out: &mut String);

    /// Render the closing of a GitHub-style alert.
    fn alert_end(kind: AlertKind, out: &mut String);

    /// Render the opening of an admonition block (`!!! type "Title"`).
    fn admonition_start(admonition: &Admonition, out: &mut String);

    /// Render the closing of an admonition block.
    fn admonition_end(admonition: &Admonition, out: &mut String);

    /// Render an image.
    ///
    /// # Arguments
    ///
    /// * `src` - Image source URL
    /// * `alt` - Alt text for the image
    /// * `title` - Optional title attribute
    /// * `out` - Output buffer to write to
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Render a hard break.
    fn hard_break(out: &mut String) {
        out.push_str("<br />");
    }

    /// Render a horizontal rule.
    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr />");
    }

    /// Render a task list marker.
    fn task_list_marker(checked: bool, out: &mut String) {
        out.push_str(if checked { "[x] " } else { "[ ] " });
    }
}
