//! Confluence backend for markdown rendering.
//!
//! Produces Confluence XHTML storage format for the REST API.

use std::fmt::Write;

use crate::admonition::{Admonition, PanelKind};
use crate::backend::{AlertKind, RenderBackend};
use crate::state::escape_html;

/// Confluence render backend.
///
/// Produces Confluence XHTML storage format with:
/// - `ac:structured-macro` code macro for code blocks
/// - panel macros (`info`, `note`, `tip`, `warning`) for blockquotes,
///   alerts and admonitions
/// - `ac:image` with `ri:url` or `ri:attachment` for images
#[derive(Debug)]
pub struct ConfluenceBackend;

impl ConfluenceBackend {
    fn panel_start(panel: PanelKind, title: Option<&str>, out: &mut String) {
        write!(
            out,
            r#"<ac:structured-macro ac:name="{}" ac:schema-version="1">"#,
            panel.macro_name()
        )
        .unwrap();
        if let Some(title) = title {
            write!(
                out,
                r#"<ac:parameter ac:name="title">{}</ac:parameter>"#,
                escape_html(title)
            )
            .unwrap();
        }
        out.push_str("<ac:rich-text-body>");
    }

    fn panel_end(out: &mut String) {
        out.push_str("</ac:rich-text-body></ac:structured-macro>");
    }
}

impl RenderBackend for ConfluenceBackend {
    fn heading(level: u8, html: &str, out: &mut String) {
        write!(out, "<h{level}>{}</h{level}>", html.trim()).unwrap();
    }

    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        out.push_str(r#"<ac:structured-macro ac:name="code" ac:schema-version="1">"#);
        if let Some(lang) = lang {
            write!(
                out,
                r#"<ac:parameter ac:name="language">{}</ac:parameter>"#,
                escape_html(lang)
            )
            .unwrap();
        }
        out.push_str(r#"<ac:parameter ac:name="linenumbers">true</ac:parameter>"#);
        // CDATA content is not escaped, but `]]>` would terminate the section early
        let content = content.trim_end_matches('\n').replace("]]>", "]]]]><![CDATA[>");
        write!(
            out,
            r"<ac:plain-text-body><![CDATA[{content}]]></ac:plain-text-body>"
        )
        .unwrap();
        out.push_str("</ac:structured-macro>");
    }

    fn blockquote_start(out: &mut String) {
        Self::panel_start(PanelKind::Info, None, out);
    }

    fn blockquote_end(out: &mut String) {
        Self::panel_end(out);
    }

    fn alert_start(kind: AlertKind, out: &mut String) {
        let (panel, title) = match kind {
            AlertKind::Note => (PanelKind::Info, "Note"),
            AlertKind::Tip => (PanelKind::Tip, "Tip"),
            AlertKind::Important => (PanelKind::Note, "Important"),
            AlertKind::Warning => (PanelKind::Note, "Warning"),
            AlertKind::Caution => (PanelKind::Warning, "Caution"),
        };
        Self::panel_start(panel, Some(title), out);
    }

    fn alert_end(_kind: AlertKind, out: &mut String) {
        Self::panel_end(out);
    }

    fn admonition_start(admonition: &Admonition, out: &mut String) {
        Self::panel_start(admonition.panel, admonition.title.as_deref(), out);
    }

    fn admonition_end(_admonition: &Admonition, out: &mut String) {
        Self::panel_end(out);
    }

    fn image(src: &str, _alt: &str, _title: &str, out: &mut String) {
        // Confluence doesn't use alt/title attributes in the same way
        let is_external = src.starts_with("http://") || src.starts_with("https://");
        let inner = if is_external {
            format!(r#"ri:url ri:value="{}""#, escape_html(src))
        } else {
            // Local file, expected to be attached to the page separately
            let filename = src.rsplit('/').next().unwrap_or(src);
            format!(r#"ri:attachment ri:filename="{}""#, escape_html(filename))
        };
        write!(out, "<ac:image><{inner} /></ac:image>").unwrap();
    }
}
