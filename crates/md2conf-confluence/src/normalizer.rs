//! Final page body assembly.
//!
//! Wraps rendered storage markup with the optional auto-generated notice panel
//! and table of contents.

use std::fmt::Write;

use md2conf_config::{LinksConfig, NoticeMode, RenderConfig, TocLayout};
use md2conf_renderer::escape_html;

const NOTICE_TITLE: &str = "Auto-generated page";

const NOTICE_TEXT: &str = "This page is generated automatically from Markdown. \
     Manual edits will be overwritten on the next publish.";

const TOC_MACRO: &str = concat!(
    r#"<ac:structured-macro ac:name="toc" ac:schema-version="1">"#,
    r#"<ac:parameter ac:name="printable">true</ac:parameter>"#,
    r#"<ac:parameter ac:name="style">disc</ac:parameter>"#,
    r#"<ac:parameter ac:name="minLevel">1</ac:parameter>"#,
    r#"<ac:parameter ac:name="maxLevel">7</ac:parameter>"#,
    r#"<ac:parameter ac:name="type">list</ac:parameter>"#,
    r#"<ac:parameter ac:name="outline">clear</ac:parameter>"#,
    "</ac:structured-macro>"
);

/// Builds the final storage body from rendered markup.
///
/// Output is a pure function of the input and settings, so identical input
/// always yields an identical body.
#[derive(Debug, Clone, Default)]
pub struct ContentNormalizer {
    toc: bool,
    toc_layout: TocLayout,
    notice: NoticeMode,
    job_url: Option<String>,
    repo_url: Option<String>,
}

impl ContentNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer from `[render]` and `[links]` settings.
    #[must_use]
    pub fn from_config(render: &RenderConfig, links: &LinksConfig) -> Self {
        Self::new()
            .toc(render.toc)
            .toc_layout(render.toc_layout)
            .notice(render.notice)
            .job_url(links.job_url.as_deref())
            .repo_url(links.repo_url.as_deref())
    }

    /// Add a table of contents macro.
    #[must_use]
    pub fn toc(mut self, enabled: bool) -> Self {
        self.toc = enabled;
        self
    }

    #[must_use]
    pub fn toc_layout(mut self, layout: TocLayout) -> Self {
        self.toc_layout = layout;
        self
    }

    #[must_use]
    pub fn notice(mut self, mode: NoticeMode) -> Self {
        self.notice = mode;
        self
    }

    #[must_use]
    pub fn job_url(mut self, url: Option<&str>) -> Self {
        self.job_url = url.map(ToOwned::to_owned);
        self
    }

    #[must_use]
    pub fn repo_url(mut self, url: Option<&str>) -> Self {
        self.repo_url = url.map(ToOwned::to_owned);
        self
    }

    /// Assemble the storage body: notice, then table of contents, then content.
    ///
    /// With the sidebar layout the notice and content share the main cell and
    /// the table of contents sits in the side cell.
    #[must_use]
    pub fn normalize(&self, html: &str) -> String {
        let notice = self.notice_panel();
        let notice = notice.as_deref().unwrap_or("");

        if !self.toc {
            return format!("{notice}{html}");
        }

        match self.toc_layout {
            TocLayout::Inline => format!("{notice}{TOC_MACRO}{html}"),
            TocLayout::Sidebar => format!(
                concat!(
                    "<ac:layout>",
                    r#"<ac:layout-section ac:type="two_right_sidebar">"#,
                    "<ac:layout-cell>{}{}</ac:layout-cell>",
                    "<ac:layout-cell>{}</ac:layout-cell>",
                    "</ac:layout-section>",
                    "</ac:layout>"
                ),
                notice, html, TOC_MACRO
            ),
        }
    }

    fn has_links(&self) -> bool {
        self.job_url.is_some() || self.repo_url.is_some()
    }

    fn notice_panel(&self) -> Option<String> {
        let show = match self.notice {
            NoticeMode::Auto => self.has_links(),
            NoticeMode::Always => true,
            NoticeMode::Never => false,
        };
        if !show {
            return None;
        }

        let mut out = String::new();
        out.push_str(r#"<ac:structured-macro ac:name="info" ac:schema-version="1">"#);
        write!(
            out,
            r#"<ac:parameter ac:name="title">{NOTICE_TITLE}</ac:parameter>"#
        )
        .unwrap();
        write!(out, "<ac:rich-text-body><p>{NOTICE_TEXT}</p>").unwrap();
        for (label, url) in [("Job", &self.job_url), ("Repository", &self.repo_url)] {
            if let Some(url) = url {
                let url = escape_html(url);
                write!(
                    out,
                    r#"<p><strong>{label}:</strong> <a href="{url}">{url}</a></p>"#
                )
                .unwrap();
            }
        }
        out.push_str("</ac:rich-text-body></ac:structured-macro>");
        Some(out)
    }
}
