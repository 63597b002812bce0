//! Admonition block support.
//!
//! Admonitions use the Python-Markdown syntax:
//!
//! ```text
//! !!! warning "Read this first"
//!     Indented body, parsed as regular markdown.
//! ```
//!
//! pulldown-cmark has no admonition extension, so blocks are handled in two
//! phases. [`AdmonitionPreprocessor::process`] rewrites each block into an
//! intermediate HTML element pair that passes through pulldown-cmark as HTML
//! blocks, with the dedented body left in between as markdown. The renderer then
//! recognizes the markers (see [`parse_marker`]) and asks the backend to emit the
//! opening and closing panel markup.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FenceTracker;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^!!! ?([\w-]+(?: +[\w-]+)*)(?: +"(.*?)")? *$"#).unwrap());

static OPEN_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<md2conf-admonition data-index="(\d+)">$"#).unwrap());

const CLOSE_MARKER: &str = "</md2conf-admonition>";

/// Confluence panel macro used for callouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    Info,
    Note,
    Tip,
    Warning,
}

impl PanelKind {
    /// Map an admonition type (`note`, `danger`, ...) to a panel.
    ///
    /// Unknown types fall back to [`PanelKind::Info`].
    #[must_use]
    pub fn from_admonition_type(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "note" | "warning" | "caution" | "attention" => Self::Note,
            "tip" | "hint" | "success" | "check" | "done" => Self::Tip,
            "danger" | "error" | "important" | "failure" | "fail" | "bug" => Self::Warning,
            _ => Self::Info,
        }
    }

    /// Confluence macro name (`ac:name` attribute).
    #[must_use]
    pub fn macro_name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Warning => "warning",
        }
    }
}

/// A parsed admonition header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Admonition {
    /// Admonition type as written (first class after `!!!`).
    pub kind: String,
    /// Panel the admonition renders as.
    pub panel: PanelKind,
    /// Panel title. `None` when the header had an explicit empty title (`""`).
    pub title: Option<String>,
}

impl Admonition {
    fn new(kind: &str, title: Option<&str>) -> Self {
        let title = match title {
            Some("") => None,
            Some(title) => Some(title.to_owned()),
            None => Some(capitalize(kind)),
        };
        Self {
            kind: kind.to_owned(),
            panel: PanelKind::from_admonition_type(kind),
            title,
        }
    }
}

/// Marker found in an HTML block emitted by the preprocessor.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Marker {
    Open(usize),
    Close,
}

/// Recognize an intermediate admonition marker.
pub(crate) fn parse_marker(html: &str) -> Option<Marker> {
    let trimmed = html.trim();
    if trimmed == CLOSE_MARKER {
        return Some(Marker::Close);
    }
    OPEN_MARKER_RE
        .captures(trimmed)
        .and_then(|caps| caps[1].parse().ok())
        .map(Marker::Open)
}

/// Rewrites admonition blocks into intermediate HTML markers.
#[derive(Debug, Default)]
pub(crate) struct AdmonitionPreprocessor {
    blocks: Vec<Admonition>,
}

impl AdmonitionPreprocessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Admonition registered under a marker index.
    pub(crate) fn get(&self, index: usize) -> Option<&Admonition> {
        self.blocks.get(index)
    }

    /// Replace admonition blocks in `markdown` with marker-wrapped bodies.
    ///
    /// Headers inside fenced code blocks are left alone. Nested admonitions are
    /// handled by processing each dedented body recursively.
    pub(crate) fn process(&mut self, markdown: &str) -> String {
        let lines: Vec<&str> = markdown.lines().collect();
        let mut out = String::with_capacity(markdown.len());
        let mut fence = FenceTracker::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if !fence.in_fence()
                && let Some(caps) = HEADER_RE.captures(line)
            {
                let kind = caps[1].split(' ').next().unwrap_or_default();
                let admonition = Admonition::new(kind, caps.get(2).map(|m| m.as_str()));

                let (body, next) = collect_body(&lines, i + 1);
                let index = self.blocks.len();
                self.blocks.push(admonition);
                let inner = self.process(&body.join("\n"));

                write!(
                    out,
                    "\n<md2conf-admonition data-index=\"{index}\">\n\n{inner}\n\n{CLOSE_MARKER}\n\n"
                )
                .unwrap();
                i = next;
                continue;
            }

            fence.update(line);
            out.push_str(line);
            out.push('\n');
            i += 1;
        }

        out
    }
}

/// Collect the indented body starting at `start`.
///
/// Returns the dedented lines and the index of the first line after the block.
/// Trailing blank lines are left to the surrounding document.
fn collect_body<'a>(lines: &[&'a str], start: usize) -> (Vec<&'a str>, usize) {
    let mut body = Vec::new();
    let mut end = start;

    while end < lines.len() {
        let line = lines[end];
        if line.trim().is_empty() {
            body.push("");
        } else if let Some(stripped) = dedent(line) {
            body.push(stripped);
        } else {
            break;
        }
        end += 1;
    }

    while body.last().is_some_and(|l| l.is_empty()) {
        body.pop();
        end -= 1;
    }

    (body, end)
}

/// Strip one level of indentation (four spaces or a tab).
fn dedent(line: &str) -> Option<&str> {
    line.strip_prefix("    ").or_else(|| line.strip_prefix('\t'))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
