//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Confluence page as returned by the REST API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (always "page").
    #[serde(rename = "type", default)]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Space the page lives in.
    #[serde(default)]
    pub space: Option<Space>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// HTML content in Confluence storage format.
    pub value: String,
    /// Content representation (always "storage").
    pub representation: String,
}

/// Space reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Space {
    /// Space key.
    pub key: String,
}

/// Hypermedia links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Links {
    /// Base URL of the Confluence instance.
    #[serde(default)]
    pub base: Option<String>,
    /// Web UI link, relative to `base`.
    #[serde(default)]
    pub webui: Option<String>,
    /// API self link.
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
}

/// Last-known state of a remote page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    /// Page ID.
    pub id: String,
    /// Current version number.
    pub version: u32,
    /// Page title.
    pub title: String,
    /// Key of the containing space (empty if the response omitted it).
    pub space_key: String,
    /// Stored body in storage format (empty if the response omitted it).
    pub body: String,
    /// Browser URL of the page.
    pub web_url: Option<String>,
}

impl PageRef {
    /// Version number the next update must carry, `None` once the counter is
    /// exhausted.
    #[must_use]
    pub fn next_version(&self) -> Option<u32> {
        self.version.checked_add(1)
    }
}

impl From<Page> for PageRef {
    fn from(page: Page) -> Self {
        let web_url = page.links.as_ref().and_then(|links| {
            let webui = links.webui.as_deref()?;
            Some(match links.base.as_deref() {
                Some(base) => format!("{base}{webui}"),
                None => webui.to_owned(),
            })
        });
        let body = page
            .body
            .and_then(|b| b.storage)
            .map(|s| s.value)
            .unwrap_or_default();

        Self {
            id: page.id,
            version: page.version.number,
            title: page.title,
            space_key: page.space.map(|s| s.key).unwrap_or_default(),
            body,
            web_url,
        }
    }
}
