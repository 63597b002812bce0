//! Page operations for Confluence API.

use serde_json::{Value, json};
use tracing::{debug, info};

use super::{ConfluenceClient, read_json};
use crate::error::ConfluenceError;
use crate::types::{Page, PageRef};

impl ConfluenceClient {
    /// Get page by ID with stored body, version and space.
    pub(crate) fn fetch_page(&self, page_id: &str) -> Result<PageRef, ConfluenceError> {
        let url = self.endpoint(&format!("content/{page_id}"));

        debug!("Getting page {}", page_id);

        let response = self
            .authorized(self.agent.get(&url))
            .query("expand", "body.storage,version,space")
            .call()?;

        let page: Page = read_json(response)?;
        Ok(page.into())
    }

    /// Create a new page.
    pub(crate) fn post_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        ancestor_id: Option<&str>,
    ) -> Result<PageRef, ConfluenceError> {
        let url = self.endpoint("content");
        let payload = page_payload(space_key, title, body, ancestor_id, None);

        info!("Creating page '{}' in space {}", title, space_key);

        let response = self
            .authorized(self.agent.post(&url))
            .send_json(&payload)?;

        let page: Page = read_json(response)?;
        Ok(page.into())
    }

    /// Update an existing page to `version`.
    pub(crate) fn put_page(
        &self,
        page_id: &str,
        version: u32,
        title: &str,
        body: &str,
        ancestor_id: Option<&str>,
    ) -> Result<PageRef, ConfluenceError> {
        let url = self.endpoint(&format!("content/{page_id}"));
        let payload = page_payload("", title, body, ancestor_id, Some(version));

        info!("Updating page {} to version {}", page_id, version);

        let response = self
            .authorized(self.agent.put(&url))
            .send_json(&payload)?;

        let page: Page = read_json(response)?;
        Ok(page.into())
    }
}

/// JSON payload for page create (no version) and update (with version).
///
/// The space is only sent on create.
fn page_payload(
    space_key: &str,
    title: &str,
    body: &str,
    ancestor_id: Option<&str>,
    version: Option<u32>,
) -> Value {
    let mut payload = json!({
        "type": "page",
        "title": title,
        "body": {
            "storage": {
                "value": body,
                "representation": "storage"
            }
        }
    });

    if let Some(number) = version {
        payload["version"] = json!({ "number": number });
    } else {
        payload["space"] = json!({ "key": space_key });
    }
    if let Some(id) = ancestor_id {
        payload["ancestors"] = json!([{ "id": id }]);
    }

    payload
}
