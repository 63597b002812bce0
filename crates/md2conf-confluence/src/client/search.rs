//! Page lookup by title.

use tracing::{debug, info};

use super::{ConfluenceClient, read_json};
use crate::error::ConfluenceError;
use crate::types::{PageRef, SearchResponse};

/// Upper bound on search hits per lookup.
const SEARCH_LIMIT: &str = "50";

impl ConfluenceClient {
    /// Find a page by exact title within a space.
    pub(crate) fn find_page(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<PageRef>, ConfluenceError> {
        let url = self.endpoint("content/search");
        let cql = title_cql(space_key, title);

        debug!("Searching pages: {}", cql);

        let response = self
            .authorized(self.agent.get(&url))
            .query("cql", &cql)
            .query("limit", SEARCH_LIMIT)
            .call()?;

        let results: SearchResponse = read_json(response)?;
        match results.unique_match(space_key, title)? {
            Some(page_id) => {
                info!("Found page '{}' (id={})", title, page_id);
                self.fetch_page(page_id).map(Some)
            }
            None => {
                info!("No page titled '{}' in space {}", title, space_key);
                Ok(None)
            }
        }
    }
}

/// CQL query for pages with the given title in a space.
fn title_cql(space_key: &str, title: &str) -> String {
    format!(
        "type=page and space={} and title={}",
        cql_string(space_key),
        cql_string(title)
    )
}

/// Quote a CQL string literal.
fn cql_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
