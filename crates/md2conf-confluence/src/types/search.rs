//! Content search types.

use serde::Deserialize;

use crate::error::ConfluenceError;

/// Response of `GET /content/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Matching content.
    pub results: Vec<ContentSummary>,
    /// Number of results in this response.
    #[serde(default)]
    pub size: usize,
}

/// Search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentSummary {
    /// Content ID.
    pub id: String,
    /// Content title.
    pub title: String,
}

impl SearchResponse {
    /// ID of the single result whose title equals `title` exactly.
    ///
    /// CQL title matching is looser than string equality, so results are
    /// filtered again here (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::AmbiguousTitle`] if more than one result matches.
    pub fn unique_match(&self, space: &str, title: &str) -> Result<Option<&str>, ConfluenceError> {
        let matches: Vec<&str> = self
            .results
            .iter()
            .filter(|hit| hit.title == title)
            .map(|hit| hit.id.as_str())
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(ConfluenceError::AmbiguousTitle {
                space: space.to_owned(),
                title: title.to_owned(),
                page_ids: matches.iter().map(|id| (*id).to_owned()).collect(),
            }),
        }
    }
}
