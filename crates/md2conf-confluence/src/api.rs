//! Trait for the Confluence operations the publisher needs.

use crate::error::ConfluenceError;
use crate::types::PageRef;

/// Confluence API operations (enables testing the publisher with fake
/// implementations).
pub trait ConfluenceApi {
    /// Find the page in `space_key` whose title equals `title` exactly.
    ///
    /// Returns `None` when no page matches.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::AmbiguousTitle`] when more than one page
    /// matches, or any transport error.
    fn find_page_by_title(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<PageRef>, ConfluenceError>;

    /// Fetch a page with its stored body and version.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page does not exist.
    fn get_page(&self, page_id: &str) -> Result<PageRef, ConfluenceError>;

    /// Create a page, optionally as a child of `ancestor_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        ancestor_id: Option<&str>,
    ) -> Result<PageRef, ConfluenceError>;

    /// Replace a page's title and body, submitting `version` as the new
    /// version number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Conflict`] if `version` is stale, or any other
    /// request error.
    fn update_page(
        &self,
        page_id: &str,
        version: u32,
        title: &str,
        body: &str,
        ancestor_id: Option<&str>,
    ) -> Result<PageRef, ConfluenceError>;

    /// Run storage-format markup through the server's storage converter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn convert_to_storage(&self, body: &str) -> Result<String, ConfluenceError>;
}
