//! Confluence API types.

mod page;
mod search;

pub use page::{Body, Links, Page, PageRef, Space, Storage, Version};
pub use search::{ContentSummary, SearchResponse};
