//! Result types for page publishing.

use std::fmt;

use crate::types::PageRef;

use super::error::PublishError;

/// What a publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new page was created.
    Created(PageRef),
    /// The page was updated; carries the version it replaced.
    Updated(PageRef, u32),
    /// Nothing was written; carries the existing page ID.
    Skipped(String, SkipReason),
}

/// Result of [`Publisher::publish`](super::Publisher::publish).
pub type PublishResult = Result<PublishOutcome, PublishError>;

/// Why a publish wrote nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Stored body already matches the local body.
    NoContentChange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContentChange => f.write_str("no content change"),
        }
    }
}

/// Decision reached by lookup and comparison, before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishPlan {
    /// No page with the title exists.
    Create,
    /// The page exists and will be replaced.
    Update {
        /// Current remote state.
        page: PageRef,
        /// Update requested regardless of content.
        forced: bool,
    },
    /// The page exists with identical content.
    Skip {
        /// Current remote state.
        page: PageRef,
    },
}
