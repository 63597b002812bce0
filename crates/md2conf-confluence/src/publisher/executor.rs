//! Publisher implementation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::api::ConfluenceApi;
use crate::types::PageRef;

use super::error::PublishError;
use super::result::{PublishOutcome, PublishPlan, PublishResult, SkipReason};
use super::{PublishOptions, PublishRequest};

/// Macro IDs are regenerated by Confluence on every save.
static MACRO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+ac:macro-id="[^"]*""#).unwrap());

/// Strip volatile attributes so two storage bodies can be compared.
#[must_use]
pub fn canonical_storage(body: &str) -> String {
    MACRO_ID_RE.replace_all(body, "").into_owned()
}

/// Creates, updates or skips a Confluence page.
pub struct Publisher<'a, C: ConfluenceApi> {
    client: &'a C,
    options: PublishOptions,
}

impl<'a, C: ConfluenceApi> Publisher<'a, C> {
    /// Create a new publisher.
    #[must_use]
    pub fn new(client: &'a C, options: PublishOptions) -> Self {
        Self { client, options }
    }

    /// Publish a document.
    ///
    /// Writes at most once: a create when no page has the title, an update to
    /// `version + 1` when the content differs (or `force_update` is set).
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Input`] for an empty title or space key before any
    /// network call. Lookup, ambiguity and write failures are returned as
    /// [`PublishError::Confluence`]; a stale version surfaces as a conflict and
    /// is not retried.
    pub fn publish(&self, request: &PublishRequest) -> PublishResult {
        match self.plan(request)? {
            PublishPlan::Create => {
                let page = self.client.create_page(
                    &request.space_key,
                    &request.title,
                    &request.body,
                    request.ancestor_id.as_deref(),
                )?;
                info!("Created page '{}' (id={})", page.title, page.id);
                Ok(PublishOutcome::Created(page))
            }
            PublishPlan::Update { page, forced } => {
                if forced {
                    info!("Forcing update of page {}", page.id);
                }
                let previous_version = page.version;
                let updated = self.client.update_page(
                    &page.id,
                    next_version(&page)?,
                    &request.title,
                    &request.body,
                    request.ancestor_id.as_deref(),
                )?;
                info!(
                    "Updated page '{}' (id={}) from version {} to {}",
                    updated.title, updated.id, previous_version, updated.version
                );
                Ok(PublishOutcome::Updated(updated, previous_version))
            }
            PublishPlan::Skip { page } => {
                info!("Page {} unchanged, skipping update", page.id);
                Ok(PublishOutcome::Skipped(page.id, SkipReason::NoContentChange))
            }
        }
    }

    /// Decide what [`publish`](Self::publish) would do, without writing.
    ///
    /// # Errors
    ///
    /// Same as [`publish`](Self::publish), minus write failures.
    pub fn plan(&self, request: &PublishRequest) -> Result<PublishPlan, PublishError> {
        Self::validate(request)?;

        let Some(page) = self
            .client
            .find_page_by_title(&request.space_key, &request.title)?
        else {
            return Ok(PublishPlan::Create);
        };

        if request.force_update {
            next_version(&page)?;
            return Ok(PublishPlan::Update { page, forced: true });
        }

        if self.content_changed(&request.body, &page)? {
            next_version(&page)?;
            Ok(PublishPlan::Update {
                page,
                forced: false,
            })
        } else {
            Ok(PublishPlan::Skip { page })
        }
    }

    fn validate(request: &PublishRequest) -> Result<(), PublishError> {
        if request.title.trim().is_empty() {
            return Err(PublishError::Input(
                "page title is empty: add a heading to the markdown or pass --title".to_owned(),
            ));
        }
        if request.space_key.trim().is_empty() {
            return Err(PublishError::Input("space key is empty".to_owned()));
        }
        Ok(())
    }

    /// Compare the canonical local body with the stored one.
    fn content_changed(&self, body: &str, page: &PageRef) -> Result<bool, PublishError> {
        let local = if self.options.server_normalize {
            self.client.convert_to_storage(body)?
        } else {
            body.to_owned()
        };

        let changed = canonical_storage(&local) != canonical_storage(&page.body);
        debug!(
            "Compared page {} (version {}): changed={}",
            page.id, page.version, changed
        );
        Ok(changed)
    }
}

fn next_version(page: &PageRef) -> Result<u32, PublishError> {
    page.next_version().ok_or_else(|| PublishError::VersionExhausted {
        page_id: page.id.clone(),
        version: page.version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfluenceError;
    use crate::mock::{Call, MockConfluence};
    use crate::renderer::PageRenderer;
    use pretty_assertions::assert_eq;

    fn request(title: &str, body: &str) -> PublishRequest {
        PublishRequest {
            space_key: "DOCS".to_owned(),
            title: title.to_owned(),
            body: body.to_owned(),
            ancestor_id: None,
            force_update: false,
        }
    }

    fn publisher(client: &MockConfluence) -> Publisher<'_, MockConfluence> {
        Publisher::new(client, PublishOptions::default())
    }

    #[test]
    fn test_canonical_storage_strips_macro_ids() {
        let body = r#"<ac:structured-macro ac:name="info" ac:schema-version="1" ac:macro-id="0b1c-22">x</ac:structured-macro>"#;
        assert_eq!(
            canonical_storage(body),
            r#"<ac:structured-macro ac:name="info" ac:schema-version="1">x</ac:structured-macro>"#
        );
    }

    #[test]
    fn test_empty_title_is_input_error_without_network() {
        let client = MockConfluence::new();
        let err = publisher(&client).publish(&request("", "<p>x</p>")).unwrap_err();
        assert!(matches!(err, PublishError::Input(_)));
        assert_eq!(client.calls(), Vec::<Call>::new());
    }

    #[test]
    fn test_empty_space_is_input_error() {
        let client = MockConfluence::new();
        let mut req = request("Readme", "<p>x</p>");
        req.space_key = String::new();
        let err = publisher(&client).publish(&req).unwrap_err();
        assert!(matches!(err, PublishError::Input(_)));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_create_then_skip() {
        let client = MockConfluence::new();
        let publisher = publisher(&client);
        let req = request("Readme", r#"<ac:structured-macro ac:name="info" ac:schema-version="1"><ac:rich-text-body><p>x</p></ac:rich-text-body></ac:structured-macro>"#);

        let first = publisher.publish(&req).unwrap();
        let PublishOutcome::Created(page) = first else {
            panic!("expected Created, got {first:?}");
        };
        assert_eq!(page.version, 1);

        let second = publisher.publish(&req).unwrap();
        assert_eq!(
            second,
            PublishOutcome::Skipped(page.id, SkipReason::NoContentChange)
        );
        assert_eq!(client.write_count(), 1);
    }

    #[test]
    fn test_changed_content_updates_next_version() {
        let client = MockConfluence::new();
        client.insert_page("DOCS", "Readme", "<p>old</p>", 4);

        let outcome = publisher(&client)
            .publish(&request("Readme", "<p>new</p>"))
            .unwrap();

        match outcome {
            PublishOutcome::Updated(page, previous) => {
                assert_eq!(previous, 4);
                assert_eq!(page.version, 5);
                assert_eq!(page.body, "<p>new</p>");
            }
            other => panic!("expected Updated, got {other:?}"),
        }
    }

    #[test]
    fn test_force_update_always_updates() {
        let client = MockConfluence::new();
        let id = client.insert_page("DOCS", "Readme", "<p>same</p>", 2);
        let mut req = request("Readme", "<p>same</p>");
        req.force_update = true;

        let outcome = publisher(&client).publish(&req).unwrap();

        assert!(matches!(outcome, PublishOutcome::Updated(ref page, 2) if page.id == id && page.version == 3));
        // Forced updates skip the comparison round-trip
        assert!(!client.calls().contains(&Call::Convert));
    }

    #[test]
    fn test_comparison_is_whitespace_sensitive() {
        let client = MockConfluence::new();
        client.insert_page("DOCS", "Readme", "<p>x</p>", 1);

        let outcome = publisher(&client)
            .publish(&request("Readme", "<p>x</p>\n"))
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Updated(_, 1)));
    }

    #[test]
    fn test_title_match_is_case_sensitive() {
        let client = MockConfluence::new();
        client.insert_page("DOCS", "readme", "<p>x</p>", 1);

        let outcome = publisher(&client)
            .publish(&request("Readme", "<p>x</p>"))
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Created(_)));
    }

    #[test]
    fn test_page_in_other_space_is_ignored() {
        let client = MockConfluence::new();
        client.insert_page("OPS", "Readme", "<p>x</p>", 1);

        let outcome = publisher(&client)
            .publish(&request("Readme", "<p>x</p>"))
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Created(ref page) if page.space_key == "DOCS"));
    }

    #[test]
    fn test_ambiguous_title_is_fatal() {
        let client = MockConfluence::new();
        client.insert_page("DOCS", "Readme", "<p>a</p>", 1);
        client.insert_page("DOCS", "Readme", "<p>b</p>", 1);

        let err = publisher(&client)
            .publish(&request("Readme", "<p>c</p>"))
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Confluence(ConfluenceError::AmbiguousTitle { ref page_ids, .. }) if page_ids.len() == 2
        ));
        assert_eq!(client.write_count(), 0);
    }

    #[test]
    fn test_conflict_then_fresh_publish_succeeds() {
        let client = MockConfluence::new();
        client.insert_page("DOCS", "Readme", "<p>old</p>", 1);
        client.fail_next_update(409);
        let req = request("Readme", "<p>new</p>");

        let err = publisher(&client).publish(&req).unwrap_err();
        let PublishError::Confluence(err) = err else {
            panic!("expected Confluence error, got {err:?}");
        };
        assert!(matches!(err, ConfluenceError::Conflict { .. }));
        assert_eq!(err.status(), Some(409));

        let outcome = publisher(&client).publish(&req).unwrap();
        assert!(matches!(outcome, PublishOutcome::Updated(ref page, 1) if page.version == 2));
    }

    #[test]
    fn test_create_failure_propagates() {
        let client = MockConfluence::new();
        client.fail_next_create(400);

        let err = publisher(&client)
            .publish(&request("Readme", "<p>x</p>"))
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Confluence(ConfluenceError::Api { status: 400, .. })
        ));
    }

    #[test]
    fn test_ancestor_sent_on_create() {
        let client = MockConfluence::new();
        let req = request("Child", "<p>x</p>").ancestor_id(Some("77"));

        publisher(&client).publish(&req).unwrap();

        assert!(client.calls().contains(&Call::Create {
            title: "Child".to_owned(),
            ancestor_id: Some("77".to_owned()),
        }));
    }

    #[test]
    fn test_without_server_normalize_no_convert_call() {
        let client = MockConfluence::new().without_macro_ids();
        client.insert_page("DOCS", "Readme", "<p>x</p>", 1);
        let publisher = Publisher::new(
            &client,
            PublishOptions {
                server_normalize: false,
            },
        );

        let outcome = publisher.publish(&request("Readme", "<p>x</p>")).unwrap();

        assert!(matches!(outcome, PublishOutcome::Skipped(_, SkipReason::NoContentChange)));
        assert!(!client.calls().contains(&Call::Convert));
    }

    #[test]
    fn test_exhausted_version_fails_before_write() {
        let client = MockConfluence::new();
        client.insert_page("DOCS", "Readme", "<p>old</p>", u32::MAX);

        let err = publisher(&client)
            .publish(&request("Readme", "<p>new</p>"))
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::VersionExhausted { version: u32::MAX, .. }
        ));
        assert_eq!(client.write_count(), 0);
    }

    #[test]
    fn test_plan_does_not_write() {
        let client = MockConfluence::new();
        client.insert_page("DOCS", "Readme", "<p>old</p>", 3);

        let plan = publisher(&client)
            .plan(&request("Readme", "<p>new</p>"))
            .unwrap();

        assert!(matches!(plan, PublishPlan::Update { ref page, forced: false } if page.version == 3));
        assert_eq!(client.write_count(), 0);
    }

    #[test]
    fn test_hello_world_lifecycle() {
        let client = MockConfluence::new();
        let publisher = publisher(&client);
        let document = PageRenderer::new().render("# Hello\n\nWorld");
        assert_eq!(document.title, "Hello");
        assert!(document.body.contains("<p>World</p>"));
        let req = PublishRequest::new("DOCS", document);

        let created = publisher.publish(&req).unwrap();
        assert!(matches!(created, PublishOutcome::Created(ref page) if page.version == 1));

        let skipped = publisher.publish(&req).unwrap();
        let PublishOutcome::Skipped(_, reason) = skipped else {
            panic!("expected Skipped, got {skipped:?}");
        };
        assert_eq!(reason.to_string(), "no content change");

        let forced = publisher.publish(&req.clone().force_update(true)).unwrap();
        assert!(matches!(forced, PublishOutcome::Updated(ref page, 1) if page.version == 2));
    }
}
