//! In-memory Confluence for publisher tests.

use std::cell::{Cell, RefCell};

use crate::api::ConfluenceApi;
use crate::error::ConfluenceError;
use crate::types::{ContentSummary, PageRef, SearchResponse};

/// Recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Find { title: String },
    Get(String),
    Create {
        title: String,
        ancestor_id: Option<String>,
    },
    Update { page_id: String, version: u32 },
    Convert,
}

/// Fake Confluence keeping pages in memory.
///
/// Like the real server it stamps a fresh `ac:macro-id` on every macro it
/// stores or converts, and rejects updates whose version is not the next one.
pub(crate) struct MockConfluence {
    pages: RefCell<Vec<PageRef>>,
    next_id: Cell<u64>,
    macro_ids: bool,
    macro_counter: Cell<u64>,
    calls: RefCell<Vec<Call>>,
    fail_create: Cell<Option<u16>>,
    fail_update: Cell<Option<u16>>,
}

impl MockConfluence {
    pub(crate) fn new() -> Self {
        Self {
            pages: RefCell::new(Vec::new()),
            next_id: Cell::new(1000),
            macro_ids: true,
            macro_counter: Cell::new(0),
            calls: RefCell::new(Vec::new()),
            fail_create: Cell::new(None),
            fail_update: Cell::new(None),
        }
    }

    /// Store bodies verbatim.
    pub(crate) fn without_macro_ids(mut self) -> Self {
        self.macro_ids = false;
        self
    }

    /// Seed a page; returns its ID.
    pub(crate) fn insert_page(&self, space: &str, title: &str, body: &str, version: u32) -> String {
        let id = self.allocate_id();
        let page = PageRef {
            id: id.clone(),
            version,
            title: title.to_owned(),
            space_key: space.to_owned(),
            body: self.stamp(body),
            web_url: Some(format!("https://wiki.example.com/pages/{id}")),
        };
        self.pages.borrow_mut().push(page);
        id
    }

    /// Make the next `create_page` fail with `status`.
    pub(crate) fn fail_next_create(&self, status: u16) {
        self.fail_create.set(Some(status));
    }

    /// Make the next `update_page` fail with `status`.
    pub(crate) fn fail_next_update(&self, status: u16) {
        self.fail_update.set(Some(status));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Number of create and update attempts.
    pub(crate) fn write_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Create { .. } | Call::Update { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate_id(&self) -> String {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id.to_string()
    }

    fn stamp(&self, body: &str) -> String {
        if !self.macro_ids {
            return body.to_owned();
        }
        let mut out = String::with_capacity(body.len());
        let mut parts = body.split("<ac:structured-macro ");
        if let Some(first) = parts.next() {
            out.push_str(first);
        }
        for part in parts {
            let n = self.macro_counter.get() + 1;
            self.macro_counter.set(n);
            out.push_str(&format!(
                "<ac:structured-macro ac:macro-id=\"mock-{n}\" {part}"
            ));
        }
        out
    }
}

impl ConfluenceApi for MockConfluence {
    fn find_page_by_title(
        &self,
        space_key: &str,
        title: &str,
    ) -> Result<Option<PageRef>, ConfluenceError> {
        self.record(Call::Find {
            title: title.to_owned(),
        });
        let results = SearchResponse {
            results: self
                .pages
                .borrow()
                .iter()
                .filter(|page| page.space_key == space_key)
                .map(|page| ContentSummary {
                    id: page.id.clone(),
                    title: page.title.clone(),
                })
                .collect(),
            size: 0,
        };
        match results.unique_match(space_key, title)? {
            Some(id) => self.get_page(id).map(Some),
            None => Ok(None),
        }
    }

    fn get_page(&self, page_id: &str) -> Result<PageRef, ConfluenceError> {
        self.record(Call::Get(page_id.to_owned()));
        self.pages
            .borrow()
            .iter()
            .find(|page| page.id == page_id)
            .cloned()
            .ok_or_else(|| ConfluenceError::from_status(404, "No content found".to_owned()))
    }

    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        ancestor_id: Option<&str>,
    ) -> Result<PageRef, ConfluenceError> {
        self.record(Call::Create {
            title: title.to_owned(),
            ancestor_id: ancestor_id.map(ToOwned::to_owned),
        });
        if let Some(status) = self.fail_create.take() {
            return Err(ConfluenceError::from_status(status, "create rejected".to_owned()));
        }
        let id = self.insert_page(space_key, title, body, 1);
        self.get_page(&id)
    }

    fn update_page(
        &self,
        page_id: &str,
        version: u32,
        title: &str,
        body: &str,
        _ancestor_id: Option<&str>,
    ) -> Result<PageRef, ConfluenceError> {
        self.record(Call::Update {
            page_id: page_id.to_owned(),
            version,
        });
        if let Some(status) = self.fail_update.take() {
            return Err(ConfluenceError::from_status(status, "update rejected".to_owned()));
        }

        let stamped = self.stamp(body);
        let mut pages = self.pages.borrow_mut();
        let page = pages
            .iter_mut()
            .find(|page| page.id == page_id)
            .ok_or_else(|| ConfluenceError::from_status(404, "No content found".to_owned()))?;
        if page.version.checked_add(1) != Some(version) {
            return Err(ConfluenceError::from_status(409, "Version must be incremented".to_owned()));
        }
        page.version = version;
        title.clone_into(&mut page.title);
        page.body = stamped;
        Ok(page.clone())
    }

    fn convert_to_storage(&self, body: &str) -> Result<String, ConfluenceError> {
        self.record(Call::Convert);
        Ok(self.stamp(body))
    }
}
