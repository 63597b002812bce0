//! Storage format conversion.

use serde_json::json;
use tracing::debug;

use super::{ConfluenceClient, read_json};
use crate::error::ConfluenceError;
use crate::types::Storage;

impl ConfluenceClient {
    /// Convert storage markup to the form Confluence would store it in.
    pub(crate) fn convert_storage(&self, body: &str) -> Result<String, ConfluenceError> {
        let url = self.endpoint("contentbody/convert/storage");

        debug!("Converting {} bytes of storage markup", body.len());

        let response = self
            .authorized(self.agent.post(&url))
            .send_json(&json!({ "value": body, "representation": "storage" }))?;

        let storage: Storage = read_json(response)?;
        Ok(storage.value)
    }
}
