//! Work-item input.
//!
//! When the run is scheduled by an automation server, the search inputs come
//! from a JSON payload instead of the command line:
//!
//! ```json
//! { "PHRASE": "IPL", "TOPIC": "Sports" }
//! ```
//!
//! Keys present in the payload win over command-line and environment values.
//! Other keys are ignored.

use crate::errors::Result;
use crate::models::SearchParams;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct WorkItemPayload {
    #[serde(rename = "PHRASE")]
    pub phrase: Option<String>,
    #[serde(rename = "TOPIC")]
    pub topic: Option<String>,
}

impl WorkItemPayload {
    /// Read a payload file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).await?;
        let payload: WorkItemPayload = serde_json::from_str(&raw)?;
        info!(
            has_phrase = payload.phrase.is_some(),
            has_topic = payload.topic.is_some(),
            "Loaded work item"
        );
        Ok(payload)
    }

    /// Overlay the payload on `defaults`.
    pub fn apply(self, defaults: SearchParams) -> SearchParams {
        SearchParams {
            phrase: self.phrase.unwrap_or(defaults.phrase),
            topic: self.topic.unwrap_or(defaults.topic),
        }
    }
}
