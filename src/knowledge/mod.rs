//! Knowledge-store collaborator
//!
//! The store is asked, once per plan, to watch every predicate referenced
//! by a branch condition and notify the dispatcher when its value becomes
//! known. The request is a bounded synchronous call; a failure degrades
//! the plan (conditions will never resolve) but does not invalidate the
//! graph.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::filter::FilterRequest;
use crate::plan::error::PlanError;

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Client for the knowledge store's filter endpoint.
pub struct KnowledgeClient {
    base_url: String,
    client: Client,
}

impl KnowledgeClient {
    /// Create a client with bounded timeouts so an unresponsive store
    /// cannot hang the compile step.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .user_agent("weft")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Send one batched filter request.
    pub fn update_filter(&self, request: &FilterRequest) -> Result<(), PlanError> {
        let url = format!("{}/filters", self.base_url);
        debug!(url = %url, entries = request.entries.len(), "pushing filter request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|err| PlanError::KnowledgeStore {
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlanError::KnowledgeStore {
                reason: format!("HTTP {} from {url}", status.as_u16()),
            });
        }

        info!(entries = request.entries.len(), "knowledge store accepted filter");
        Ok(())
    }
}
