//! Fetching the OpenAPI document from a running API server.

use anyhow::Result;
use reqwest::header::CONTENT_TYPE;

use crate::config::SourceConfig;
use crate::constants::DOCS_PATH;
use crate::core::GenError;
use crate::schema::SchemaDocument;

/// Where the document lives: `{base_url}/apis/docs`.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    base_url: String,
    client: reqwest::Client,
}

impl DocumentSource {
    /// `base_url` without trailing slash, e.g. `https://localhost:8443`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.base_url())
    }

    #[must_use]
    pub fn docs_url(&self) -> String {
        format!("{}{}", self.base_url, DOCS_PATH)
    }

    /// GET the document and parse it.
    ///
    /// Transport failures and non-2xx statuses are [`GenError::FetchFailed`],
    /// an empty body is [`GenError::EmptyDocument`].
    pub async fn fetch(&self) -> Result<SchemaDocument> {
        let url = self.docs_url();
        tracing::debug!("Fetching schema document from {}", url);

        let fetch_failed = |reason: String| GenError::FetchFailed {
            url: url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failed(format!("HTTP {status}")).into());
        }

        let body = response.bytes().await.map_err(|e| fetch_failed(e.to_string()))?;
        if body.is_empty() {
            return Err(GenError::EmptyDocument {
                url,
            }
            .into());
        }

        let document = SchemaDocument::from_slice(&body)?;
        tracing::info!("Fetched {} schema entries from {}", document.schemas().len(), url);
        Ok(document)
    }
}
