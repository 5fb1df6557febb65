//! Contracts for the external ranking and content providers.
//!
//! Implementations own their retry and backoff. A returned `ProviderError`
//! is terminal for that call; the collector records it and moves on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::geo::GeoTag;
use crate::ProviderError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    pub position: u32,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalPackResult {
    pub position: u32,
    pub title: String,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u32>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacklinkSummary {
    pub backlinks: u64,
    pub referring_domains: u64,
    /// Domain rank on a 0-100 scale.
    pub rank: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub markdown: String,
    pub html: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub success: bool,
}

impl FetchedPage {
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(serde_json::Value::as_str)
    }
}

#[async_trait]
pub trait RankingProvider: Send + Sync {
    async fn organic_search(
        &self,
        keyword: &str,
        geo: &GeoTag,
    ) -> Result<Vec<OrganicResult>, ProviderError>;

    async fn local_pack(
        &self,
        keyword: &str,
        geo: &GeoTag,
    ) -> Result<Vec<LocalPackResult>, ProviderError>;

    async fn backlink_summary(&self, domain: &str) -> Result<BacklinkSummary, ProviderError>;
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ProviderError>;

    async fn discover(&self, root_url: &str, limit: usize) -> Result<Vec<String>, ProviderError>;
}
