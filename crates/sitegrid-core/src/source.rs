use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    SerpOrganic,
    SerpLocalPack,
    CompetitorWebsite,
    CompetitorPage,
    BacklinkSummary,
}

impl SourceType {
    #[must_use]
    pub fn is_serp(self) -> bool {
        matches!(self, SourceType::SerpOrganic | SourceType::SerpLocalPack)
    }

    #[must_use]
    pub fn is_content(self) -> bool {
        matches!(
            self,
            SourceType::CompetitorWebsite | SourceType::CompetitorPage
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    Pending,
    Success,
    Failed,
    /// Recorded without content, e.g. a discovered URL beyond the fetch limit.
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFreshness {
    Current,
    Recent,
    Stale,
}

/// One fetched or queried artifact. Created only by the collect stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub source_type: SourceType,
    pub url: String,
    pub domain: Option<String>,
    pub scraped_at: Option<DateTime<Utc>>,
    pub scrape_status: ScrapeStatus,
    pub data_freshness: DataFreshness,
    pub freshness_days: Option<i64>,
    #[serde(default)]
    pub geo_tags: Vec<GeoTag>,
    #[serde(default)]
    pub keywords_targeted: Vec<String>,
    pub serp_position: Option<u32>,
    pub raw_data: Option<serde_json::Value>,
}

impl Source {
    /// A successful source scraped now.
    #[must_use]
    pub fn new(source_type: SourceType, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source_type,
            url: url.into(),
            domain: None,
            scraped_at: Some(Utc::now()),
            scrape_status: ScrapeStatus::Success,
            data_freshness: DataFreshness::Current,
            freshness_days: Some(0),
            geo_tags: Vec::new(),
            keywords_targeted: Vec::new(),
            serp_position: None,
            raw_data: None,
        }
    }

    /// A terminal provider failure, with the message kept in `raw_data.error`.
    #[must_use]
    pub fn failed(source_type: SourceType, url: impl Into<String>, error: &str) -> Self {
        let mut source = Self::new(source_type, url);
        source.scrape_status = ScrapeStatus::Failed;
        source.raw_data = Some(serde_json::json!({ "error": error }));
        source
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_geo(mut self, geo: GeoTag) -> Self {
        self.geo_tags.push(geo);
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords_targeted.push(keyword.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: u32) -> Self {
        self.serp_position = Some(position);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ScrapeStatus) -> Self {
        self.scrape_status = status;
        self
    }

    #[must_use]
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw_data = Some(raw);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.scrape_status == ScrapeStatus::Success
    }

    /// Read a string field from `raw_data`.
    #[must_use]
    pub fn raw_str(&self, key: &str) -> Option<&str> {
        self.raw_data.as_ref()?.get(key)?.as_str()
    }

    /// Read a numeric field from `raw_data`.
    #[must_use]
    pub fn raw_f64(&self, key: &str) -> Option<f64> {
        self.raw_data.as_ref()?.get(key)?.as_f64()
    }

    /// Recompute `data_freshness` from `scraped_at` relative to `now`.
    ///
    /// Sources with no timestamp are stale.
    pub fn update_freshness(&mut self, now: DateTime<Utc>) {
        let Some(scraped_at) = self.scraped_at else {
            self.data_freshness = DataFreshness::Stale;
            self.freshness_days = None;
            return;
        };

        let days_old = (now - scraped_at).num_days();
        self.freshness_days = Some(days_old);
        self.data_freshness = if days_old < 7 {
            DataFreshness::Current
        } else if days_old < 30 {
            DataFreshness::Recent
        } else {
            DataFreshness::Stale
        };
    }
}

/// Host of `url` without scheme, port, or leading `www.`, lowercased.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    let trimmed = url.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme);
    let host = host.split(':').next().unwrap_or(host);
    let host = host.to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}
