//! Firecrawl v2 client: single-page scrape and site URL discovery (`/map`).

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sitegrid_core::{AppConfig, ContentProvider, FetchedPage, ProviderError};

use crate::error::ClientError;
use crate::http::{check_status, trim_base_url, HttpSettings};
use crate::rate_limit::retry_with_backoff;

pub const PROVIDER_NAME: &str = "firecrawl";

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    links: Vec<MapLink>,
}

/// v2 returns link objects; older deployments return bare strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MapLink {
    Url(String),
    Entry { url: String },
}

impl MapLink {
    fn into_url(self) -> String {
        match self {
            MapLink::Url(url) | MapLink::Entry { url } => url,
        }
    }
}

/// [`ContentProvider`] backed by the Firecrawl v2 API.
pub struct FirecrawlClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl FirecrawlClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, base_url: &str, settings: &HttpSettings) -> Result<Self, ClientError> {
        Ok(Self {
            client: settings.build_client()?,
            base_url: trim_base_url(base_url),
            api_key: api_key.to_owned(),
            max_retries: settings.max_retries,
            backoff_base_secs: settings.backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredentials`] when `FIRECRAWL_API_KEY`
    /// is unset.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        let api_key = config
            .firecrawl_api_key
            .as_deref()
            .ok_or(ClientError::MissingCredentials("FIRECRAWL_API_KEY"))?;
        Self::new(
            api_key,
            &config.firecrawl_base_url,
            &HttpSettings::from_app_config(config),
        )
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
                    .await?;
                let response = check_status(response, &url)?;
                let text = response.text().await?;
                serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                    context: path.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }

    /// Scrape one page as markdown and HTML.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] when Firecrawl reports `success: false`.
    pub async fn scrape(&self, url: &str) -> Result<FetchedPage, ClientError> {
        let body = serde_json::json!({
            "url": url,
            "formats": ["markdown", "html"],
            "onlyMainContent": true,
        });
        let response: ScrapeResponse = self.post_json("/scrape", body).await?;
        if !response.success {
            return Err(ClientError::Api {
                status_code: None,
                message: response
                    .error
                    .unwrap_or_else(|| format!("scrape of {url} was unsuccessful")),
            });
        }
        let data = response.data.unwrap_or_default();
        Ok(FetchedPage {
            markdown: data.markdown.unwrap_or_default(),
            html: data.html.unwrap_or_default(),
            metadata: data.metadata,
            success: true,
        })
    }

    /// List up to `limit` URLs on the site rooted at `root_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] when Firecrawl reports `success: false`.
    pub async fn map(&self, root_url: &str, limit: usize) -> Result<Vec<String>, ClientError> {
        let body = serde_json::json!({
            "url": root_url,
            "limit": limit,
        });
        let response: MapResponse = self.post_json("/map", body).await?;
        if !response.success {
            return Err(ClientError::Api {
                status_code: None,
                message: response
                    .error
                    .unwrap_or_else(|| format!("map of {root_url} was unsuccessful")),
            });
        }
        Ok(response
            .links
            .into_iter()
            .map(MapLink::into_url)
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl ContentProvider for FirecrawlClient {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ProviderError> {
        self.scrape(url)
            .await
            .map_err(|e| e.into_provider_error(PROVIDER_NAME))
    }

    async fn discover(&self, root_url: &str, limit: usize) -> Result<Vec<String>, ProviderError> {
        self.map(root_url, limit)
            .await
            .map_err(|e| e.into_provider_error(PROVIDER_NAME))
    }
}
