//! DataForSEO client: organic SERP, Google Maps local pack, and backlink
//! summary endpoints.
//!
//! Every endpoint takes a one-element task array and answers with the
//! `{status_code, tasks: [{status_code, result: [...]}]}` envelope. Status
//! `20000` means success at both levels; anything else surfaces as
//! [`ClientError::Api`].

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sitegrid_core::{
    AppConfig, BacklinkSummary, GeoTag, LocalPackResult, OrganicResult, ProviderError,
    RankingProvider,
};

use crate::error::ClientError;
use crate::http::{check_status, trim_base_url, HttpSettings};
use crate::rate_limit::retry_with_backoff;

pub const PROVIDER_NAME: &str = "dataforseo";

const STATUS_OK: i64 = 20_000;
/// Organic results requested per query.
const ORGANIC_DEPTH: u32 = 20;

#[derive(Debug, Deserialize)]
struct Envelope {
    status_code: i64,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct Task {
    status_code: i64,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    result: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ItemsResult<T> {
    /// `null` when the SERP has no items.
    #[serde(default = "Option::default")]
    items: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct OrganicItem {
    #[serde(rename = "type")]
    item_type: String,
    rank_absolute: Option<u32>,
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    domain: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MapsRating {
    value: Option<f64>,
    votes_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct MapsItem {
    rank_absolute: Option<u32>,
    title: Option<String>,
    url: Option<String>,
    domain: Option<String>,
    rating: Option<MapsRating>,
    address: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BacklinkResult {
    #[serde(default)]
    backlinks: u64,
    #[serde(default)]
    referring_domains: u64,
    #[serde(default)]
    rank: u32,
}

/// [`RankingProvider`] backed by the DataForSEO v3 live endpoints.
pub struct DataForSeoClient {
    client: Client,
    base_url: String,
    login: String,
    password: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl DataForSeoClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        login: &str,
        password: &str,
        base_url: &str,
        settings: &HttpSettings,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            client: settings.build_client()?,
            base_url: trim_base_url(base_url),
            login: login.to_owned(),
            password: password.to_owned(),
            max_retries: settings.max_retries,
            backoff_base_secs: settings.backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredentials`] when either DataForSEO
    /// credential is unset.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        let login = config
            .dataforseo_login
            .as_deref()
            .ok_or(ClientError::MissingCredentials("DATAFORSEO_LOGIN"))?;
        let password = config
            .dataforseo_password
            .as_deref()
            .ok_or(ClientError::MissingCredentials("DATAFORSEO_PASSWORD"))?;
        Self::new(
            login,
            password,
            &config.dataforseo_base_url,
            &HttpSettings::from_app_config(config),
        )
    }

    /// POST one task and return the first element of its `result` array.
    async fn post_task(
        &self,
        path: &str,
        task: serde_json::Value,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        let url = format!("{}{path}", self.base_url);
        let body = serde_json::Value::Array(vec![task]);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = self
                    .client
                    .post(&url)
                    .basic_auth(&self.login, Some(&self.password))
                    .json(&body)
                    .send()
                    .await?;
                let response = check_status(response, &url)?;
                let text = response.text().await?;
                let envelope: Envelope =
                    serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                        context: path.to_owned(),
                        source: e,
                    })?;
                first_result(envelope)
            }
        })
        .await
    }

    async fn task_items<T: DeserializeOwned>(
        &self,
        path: &str,
        task: serde_json::Value,
    ) -> Result<Vec<T>, ClientError> {
        let Some(result) = self.post_task(path, task).await? else {
            return Ok(Vec::new());
        };
        let parsed: ItemsResult<T> =
            serde_json::from_value(result).map_err(|e| ClientError::Deserialize {
                context: format!("{path} items"),
                source: e,
            })?;
        Ok(parsed.items.unwrap_or_default())
    }
}

fn first_result(envelope: Envelope) -> Result<Option<serde_json::Value>, ClientError> {
    if envelope.status_code != STATUS_OK {
        return Err(api_error(envelope.status_code, envelope.status_message));
    }
    let Some(task) = envelope.tasks.into_iter().next() else {
        return Ok(None);
    };
    if task.status_code != STATUS_OK {
        return Err(api_error(task.status_code, task.status_message));
    }
    Ok(task.result.and_then(|r| r.into_iter().next()))
}

fn api_error(status_code: i64, message: String) -> ClientError {
    // 40200 payment required, 40210 insufficient funds
    if status_code == 40_200 || status_code == 40_210 {
        return ClientError::QuotaExceeded(message);
    }
    ClientError::Api {
        status_code: Some(status_code),
        message,
    }
}

fn organic_from_items(items: Vec<OrganicItem>) -> Vec<OrganicResult> {
    items
        .into_iter()
        .filter(|item| item.item_type == "organic")
        .enumerate()
        .filter_map(|(idx, item)| {
            let url = item.url?;
            let domain = sitegrid_core::extract_domain(item.domain.as_deref().unwrap_or(&url));
            #[allow(clippy::cast_possible_truncation)]
            let fallback_position = idx as u32 + 1;
            Some(OrganicResult {
                position: item.rank_absolute.unwrap_or(fallback_position),
                title: item.title.unwrap_or_default(),
                description: item.description,
                domain,
                url,
            })
        })
        .collect()
}

fn local_from_items(items: Vec<MapsItem>) -> Vec<LocalPackResult> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let domain = item
                .domain
                .as_deref()
                .or(item.url.as_deref())
                .map(sitegrid_core::extract_domain)
                .filter(|d| !d.is_empty());
            #[allow(clippy::cast_possible_truncation)]
            let fallback_position = idx as u32 + 1;
            LocalPackResult {
                position: item.rank_absolute.unwrap_or(fallback_position),
                title: item.title.unwrap_or_default(),
                url: item.url,
                domain,
                rating: item.rating.as_ref().and_then(|r| r.value),
                reviews_count: item.rating.as_ref().and_then(|r| r.votes_count),
                address: item.address,
                phone: item.phone,
            }
        })
        .collect()
}

#[async_trait]
impl RankingProvider for DataForSeoClient {
    async fn organic_search(
        &self,
        keyword: &str,
        geo: &GeoTag,
    ) -> Result<Vec<OrganicResult>, ProviderError> {
        let task = serde_json::json!({
            "keyword": keyword,
            "location_name": geo.full_name(),
            "language_code": "en",
            "device": "desktop",
            "depth": ORGANIC_DEPTH,
        });
        let items: Vec<OrganicItem> = self
            .task_items("/serp/google/organic/live/advanced", task)
            .await
            .map_err(|e| e.into_provider_error(PROVIDER_NAME))?;
        Ok(organic_from_items(items))
    }

    async fn local_pack(
        &self,
        keyword: &str,
        geo: &GeoTag,
    ) -> Result<Vec<LocalPackResult>, ProviderError> {
        let task = serde_json::json!({
            "keyword": keyword,
            "location_name": geo.full_name(),
            "language_code": "en",
        });
        let items: Vec<MapsItem> = self
            .task_items("/serp/google/maps/live/advanced", task)
            .await
            .map_err(|e| e.into_provider_error(PROVIDER_NAME))?;
        Ok(local_from_items(items))
    }

    async fn backlink_summary(&self, domain: &str) -> Result<BacklinkSummary, ProviderError> {
        let task = serde_json::json!({
            "target": domain,
            "internal_list_limit": 10,
            "backlinks_status_type": "live",
            "rank_scale": "one_hundred",
        });
        let result = self
            .post_task("/backlinks/summary/live", task)
            .await
            .map_err(|e| e.into_provider_error(PROVIDER_NAME))?;
        let Some(result) = result else {
            return Err(ProviderError::Malformed {
                provider: PROVIDER_NAME,
                reason: format!("empty backlink summary for {domain}"),
            });
        };
        let parsed: BacklinkResult =
            serde_json::from_value(result).map_err(|e| ProviderError::Malformed {
                provider: PROVIDER_NAME,
                reason: e.to_string(),
            })?;
        Ok(BacklinkSummary {
            backlinks: parsed.backlinks,
            referring_domains: parsed.referring_domains,
            rank: parsed.rank.min(100),
        })
    }
}
