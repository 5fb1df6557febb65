//! Stage 2: fan matrix keywords out to the ranking provider, then fetch each
//! discovered competitor once through the content provider.
//!
//! Every provider failure becomes a FAILED [`Source`]; nothing here aborts the
//! batch. Provider calls within a phase run under `max_concurrent` using an
//! ordered buffer, so source order is reproducible for identical provider
//! answers.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use sitegrid_core::{
    extract_domain, AppConfig, ContentProvider, FetchedPage, GeoBucket, GeoTag, IntentGeoMatrix,
    RankingProvider, ScrapeStatus, Source, SourceType,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    pub max_concurrent: usize,
    pub max_query_pairs: usize,
    pub max_competitors: usize,
    /// URLs requested from `discover` per competitor.
    pub pages_per_competitor: usize,
    /// Discovered pages whose content is actually fetched.
    pub page_fetch_limit: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            max_query_pairs: 50,
            max_competitors: 10,
            pages_per_competitor: 20,
            page_fetch_limit: 5,
        }
    }
}

impl CollectorConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_concurrent: config.collect_max_concurrent.max(1),
            max_query_pairs: config.collect_max_query_pairs,
            max_competitors: config.collect_max_competitors,
            pages_per_competitor: config.collect_pages_per_competitor,
            page_fetch_limit: config.collect_page_fetch_limit,
        }
    }
}

const KEYWORDS_PER_CELL: usize = 5;
const LOCATIONS_PER_CELL: usize = 3;
const LOCAL_KEYWORDS_PER_CELL: usize = 3;
const ORGANIC_RESULTS_KEPT: usize = 20;
const LOCAL_RESULTS_KEPT: usize = 10;
const UNSUCCESSFUL_FETCH: &str = "provider reported unsuccessful fetch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPair {
    pub keyword: String,
    pub geo: GeoTag,
}

impl QueryPair {
    fn descriptor(&self, kind: &str) -> String {
        format!("{kind}:{}@{}", self.keyword, self.geo.city)
    }
}

/// Deduplicated `keyword × location` pairs across all cells, capped at `cap`.
#[must_use]
pub fn query_pairs(matrix: &IntentGeoMatrix, cap: usize) -> Vec<QueryPair> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for cell in &matrix.cells {
        let Some(column) = matrix.column(cell.geo_bucket) else {
            continue;
        };
        for keyword in cell.keyword_cluster.iter().take(KEYWORDS_PER_CELL) {
            for location in column.locations.iter().take(LOCATIONS_PER_CELL) {
                if seen.insert(format!("{keyword}|{location}")) {
                    pairs.push(QueryPair {
                        keyword: keyword.clone(),
                        geo: GeoTag::from_location_name(location),
                    });
                }
            }
        }
    }

    pairs.truncate(cap);
    pairs
}

/// Local-pack queries: top keywords of every 0-10 cell at that column's
/// first location.
#[must_use]
pub fn local_pack_queries(matrix: &IntentGeoMatrix) -> Vec<QueryPair> {
    let Some(location) = matrix
        .column(GeoBucket::Miles0To10)
        .and_then(|c| c.locations.first())
    else {
        return Vec::new();
    };
    let geo = GeoTag::from_location_name(location);

    let mut seen = HashSet::new();
    matrix
        .cells
        .iter()
        .filter(|c| c.geo_bucket == GeoBucket::Miles0To10)
        .flat_map(|c| c.keyword_cluster.iter().take(LOCAL_KEYWORDS_PER_CELL))
        .filter(|k| seen.insert((*k).clone()))
        .map(|keyword| QueryPair {
            keyword: keyword.clone(),
            geo: geo.clone(),
        })
        .collect()
}

/// Competitor domains in first-seen order, tracked across every ranking
/// query so each is content-fetched once.
#[derive(Debug, Default)]
struct DomainTracker {
    seen: HashSet<String>,
    ordered: Vec<String>,
    excluded: Option<String>,
}

impl DomainTracker {
    fn observe(&mut self, domain: &str) {
        if domain.is_empty() || self.excluded.as_deref() == Some(domain) {
            return;
        }
        if self.seen.insert(domain.to_string()) {
            self.ordered.push(domain.to_string());
        }
    }
}

pub struct DataCollector {
    ranking: Arc<dyn RankingProvider>,
    content: Arc<dyn ContentProvider>,
    config: CollectorConfig,
    excluded_domain: Option<String>,
}

impl DataCollector {
    #[must_use]
    pub fn new(
        ranking: Arc<dyn RankingProvider>,
        content: Arc<dyn ContentProvider>,
        config: CollectorConfig,
    ) -> Self {
        Self {
            ranking,
            content,
            config,
            excluded_domain: None,
        }
    }

    /// Never profile `domain` (normally the client's own site).
    #[must_use]
    pub fn excluding(mut self, domain: impl Into<String>) -> Self {
        self.excluded_domain = Some(extract_domain(&domain.into()));
        self
    }

    /// Run organic, local-pack and competitor collection for `matrix`.
    #[tracing::instrument(skip_all, fields(client = %matrix.client_id))]
    pub async fn collect(&self, matrix: &IntentGeoMatrix) -> Vec<Source> {
        let mut tracker = DomainTracker {
            excluded: self.excluded_domain.clone(),
            ..DomainTracker::default()
        };

        let mut sources = self.collect_organic(matrix, &mut tracker).await;
        sources.extend(self.collect_local_pack(matrix, &mut tracker).await);

        let competitors: Vec<String> = tracker
            .ordered
            .into_iter()
            .take(self.config.max_competitors)
            .collect();
        tracing::info!(competitors = competitors.len(), "collecting competitor sites");

        let per_domain: Vec<Vec<Source>> = stream::iter(&competitors)
            .map(|domain| self.collect_competitor(domain))
            .buffered(self.config.max_concurrent.max(1))
            .collect()
            .await;
        sources.extend(per_domain.into_iter().flatten());

        let now = Utc::now();
        for source in &mut sources {
            source.update_freshness(now);
        }

        let failed = sources
            .iter()
            .filter(|s| s.scrape_status == ScrapeStatus::Failed)
            .count();
        tracing::info!(total = sources.len(), failed, "collection complete");
        sources
    }

    async fn collect_organic(
        &self,
        matrix: &IntentGeoMatrix,
        tracker: &mut DomainTracker,
    ) -> Vec<Source> {
        let pairs = query_pairs(matrix, self.config.max_query_pairs);
        tracing::info!(queries = pairs.len(), "collecting organic results");

        let responses: Vec<_> = stream::iter(&pairs)
            .map(|pair| async move {
                (pair, self.ranking.organic_search(&pair.keyword, &pair.geo).await)
            })
            .buffered(self.config.max_concurrent.max(1))
            .collect()
            .await;

        let mut sources = Vec::new();
        for (pair, response) in responses {
            match response {
                Ok(results) => {
                    for result in results.into_iter().take(ORGANIC_RESULTS_KEPT) {
                        let domain = extract_domain(&result.domain);
                        tracker.observe(&domain);
                        sources.push(
                            Source::new(SourceType::SerpOrganic, result.url)
                                .with_domain(domain)
                                .with_geo(pair.geo.clone())
                                .with_keyword(pair.keyword.clone())
                                .with_position(result.position)
                                .with_raw(serde_json::json!({
                                    "title": result.title,
                                    "description": result.description,
                                })),
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(keyword = %pair.keyword, city = %pair.geo.city, error = %e, "organic search failed");
                    sources.push(
                        Source::failed(
                            SourceType::SerpOrganic,
                            pair.descriptor("organic"),
                            &e.to_string(),
                        )
                        .with_geo(pair.geo.clone())
                        .with_keyword(pair.keyword.clone()),
                    );
                }
            }
        }
        sources
    }

    async fn collect_local_pack(
        &self,
        matrix: &IntentGeoMatrix,
        tracker: &mut DomainTracker,
    ) -> Vec<Source> {
        let queries = local_pack_queries(matrix);
        tracing::info!(queries = queries.len(), "collecting local pack results");

        let responses: Vec<_> = stream::iter(&queries)
            .map(|pair| async move {
                (pair, self.ranking.local_pack(&pair.keyword, &pair.geo).await)
            })
            .buffered(self.config.max_concurrent.max(1))
            .collect()
            .await;

        let mut sources = Vec::new();
        for (pair, response) in responses {
            match response {
                Ok(results) => {
                    for result in results.into_iter().take(LOCAL_RESULTS_KEPT) {
                        let url = result
                            .url
                            .clone()
                            .unwrap_or_else(|| format!("local:{}", result.title));
                        let mut source = Source::new(SourceType::SerpLocalPack, url)
                            .with_geo(pair.geo.clone())
                            .with_keyword(pair.keyword.clone())
                            .with_position(result.position)
                            .with_raw(serde_json::json!({
                                "title": result.title,
                                "rating": result.rating,
                                "reviews_count": result.reviews_count,
                                "address": result.address,
                                "phone": result.phone,
                            }));
                        if let Some(domain) = result
                            .domain
                            .as_deref()
                            .map(extract_domain)
                            .filter(|d| !d.is_empty())
                        {
                            tracker.observe(&domain);
                            source = source.with_domain(domain);
                        }
                        sources.push(source);
                    }
                }
                Err(e) => {
                    tracing::warn!(keyword = %pair.keyword, error = %e, "local pack query failed");
                    sources.push(
                        Source::failed(
                            SourceType::SerpLocalPack,
                            pair.descriptor("local"),
                            &e.to_string(),
                        )
                        .with_geo(pair.geo.clone())
                        .with_keyword(pair.keyword.clone()),
                    );
                }
            }
        }
        sources
    }

    /// Homepage, discovered pages and backlink summary for one domain.
    async fn collect_competitor(&self, domain: &str) -> Vec<Source> {
        let homepage = format!("https://{domain}");
        let mut sources = Vec::new();

        match self.content.fetch(&homepage).await {
            Ok(page) if !page.success => {
                tracing::warn!(domain = %domain, "homepage fetch reported unsuccessful");
                sources.push(
                    Source::failed(
                        SourceType::CompetitorWebsite,
                        homepage.clone(),
                        UNSUCCESSFUL_FETCH,
                    )
                    .with_domain(domain),
                );
            }
            Ok(page) => sources.push(
                Source::new(SourceType::CompetitorWebsite, homepage.clone())
                    .with_domain(domain)
                    .with_raw(page_payload(&page)),
            ),
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "homepage fetch failed");
                sources.push(
                    Source::failed(SourceType::CompetitorWebsite, homepage.clone(), &e.to_string())
                        .with_domain(domain),
                );
            }
        }

        sources.extend(self.collect_pages(domain, &homepage).await);

        let backlinks_url = format!("backlinks:{domain}");
        match self.ranking.backlink_summary(domain).await {
            Ok(summary) => sources.push(
                Source::new(SourceType::BacklinkSummary, backlinks_url)
                    .with_domain(domain)
                    .with_raw(serde_json::json!({
                        "backlinks": summary.backlinks,
                        "referring_domains": summary.referring_domains,
                        "rank": summary.rank,
                    })),
            ),
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "backlink summary failed");
                sources.push(
                    Source::failed(SourceType::BacklinkSummary, backlinks_url, &e.to_string())
                        .with_domain(domain),
                );
            }
        }

        tracing::debug!(domain = %domain, sources = sources.len(), "competitor collected");
        sources
    }

    async fn collect_pages(&self, domain: &str, homepage: &str) -> Vec<Source> {
        let urls = match self
            .content
            .discover(homepage, self.config.pages_per_competitor)
            .await
        {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "page discovery failed");
                return vec![
                    Source::failed(SourceType::CompetitorPage, homepage, &e.to_string())
                        .with_domain(domain),
                ];
            }
        };

        let root = homepage.trim_end_matches('/');
        let pages: Vec<String> = urls
            .into_iter()
            .filter(|u| u.trim_end_matches('/') != root)
            .take(self.config.pages_per_competitor)
            .collect();

        let mut sources = Vec::with_capacity(pages.len());
        for (idx, url) in pages.into_iter().enumerate() {
            if idx >= self.config.page_fetch_limit {
                sources.push(
                    Source::new(SourceType::CompetitorPage, url)
                        .with_domain(domain)
                        .with_status(ScrapeStatus::Partial),
                );
                continue;
            }
            match self.content.fetch(&url).await {
                Ok(page) if !page.success => {
                    tracing::warn!(domain = %domain, url = %url, "page fetch reported unsuccessful");
                    sources.push(
                        Source::failed(SourceType::CompetitorPage, url, UNSUCCESSFUL_FETCH)
                            .with_domain(domain),
                    );
                }
                Ok(page) => sources.push(
                    Source::new(SourceType::CompetitorPage, url)
                        .with_domain(domain)
                        .with_raw(page_payload(&page)),
                ),
                Err(e) => {
                    tracing::warn!(domain = %domain, url = %url, error = %e, "page fetch failed");
                    sources.push(
                        Source::failed(SourceType::CompetitorPage, url, &e.to_string())
                            .with_domain(domain),
                    );
                }
            }
        }
        sources
    }
}

fn page_payload(page: &FetchedPage) -> serde_json::Value {
    serde_json::json!({
        "markdown": page.markdown,
        "html": page.html,
        "metadata": page.metadata,
    })
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod tests;
