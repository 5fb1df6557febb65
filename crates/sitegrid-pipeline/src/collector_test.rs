use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use sitegrid_core::{
    BacklinkSummary, FetchedPage, LocalPackResult, OrganicResult, ProviderError,
};

use super::*;
use crate::planner::generate_matrix;
use crate::test_support::sample_client;

#[derive(Default)]
struct MockRanking {
    organic_domains: Vec<&'static str>,
    failing_keyword: Option<&'static str>,
    organic_calls: AtomicUsize,
    local_calls: AtomicUsize,
    backlink_calls: AtomicUsize,
}

#[async_trait]
impl RankingProvider for MockRanking {
    async fn organic_search(
        &self,
        keyword: &str,
        _geo: &GeoTag,
    ) -> Result<Vec<OrganicResult>, ProviderError> {
        self.organic_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_keyword == Some(keyword) {
            return Err(ProviderError::Request {
                provider: "mock",
                message: "connection reset".into(),
            });
        }
        Ok(self
            .organic_domains
            .iter()
            .zip(1u32..)
            .map(|(domain, position)| OrganicResult {
                position,
                url: format!("https://www.{domain}/"),
                title: format!("{domain} home"),
                description: None,
                domain: format!("www.{domain}"),
            })
            .collect())
    }

    async fn local_pack(
        &self,
        _keyword: &str,
        _geo: &GeoTag,
    ) -> Result<Vec<LocalPackResult>, ProviderError> {
        self.local_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![LocalPackResult {
            position: 1,
            title: "Local Dent Shop".into(),
            url: Some("https://localdent.com".into()),
            domain: Some("localdent.com".into()),
            rating: Some(4.8),
            reviews_count: Some(87),
            address: None,
            phone: None,
        }])
    }

    async fn backlink_summary(&self, _domain: &str) -> Result<BacklinkSummary, ProviderError> {
        self.backlink_calls.fetch_add(1, Ordering::SeqCst);
        Ok(BacklinkSummary {
            backlinks: 100,
            referring_domains: 20,
            rank: 15,
        })
    }
}

#[derive(Default)]
struct MockContent {
    pages_per_site: usize,
    /// Answer every fetch with `success: false`.
    unsuccessful: bool,
    fetched: Mutex<Vec<String>>,
    discover_calls: AtomicUsize,
}

#[async_trait]
impl ContentProvider for MockContent {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ProviderError> {
        self.fetched
            .lock()
            .expect("fetch log lock")
            .push(url.to_string());
        Ok(FetchedPage {
            markdown: format!("# {url}"),
            html: format!("<a href=\"tel:+16105550101\">{url}</a>"),
            metadata: serde_json::Map::new(),
            success: !self.unsuccessful,
        })
    }

    async fn discover(&self, root_url: &str, limit: usize) -> Result<Vec<String>, ProviderError> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        let mut urls = vec![format!("{root_url}/")];
        urls.extend((0..self.pages_per_site).map(|i| format!("{root_url}/services/page-{i}")));
        urls.truncate(limit);
        Ok(urls)
    }
}

fn collector(
    ranking: Arc<MockRanking>,
    content: Arc<MockContent>,
    config: CollectorConfig,
) -> DataCollector {
    DataCollector::new(ranking, content, config).excluding("https://www.dentsorcery.com/")
}

#[test]
fn query_pairs_are_unique_and_capped() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let pairs = query_pairs(&matrix, 50);

    let keys: HashSet<String> = pairs
        .iter()
        .map(|p| format!("{}|{}", p.keyword, p.geo.full_name()))
        .collect();
    assert_eq!(keys.len(), pairs.len());
    assert!(pairs.len() <= 50);

    assert_eq!(query_pairs(&matrix, 4).len(), 4);
}

#[test]
fn local_pack_queries_use_first_primary_location() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let queries = local_pack_queries(&matrix);

    assert!(!queries.is_empty());
    assert!(queries.iter().all(|q| q.geo.city == "Bethlehem"));
    let unique: HashSet<&str> = queries.iter().map(|q| q.keyword.as_str()).collect();
    assert_eq!(unique.len(), queries.len());
}

#[tokio::test]
async fn each_competitor_is_fetched_once() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let ranking = Arc::new(MockRanking {
        organic_domains: vec!["rivaldent.com", "hailpros.net"],
        ..MockRanking::default()
    });
    let content = Arc::new(MockContent::default());

    let sources = collector(ranking.clone(), content.clone(), CollectorConfig::default())
        .collect(&matrix)
        .await;

    assert_eq!(
        ranking.organic_calls.load(Ordering::SeqCst),
        query_pairs(&matrix, 50).len()
    );
    assert_eq!(
        ranking.local_calls.load(Ordering::SeqCst),
        local_pack_queries(&matrix).len()
    );
    // two organic domains plus the local pack domain
    assert_eq!(ranking.backlink_calls.load(Ordering::SeqCst), 3);
    assert_eq!(content.discover_calls.load(Ordering::SeqCst), 3);
    let websites: Vec<&Source> = sources
        .iter()
        .filter(|s| s.source_type == SourceType::CompetitorWebsite)
        .collect();
    assert_eq!(websites.len(), 3);
    assert_eq!(websites[0].domain.as_deref(), Some("rivaldent.com"));

    let organic = sources
        .iter()
        .find(|s| s.source_type == SourceType::SerpOrganic)
        .unwrap();
    assert_eq!(organic.domain.as_deref(), Some("rivaldent.com"));
    assert_eq!(organic.serp_position, Some(1));
}

#[tokio::test]
async fn client_domain_is_never_profiled() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let ranking = Arc::new(MockRanking {
        organic_domains: vec!["dentsorcery.com", "rivaldent.com"],
        ..MockRanking::default()
    });
    let content = Arc::new(MockContent::default());

    let sources = collector(ranking, content.clone(), CollectorConfig::default())
        .collect(&matrix)
        .await;

    assert!(!sources.iter().any(|s| {
        s.source_type == SourceType::CompetitorWebsite
            && s.domain.as_deref() == Some("dentsorcery.com")
    }));
    let fetched = content.fetched.lock().unwrap();
    assert!(!fetched.iter().any(|u| u.contains("dentsorcery")));
}

#[tokio::test]
async fn provider_failures_become_failed_sources() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let ranking = Arc::new(MockRanking {
        organic_domains: vec!["rivaldent.com"],
        failing_keyword: Some("hail damage repair"),
        ..MockRanking::default()
    });
    let content = Arc::new(MockContent::default());

    let sources = collector(ranking.clone(), content, CollectorConfig::default())
        .collect(&matrix)
        .await;

    let failed: Vec<&Source> = sources
        .iter()
        .filter(|s| s.scrape_status == ScrapeStatus::Failed)
        .collect();
    assert!(!failed.is_empty());
    assert!(failed
        .iter()
        .any(|s| s.url == "organic:hail damage repair@Bethlehem" && s.raw_str("error").is_some()));
    // the rest of the batch still ran
    assert!(sources
        .iter()
        .any(|s| s.source_type == SourceType::CompetitorWebsite && s.is_success()));
}

#[tokio::test]
async fn pages_past_fetch_limit_are_partial() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let ranking = Arc::new(MockRanking {
        organic_domains: vec!["rivaldent.com"],
        ..MockRanking::default()
    });
    let content = Arc::new(MockContent {
        pages_per_site: 6,
        ..MockContent::default()
    });
    let config = CollectorConfig {
        max_competitors: 1,
        page_fetch_limit: 2,
        ..CollectorConfig::default()
    };

    let sources = collector(ranking, content, config).collect(&matrix).await;
    let pages: Vec<&Source> = sources
        .iter()
        .filter(|s| s.source_type == SourceType::CompetitorPage)
        .collect();

    // the homepage echoed by discover is skipped
    assert_eq!(pages.len(), 6);
    assert_eq!(pages.iter().filter(|s| s.is_success()).count(), 2);
    assert_eq!(
        pages
            .iter()
            .filter(|s| s.scrape_status == ScrapeStatus::Partial)
            .count(),
        4
    );
}

#[tokio::test]
async fn competitor_count_is_capped() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let ranking = Arc::new(MockRanking {
        organic_domains: vec!["a.com", "b.com", "c.com", "d.com"],
        ..MockRanking::default()
    });
    let content = Arc::new(MockContent::default());
    let config = CollectorConfig {
        max_competitors: 2,
        ..CollectorConfig::default()
    };

    let sources = collector(ranking.clone(), content, config).collect(&matrix).await;
    let profiled: HashSet<&str> = sources
        .iter()
        .filter(|s| s.source_type == SourceType::CompetitorWebsite)
        .filter_map(|s| s.domain.as_deref())
        .collect();
    assert_eq!(profiled, HashSet::from(["a.com", "b.com"]));
    assert_eq!(ranking.backlink_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unsuccessful_fetches_are_recorded_as_failed() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let ranking = Arc::new(MockRanking {
        organic_domains: vec!["rivaldent.com"],
        ..MockRanking::default()
    });
    let content = Arc::new(MockContent {
        pages_per_site: 1,
        unsuccessful: true,
        ..MockContent::default()
    });
    let config = CollectorConfig {
        max_competitors: 1,
        ..CollectorConfig::default()
    };

    let sources = collector(ranking, content, config).collect(&matrix).await;
    let fetched: Vec<&Source> = sources
        .iter()
        .filter(|s| {
            matches!(
                s.source_type,
                SourceType::CompetitorWebsite | SourceType::CompetitorPage
            )
        })
        .collect();

    assert_eq!(fetched.len(), 2);
    for source in fetched {
        assert_eq!(source.scrape_status, ScrapeStatus::Failed, "{}", source.url);
        assert_eq!(
            source.raw_str("error"),
            Some("provider reported unsuccessful fetch")
        );
    }
}

#[tokio::test]
async fn page_payloads_keep_html() {
    let matrix = generate_matrix(&sample_client()).unwrap();
    let ranking = Arc::new(MockRanking {
        organic_domains: vec!["rivaldent.com"],
        ..MockRanking::default()
    });
    let content = Arc::new(MockContent {
        pages_per_site: 1,
        ..MockContent::default()
    });
    let config = CollectorConfig {
        max_competitors: 1,
        ..CollectorConfig::default()
    };

    let sources = collector(ranking, content, config).collect(&matrix).await;
    let page = sources
        .iter()
        .find(|s| s.source_type == SourceType::CompetitorPage && s.is_success())
        .expect("fetched sub-page");
    assert!(page.raw_str("html").is_some_and(|h| h.contains("tel:")));
    assert!(page.raw_str("markdown").is_some());
}
