//! End-to-end runs against in-process providers, writing into a scratch
//! directory under the system temp dir.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sitegrid_core::{
    parse_client, BacklinkSummary, Client, ContentProvider, FetchedPage, GeoTag, LocalPackResult,
    OrganicResult, ProviderError, RankingProvider, Source, SourceType,
};
use sitegrid_pipeline::artifacts::{
    FINDINGS_FILE, INSIGHTS_FILE, MATRIX_FILE, OUTPUT_SPEC_FILE, PROFILES_FILE, SOURCES_FILE,
    SUMMARY_FILE,
};
use sitegrid_pipeline::{load_sources, CollectorConfig, Orchestrator, RunStatus};

const CLIENT: &str = r#"
id: dent-sorcery
name: Dent Sorcery
domain: https://www.dentsorcery.com/
vertical: pdr
contact:
  phone: (610) 555-0199
services:
  - id: pdr
    name: Paintless Dent Repair
    is_money_service: true
    keywords: [paintless dent repair, pdr]
  - id: hail
    name: Hail Damage Repair
    is_money_service: true
  - id: door-ding
    name: Door Ding Removal
    parent_service_id: pdr
locations:
  - id: bethlehem
    name: Bethlehem, PA
    geo_bucket: "0-10"
    is_primary: true
  - id: easton
    name: Easton, PA
    geo_bucket: "0-10"
  - id: allentown
    name: Allentown, PA
    geo_bucket: "10-30"
gbp_profile:
  rating: 4.6
  review_count: 20
"#;

const HOMEPAGE: &str = "\
# Big Shop Dent Repair
Licensed and insured technicians. Lifetime warranty on every repair.
See our before and after gallery. Call (610) 555-0101 for a free estimate.
";

fn client() -> Client {
    parse_client(CLIENT).expect("fixture client parses")
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sitegrid-run-{name}-{}", uuid::Uuid::new_v4()))
}

struct FakeRanking {
    calls: AtomicUsize,
}

#[async_trait]
impl RankingProvider for FakeRanking {
    async fn organic_search(
        &self,
        _keyword: &str,
        _geo: &GeoTag,
    ) -> Result<Vec<OrganicResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(["bigshop.com", "rivaldent.com", "dentsorcery.com"]
            .iter()
            .zip(1u32..)
            .map(|(domain, position)| OrganicResult {
                position,
                url: format!("https://www.{domain}/"),
                title: (*domain).to_string(),
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
        Ok(vec![LocalPackResult {
            position: 1,
            title: "Big Shop Dent Repair".to_string(),
            url: Some("https://bigshop.com".to_string()),
            domain: Some("bigshop.com".to_string()),
            rating: Some(4.9),
            reviews_count: Some(150),
            address: None,
            phone: None,
        }])
    }

    async fn backlink_summary(&self, domain: &str) -> Result<BacklinkSummary, ProviderError> {
        if domain == "rivaldent.com" {
            return Err(ProviderError::QuotaExceeded { provider: "fake" });
        }
        Ok(BacklinkSummary {
            backlinks: 900,
            referring_domains: 120,
            rank: 40,
        })
    }
}

struct FakeContent;

#[async_trait]
impl ContentProvider for FakeContent {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ProviderError> {
        if url.contains("rivaldent.com") {
            return Err(ProviderError::UnexpectedStatus {
                provider: "fake",
                status: 403,
                url: url.to_string(),
            });
        }
        let mut metadata = serde_json::Map::new();
        metadata.insert("title".into(), "Big Shop | Dent Repair".into());
        Ok(FetchedPage {
            markdown: HOMEPAGE.to_string(),
            html: String::new(),
            metadata,
            success: true,
        })
    }

    async fn discover(&self, root_url: &str, _limit: usize) -> Result<Vec<String>, ProviderError> {
        Ok(vec![format!("{root_url}/services/hail-repair")])
    }
}

fn orchestrator(root: &Path) -> (Orchestrator, Arc<FakeRanking>) {
    let ranking = Arc::new(FakeRanking {
        calls: AtomicUsize::new(0),
    });
    let orchestrator = Orchestrator::new(root)
        .with_providers(ranking.clone(), Arc::new(FakeContent))
        .with_collector_config(CollectorConfig {
            max_concurrent: 2,
            ..CollectorConfig::default()
        });
    (orchestrator, ranking)
}

// ---------------------------------------------------------------------------
// full runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_run_writes_every_artifact() {
    let root = scratch_dir("full");
    let (orchestrator, ranking) = orchestrator(&root);

    let result = orchestrator.run(&client()).await;

    assert_eq!(result.status, RunStatus::Completed, "{:?}", result.errors);
    assert!(result.errors.is_empty());
    assert!(ranking.calls.load(Ordering::SeqCst) > 0);

    let dir = root.join("dent-sorcery");
    for file in [
        MATRIX_FILE,
        SOURCES_FILE,
        PROFILES_FILE,
        FINDINGS_FILE,
        INSIGHTS_FILE,
        OUTPUT_SPEC_FILE,
        SUMMARY_FILE,
    ] {
        assert!(dir.join(file).exists(), "missing {file}");
    }

    let stats = &result.stats;
    assert_eq!(stats.total_cells, 6);
    assert_eq!(stats.total_competitors, 2);
    assert!(stats.failed_sources >= 2);
    assert_eq!(stats.normalization_gaps, 1);
    assert_eq!(stats.total_pages, 13);
    assert!(stats.total_findings > 0);

    let insights = result.insights.as_ref().unwrap();
    assert!(insights.contains_rule("review_gap"));
    assert!(insights.contains_rule("backlink_gap"));
    assert_eq!(stats.total_insights, insights.insights.len());

    let profiles = &result.profiles;
    assert!(!profiles.iter().any(|p| p.domain == "dentsorcery.com"));

    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join(SUMMARY_FILE)).unwrap()).unwrap();
    assert_eq!(summary["status"], "completed");
    assert_eq!(summary["stats"]["total_pages"], 13);

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn saved_sources_replay_without_providers() {
    let root = scratch_dir("replay");
    let (orchestrator, _) = orchestrator(&root);
    let first = orchestrator.run(&client()).await;
    assert!(first.is_success());

    let saved = load_sources(&root.join("dent-sorcery").join(SOURCES_FILE))
        .await
        .unwrap();
    let replay_root = scratch_dir("replay-out");
    let replay = Orchestrator::new(replay_root.clone())
        .run_with_sources(&client(), saved)
        .await;

    assert!(replay.is_success(), "{:?}", replay.errors);
    assert_eq!(replay.stats.total_competitors, first.stats.total_competitors);
    assert_eq!(replay.stats.total_sources, first.stats.total_sources);
    let routes = |spec: &sitegrid_core::OutputSpec| -> Vec<String> {
        spec.page_map.iter().map(|p| p.route.clone()).collect()
    };
    assert_eq!(
        routes(replay.output_spec.as_ref().unwrap()),
        routes(first.output_spec.as_ref().unwrap())
    );

    std::fs::remove_dir_all(&root).ok();
    std::fs::remove_dir_all(&replay_root).ok();
}

#[tokio::test]
async fn empty_sources_still_export_a_site() {
    let root = scratch_dir("empty");
    let result = Orchestrator::new(root.clone())
        .run_with_sources(&client(), Vec::new())
        .await;

    assert!(result.is_success());
    assert_eq!(result.stats.total_competitors, 0);
    assert_eq!(result.stats.total_insights, 0);
    assert_eq!(result.stats.total_pages, 13);

    std::fs::remove_dir_all(&root).ok();
}

// ---------------------------------------------------------------------------
// failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_providers_fail_collection_but_keep_the_matrix() {
    let root = scratch_dir("noproviders");
    let result = Orchestrator::new(root.clone()).run(&client()).await;

    assert_eq!(result.status, RunStatus::Failed);
    assert!(result.errors[0].contains("no providers"));
    assert!(result.matrix.is_some());
    assert!(result.output_spec.is_none());

    let dir = root.join("dent-sorcery");
    assert!(dir.join(MATRIX_FILE).exists());
    assert!(!dir.join(SOURCES_FILE).exists());
    assert!(dir.join(SUMMARY_FILE).exists());

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn invalid_client_fails_before_planning() {
    let root = scratch_dir("invalid");
    let mut bad = client();
    bad.locations.clear();

    let result = Orchestrator::new(root.clone())
        .run_with_sources(&bad, vec![Source::new(SourceType::SerpOrganic, "x")])
        .await;

    assert_eq!(result.status, RunStatus::Failed);
    assert!(result.matrix.is_none());
    assert_eq!(result.errors.len(), 1);
    assert!(!root.join("dent-sorcery").join(MATRIX_FILE).exists());
    assert!(root.join("dent-sorcery").join(SUMMARY_FILE).exists());

    std::fs::remove_dir_all(&root).ok();
}
