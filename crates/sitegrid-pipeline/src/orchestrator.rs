//! Runs the five stages in order, persisting each stage's output before the
//! next one starts.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sitegrid_core::{
    validate_client, Client, CompetitorProfile, ContentProvider, FindingsReport, InsightReport,
    IntentGeoMatrix, OutputSpec, RankingProvider, ScrapeStatus, Source,
};
use tracing::{error, info, instrument, warn};

use crate::artifacts::{
    ArtifactStore, FINDINGS_FILE, INSIGHTS_FILE, MATRIX_FILE, OUTPUT_SPEC_FILE, PROFILES_FILE,
    SOURCES_FILE, SUMMARY_FILE,
};
use crate::collector::{CollectorConfig, DataCollector};
use crate::error::{NormalizationGap, PipelineError};
use crate::exporter::SpecExporter;
use crate::normalizer::{NormalizerConfig, ProfileNormalizer};
use crate::planner::generate_matrix;
use crate::rules::RuleEngine;
use crate::scorer::InsightScorer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total_cells: usize,
    pub total_sources: usize,
    pub failed_sources: usize,
    pub total_competitors: usize,
    pub normalization_gaps: usize,
    pub total_findings: usize,
    pub total_insights: usize,
    pub quick_wins: usize,
    pub total_pages: usize,
}

/// Outcome of one run. Stage outputs produced before a failure are kept for
/// inspection; only the summary fields are serialized.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub client_id: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub errors: Vec<String>,
    pub stats: RunStats,
    pub artifacts: BTreeMap<String, PathBuf>,
    #[serde(skip)]
    pub matrix: Option<IntentGeoMatrix>,
    #[serde(skip)]
    pub sources: Vec<Source>,
    #[serde(skip)]
    pub profiles: Vec<CompetitorProfile>,
    #[serde(skip)]
    pub gaps: Vec<NormalizationGap>,
    #[serde(skip)]
    pub findings: Option<FindingsReport>,
    #[serde(skip)]
    pub insights: Option<InsightReport>,
    #[serde(skip)]
    pub output_spec: Option<OutputSpec>,
}

impl PipelineResult {
    fn start(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            errors: Vec::new(),
            stats: RunStats::default(),
            artifacts: BTreeMap::new(),
            matrix: None,
            sources: Vec::new(),
            profiles: Vec::new(),
            gaps: Vec::new(),
            findings: None,
            insights: None,
            output_spec: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

pub struct Orchestrator {
    output_dir: PathBuf,
    providers: Option<(Arc<dyn RankingProvider>, Arc<dyn ContentProvider>)>,
    collector_config: CollectorConfig,
    rules: RuleEngine,
    scorer: InsightScorer,
    exporter: SpecExporter,
}

impl Orchestrator {
    /// An orchestrator without providers can only replay saved sources.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            providers: None,
            collector_config: CollectorConfig::default(),
            rules: RuleEngine::with_default_rules(),
            scorer: InsightScorer::new(),
            exporter: SpecExporter::new(),
        }
    }

    #[must_use]
    pub fn with_providers(
        mut self,
        ranking: Arc<dyn RankingProvider>,
        content: Arc<dyn ContentProvider>,
    ) -> Self {
        self.providers = Some((ranking, content));
        self
    }

    #[must_use]
    pub fn with_collector_config(mut self, config: CollectorConfig) -> Self {
        self.collector_config = config;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    /// Full run: plan, collect, normalize, analyze, export.
    pub async fn run(&self, client: &Client) -> PipelineResult {
        self.run_inner(client, None).await
    }

    /// Skip collection and analyze previously saved sources. Freshness is
    /// recomputed against the current time.
    pub async fn run_with_sources(&self, client: &Client, sources: Vec<Source>) -> PipelineResult {
        self.run_inner(client, Some(sources)).await
    }

    #[instrument(skip_all, fields(client = %client.id))]
    async fn run_inner(&self, client: &Client, sources: Option<Vec<Source>>) -> PipelineResult {
        let store = ArtifactStore::new(&self.output_dir, &client.id);
        let mut result = PipelineResult::start(&client.id);
        info!(name = %client.name, "pipeline started");

        match self.execute(client, sources, &store, &mut result).await {
            Ok(()) => result.status = RunStatus::Completed,
            Err(e) => {
                error!(error = %e, "pipeline failed");
                result.errors.push(e.to_string());
                result.status = RunStatus::Failed;
            }
        }
        result.completed_at = Some(Utc::now());

        match store.write(SUMMARY_FILE, &result).await {
            Ok(path) => {
                result.artifacts.insert("summary".to_string(), path);
            }
            Err(e) => {
                error!(error = %e, "failed to write run summary");
                result.errors.push(e.to_string());
                result.status = RunStatus::Failed;
            }
        }

        info!(
            status = ?result.status,
            errors = result.errors.len(),
            pages = result.stats.total_pages,
            "pipeline finished"
        );
        result
    }

    async fn execute(
        &self,
        client: &Client,
        sources: Option<Vec<Source>>,
        store: &ArtifactStore,
        result: &mut PipelineResult,
    ) -> Result<(), PipelineError> {
        validate_client(client)?;

        // Stage 1
        let matrix = generate_matrix(client)?;
        result.stats.total_cells = matrix.cells.len();
        save(store, result, "matrix", MATRIX_FILE, &matrix).await?;
        result.matrix = Some(matrix.clone());
        info!(stage = "plan", cells = matrix.cells.len(), "stage complete");

        // Stage 2
        let sources = match sources {
            Some(mut sources) => {
                let now = Utc::now();
                for source in &mut sources {
                    source.update_freshness(now);
                }
                info!(stage = "collect", sources = sources.len(), "using saved sources");
                sources
            }
            None => {
                let (ranking, content) = self.providers.clone().ok_or_else(|| {
                    PipelineError::stage("collect", "no providers configured for collection")
                })?;
                DataCollector::new(ranking, content, self.collector_config.clone())
                    .excluding(client.domain.clone())
                    .collect(&matrix)
                    .await
            }
        };
        result.stats.total_sources = sources.len();
        result.stats.failed_sources = sources
            .iter()
            .filter(|s| s.scrape_status == ScrapeStatus::Failed)
            .count();
        if result.stats.failed_sources > 0 {
            warn!(
                stage = "collect",
                failed = result.stats.failed_sources,
                "some sources failed"
            );
        }
        save(store, result, "sources", SOURCES_FILE, &sources).await?;

        // Stage 3
        let normalizer =
            ProfileNormalizer::new(NormalizerConfig::for_vertical(client.vertical.category()));
        let (profiles, gaps) = normalizer.normalize_with_gaps(&sources);
        result.sources = sources;
        result.stats.total_competitors = profiles.len();
        result.stats.normalization_gaps = gaps.len();
        save(store, result, "profiles", PROFILES_FILE, &profiles).await?;
        info!(stage = "normalize", profiles = profiles.len(), "stage complete");

        // Stage 4
        let findings = self.rules.findings(client, &profiles);
        let report = FindingsReport::new(&client.id, findings);
        result.stats.total_findings = report.findings.len();
        result.profiles = profiles;
        result.gaps = gaps;
        save(store, result, "findings", FINDINGS_FILE, &report).await?;

        let insights = InsightReport::new(&client.id, self.scorer.insights(&report.findings));
        result.stats.total_insights = insights.insights.len();
        result.stats.quick_wins = insights.quick_wins().len();
        result.findings = Some(report);
        save(store, result, "insights", INSIGHTS_FILE, &insights).await?;
        info!(
            stage = "analyze",
            findings = result.stats.total_findings,
            insights = result.stats.total_insights,
            "stage complete"
        );

        // Stage 5
        let spec = self.exporter.export(client, &matrix, &insights.insights)?;
        result.stats.total_pages = spec.total_pages();
        result.insights = Some(insights);
        save(store, result, "output_spec", OUTPUT_SPEC_FILE, &spec).await?;
        result.output_spec = Some(spec);
        info!(stage = "export", pages = result.stats.total_pages, "stage complete");

        Ok(())
    }
}

async fn save<T: Serialize + ?Sized>(
    store: &ArtifactStore,
    result: &mut PipelineResult,
    key: &str,
    file: &str,
    value: &T,
) -> Result<(), PipelineError> {
    let path = store.write(file, value).await?;
    result.artifacts.insert(key.to_string(), path);
    Ok(())
}
