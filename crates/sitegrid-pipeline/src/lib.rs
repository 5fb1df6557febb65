//! The five-stage competitive-analysis pipeline: plan, collect, normalize,
//! analyze, export.

pub mod artifacts;
pub mod collector;
pub mod error;
pub mod exporter;
pub mod normalizer;
pub mod orchestrator;
pub mod planner;
pub mod rules;
pub mod scorer;

#[cfg(test)]
mod test_support;

pub use artifacts::{load_sources, ArtifactStore};
pub use collector::{CollectorConfig, DataCollector};
pub use error::{NormalizationGap, PipelineError};
pub use exporter::SpecExporter;
pub use normalizer::{NormalizerConfig, ProfileNormalizer};
pub use orchestrator::{Orchestrator, PipelineResult, RunStats, RunStatus};
pub use planner::generate_matrix;
pub use rules::{Rule, RuleEngine, RuleScope};
pub use scorer::{priority_score, InsightScorer};
