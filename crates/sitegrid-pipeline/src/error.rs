use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sitegrid_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("stage {stage} failed: {reason}")]
    Stage { stage: &'static str, reason: String },

    #[error("failed to write artifact {path}: {source}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize artifact {name}: {source}")]
    ArtifactSerialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    pub(crate) fn stage(stage: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::Stage {
            stage,
            reason: reason.into(),
        }
    }
}

/// A competitor domain whose sources carried no usable page content.
///
/// Non-fatal: the domain still gets a low-confidence profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationGap {
    pub domain: String,
    pub reason: String,
}

impl std::fmt::Display for NormalizationGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.domain, self.reason)
    }
}
