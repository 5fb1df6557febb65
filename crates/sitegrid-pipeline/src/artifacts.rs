//! JSON artifacts, one file per stage output, overwritten on rerun.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sitegrid_core::Source;

use crate::error::PipelineError;

pub const MATRIX_FILE: &str = "matrix.json";
pub const SOURCES_FILE: &str = "sources.json";
pub const PROFILES_FILE: &str = "profiles.json";
pub const FINDINGS_FILE: &str = "findings.json";
pub const INSIGHTS_FILE: &str = "insights.json";
pub const OUTPUT_SPEC_FILE: &str = "output_spec.json";
pub const SUMMARY_FILE: &str = "pipeline_summary.json";

/// Writes artifacts under `<root>/<client_id>/`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(root: &Path, client_id: &str) -> Self {
        Self {
            dir: root.join(client_id),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Serialize `value` as pretty JSON into `name`, creating the directory
    /// when needed. Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ArtifactSerialize`] or
    /// [`PipelineError::ArtifactIo`].
    pub async fn write<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<PathBuf, PipelineError> {
        let bytes =
            serde_json::to_vec_pretty(value).map_err(|source| PipelineError::ArtifactSerialize {
                name: name.to_string(),
                source,
            })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| PipelineError::ArtifactIo {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| PipelineError::ArtifactIo {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "artifact written");
        Ok(path)
    }
}

/// Read a previously saved `sources.json`.
///
/// # Errors
///
/// Returns [`PipelineError::ArtifactIo`] if the file cannot be read and
/// [`PipelineError::ArtifactSerialize`] if it is not a source list.
pub async fn load_sources(path: &Path) -> Result<Vec<Source>, PipelineError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| PipelineError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| PipelineError::ArtifactSerialize {
        name: path.display().to_string(),
        source,
    })
}
