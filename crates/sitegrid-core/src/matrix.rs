use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStrategy {
    Dedicated,
    Merged,
    Section,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub service_id: String,
    pub service_name: String,
    pub is_money_service: bool,
    /// 1-based, ascending.
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixColumn {
    pub geo_bucket: GeoBucket,
    pub label: String,
    /// Location names in client order.
    pub locations: Vec<String>,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCtaRules {
    pub primary: String,
    pub urgency: UrgencyLevel,
    pub phone_prominent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub service_id: String,
    pub geo_bucket: GeoBucket,
    pub page_strategy: PageStrategy,
    pub page_type: Option<String>,
    pub merge_with: Option<String>,
    pub keyword_cluster: Vec<String>,
    pub proof_requirements: Vec<String>,
    pub cta_rules: CellCtaRules,
    pub schema_types: Vec<String>,
    pub priority_score: f64,
}

impl MatrixCell {
    /// Unique `(service_id, geo_bucket)` key.
    #[must_use]
    pub fn key(&self) -> (String, GeoBucket) {
        (self.service_id.clone(), self.geo_bucket)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixSummary {
    pub total_pages_needed: usize,
    pub service_pages: usize,
    pub service_area_pages: usize,
    pub merged_pages: usize,
    pub blog_content_needed: usize,
    pub total_keywords: usize,
}

impl MatrixSummary {
    #[must_use]
    pub fn from_cells(cells: &[MatrixCell]) -> Self {
        let page_type_count = |ty: &str| {
            cells
                .iter()
                .filter(|c| c.page_type.as_deref() == Some(ty))
                .count()
        };
        Self {
            total_pages_needed: cells
                .iter()
                .filter(|c| c.page_strategy == PageStrategy::Dedicated)
                .count(),
            service_pages: page_type_count("service"),
            service_area_pages: page_type_count("service-area"),
            merged_pages: cells
                .iter()
                .filter(|c| c.page_strategy == PageStrategy::Merged)
                .count(),
            blog_content_needed: page_type_count("blog"),
            total_keywords: cells.iter().map(|c| c.keyword_cluster.len()).sum(),
        }
    }
}

/// Services × geo buckets targeting grid produced by the plan stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentGeoMatrix {
    pub client_id: String,
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub rows: Vec<MatrixRow>,
    pub columns: Vec<MatrixColumn>,
    pub cells: Vec<MatrixCell>,
    pub summary: MatrixSummary,
}

impl IntentGeoMatrix {
    #[must_use]
    pub fn cell(&self, service_id: &str, bucket: GeoBucket) -> Option<&MatrixCell> {
        self.cells
            .iter()
            .find(|c| c.service_id == service_id && c.geo_bucket == bucket)
    }

    #[must_use]
    pub fn column(&self, bucket: GeoBucket) -> Option<&MatrixColumn> {
        self.columns.iter().find(|c| c.geo_bucket == bucket)
    }

    #[must_use]
    pub fn row(&self, service_id: &str) -> Option<&MatrixRow> {
        self.rows.iter().find(|r| r.service_id == service_id)
    }

    /// Cells in row order then column order.
    pub fn ordered_cells(&self) -> impl Iterator<Item = &MatrixCell> {
        self.rows.iter().flat_map(move |row| {
            self.columns
                .iter()
                .filter_map(move |col| self.cell(&row.service_id, col.geo_bucket))
        })
    }
}
