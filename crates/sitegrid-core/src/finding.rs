use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingType {
    Gap,
    Strength,
    Opportunity,
    Pattern,
    Threat,
}

impl FindingType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FindingType::Gap => "gap",
            FindingType::Strength => "strength",
            FindingType::Opportunity => "opportunity",
            FindingType::Pattern => "pattern",
            FindingType::Threat => "threat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Trust,
    Conversion,
    Content,
    Technical,
    Backlinks,
    LocalSeo,
    Structure,
    Ux,
}

impl FindingCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FindingCategory::Trust => "trust",
            FindingCategory::Conversion => "conversion",
            FindingCategory::Content => "content",
            FindingCategory::Technical => "technical",
            FindingCategory::Backlinks => "backlinks",
            FindingCategory::LocalSeo => "local_seo",
            FindingCategory::Structure => "structure",
            FindingCategory::Ux => "ux",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Numbers backing a finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPoints {
    pub our_value: Option<f64>,
    pub benchmark: Option<f64>,
    pub delta: Option<f64>,
    #[serde(default)]
    pub competitor_values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub finding_type: FindingType,
    pub category: FindingCategory,
    pub severity: Severity,
    pub rule_id: String,
    pub observation: String,
    pub details: Option<String>,
    #[serde(default)]
    pub competitor_refs: Vec<String>,
    pub data_points: Option<DataPoints>,
    pub confidence: f64,
    pub discovered_at: DateTime<Utc>,
}

impl Finding {
    #[must_use]
    pub fn new(
        rule_id: &str,
        finding_type: FindingType,
        category: FindingCategory,
        severity: Severity,
        observation: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            finding_type,
            category,
            severity,
            rule_id: rule_id.to_string(),
            observation: observation.into(),
            details: None,
            competitor_refs: Vec::new(),
            data_points: None,
            confidence: 0.8,
            discovered_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_competitors(mut self, refs: Vec<String>) -> Self {
        self.competitor_refs = refs;
        self
    }

    #[must_use]
    pub fn with_data_points(mut self, data_points: DataPoints) -> Self {
        self.data_points = Some(data_points);
        self
    }

    /// GAP, OPPORTUNITY and THREAT findings call for a change.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        matches!(
            self.finding_type,
            FindingType::Gap | FindingType::Opportunity | FindingType::Threat
        )
    }
}

/// Stage 4 findings output, grouped for downstream reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingsReport {
    pub client_id: String,
    pub generated_at: DateTime<Utc>,
    pub findings: Vec<Finding>,
    pub by_category: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}

impl FindingsReport {
    #[must_use]
    pub fn new(client_id: &str, findings: Vec<Finding>) -> Self {
        let mut by_category = BTreeMap::new();
        let mut by_type = BTreeMap::new();
        for finding in &findings {
            *by_category
                .entry(finding.category.as_str().to_string())
                .or_insert(0) += 1;
            *by_type
                .entry(finding.finding_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        Self {
            client_id: client_id.to_string(),
            generated_at: Utc::now(),
            findings,
            by_category,
            by_type,
        }
    }

    pub fn actionable(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_actionable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_groups_counts() {
        let findings = vec![
            Finding::new(
                "review_gap",
                FindingType::Gap,
                FindingCategory::Trust,
                Severity::High,
                "few reviews",
            ),
            Finding::new(
                "review_gap",
                FindingType::Strength,
                FindingCategory::Trust,
                Severity::Medium,
                "rival has many reviews",
            ),
            Finding::new(
                "sticky_cta",
                FindingType::Pattern,
                FindingCategory::Conversion,
                Severity::High,
                "most use sticky CTAs",
            ),
        ];
        let report = FindingsReport::new("client", findings);
        assert_eq!(report.by_category.get("trust"), Some(&2));
        assert_eq!(report.by_category.get("conversion"), Some(&1));
        assert_eq!(report.by_type.get("gap"), Some(&1));
        assert_eq!(report.actionable().count(), 1);
    }

    #[test]
    fn builder_sets_optional_fields() {
        let finding = Finding::new(
            "backlink_gap",
            FindingType::Threat,
            FindingCategory::Backlinks,
            Severity::High,
            "leader",
        )
        .with_details("DA 60")
        .with_competitors(vec!["rival.com".into()]);
        assert_eq!(finding.details.as_deref(), Some("DA 60"));
        assert_eq!(finding.competitor_refs, vec!["rival.com".to_string()]);
        assert!(finding.is_actionable());
        assert!(Severity::Critical > Severity::High);
    }
}
