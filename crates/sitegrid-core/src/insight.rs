use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            ImpactLevel::High => 1.0,
            ImpactLevel::Medium => 0.6,
            ImpactLevel::Low => 0.3,
            ImpactLevel::None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

impl EffortLevel {
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            EffortLevel::Low => 1.5,
            EffortLevel::Medium => 1.0,
            EffortLevel::High => 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    TrustGap,
    ConversionGap,
    ContentGap,
    TechnicalFix,
    BacklinkOpportunity,
    LocalSeoFix,
    StructureImprovement,
    CompetitiveResponse,
}

/// A finding cited in support of an insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub finding_id: String,
    pub finding_type: String,
    pub observation: String,
    #[serde(default)]
    pub competitor_refs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedImpact {
    pub rank_impact: ImpactLevel,
    pub cvr_impact: ImpactLevel,
    pub trust_impact: ImpactLevel,
    pub speed_impact: ImpactLevel,
}

impl ExpectedImpact {
    #[must_use]
    pub const fn new(
        rank_impact: ImpactLevel,
        cvr_impact: ImpactLevel,
        trust_impact: ImpactLevel,
        speed_impact: ImpactLevel,
    ) -> Self {
        Self {
            rank_impact,
            cvr_impact,
            trust_impact,
            speed_impact,
        }
    }

    #[must_use]
    pub fn any_high(&self) -> bool {
        [
            self.rank_impact,
            self.cvr_impact,
            self.trust_impact,
            self.speed_impact,
        ]
        .contains(&ImpactLevel::High)
    }
}

/// Implementation detail attached to an insight; the exporter reads
/// `component` to inject page components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDetails {
    pub page_type: Option<String>,
    pub component: Option<String>,
    #[serde(default)]
    pub content_requirements: Vec<String>,
    #[serde(default)]
    pub design_requirements: Vec<String>,
    pub placement: Option<String>,
    #[serde(default)]
    pub schema_requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionableInsight {
    pub id: String,
    pub rule_id: String,
    pub title: String,
    pub problem: String,
    pub hypothesis: String,
    pub evidence: Vec<Evidence>,
    pub finding_refs: Vec<String>,
    pub spec_change: String,
    pub spec_details: Option<SpecDetails>,
    pub expected_impact: ExpectedImpact,
    pub effort_estimate: EffortLevel,
    pub insight_type: InsightType,
    pub priority_score: f64,
    pub created_at: DateTime<Utc>,
}

impl ActionableInsight {
    /// At least one HIGH impact axis at LOW effort.
    #[must_use]
    pub fn is_quick_win(&self) -> bool {
        self.expected_impact.any_high() && self.effort_estimate == EffortLevel::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub client_id: String,
    pub generated_at: DateTime<Utc>,
    pub insights: Vec<ActionableInsight>,
}

impl InsightReport {
    #[must_use]
    pub fn new(client_id: &str, insights: Vec<ActionableInsight>) -> Self {
        Self {
            client_id: client_id.to_string(),
            generated_at: Utc::now(),
            insights,
        }
    }

    /// Highest priority first; ties keep generation order.
    #[must_use]
    pub fn by_priority(&self) -> Vec<&ActionableInsight> {
        let mut sorted: Vec<&ActionableInsight> = self.insights.iter().collect();
        sorted.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
        sorted
    }

    #[must_use]
    pub fn quick_wins(&self) -> Vec<&ActionableInsight> {
        self.by_priority()
            .into_iter()
            .filter(|i| i.is_quick_win())
            .collect()
    }

    #[must_use]
    pub fn contains_rule(&self, rule_id: &str) -> bool {
        self.insights.iter().any(|i| i.rule_id == rule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(rule_id: &str, score: f64, effort: EffortLevel, rank: ImpactLevel) -> ActionableInsight {
        ActionableInsight {
            id: rule_id.to_string(),
            rule_id: rule_id.to_string(),
            title: rule_id.to_string(),
            problem: String::new(),
            hypothesis: String::new(),
            evidence: Vec::new(),
            finding_refs: Vec::new(),
            spec_change: String::new(),
            spec_details: None,
            expected_impact: ExpectedImpact::new(
                rank,
                ImpactLevel::Low,
                ImpactLevel::Low,
                ImpactLevel::Low,
            ),
            effort_estimate: effort,
            insight_type: InsightType::ContentGap,
            priority_score: score,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn by_priority_sorts_descending_and_is_stable() {
        let report = InsightReport::new(
            "c",
            vec![
                insight("a", 40.0, EffortLevel::High, ImpactLevel::Low),
                insight("b", 90.0, EffortLevel::Low, ImpactLevel::High),
                insight("c", 40.0, EffortLevel::Medium, ImpactLevel::Low),
            ],
        );
        let ids: Vec<&str> = report.by_priority().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn quick_wins_need_high_axis_and_low_effort() {
        let report = InsightReport::new(
            "c",
            vec![
                insight("a", 90.0, EffortLevel::Low, ImpactLevel::High),
                insight("b", 80.0, EffortLevel::Medium, ImpactLevel::High),
                insight("c", 30.0, EffortLevel::Low, ImpactLevel::Medium),
            ],
        );
        let wins: Vec<&str> = report.quick_wins().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(wins, vec!["a"]);
        assert!(report.contains_rule("b"));
    }
}
