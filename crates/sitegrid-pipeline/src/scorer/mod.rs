//! Stage 4b: turns findings into prioritized, actionable insights.

mod templates;

use chrono::Utc;
use sitegrid_core::{
    ActionableInsight, EffortLevel, Evidence, ExpectedImpact, Finding, FindingType,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub use templates::{template_for, InsightTemplate, TemplateDetails, TEMPLATES};

const RANK_WEIGHT: f64 = 0.35;
const CVR_WEIGHT: f64 = 0.30;
const TRUST_WEIGHT: f64 = 0.15;
const SPEED_WEIGHT: f64 = 0.20;
const QUICK_WIN_BOOST: f64 = 1.2;

/// Priority in `0.0..=100.0`. Pure: the same inputs always score the same.
#[must_use]
pub fn priority_score(impact: &ExpectedImpact, effort: EffortLevel) -> f64 {
    let weighted = RANK_WEIGHT * impact.rank_impact.weight()
        + CVR_WEIGHT * impact.cvr_impact.weight()
        + TRUST_WEIGHT * impact.trust_impact.weight()
        + SPEED_WEIGHT * impact.speed_impact.weight();

    let mut score = weighted * effort.multiplier() * 100.0;
    if impact.any_high() && effort == EffortLevel::Low {
        score *= QUICK_WIN_BOOST;
    }
    score.clamp(0.0, 100.0)
}

/// Maps findings onto insight templates, one insight per rule id.
#[derive(Debug, Clone, Copy)]
pub struct InsightScorer {
    templates: &'static [InsightTemplate],
}

impl Default for InsightScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightScorer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: TEMPLATES,
        }
    }

    /// A template fires when at least one non-strength finding carries its
    /// rule id. Every finding with that rule id becomes evidence. Output is
    /// sorted by priority, highest first; ties keep template order.
    #[instrument(skip_all, fields(findings = findings.len()))]
    pub fn insights(&self, findings: &[Finding]) -> Vec<ActionableInsight> {
        let mut insights: Vec<ActionableInsight> = self
            .templates
            .iter()
            .filter_map(|template| {
                let matched: Vec<&Finding> = findings
                    .iter()
                    .filter(|f| f.rule_id == template.rule_id)
                    .collect();
                if !matched.iter().any(|f| f.finding_type != FindingType::Strength) {
                    return None;
                }
                Some(build_insight(template, &matched))
            })
            .collect();

        let unmapped = findings
            .iter()
            .filter(|f| f.finding_type != FindingType::Strength)
            .filter(|f| !self.templates.iter().any(|t| t.rule_id == f.rule_id))
            .count();
        if unmapped > 0 {
            debug!(unmapped, "findings without an insight template");
        }

        insights.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
        info!(
            insights = insights.len(),
            quick_wins = insights.iter().filter(|i| i.is_quick_win()).count(),
            "insights scored"
        );
        insights
    }
}

fn build_insight(template: &InsightTemplate, matched: &[&Finding]) -> ActionableInsight {
    let evidence = matched
        .iter()
        .map(|f| Evidence {
            finding_id: f.id.clone(),
            finding_type: f.finding_type.as_str().to_string(),
            observation: f.observation.clone(),
            competitor_refs: f.competitor_refs.clone(),
        })
        .collect();

    ActionableInsight {
        id: Uuid::new_v4().to_string(),
        rule_id: template.rule_id.to_string(),
        title: template.title.to_string(),
        problem: template.problem.to_string(),
        hypothesis: template.hypothesis.to_string(),
        evidence,
        finding_refs: matched.iter().map(|f| f.id.clone()).collect(),
        spec_change: template.spec_change.to_string(),
        spec_details: template.details.map(TemplateDetails::to_spec_details),
        expected_impact: template.impact,
        effort_estimate: template.effort,
        insight_type: template.insight_type,
        priority_score: priority_score(&template.impact, template.effort),
        created_at: Utc::now(),
    }
}
