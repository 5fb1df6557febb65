//! Stage 4a: compare the client against competitor profiles.
//!
//! Rules are pure functions registered under a scope. The engine runs the
//! universal rules, then the client's vertical rules, then the client-only
//! self-assessment rules, always in registration order. No rule sees
//! another rule's output.

mod blue_collar;
mod entertainment;
mod healthcare;
mod self_assessment;
mod universal;

use std::collections::HashMap;

use sitegrid_core::{Client, CompetitorProfile, Finding, VerticalCategory};
use tracing::{debug, info, warn};

/// Signature shared by every rule.
pub type RuleFn = fn(&Client, &[CompetitorProfile]) -> Vec<Finding>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub eval: RuleFn,
}

impl Rule {
    #[must_use]
    pub const fn new(id: &'static str, eval: RuleFn) -> Self {
        Self { id, eval }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish()
    }
}

/// Where a rule is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Runs for every vertical when competitor data exists.
    Universal,
    /// Runs only for clients in this category.
    Vertical(VerticalCategory),
    /// Reads only the client; runs even with no competitors.
    SelfAssessment,
}

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    universal: Vec<Rule>,
    vertical: HashMap<VerticalCategory, Vec<Rule>>,
    self_assessment: Vec<Rule>,
}

impl RuleEngine {
    /// An engine with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in rule battery.
    #[must_use]
    pub fn with_default_rules() -> Self {
        let mut engine = Self::empty();
        for rule in universal::RULES {
            engine.register(RuleScope::Universal, *rule);
        }
        for rule in blue_collar::RULES {
            engine.register(RuleScope::Vertical(VerticalCategory::BlueCollar), *rule);
        }
        for rule in entertainment::RULES {
            engine.register(RuleScope::Vertical(VerticalCategory::Entertainment), *rule);
        }
        for rule in healthcare::RULES {
            engine.register(RuleScope::Vertical(VerticalCategory::Healthcare), *rule);
        }
        for rule in self_assessment::RULES {
            engine.register(RuleScope::SelfAssessment, *rule);
        }
        engine
    }

    pub fn register(&mut self, scope: RuleScope, rule: Rule) {
        match scope {
            RuleScope::Universal => self.universal.push(rule),
            RuleScope::Vertical(category) => self.vertical.entry(category).or_default().push(rule),
            RuleScope::SelfAssessment => self.self_assessment.push(rule),
        }
    }

    /// Comparative rules for `category`: universal first, then vertical.
    /// A category with no registered rules gets the universal set only.
    #[must_use]
    pub fn rules_for(&self, category: VerticalCategory) -> Vec<&Rule> {
        self.universal
            .iter()
            .chain(self.vertical.get(&category).into_iter().flatten())
            .collect()
    }

    /// Run the battery. Never fails: with no competitors only the
    /// self-assessment rules run.
    #[tracing::instrument(skip_all, fields(client = %client.id, competitors = competitors.len()))]
    #[must_use]
    pub fn findings(&self, client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
        let category = client.vertical.category();
        let mut findings = Vec::new();

        if competitors.is_empty() {
            warn!("no competitor profiles; running self-assessment only");
        } else {
            for rule in self.rules_for(category) {
                let emitted = (rule.eval)(client, competitors);
                debug!(rule = rule.id, findings = emitted.len(), "rule evaluated");
                findings.extend(emitted);
            }
        }

        for rule in &self.self_assessment {
            findings.extend((rule.eval)(client, competitors));
        }

        info!(
            %category,
            findings = findings.len(),
            "findings generated"
        );
        findings
    }
}

// -----------------------------------------------------------------------
// shared aggregation helpers
// -----------------------------------------------------------------------

/// Competitors matching `pred`.
fn matching<'a>(
    competitors: &'a [CompetitorProfile],
    pred: impl Fn(&CompetitorProfile) -> bool,
) -> Vec<&'a CompetitorProfile> {
    competitors.iter().filter(|c| pred(c)).collect()
}

/// True when `count` is at least `ratio` of `total`.
#[allow(clippy::cast_precision_loss)]
fn share_at_least(count: usize, total: usize, ratio: f64) -> bool {
    total > 0 && count as f64 >= total as f64 * ratio
}

fn domains(competitors: &[&CompetitorProfile]) -> Vec<String> {
    competitors.iter().map(|c| c.domain.clone()).collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
