use sitegrid_core::{Client, CompetitorProfile, Finding, FindingCategory, FindingType, Severity};

use super::{domains, matching, share_at_least, Rule};

pub(super) const RULES: &[Rule] = &[
    Rule::new("credential_display", credential_display),
    Rule::new("online_scheduling", online_scheduling),
];

const MAJORITY: f64 = 0.5;
const TELEHEALTH_ADOPTERS: usize = 2;

fn credential_display(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let credentialed = matching(competitors, |c| {
        !c.trust_signals.credentials_shown.is_empty()
            || !c.trust_signals.board_certifications.is_empty()
    });
    if !share_at_least(credentialed.len(), competitors.len(), MAJORITY) {
        return Vec::new();
    }
    vec![Finding::new(
        "credential_display",
        FindingType::Pattern,
        FindingCategory::Trust,
        Severity::High,
        format!(
            "{}/{} competitors display provider credentials",
            credentialed.len(),
            competitors.len()
        ),
    )
    .with_competitors(domains(&credentialed))]
}

fn online_scheduling(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let mut findings = Vec::new();

    let scheduling = matching(competitors, |c| c.conversion_mechanics.online_scheduling);
    if share_at_least(scheduling.len(), competitors.len(), MAJORITY) {
        findings.push(
            Finding::new(
                "online_scheduling",
                FindingType::Pattern,
                FindingCategory::Conversion,
                Severity::High,
                format!(
                    "{}/{} competitors offer online appointment scheduling",
                    scheduling.len(),
                    competitors.len()
                ),
            )
            .with_competitors(domains(&scheduling)),
        );
    }

    let telehealth = matching(competitors, |c| c.conversion_mechanics.telehealth_option);
    if telehealth.len() >= TELEHEALTH_ADOPTERS {
        findings.push(
            Finding::new(
                "online_scheduling",
                FindingType::Opportunity,
                FindingCategory::Conversion,
                Severity::Medium,
                format!("{} competitors offer telehealth visits", telehealth.len()),
            )
            .with_competitors(domains(&telehealth)),
        );
    }
    findings
}
