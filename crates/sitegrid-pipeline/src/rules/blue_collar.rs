//! Trades and home-service rules: proof of work, credentials, coverage.

use sitegrid_core::{
    Client, CompetitorProfile, DataPoints, Finding, FindingCategory, FindingType, Severity,
};

use super::{domains, matching, mean, share_at_least, Rule};

pub(super) const RULES: &[Rule] = &[
    Rule::new("certification_check", certification_check),
    Rule::new("gallery_presence", gallery_presence),
    Rule::new("service_area_coverage", service_area_coverage),
    Rule::new("sticky_cta", sticky_cta),
];

const CERT_SHARE: f64 = 0.6;
const MAJORITY: f64 = 0.5;
const RARE_SHARE: f64 = 0.3;
const BROAD_COVERAGE_PAGES: usize = 5;

fn certification_check(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let certified = matching(competitors, |c| {
        c.trust_signals.licenses_shown || !c.trust_signals.certifications.is_empty()
    });
    if !share_at_least(certified.len(), competitors.len(), CERT_SHARE) {
        return Vec::new();
    }
    vec![Finding::new(
        "certification_check",
        FindingType::Pattern,
        FindingCategory::Trust,
        Severity::Medium,
        format!(
            "{}/{} competitors display certifications/licenses",
            certified.len(),
            competitors.len()
        ),
    )
    .with_details("Industry standard to show credentials prominently")
    .with_competitors(domains(&certified))]
}

fn gallery_presence(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let with_gallery = matching(competitors, |c| c.trust_signals.before_after_gallery);
    let total = competitors.len();

    if share_at_least(with_gallery.len(), total, MAJORITY) {
        vec![Finding::new(
            "gallery_presence",
            FindingType::Pattern,
            FindingCategory::Trust,
            Severity::High,
            format!(
                "{}/{total} competitors have before/after galleries",
                with_gallery.len()
            ),
        )
        .with_details("Visual proof is table stakes in this industry")
        .with_competitors(domains(&with_gallery))]
    } else if !share_at_least(with_gallery.len(), total, RARE_SHARE) {
        vec![Finding::new(
            "gallery_presence",
            FindingType::Opportunity,
            FindingCategory::Trust,
            Severity::High,
            format!(
                "Only {}/{total} competitors show before/after work",
                with_gallery.len()
            ),
        )
        .with_details("A strong gallery would differentiate in this market")]
    } else {
        Vec::new()
    }
}

fn service_area_coverage(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let mut findings: Vec<Finding> = competitors
        .iter()
        .filter(|c| c.seo_structure.service_area_pages.len() >= BROAD_COVERAGE_PAGES)
        .map(|c| {
            Finding::new(
                "service_area_coverage",
                FindingType::Pattern,
                FindingCategory::LocalSeo,
                Severity::High,
                format!(
                    "{} has {} service area pages",
                    c.domain,
                    c.seo_structure.service_area_pages.len()
                ),
            )
            .with_competitors(vec![c.domain.clone()])
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let counts: Vec<f64> = competitors
        .iter()
        .map(|c| c.seo_structure.service_area_pages.len())
        .filter(|n| *n > 0)
        .map(|n| n as f64)
        .collect();
    if let Some(average) = mean(&counts) {
        findings.push(
            Finding::new(
                "service_area_coverage",
                FindingType::Pattern,
                FindingCategory::LocalSeo,
                Severity::Medium,
                format!(
                    "{}/{} competitors publish service area pages (avg {average:.1})",
                    counts.len(),
                    competitors.len()
                ),
            )
            .with_data_points(DataPoints {
                benchmark: Some(average),
                ..DataPoints::default()
            }),
        );
    }
    findings
}

fn sticky_cta(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let sticky = matching(competitors, |c| {
        c.conversion_mechanics.sticky_cta || c.conversion_mechanics.sticky_header
    });
    if !share_at_least(sticky.len(), competitors.len(), MAJORITY) {
        return Vec::new();
    }
    vec![Finding::new(
        "sticky_cta",
        FindingType::Pattern,
        FindingCategory::Conversion,
        Severity::High,
        format!(
            "{}/{} competitors use sticky CTAs",
            sticky.len(),
            competitors.len()
        ),
    )
    .with_details("Sticky CTAs keep the conversion action visible")
    .with_competitors(domains(&sticky))]
}
