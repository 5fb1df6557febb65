use sitegrid_core::{
    FindingCategory, FindingType, ServiceAreaPage, Severity, Vertical, VerticalCategory,
};

use super::*;
use crate::test_support::{
    client_for, competitor, competitor_with_reviews, sample_client, with_reviews,
};

fn review_findings(findings: &[Finding]) -> Vec<&Finding> {
    findings.iter().filter(|f| f.rule_id == "review_gap").collect()
}

fn rule_ids(findings: &[Finding]) -> Vec<&str> {
    let mut ids: Vec<&str> = Vec::new();
    for finding in findings {
        if !ids.contains(&finding.rule_id.as_str()) {
            ids.push(&finding.rule_id);
        }
    }
    ids
}

// -----------------------------------------------------------------------
// review_gap
// -----------------------------------------------------------------------

#[test]
fn review_gap_scenario_flags_gap_and_competitor_strength() {
    let client = with_reviews(sample_client(), 20, 4.6);
    let competitors = vec![
        competitor_with_reviews("bigshop.com", 150),
        competitor_with_reviews("b.com", 25),
        competitor_with_reviews("c.com", 15),
        competitor_with_reviews("d.com", 10),
    ];

    let findings = RuleEngine::with_default_rules().findings(&client, &competitors);
    let reviews = review_findings(&findings);

    let gap = reviews
        .iter()
        .find(|f| f.finding_type == FindingType::Gap)
        .expect("gap finding");
    assert_eq!(gap.severity, Severity::High);
    let points = gap.data_points.as_ref().unwrap();
    assert_eq!(points.benchmark, Some(50.0));
    assert_eq!(points.delta, Some(-30.0));

    let strengths: Vec<&&Finding> = reviews
        .iter()
        .filter(|f| f.finding_type == FindingType::Strength)
        .collect();
    assert_eq!(strengths.len(), 1);
    assert_eq!(strengths[0].competitor_refs, vec!["bigshop.com".to_string()]);
    assert_eq!(strengths[0].severity, Severity::Medium);
}

#[test]
fn review_gap_is_medium_when_merely_below_average() {
    let client = with_reviews(sample_client(), 40, 4.6);
    let competitors = vec![
        competitor_with_reviews("a.com", 60),
        competitor_with_reviews("b.com", 40),
    ];
    let findings = RuleEngine::with_default_rules().findings(&client, &competitors);
    let gap = review_findings(&findings)
        .into_iter()
        .find(|f| f.finding_type == FindingType::Gap)
        .unwrap();
    assert_eq!(gap.severity, Severity::Medium);
}

#[test]
fn review_lead_over_every_competitor_is_a_strength() {
    let client = with_reviews(sample_client(), 90, 4.6);
    let competitors = vec![
        competitor_with_reviews("a.com", 60),
        competitor_with_reviews("b.com", 40),
    ];
    let findings = RuleEngine::with_default_rules().findings(&client, &competitors);
    let reviews = review_findings(&findings);

    assert!(!reviews.iter().any(|f| f.finding_type == FindingType::Gap));
    let lead = reviews
        .iter()
        .find(|f| f.finding_type == FindingType::Strength && f.competitor_refs.is_empty())
        .unwrap();
    assert_eq!(lead.severity, Severity::Low);
}

#[test]
fn high_competitor_ratings_are_a_pattern() {
    let client = sample_client();
    let mut a = competitor_with_reviews("a.com", 30);
    a.trust_signals.rating = Some(4.9);
    let mut b = competitor_with_reviews("b.com", 30);
    b.trust_signals.rating = Some(4.7);

    let findings = RuleEngine::with_default_rules().findings(&client, &[a, b]);
    assert!(review_findings(&findings)
        .iter()
        .any(|f| f.finding_type == FindingType::Pattern && f.observation.contains("4.8")));
}

// -----------------------------------------------------------------------
// engine dispatch
// -----------------------------------------------------------------------

#[test]
fn no_competitors_runs_self_assessment_only() {
    let client = with_reviews(sample_client(), 150, 4.9);
    let findings = RuleEngine::with_default_rules().findings(&client, &[]);

    assert_eq!(
        rule_ids(&findings),
        vec!["client_review_strength", "client_rating_strength"]
    );
    assert!(findings
        .iter()
        .all(|f| f.finding_type == FindingType::Strength && f.severity == Severity::Low));
}

#[test]
fn modest_client_without_competitors_yields_nothing() {
    let findings = RuleEngine::with_default_rules().findings(&sample_client(), &[]);
    assert!(findings.is_empty());
}

#[test]
fn general_vertical_falls_back_to_universal_rules() {
    let engine = RuleEngine::with_default_rules();
    let general: Vec<&str> = engine
        .rules_for(VerticalCategory::General)
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(
        general,
        vec![
            "backlink_gap",
            "review_gap",
            "content_depth",
            "grid_ranking",
            "chat_widget",
            "blog_activity"
        ]
    );
    assert_eq!(engine.rules_for(VerticalCategory::BlueCollar).len(), 10);
    assert_eq!(engine.rules_for(VerticalCategory::Entertainment).len(), 11);
    assert_eq!(engine.rules_for(VerticalCategory::Healthcare).len(), 8);
}

#[test]
fn vertical_rules_only_run_for_their_category() {
    let mut booking = competitor("escape.com");
    booking.conversion_mechanics.online_booking = true;
    let competitors = vec![booking];

    let for_escape = RuleEngine::with_default_rules()
        .findings(&client_for(Vertical::EscapeRoom), &competitors);
    assert!(for_escape.iter().any(|f| f.rule_id == "online_booking"));

    let for_law =
        RuleEngine::with_default_rules().findings(&client_for(Vertical::Law), &competitors);
    assert!(!for_law.iter().any(|f| f.rule_id == "online_booking"));
}

#[test]
fn findings_follow_registration_order() {
    let mut a = competitor("a.com");
    a.backlinks.domain_authority = Some(40);
    a.trust_signals.review_count = Some(80);
    a.grid_performance.insert("Bethlehem".into(), 1.0);
    a.conversion_mechanics.sticky_cta = true;

    let findings = RuleEngine::with_default_rules().findings(&sample_client(), &[a]);
    assert_eq!(
        rule_ids(&findings),
        vec![
            "backlink_gap",
            "review_gap",
            "grid_ranking",
            "gallery_presence",
            "sticky_cta"
        ]
    );
}

#[test]
fn custom_rules_can_be_registered() {
    fn always(_: &Client, _: &[CompetitorProfile]) -> Vec<Finding> {
        vec![Finding::new(
            "always",
            FindingType::Pattern,
            FindingCategory::Ux,
            Severity::Low,
            "fires",
        )]
    }

    let mut engine = RuleEngine::empty();
    engine.register(RuleScope::Vertical(VerticalCategory::General), Rule::new("always", always));

    let findings = engine.findings(&client_for(Vertical::Law), &[competitor("a.com")]);
    assert_eq!(rule_ids(&findings), vec!["always"]);
    assert!(engine
        .findings(&client_for(Vertical::Pdr), &[competitor("a.com")])
        .is_empty());
}

// -----------------------------------------------------------------------
// thresholds
// -----------------------------------------------------------------------

#[test]
fn sticky_pattern_needs_half_of_competitors() {
    let engine = RuleEngine::with_default_rules();
    let client = sample_client();

    let mut competitors: Vec<CompetitorProfile> =
        ["a.com", "b.com", "c.com", "d.com"].map(competitor).into();
    competitors[0].conversion_mechanics.sticky_cta = true;
    assert!(!engine
        .findings(&client, &competitors)
        .iter()
        .any(|f| f.rule_id == "sticky_cta"));

    competitors[1].conversion_mechanics.sticky_header = true;
    let findings = engine.findings(&client, &competitors);
    let sticky = findings.iter().find(|f| f.rule_id == "sticky_cta").unwrap();
    assert_eq!(sticky.finding_type, FindingType::Pattern);
    assert_eq!(sticky.severity, Severity::High);
    assert_eq!(sticky.competitor_refs, vec!["a.com", "b.com"]);
}

#[test]
fn grid_dominance_is_a_critical_threat() {
    let mut leader = competitor("leader.com");
    leader.grid_performance.insert("Bethlehem".into(), 2.0);
    leader.grid_performance.insert("Easton".into(), 3.0);
    let mut laggard = competitor("laggard.com");
    laggard.grid_performance.insert("Bethlehem".into(), 7.0);

    let findings = RuleEngine::with_default_rules().findings(&sample_client(), &[leader, laggard]);
    let threats: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.rule_id == "grid_ranking")
        .collect();
    assert_eq!(threats.len(), 1);
    assert_eq!(threats[0].finding_type, FindingType::Threat);
    assert_eq!(threats[0].severity, Severity::Critical);
    assert_eq!(threats[0].competitor_refs, vec!["leader.com"]);
}

#[test]
fn gallery_rule_flags_pattern_or_opportunity() {
    let engine = RuleEngine::with_default_rules();
    let client = sample_client();
    let mut competitors: Vec<CompetitorProfile> = ["a.com", "b.com"].map(competitor).into();

    let findings = engine.findings(&client, &competitors);
    let gallery = findings.iter().find(|f| f.rule_id == "gallery_presence").unwrap();
    assert_eq!(gallery.finding_type, FindingType::Opportunity);

    competitors[0].trust_signals.before_after_gallery = true;
    let findings = engine.findings(&client, &competitors);
    let gallery = findings.iter().find(|f| f.rule_id == "gallery_presence").unwrap();
    assert_eq!(gallery.finding_type, FindingType::Pattern);
}

#[test]
fn backlink_leader_is_a_threat() {
    let mut competitors: Vec<CompetitorProfile> =
        ["a.com", "b.com", "c.com"].map(competitor).into();
    competitors[0].backlinks.domain_authority = Some(60);
    competitors[1].backlinks.domain_authority = Some(15);
    competitors[2].backlinks.domain_authority = Some(15);

    let findings = RuleEngine::with_default_rules().findings(&sample_client(), &competitors);
    let backlinks: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.rule_id == "backlink_gap")
        .collect();
    assert_eq!(backlinks.len(), 2);
    assert_eq!(
        backlinks[0].data_points.as_ref().unwrap().benchmark,
        Some(30.0)
    );
    assert_eq!(backlinks[1].finding_type, FindingType::Threat);
    assert_eq!(backlinks[1].competitor_refs, vec!["a.com"]);
}

#[test]
fn service_area_coverage_counts_pages() {
    let mut broad = competitor("broad.com");
    broad.seo_structure.service_area_pages = (0..6)
        .map(|i| ServiceAreaPage {
            url: format!("https://broad.com/areas/town-{i}"),
            location: format!("Town {i}"),
        })
        .collect();
    let findings = RuleEngine::with_default_rules()
        .findings(&sample_client(), &[broad, competitor("thin.com")]);
    let coverage: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.rule_id == "service_area_coverage")
        .collect();
    assert_eq!(coverage.len(), 2);
    assert_eq!(coverage[0].severity, Severity::High);
    assert_eq!(coverage[1].data_points.as_ref().unwrap().benchmark, Some(6.0));
}

#[test]
fn healthcare_telehealth_is_an_opportunity() {
    let mut competitors: Vec<CompetitorProfile> =
        ["a.com", "b.com", "c.com"].map(competitor).into();
    competitors[0].conversion_mechanics.telehealth_option = true;
    competitors[1].conversion_mechanics.telehealth_option = true;

    let findings = RuleEngine::with_default_rules()
        .findings(&client_for(Vertical::Dental), &competitors);
    let scheduling: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.rule_id == "online_scheduling")
        .collect();
    assert_eq!(scheduling.len(), 1);
    assert_eq!(scheduling[0].finding_type, FindingType::Opportunity);
}
