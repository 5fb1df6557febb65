use sitegrid_core::{
    ActionableInsight, Client, Finding, FindingCategory, FindingType, OutputSpec, PageType,
    Severity,
};

use super::*;
use crate::planner::generate_matrix;
use crate::scorer::InsightScorer;
use crate::test_support::sample_client;

fn export(client: &Client, insights: &[ActionableInsight]) -> OutputSpec {
    let matrix = generate_matrix(client).unwrap();
    SpecExporter::new().export(client, &matrix, insights).unwrap()
}

fn routes(spec: &OutputSpec) -> Vec<&str> {
    spec.page_map.iter().map(|p| p.route.as_str()).collect()
}

fn scored(rule_ids: &[&str]) -> Vec<ActionableInsight> {
    let findings: Vec<Finding> = rule_ids
        .iter()
        .map(|id| {
            Finding::new(
                id,
                FindingType::Pattern,
                FindingCategory::Trust,
                Severity::High,
                "observed",
            )
        })
        .collect();
    InsightScorer::new().insights(&findings)
}

// ---------------------------------------------------------------------------
// page map
// ---------------------------------------------------------------------------

#[test]
fn page_map_orders_core_hubs_cells_then_support_pages() {
    let spec = export(&sample_client(), &[]);

    assert_eq!(
        routes(&spec),
        vec![
            "/",
            "/services/paintless-dent-repair",
            "/services/hail-damage-repair",
            "/services/hail-damage-repair/bethlehem",
            "/services/hail-damage-repair/allentown",
            "/services/paintless-dent-repair/bethlehem",
            "/services/paintless-dent-repair/allentown",
            "/services/door-ding-removal",
            "/about",
            "/contact",
            "/gallery",
            "/faq",
            "/reviews",
        ]
    );
    let priorities: Vec<u32> = spec.page_map.iter().map(|p| p.priority).collect();
    assert_eq!(priorities, (1..=13).collect::<Vec<u32>>());
}

#[test]
fn identical_inputs_yield_identical_routes() {
    let client = sample_client();
    let insights = scored(&["review_gap", "sticky_cta"]);
    let first = export(&client, &insights);
    let second = export(&client, &insights);
    assert_eq!(routes(&first), routes(&second));
}

#[test]
fn service_area_pages_carry_cell_targeting() {
    let spec = export(&sample_client(), &[]);
    let page = spec.page("/services/hail-damage-repair/allentown").unwrap();

    assert_eq!(page.page_type, PageType::ServiceArea);
    assert_eq!(page.h1, "Hail Damage Repair in Allentown");
    assert_eq!(page.geo_target.as_ref().unwrap().state, "PA");
    assert_eq!(page.service_target.as_deref(), Some("hail"));
    assert_eq!(page.cta_rules.as_ref().unwrap().primary_cta, "Schedule Estimate");
    assert!(page.schema_types.contains(&"GeoCircle".to_string()));
    assert!(page.keyword_targets.len() <= 5);
}

#[test]
fn same_city_in_another_state_gets_a_distinct_route() {
    let mut client = sample_client();
    client.locations[2].name = "Bethlehem, NY".to_string();
    let spec = export(&client, &[]);

    assert!(spec.page("/services/hail-damage-repair/bethlehem").is_some());
    assert!(spec.page("/services/hail-damage-repair/bethlehem-ny").is_some());
}

#[test]
fn duplicate_routes_fail_the_stage() {
    let mut client = sample_client();
    let matrix = generate_matrix(&client).unwrap();
    client.services[1].slug = client.services[0].slug.clone();

    let err = SpecExporter::new()
        .export(&client, &matrix, &[])
        .unwrap_err();
    assert!(err.to_string().contains("duplicate route"));
}

#[test]
fn unknown_matrix_service_fails_the_stage() {
    let client = sample_client();
    let mut matrix = generate_matrix(&client).unwrap();
    matrix.rows[0].service_id = "ghost".to_string();
    for cell in matrix.cells.iter_mut().filter(|c| c.service_id == "hail") {
        cell.service_id = "ghost".to_string();
    }

    let err = SpecExporter::new()
        .export(&client, &matrix, &[])
        .unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn meta_descriptions_stay_within_limit() {
    let mut client = sample_client();
    client.services[0].description = Some("dent ".repeat(80));
    let spec = export(&client, &[]);
    assert!(spec
        .page_map
        .iter()
        .all(|p| p.meta_description.chars().count() <= 160));
}

// ---------------------------------------------------------------------------
// links and components
// ---------------------------------------------------------------------------

#[test]
fn links_follow_home_service_area_graph() {
    let spec = export(&sample_client(), &[]);

    let home = spec.page("/").unwrap();
    let home_targets: Vec<&str> = home.internal_links.iter().map(|l| l.target.as_str()).collect();
    assert_eq!(
        home_targets,
        vec![
            "/services/paintless-dent-repair",
            "/services/hail-damage-repair",
            "/services/door-ding-removal"
        ]
    );

    let hub = spec.page("/services/paintless-dent-repair").unwrap();
    let anchors: Vec<&str> = hub.internal_links.iter().map(|l| l.anchor.as_str()).collect();
    assert_eq!(
        anchors,
        vec![
            "Paintless Dent Repair in Bethlehem",
            "Paintless Dent Repair in Allentown",
            "See our Paintless Dent Repair work",
            "Read customer reviews"
        ]
    );

    let area = spec.page("/services/paintless-dent-repair/bethlehem").unwrap();
    assert_eq!(area.internal_links.len(), 1);
    assert_eq!(area.internal_links[0].anchor, "Learn more about Paintless Dent Repair");
    assert_eq!(area.internal_links[0].target, "/services/paintless-dent-repair");

    assert!(spec.page("/about").unwrap().internal_links.is_empty());
}

#[test]
fn insight_components_are_added_to_service_pages() {
    let insights = scored(&["review_gap", "sticky_cta", "backlink_gap"]);
    let spec = export(&sample_client(), &insights);

    for page in spec
        .page_map
        .iter()
        .filter(|p| matches!(p.page_type, PageType::Service | PageType::ServiceArea))
    {
        assert!(page.components.contains(&"ReviewsWidget".to_string()), "{}", page.route);
        assert!(page.components.contains(&"StickyCTA".to_string()), "{}", page.route);
        assert!(!page.components.contains(&"BeforeAfterGallery".to_string()));
    }
    let about = spec.page("/about").unwrap();
    assert!(!about.components.contains(&"StickyCTA".to_string()));

    let home = spec.page("/").unwrap();
    let widgets = home.components.iter().filter(|c| *c == "ReviewsWidget").count();
    assert_eq!(widgets, 1);

    let applied: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(spec.insights_applied, applied);
}

// ---------------------------------------------------------------------------
// answer blocks and fixed sections
// ---------------------------------------------------------------------------

#[test]
fn every_money_service_gets_an_answer_block() {
    let spec = export(&sample_client(), &[]);
    assert_eq!(spec.llm_answer_blocks.len(), 2);

    let pdr = &spec.llm_answer_blocks[0];
    assert_eq!(pdr.service_slug, "paintless-dent-repair");
    assert_eq!(pdr.triggers, vec!["door dings", "hail dents"]);
    assert_eq!(pdr.process_steps.len(), 3);
    assert_eq!(pdr.cost_range.range.as_deref(), Some("$75-$450"));
    assert_eq!(pdr.timeline, "1-3 hours");
    assert_eq!(pdr.faqs.len(), 2);
    assert_eq!(pdr.faqs[0].question, "What is the cost for paintless dent repair?");
    assert_eq!(pdr.content_hash.len(), 16);
    assert!(pdr.content_hash.chars().all(|c| c.is_ascii_hexdigit()));

    let hail = &spec.llm_answer_blocks[1];
    assert_eq!(hail.triggers, vec!["When you need hail damage repair"]);
    assert_eq!(hail.process_steps.len(), 5);
    assert!(hail.cost_range.range.is_none());
    assert!(hail.definition.contains("Hail Damage Repair"));

    let hub = spec.page("/services/paintless-dent-repair").unwrap();
    assert_eq!(hub.llm_answer_block_id.as_deref(), Some(pdr.id.as_str()));
    assert!(spec
        .page("/services/door-ding-removal")
        .unwrap()
        .llm_answer_block_id
        .is_none());
}

#[test]
fn content_hash_tracks_source_text() {
    let client = sample_client();
    let service = &client.services[0];
    let triggers = vec!["door dings".to_string()];
    let hash = llm::content_hash(service, &triggers);
    assert_eq!(hash, llm::content_hash(service, &triggers));

    let mut edited = service.clone();
    edited.description = Some("Something else".to_string());
    assert_ne!(hash, llm::content_hash(&edited, &triggers));
}

#[test]
fn fixed_sections_are_populated() {
    let spec = export(&sample_client(), &[]);

    assert_eq!(
        spec.site_config.service_area_text,
        "Serving Bethlehem, PA, Easton, PA, Allentown, PA and surrounding areas"
    );
    assert_eq!(spec.site_config.primary_phone.as_deref(), Some("(610) 555-0199"));
    assert_eq!(spec.content_calendar.len(), 6);
    assert_eq!(spec.content_calendar[0].title, "Complete Guide to Paintless Dent Repair");
    assert_eq!(spec.backlink_targets.len(), 4);
    assert_eq!(spec.internal_linking_rules.len(), 5);
    assert_eq!(spec.metrics_targets.ranking_targets.get("primary_keyword"), Some(&3));
    assert!(spec
        .component_set
        .iter()
        .any(|c| c.name == "StickyCTA"));
}

#[test]
fn json_round_trip_preserves_pages() {
    let spec = export(&sample_client(), &scored(&["gallery_presence"]));
    let json = serde_json::to_string_pretty(&spec).unwrap();
    let back: OutputSpec = serde_json::from_str(&json).unwrap();

    assert_eq!(back.total_pages(), spec.total_pages());
    assert_eq!(routes(&back), routes(&spec));
    assert_eq!(back.llm_answer_blocks.len(), spec.llm_answer_blocks.len());
}
