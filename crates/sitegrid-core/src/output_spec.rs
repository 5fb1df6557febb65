//! Website blueprint emitted by the export stage.
//!
//! Plain serializable data; downstream renderers and site generators consume
//! it read-only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoTag;
use crate::matrix::UrgencyLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    Home,
    Service,
    ServiceArea,
    Gallery,
    Faq,
    Blog,
    About,
    Contact,
    Reviews,
}

impl PageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Home => "home",
            PageType::Service => "service",
            PageType::ServiceArea => "service-area",
            PageType::Gallery => "gallery",
            PageType::Faq => "faq",
            PageType::Blog => "blog",
            PageType::About => "about",
            PageType::Contact => "contact",
            PageType::Reviews => "reviews",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Trust,
    Conversion,
    Content,
    Seo,
    Navigation,
    Footer,
    Hero,
    Gallery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLink {
    pub anchor: String,
    pub target: String,
    pub placement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaRules {
    pub primary_cta: String,
    pub secondary_cta: Option<String>,
    pub urgency_level: UrgencyLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub route: String,
    pub page_type: PageType,
    pub template: String,
    pub title: String,
    /// At most 160 characters.
    pub meta_description: String,
    pub h1: String,
    pub geo_target: Option<GeoTag>,
    pub service_target: Option<String>,
    pub components: Vec<String>,
    pub content_requirements: Vec<String>,
    pub schema_types: Vec<String>,
    pub internal_links: Vec<InternalLink>,
    pub cta_rules: Option<CtaRules>,
    /// Build order, 1 = first.
    pub priority: u32,
    pub keyword_targets: Vec<String>,
    pub word_count_target: Option<u32>,
    pub llm_answer_block_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub description: String,
    pub required_data: Vec<String>,
    pub placement_rules: Option<String>,
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLinkingRule {
    pub from_page_type: PageType,
    pub to_page_type: PageType,
    pub anchor_pattern: String,
    pub placement: Option<String>,
    pub max_links: u32,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRequirement {
    pub page_type: PageType,
    pub schema_types: Vec<String>,
    pub required_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRange {
    pub range: Option<String>,
    pub variables: Vec<String>,
    pub disclaimers: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Quotable, entity-clear content block for one money service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmAnswerBlock {
    pub id: String,
    pub service: String,
    pub service_slug: String,
    pub geo_context: Option<GeoTag>,
    pub definition: String,
    pub entity_statement: String,
    pub triggers: Vec<String>,
    pub cost_range: CostRange,
    pub timeline: String,
    pub process_steps: Vec<String>,
    pub benefits: Vec<String>,
    pub how_to_choose: Vec<String>,
    pub faqs: Vec<Faq>,
    pub nap_statement: Option<String>,
    pub content_hash: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCalendarItem {
    pub title: String,
    pub topic: String,
    pub target_keyword: String,
    pub content_type: String,
    pub word_count_target: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinkTarget {
    pub domain: String,
    #[serde(rename = "type")]
    pub target_type: String,
    pub priority: String,
    pub approach: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub domain: String,
    pub site_name: String,
    pub tagline: Option<String>,
    pub primary_phone: Option<String>,
    pub primary_email: Option<String>,
    pub address: Option<String>,
    pub service_area_text: String,
    pub business_hours: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTargets {
    pub organic_traffic_target: u32,
    pub conversion_rate_target: f64,
    pub ranking_targets: BTreeMap<String, u32>,
    pub backlink_target: u32,
    pub authority_target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub client_id: String,
    pub client_name: String,
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub site_config: SiteConfig,
    pub page_map: Vec<PageSpec>,
    pub component_set: Vec<ComponentSpec>,
    pub internal_linking_rules: Vec<InternalLinkingRule>,
    pub schema_requirements: Vec<SchemaRequirement>,
    pub llm_answer_blocks: Vec<LlmAnswerBlock>,
    pub content_calendar: Vec<ContentCalendarItem>,
    pub backlink_targets: Vec<BacklinkTarget>,
    pub insights_applied: Vec<String>,
    pub metrics_targets: MetricsTargets,
}

impl OutputSpec {
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.page_map.len()
    }

    #[must_use]
    pub fn page(&self, route: &str) -> Option<&PageSpec> {
        self.page_map.iter().find(|p| p.route == route)
    }

    pub fn pages_of_type(&self, page_type: PageType) -> impl Iterator<Item = &PageSpec> {
        self.page_map.iter().filter(move |p| p.page_type == page_type)
    }
}
