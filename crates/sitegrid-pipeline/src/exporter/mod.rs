//! Stage 5: assemble the website blueprint ([`OutputSpec`]) from the
//! client, matrix and scored insights.

mod llm;
mod pages;

use std::collections::BTreeMap;

use chrono::Utc;
use sitegrid_core::{
    ActionableInsight, BacklinkTarget, Client, ComponentSpec, ComponentType, ContentCalendarItem,
    IntentGeoMatrix, InternalLinkingRule, MetricsTargets, OutputSpec, PageType,
    SchemaRequirement, SiteConfig,
};
use tracing::{info, instrument};

use crate::error::PipelineError;

pub const OUTPUT_SPEC_VERSION: &str = "1.0.0";

const SERVICE_AREA_NAMES: usize = 5;
const CALENDAR_SERVICES: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpecExporter;

impl SpecExporter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the blueprint. Route set and order depend only on the client,
    /// matrix and insights.
    ///
    /// # Errors
    ///
    /// Returns a stage error when the matrix references a service the client
    /// does not define, or when two pages resolve to the same route.
    #[instrument(skip_all, fields(client = %client.id, insights = insights.len()))]
    pub fn export(
        &self,
        client: &Client,
        matrix: &IntentGeoMatrix,
        insights: &[ActionableInsight],
    ) -> Result<OutputSpec, PipelineError> {
        let page_map = pages::page_map(client, matrix, insights)?;
        let llm_answer_blocks = llm::answer_blocks(client);

        info!(
            pages = page_map.len(),
            answer_blocks = llm_answer_blocks.len(),
            "output spec assembled"
        );

        Ok(OutputSpec {
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            generated_at: Utc::now(),
            version: OUTPUT_SPEC_VERSION.to_string(),
            site_config: site_config(client),
            page_map,
            component_set: component_set(),
            internal_linking_rules: linking_rules(),
            schema_requirements: schema_requirements(),
            llm_answer_blocks,
            content_calendar: content_calendar(client),
            backlink_targets: backlink_targets(),
            insights_applied: insights.iter().map(|i| i.id.clone()).collect(),
            metrics_targets: metrics_targets(),
        })
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn site_config(client: &Client) -> SiteConfig {
    let areas: Vec<&str> = client
        .locations
        .iter()
        .take(SERVICE_AREA_NAMES)
        .map(|l| l.name.as_str())
        .collect();

    SiteConfig {
        domain: client.domain.clone(),
        site_name: client.name.clone(),
        tagline: client.brand.tagline.clone(),
        primary_phone: client.contact.phone.clone(),
        primary_email: client.contact.email.clone(),
        address: client.contact.address.clone(),
        service_area_text: format!("Serving {} and surrounding areas", areas.join(", ")),
        business_hours: client.contact.business_hours.clone(),
    }
}

fn component(
    name: &str,
    component_type: ComponentType,
    description: &str,
    required_data: &[&str],
    placement: &str,
) -> ComponentSpec {
    ComponentSpec {
        name: name.to_string(),
        component_type,
        description: description.to_string(),
        required_data: strings(required_data),
        placement_rules: Some(placement.to_string()),
        variants: Vec::new(),
    }
}

fn component_set() -> Vec<ComponentSpec> {
    vec![
        component(
            "Hero",
            ComponentType::Hero,
            "Main hero section with headline and CTA",
            &["title", "subtitle", "cta_text", "cta_link", "background_image"],
            "Top of page, full width",
        ),
        component(
            "TrustBar",
            ComponentType::Trust,
            "Trust signals bar with reviews, badges, certifications",
            &["rating", "review_count", "certifications", "badges"],
            "Below hero or in header",
        ),
        component(
            "ReviewsWidget",
            ComponentType::Trust,
            "Embedded Google reviews widget",
            &["place_id", "display_count"],
            "Above fold on service pages",
        ),
        component(
            "BeforeAfterGallery",
            ComponentType::Gallery,
            "Interactive before/after comparison gallery",
            &["images"],
            "Service pages, proof sections",
        ),
        component(
            "FAQAccordion",
            ComponentType::Content,
            "Expandable FAQ section",
            &["faqs"],
            "Service pages, dedicated FAQ page",
        ),
        component(
            "ServiceAreaMap",
            ComponentType::Content,
            "Interactive map showing service areas",
            &["center_coordinates", "service_radius", "highlighted_cities"],
            "Home page, service area pages",
        ),
        component(
            "CTASection",
            ComponentType::Conversion,
            "Call-to-action section with phone and form",
            &["headline", "phone", "form_id"],
            "Bottom of every page",
        ),
        component(
            "StickyCTA",
            ComponentType::Conversion,
            "Fixed CTA bar that appears on scroll",
            &["phone", "cta_text"],
            "Fixed position header on scroll",
        ),
        component(
            "ProcessSteps",
            ComponentType::Content,
            "Visual process/timeline steps",
            &["steps"],
            "Service pages",
        ),
        component(
            "PricingBlock",
            ComponentType::Content,
            "Price range and factors display",
            &["price_range", "factors"],
            "Service pages",
        ),
    ]
}

fn linking_rules() -> Vec<InternalLinkingRule> {
    let rule = |from, to, anchor: &str, placement: &str, max_links, priority| InternalLinkingRule {
        from_page_type: from,
        to_page_type: to,
        anchor_pattern: anchor.to_string(),
        placement: Some(placement.to_string()),
        max_links,
        priority,
    };
    vec![
        rule(PageType::Home, PageType::Service, "{service_name}", "Services grid", 6, 1),
        rule(
            PageType::Service,
            PageType::ServiceArea,
            "{service_name} in {city}",
            "Service area section",
            5,
            2,
        ),
        rule(
            PageType::ServiceArea,
            PageType::Service,
            "Learn more about {service_name}",
            "Content body",
            2,
            3,
        ),
        rule(
            PageType::Service,
            PageType::Gallery,
            "See our {service_name} work",
            "Gallery section",
            1,
            4,
        ),
        rule(
            PageType::Service,
            PageType::Reviews,
            "Read customer reviews",
            "Trust section",
            1,
            5,
        ),
    ]
}

fn schema_requirements() -> Vec<SchemaRequirement> {
    let requirement = |page_type, schema_types: &[&str], required_fields: &[&str]| {
        SchemaRequirement {
            page_type,
            schema_types: strings(schema_types),
            required_fields: strings(required_fields),
        }
    };
    vec![
        requirement(
            PageType::Home,
            &["LocalBusiness", "Organization"],
            &["name", "address", "telephone", "openingHours", "geo", "areaServed"],
        ),
        requirement(
            PageType::Service,
            &["Service", "FAQPage"],
            &["name", "description", "provider", "areaServed", "mainEntity"],
        ),
        requirement(
            PageType::ServiceArea,
            &["Service", "LocalBusiness", "GeoCircle"],
            &["name", "areaServed", "geo", "geoMidpoint", "geoRadius"],
        ),
        requirement(PageType::Faq, &["FAQPage"], &["mainEntity"]),
        requirement(
            PageType::Reviews,
            &["AggregateRating", "Review"],
            &["ratingValue", "reviewCount", "bestRating"],
        ),
    ]
}

fn content_calendar(client: &Client) -> Vec<ContentCalendarItem> {
    client
        .money_services()
        .take(CALENDAR_SERVICES)
        .flat_map(|service| {
            let name = &service.name;
            let lowered = name.to_lowercase();
            [
                ContentCalendarItem {
                    title: format!("Complete Guide to {name}"),
                    topic: name.clone(),
                    target_keyword: format!("what is {lowered}"),
                    content_type: "guide".to_string(),
                    word_count_target: 2000,
                },
                ContentCalendarItem {
                    title: format!("{name} FAQ: Your Questions Answered"),
                    topic: name.clone(),
                    target_keyword: format!("{lowered} faq"),
                    content_type: "faq".to_string(),
                    word_count_target: 1500,
                },
                ContentCalendarItem {
                    title: format!("{name} vs [Alternative]: Which is Right for You?"),
                    topic: name.clone(),
                    target_keyword: format!("{lowered} vs"),
                    content_type: "comparison".to_string(),
                    word_count_target: 1500,
                },
            ]
        })
        .collect()
}

fn backlink_targets() -> Vec<BacklinkTarget> {
    [
        ("Local Chamber of Commerce", "chamber", "high", "membership"),
        ("BBB", "trust_badge", "high", "accreditation"),
        ("Yelp Business", "directory", "medium", "claim listing"),
        ("Local news site", "press", "medium", "press release"),
    ]
    .into_iter()
    .map(|(domain, target_type, priority, approach)| BacklinkTarget {
        domain: domain.to_string(),
        target_type: target_type.to_string(),
        priority: priority.to_string(),
        approach: approach.to_string(),
    })
    .collect()
}

fn metrics_targets() -> MetricsTargets {
    MetricsTargets {
        organic_traffic_target: 1000,
        conversion_rate_target: 0.05,
        ranking_targets: BTreeMap::from([
            ("primary_keyword".to_string(), 3),
            ("secondary_keyword".to_string(), 5),
        ]),
        backlink_target: 50,
        authority_target: 20,
    }
}

#[cfg(test)]
#[path = "exporter_test.rs"]
mod tests;
