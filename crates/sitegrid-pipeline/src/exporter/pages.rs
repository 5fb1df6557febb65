//! Page map: core pages, money-service hubs, and one page per dedicated
//! matrix cell, followed by the internal link graph.

use std::collections::HashSet;

use sitegrid_core::{
    slugify, ActionableInsight, Client, CtaRules, GeoTag, IntentGeoMatrix, InternalLink,
    MatrixCell, PageSpec, PageStrategy, PageType, Service, UrgencyLevel,
};

use super::llm::block_id;
use crate::error::PipelineError;

const META_DESCRIPTION_MAX: usize = 160;
const MAX_CELL_KEYWORDS: usize = 5;
const SERVICE_WORD_COUNT: u32 = 1500;
const SERVICE_AREA_WORD_COUNT: u32 = 900;

const HOME_SERVICE_LINKS: usize = 6;
const SERVICE_AREA_LINKS: usize = 5;
const BACK_TO_SERVICE_LINKS: usize = 2;

/// Components an insight may add to service and service-area pages.
const INJECTABLE_COMPONENTS: &[&str] = &["ReviewsWidget", "BeforeAfterGallery", "StickyCTA"];

/// Build the ordered page map. Priority is the 1-based position.
///
/// # Errors
///
/// Returns a stage error when a dedicated cell names an unknown service or
/// two pages resolve to the same route.
pub(crate) fn page_map(
    client: &Client,
    matrix: &IntentGeoMatrix,
    insights: &[ActionableInsight],
) -> Result<Vec<PageSpec>, PipelineError> {
    let mut pages = vec![home_page(client)];
    pages.extend(client.money_services().map(|s| service_page(client, s)));

    for cell in matrix
        .ordered_cells()
        .filter(|c| c.page_strategy == PageStrategy::Dedicated)
    {
        let service = client.service(&cell.service_id).ok_or_else(|| {
            PipelineError::stage(
                "export",
                format!("matrix cell references unknown service {}", cell.service_id),
            )
        })?;
        if cell.page_type.as_deref() == Some("service-area") {
            let Some(location) = matrix
                .column(cell.geo_bucket)
                .and_then(|col| col.locations.first())
            else {
                continue;
            };
            let mut page = service_area_page(client, service, cell, location);
            if pages.iter().any(|p| p.route == page.route) {
                // Same city name in another state.
                let geo = GeoTag::from_location_name(location);
                page.route = format!("/services/{}/{}", service.slug, geo.slug());
            }
            pages.push(page);
        } else if !service.is_money_service {
            let mut page = service_page(client, service);
            page.keyword_targets = cell_keywords(cell, &page.keyword_targets);
            page.schema_types.clone_from(&cell.schema_types);
            pages.push(page);
        }
    }

    pages.extend([
        about_page(client),
        contact_page(client),
        gallery_page(client),
        faq_page(client),
        reviews_page(client),
    ]);

    let mut seen = HashSet::new();
    for page in &pages {
        if !seen.insert(page.route.as_str()) {
            return Err(PipelineError::stage(
                "export",
                format!("duplicate route {}", page.route),
            ));
        }
    }

    for (page, priority) in pages.iter_mut().zip(1u32..) {
        page.priority = priority;
    }
    apply_insight_components(&mut pages, insights);
    link_pages(client, &mut pages);
    Ok(pages)
}

fn cell_keywords(cell: &MatrixCell, fallback: &[String]) -> Vec<String> {
    if cell.keyword_cluster.is_empty() {
        fallback.to_vec()
    } else {
        cell.keyword_cluster
            .iter()
            .take(MAX_CELL_KEYWORDS)
            .cloned()
            .collect()
    }
}

fn area_name(client: &Client) -> String {
    client
        .primary_location()
        .map_or_else(|| "your area".to_string(), |l| l.name.clone())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Truncate on a char boundary to the meta description limit.
pub(crate) fn meta(text: String) -> String {
    if text.chars().count() <= META_DESCRIPTION_MAX {
        return text;
    }
    text.chars().take(META_DESCRIPTION_MAX).collect()
}

fn cta(primary: &str, urgency_level: UrgencyLevel) -> Option<CtaRules> {
    Some(CtaRules {
        primary_cta: primary.to_string(),
        secondary_cta: None,
        urgency_level,
    })
}

fn base_page(route: &str, page_type: PageType, title: String, h1: String) -> PageSpec {
    PageSpec {
        route: route.to_string(),
        page_type,
        template: page_type.as_str().to_string(),
        title,
        meta_description: String::new(),
        h1,
        geo_target: None,
        service_target: None,
        components: Vec::new(),
        content_requirements: Vec::new(),
        schema_types: Vec::new(),
        internal_links: Vec::new(),
        cta_rules: None,
        priority: 0,
        keyword_targets: Vec::new(),
        word_count_target: None,
        llm_answer_block_id: None,
    }
}

// ---------------------------------------------------------------------------
// Page builders
// ---------------------------------------------------------------------------

fn home_page(client: &Client) -> PageSpec {
    let primary = client.money_services().next();
    let tagline = client
        .brand
        .tagline
        .as_deref()
        .unwrap_or("Professional Services");
    let service_name = primary.map_or("services", |s| s.name.as_str());

    let mut page = base_page(
        "/",
        PageType::Home,
        format!("{} | {tagline}", client.name),
        client.name.clone(),
    );
    page.meta_description = meta(format!(
        "{} provides expert {service_name} in {}.",
        client.name,
        area_name(client)
    ));
    page.components = strings(&[
        "Hero",
        "TrustBar",
        "ServicesGrid",
        "ReviewsWidget",
        "ServiceAreaMap",
        "CTASection",
    ]);
    page.schema_types = strings(&["LocalBusiness", "Organization"]);
    page.cta_rules = cta("Get Free Quote", UrgencyLevel::High);
    page.keyword_targets = primary
        .map(|s| s.name.to_lowercase())
        .into_iter()
        .chain(client.primary_location().map(|l| l.name.to_lowercase()))
        .collect();
    page
}

fn service_page(client: &Client, service: &Service) -> PageSpec {
    let mut page = base_page(
        &format!("/services/{}", service.slug),
        PageType::Service,
        format!("{} | {}", service.name, client.name),
        service.name.clone(),
    );
    let description = service.description.as_deref().unwrap_or_default();
    page.meta_description = meta(
        format!("Expert {} services by {}. {description}", service.name, client.name)
            .trim_end()
            .to_string(),
    );
    page.service_target = Some(service.id.clone());
    page.components = strings(&[
        "ServiceHero",
        "TrustBar",
        "ProcessSteps",
        "PricingBlock",
        "FAQAccordion",
        "RelatedServices",
        "CTASection",
    ]);
    page.content_requirements = strings(&[
        "Service definition",
        "When you need it",
        "Process steps",
        "Pricing range",
        "FAQs",
        "Before/after examples",
    ]);
    page.schema_types = strings(&["Service", "FAQPage"]);
    page.cta_rules = cta("Get Free Quote", UrgencyLevel::High);
    page.keyword_targets = if service.keywords.is_empty() {
        vec![service.name.to_lowercase()]
    } else {
        service.keywords.clone()
    };
    page.word_count_target = Some(SERVICE_WORD_COUNT);
    if service.is_money_service {
        page.llm_answer_block_id = Some(block_id(service));
    }
    page
}

fn service_area_page(
    client: &Client,
    service: &Service,
    cell: &MatrixCell,
    location: &str,
) -> PageSpec {
    let geo = GeoTag::from_location_name(location);
    let place = geo.full_name();
    let mut page = base_page(
        &format!("/services/{}/{}", service.slug, slugify(&geo.city)),
        PageType::ServiceArea,
        format!("{} in {} | {}", service.name, geo.city, client.name),
        format!("{} in {}", service.name, geo.city),
    );
    page.meta_description = meta(format!(
        "Looking for {} in {place}? {} provides expert service. Call today!",
        service.name.to_lowercase(),
        client.name
    ));
    page.geo_target = Some(geo);
    page.service_target = Some(service.id.clone());
    page.components = strings(&[
        "ServiceAreaHero",
        "LocalTrustBar",
        "ServiceDescription",
        "LocalTestimonials",
        "ServiceAreaMap",
        "CTASection",
    ]);
    page.content_requirements = strings(&[
        "Location-specific intro",
        "Service description",
        "Local testimonials",
        "Travel time from shop",
        "Service area map",
    ]);
    page.schema_types.clone_from(&cell.schema_types);
    page.cta_rules = cta(&cell.cta_rules.primary, cell.cta_rules.urgency);
    page.keyword_targets = cell_keywords(cell, &[service.name.to_lowercase()]);
    page.word_count_target = Some(SERVICE_AREA_WORD_COUNT);
    page
}

fn about_page(client: &Client) -> PageSpec {
    let mut page = base_page(
        "/about",
        PageType::About,
        format!("About {}", client.name),
        format!("About {}", client.name),
    );
    page.meta_description = meta(format!(
        "Learn about {}, serving {} with expert {} services.",
        client.name,
        area_name(client),
        client.vertical
    ));
    page.components = strings(&[
        "AboutHero",
        "OwnerStory",
        "TeamSection",
        "CertificationsGrid",
        "TimelineHistory",
        "CTASection",
    ]);
    page.content_requirements = strings(&[
        "Owner/founder story",
        "Years in business",
        "Team photos and bios",
        "Certifications and training",
        "Company values",
    ]);
    page.schema_types = strings(&["AboutPage", "Organization"]);
    page
}

fn contact_page(client: &Client) -> PageSpec {
    let mut page = base_page(
        "/contact",
        PageType::Contact,
        format!("Contact {}", client.name),
        "Contact Us".to_string(),
    );
    page.meta_description = meta(match &client.contact.phone {
        Some(phone) => format!(
            "Contact {} for a free quote. Call {phone} or fill out our contact form.",
            client.name
        ),
        None => format!(
            "Contact {} for a free quote. Fill out our contact form.",
            client.name
        ),
    });
    page.components = strings(&[
        "ContactHero",
        "ContactForm",
        "PhoneBlock",
        "LocationMap",
        "BusinessHours",
    ]);
    page.schema_types = strings(&["ContactPage", "LocalBusiness"]);
    page.cta_rules = cta("Send Message", UrgencyLevel::Medium);
    page
}

fn gallery_page(client: &Client) -> PageSpec {
    let mut page = base_page(
        "/gallery",
        PageType::Gallery,
        format!("Our Work | {}", client.name),
        "Our Work".to_string(),
    );
    page.meta_description = meta(format!(
        "See our {} work. Before and after photos, project gallery, and more.",
        client.vertical
    ));
    page.components = strings(&["GalleryHero", "BeforeAfterGrid", "FilterTabs", "CTASection"]);
    page.content_requirements = strings(&[
        "Before/after photos",
        "Service type categorization",
        "Location tags",
    ]);
    page.schema_types = strings(&["ImageGallery"]);
    page
}

fn faq_page(client: &Client) -> PageSpec {
    let mut page = base_page(
        "/faq",
        PageType::Faq,
        format!("FAQ | {}", client.name),
        "Frequently Asked Questions".to_string(),
    );
    page.meta_description = meta(format!(
        "Frequently asked questions about our {} services. Get answers before you call.",
        client.vertical
    ));
    page.components = strings(&["FAQHero", "FAQAccordion", "CTASection"]);
    page.schema_types = strings(&["FAQPage"]);
    page
}

fn reviews_page(client: &Client) -> PageSpec {
    let mut page = base_page(
        "/reviews",
        PageType::Reviews,
        format!("Reviews | {}", client.name),
        "Customer Reviews".to_string(),
    );
    let reviews = client.review_count();
    page.meta_description = meta(if reviews > 0 {
        format!("See what our customers say. {reviews} reviews and counting.")
    } else {
        "See what our customers say.".to_string()
    });
    page.components = strings(&[
        "ReviewsHero",
        "AggregateRating",
        "ReviewsGrid",
        "CTASection",
    ]);
    page.schema_types = strings(&["Review", "AggregateRating"]);
    page
}

// ---------------------------------------------------------------------------
// Insight components and links
// ---------------------------------------------------------------------------

fn apply_insight_components(pages: &mut [PageSpec], insights: &[ActionableInsight]) {
    let components: Vec<&str> = insights
        .iter()
        .filter_map(|i| i.spec_details.as_ref()?.component.as_deref())
        .filter(|c| INJECTABLE_COMPONENTS.contains(c))
        .collect();
    if components.is_empty() {
        return;
    }

    for page in pages
        .iter_mut()
        .filter(|p| matches!(p.page_type, PageType::Service | PageType::ServiceArea))
    {
        for component in &components {
            if !page.components.iter().any(|c| c == component) {
                page.components.push((*component).to_string());
            }
        }
    }
}

fn link(anchor: String, target: &str, placement: &str) -> InternalLink {
    InternalLink {
        anchor,
        target: target.to_string(),
        placement: Some(placement.to_string()),
    }
}

/// home→service, service→service-area, service-area→service, and each
/// service page to the gallery and reviews pages.
fn link_pages(client: &Client, pages: &mut [PageSpec]) {
    let service_name = |id: &Option<String>| {
        id.as_deref()
            .and_then(|id| client.service(id))
            .map_or_else(String::new, |s| s.name.clone())
    };

    let hubs: Vec<(Option<String>, String)> = pages
        .iter()
        .filter(|p| p.page_type == PageType::Service)
        .map(|p| (p.service_target.clone(), p.route.clone()))
        .collect();
    let areas: Vec<(Option<String>, String, String)> = pages
        .iter()
        .filter(|p| p.page_type == PageType::ServiceArea)
        .map(|p| {
            let city = p.geo_target.as_ref().map_or_else(String::new, |g| g.city.clone());
            (p.service_target.clone(), p.route.clone(), city)
        })
        .collect();

    for page in pages.iter_mut() {
        match page.page_type {
            PageType::Home => {
                page.internal_links = hubs
                    .iter()
                    .take(HOME_SERVICE_LINKS)
                    .map(|(id, route)| link(service_name(id), route, "Services grid"))
                    .collect();
            }
            PageType::Service => {
                let name = service_name(&page.service_target);
                let mut links: Vec<InternalLink> = areas
                    .iter()
                    .filter(|(id, _, _)| *id == page.service_target)
                    .take(SERVICE_AREA_LINKS)
                    .map(|(_, route, city)| {
                        link(format!("{name} in {city}"), route, "Service area section")
                    })
                    .collect();
                links.push(link(format!("See our {name} work"), "/gallery", "Gallery section"));
                links.push(link(
                    "Read customer reviews".to_string(),
                    "/reviews",
                    "Trust section",
                ));
                page.internal_links = links;
            }
            PageType::ServiceArea => {
                let name = service_name(&page.service_target);
                page.internal_links = hubs
                    .iter()
                    .filter(|(id, _)| *id == page.service_target)
                    .take(BACK_TO_SERVICE_LINKS)
                    .map(|(_, route)| link(format!("Learn more about {name}"), route, "Content body"))
                    .collect();
            }
            _ => {}
        }
    }
}
