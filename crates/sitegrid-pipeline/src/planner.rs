//! Stage 1: expand a client's services × geo buckets into an
//! [`IntentGeoMatrix`].

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use sitegrid_core::{
    validate_client, CellCtaRules, Client, ConfigError, GeoBucket, GeoTag, IntentGeoMatrix,
    MatrixCell, MatrixColumn, MatrixRow, MatrixSummary, PageStrategy, Service, UrgencyLevel,
};

pub const MATRIX_VERSION: &str = "1.0";

const TOP_TERMS: usize = 3;
const TOP_LOCATIONS: usize = 3;
const MAX_CLUSTER_KEYWORDS: usize = 15;

/// Build the targeting grid for `client`.
///
/// Rows are money services first, then the rest, each group alphabetical by
/// name. Columns are the distinct buckets present, nearest first. Output is
/// deterministic apart from `generated_at`.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if the client fails
/// [`validate_client`], so every `(service_id, geo_bucket)` key is unique.
#[tracing::instrument(skip_all, fields(client = %client.id))]
pub fn generate_matrix(client: &Client) -> Result<IntentGeoMatrix, ConfigError> {
    validate_client(client)?;

    let rows = build_rows(client);
    let columns = build_columns(client);

    let mut cells = Vec::with_capacity(rows.len() * columns.len());
    for row in &rows {
        let Some(service) = client.service(&row.service_id) else {
            continue;
        };
        for column in &columns {
            cells.push(build_cell(service, row, column));
        }
    }

    let summary = MatrixSummary::from_cells(&cells);
    tracing::info!(
        rows = rows.len(),
        columns = columns.len(),
        cells = cells.len(),
        dedicated = summary.total_pages_needed,
        "matrix generated"
    );

    Ok(IntentGeoMatrix {
        client_id: client.id.clone(),
        generated_at: Utc::now(),
        version: MATRIX_VERSION.to_string(),
        rows,
        columns,
        cells,
        summary,
    })
}

fn build_rows(client: &Client) -> Vec<MatrixRow> {
    let mut services: Vec<&Service> = client.services.iter().collect();
    services.sort_by(|a, b| {
        b.is_money_service
            .cmp(&a.is_money_service)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
    });

    services
        .into_iter()
        .zip(1u32..)
        .map(|(service, priority)| MatrixRow {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            is_money_service: service.is_money_service,
            priority,
        })
        .collect()
}

fn build_columns(client: &Client) -> Vec<MatrixColumn> {
    let mut by_bucket: BTreeMap<GeoBucket, Vec<String>> = BTreeMap::new();
    for location in &client.locations {
        by_bucket
            .entry(location.geo_bucket)
            .or_default()
            .push(location.name.clone());
    }

    // BTreeMap iterates buckets in declaration (nearest-first) order.
    by_bucket
        .into_iter()
        .zip(1u32..)
        .map(|((geo_bucket, locations), priority)| MatrixColumn {
            geo_bucket,
            label: geo_bucket.label().to_string(),
            locations,
            priority,
        })
        .collect()
}

fn build_cell(service: &Service, row: &MatrixRow, column: &MatrixColumn) -> MatrixCell {
    let bucket = column.geo_bucket;
    let (page_strategy, page_type, merge_with) = page_strategy(service, bucket);

    MatrixCell {
        service_id: service.id.clone(),
        geo_bucket: bucket,
        page_strategy,
        schema_types: schema_types(service, page_type),
        page_type: page_type.map(str::to_string),
        merge_with,
        keyword_cluster: keyword_cluster(service, &column.locations),
        proof_requirements: proof_requirements(service, bucket),
        cta_rules: cta_rules(bucket),
        priority_score: priority_score(
            row.is_money_service,
            row.priority,
            column.priority,
            bucket,
        ),
    }
}

/// Strategy decision table: `(strategy, page_type, merge_with)`.
pub(crate) fn page_strategy(
    service: &Service,
    bucket: GeoBucket,
) -> (PageStrategy, Option<&'static str>, Option<String>) {
    use GeoBucket::{Miles0To10, Miles10To30, Miles30To60, Miles60To90, Miles90Plus};

    match (service.is_money_service, bucket) {
        (true, Miles0To10 | Miles10To30 | Miles30To60) => {
            (PageStrategy::Dedicated, Some("service-area"), None)
        }
        (true, Miles60To90 | Miles90Plus) => (PageStrategy::Section, Some("blog"), None),
        (false, Miles0To10) => (PageStrategy::Dedicated, Some("service"), None),
        (false, Miles10To30 | Miles30To60) => match &service.parent_service_id {
            Some(parent) => (PageStrategy::Merged, Some("merged"), Some(parent.clone())),
            None => (PageStrategy::Section, Some("service"), None),
        },
        (false, Miles60To90 | Miles90Plus) => (PageStrategy::None, None, None),
    }
}

/// Up to three keyword/synonym terms crossed with up to three column cities.
pub(crate) fn keyword_cluster(service: &Service, locations: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms: Vec<String> = service
        .keywords
        .iter()
        .chain(&service.synonyms)
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .take(TOP_TERMS)
        .collect();
    if terms.is_empty() {
        terms.push(fallback_term(service));
    }

    let cities: Vec<String> = locations
        .iter()
        .take(TOP_LOCATIONS)
        .map(|name| GeoTag::from_location_name(name).city.to_lowercase())
        .collect();

    let mut seen = HashSet::new();
    let mut cluster = Vec::new();
    for term in &terms {
        let candidates = std::iter::once(term.clone()).chain(
            cities
                .iter()
                .flat_map(|city| [format!("{term} {city}"), format!("{city} {term}")]),
        );
        for keyword in candidates {
            if seen.insert(keyword.clone()) {
                cluster.push(keyword);
            }
        }
    }
    cluster.truncate(MAX_CLUSTER_KEYWORDS);
    cluster
}

fn proof_requirements(service: &Service, bucket: GeoBucket) -> Vec<String> {
    let mut requirements = vec!["reviews_above_fold", "rating_visible"];
    match bucket {
        GeoBucket::Miles0To10 => requirements.extend([
            "before_after_gallery",
            "local_testimonials",
            "certifications_visible",
            "license_badge",
        ]),
        GeoBucket::Miles10To30 => {
            requirements.extend(["local_testimonials", "service_area_mention"]);
        }
        GeoBucket::Miles30To60 | GeoBucket::Miles60To90 | GeoBucket::Miles90Plus => {
            requirements.extend(["travel_time_copy", "service_area_map"]);
        }
    }
    if service.name.to_lowercase().contains("hail") {
        requirements.push("insurance_partnership_badges");
    }
    requirements.into_iter().map(str::to_string).collect()
}

fn cta_rules(bucket: GeoBucket) -> CellCtaRules {
    let (primary, urgency, phone_prominent) = match bucket {
        GeoBucket::Miles0To10 => ("Get Free Quote", UrgencyLevel::High, true),
        GeoBucket::Miles10To30 | GeoBucket::Miles30To60 => {
            ("Schedule Estimate", UrgencyLevel::Medium, true)
        }
        GeoBucket::Miles60To90 | GeoBucket::Miles90Plus => {
            ("Contact Us", UrgencyLevel::Low, false)
        }
    };
    CellCtaRules {
        primary: primary.to_string(),
        urgency,
        phone_prominent,
    }
}

fn schema_types(service: &Service, page_type: Option<&str>) -> Vec<String> {
    let mut schemas: Vec<&str> = match page_type {
        Some("service") => vec!["Service", "LocalBusiness"],
        Some("service-area") => vec!["Service", "LocalBusiness", "GeoCircle"],
        Some("blog") => vec!["Article", "FAQPage"],
        _ => Vec::new(),
    };
    if !service.faq_topics.is_empty() && !schemas.contains(&"FAQPage") {
        schemas.push("FAQPage");
    }
    schemas.into_iter().map(str::to_string).collect()
}

fn bucket_bonus(bucket: GeoBucket) -> f64 {
    match bucket {
        GeoBucket::Miles0To10 => 15.0,
        GeoBucket::Miles10To30 => 10.0,
        GeoBucket::Miles30To60 => 5.0,
        GeoBucket::Miles60To90 => 0.0,
        GeoBucket::Miles90Plus => -5.0,
    }
}

/// `50 + 20·money + max(0, 10 − row) + max(0, 10 − column) + bucket bonus`,
/// clamped to `[0, 100]`.
pub(crate) fn priority_score(
    is_money_service: bool,
    service_rank: u32,
    column_rank: u32,
    bucket: GeoBucket,
) -> f64 {
    let mut score = 50.0;
    if is_money_service {
        score += 20.0;
    }
    score += f64::from(10u32.saturating_sub(service_rank));
    score += f64::from(10u32.saturating_sub(column_rank));
    score += bucket_bonus(bucket);
    score.clamp(0.0, 100.0)
}

/// Slug of the service name with hyphens read as spaces.
fn fallback_term(service: &Service) -> String {
    let slug = if service.slug.is_empty() {
        sitegrid_core::slugify(&service.name)
    } else {
        service.slug.clone()
    };
    slug.replace('-', " ")
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
