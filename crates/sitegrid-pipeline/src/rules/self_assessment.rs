//! Client-only rules. These never read competitor data.

use sitegrid_core::{
    Client, CompetitorProfile, DataPoints, Finding, FindingCategory, FindingType, Severity,
};

use super::Rule;

pub(super) const RULES: &[Rule] = &[
    Rule::new("client_review_strength", client_review_strength),
    Rule::new("client_rating_strength", client_rating_strength),
];

const STRONG_REVIEW_COUNT: u32 = 100;
const EXCELLENT_RATING: f64 = 4.8;

fn client_review_strength(client: &Client, _competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let reviews = client.review_count();
    if reviews < STRONG_REVIEW_COUNT {
        return Vec::new();
    }
    vec![Finding::new(
        "client_review_strength",
        FindingType::Strength,
        FindingCategory::Trust,
        Severity::Low,
        format!("Strong review presence ({reviews} reviews)"),
    )
    .with_data_points(DataPoints {
        our_value: Some(f64::from(reviews)),
        ..DataPoints::default()
    })]
}

fn client_rating_strength(client: &Client, _competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let rating = client.rating();
    if rating < EXCELLENT_RATING {
        return Vec::new();
    }
    vec![Finding::new(
        "client_rating_strength",
        FindingType::Strength,
        FindingCategory::Trust,
        Severity::Low,
        format!("Excellent rating ({rating:.1})"),
    )
    .with_data_points(DataPoints {
        our_value: Some(rating),
        ..DataPoints::default()
    })]
}
