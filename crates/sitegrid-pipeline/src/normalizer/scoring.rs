//! Fixed-weight scores derived from extracted signals.

use sitegrid_core::{
    ConversionMechanics, DataFreshness, PhotoType, PriceTransparency, SeoStructure, Source,
    TrustSignals, VerticalCategory,
};

const MAX_SCORE: f64 = 100.0;
/// Rank assumed for a domain never seen in a SERP.
const UNRANKED_AVERAGE: f64 = 10.0;

fn points(flag: bool, value: f64) -> f64 {
    if flag {
        value
    } else {
        0.0
    }
}

#[allow(clippy::cast_precision_loss)]
fn per_item(items: &[String], each: f64, cap: f64) -> f64 {
    (items.len() as f64 * each).min(cap)
}

/// Trust score on 0-100, weighted by vertical.
#[must_use]
pub fn trust_score(category: VerticalCategory, signals: &TrustSignals) -> f64 {
    let mut score = 0.0;

    if let Some(reviews) = signals.review_count {
        score += (f64::from(reviews) / 10.0).min(10.0);
    }
    if let Some(rating) = signals.rating {
        if rating > 3.0 {
            score += (rating - 3.0) * 10.0;
        }
    }
    score += points(signals.real_photos_vs_stock == PhotoType::Real, 10.0);
    score += points(signals.team_photos, 5.0);
    score += points(signals.video_content, 5.0);
    score += per_item(&signals.badges_associations, 2.0, 10.0);

    score += match category {
        VerticalCategory::BlueCollar => {
            points(signals.licenses_shown, 10.0)
                + points(signals.insurance_shown, 5.0)
                + per_item(&signals.certifications, 3.0, 15.0)
                + points(signals.warranty_guarantee_language.is_some(), 5.0)
                + points(signals.before_after_gallery, 10.0)
        }
        VerticalCategory::Entertainment => {
            points(signals.experience_photos, 10.0)
                + points(signals.promo_video, 10.0)
                + per_item(&signals.awards_shown, 5.0, 15.0)
                + per_item(&signals.press_mentions, 3.0, 10.0)
                + per_item(&signals.unique_features, 3.0, 15.0)
                + per_item(&signals.immersion_indicators, 2.0, 10.0)
        }
        VerticalCategory::Healthcare => {
            per_item(&signals.credentials_shown, 3.0, 15.0)
                + per_item(&signals.board_certifications, 5.0, 15.0)
                + points(signals.patient_testimonials, 10.0)
        }
        VerticalCategory::General => {
            points(signals.experience_photos, 5.0) + per_item(&signals.awards_shown, 3.0, 10.0)
        }
    };

    score.min(MAX_SCORE)
}

/// Conversion score on 0-100, weighted by vertical.
#[must_use]
pub fn conversion_score(category: VerticalCategory, mechanics: &ConversionMechanics) -> f64 {
    let mut score = points(mechanics.phone_visible, 5.0)
        + points(mechanics.phone_clickable, 5.0)
        + points(mechanics.sticky_cta, 10.0)
        + points(mechanics.form_present, 5.0)
        + points(mechanics.chat_widget, 5.0)
        + points(
            mechanics.price_transparency != PriceTransparency::None,
            5.0,
        );

    score += match category {
        VerticalCategory::BlueCollar => {
            points(mechanics.emergency_language, 10.0)
                + points(mechanics.financing_shown, 5.0)
                + points(mechanics.free_quote_language, 5.0)
        }
        VerticalCategory::Entertainment => {
            points(mechanics.online_booking, 15.0)
                + points(mechanics.availability_calendar, 10.0)
                + points(mechanics.group_booking_options, 5.0)
                + points(mechanics.party_packages, 5.0)
                + points(mechanics.corporate_booking, 5.0)
                + points(mechanics.gift_cards, 5.0)
                + points(mechanics.experience_urgency, 5.0)
        }
        VerticalCategory::Healthcare => {
            points(mechanics.online_scheduling, 15.0)
                + points(mechanics.insurance_checker, 10.0)
                + points(mechanics.patient_portal, 5.0)
                + points(mechanics.telehealth_option, 5.0)
        }
        VerticalCategory::General => 0.0,
    };

    score.min(MAX_SCORE)
}

/// `trust·0.3 + conversion·0.2 + authority·0.3 + grid·0.2`, where grid maps
/// an average rank of 1 to 100 and loses 10 per position, within `[0, 100]`.
#[must_use]
pub fn threat_composite(
    trust: f64,
    conversion: f64,
    authority: Option<u32>,
    average_rank: Option<f64>,
) -> f64 {
    let authority = authority.map_or(0.0, f64::from);
    let average_rank = average_rank.unwrap_or(UNRANKED_AVERAGE);
    let grid = (MAX_SCORE - (average_rank - 1.0) * 10.0).clamp(0.0, MAX_SCORE);
    trust * 0.3 + conversion * 0.2 + authority * 0.3 + grid * 0.2
}

/// `min(n/20, 0.5) + success_ratio·0.3 + current_ratio·0.2`, clamped to
/// `[0, 1]`. Zero when nothing about the domain was fetched successfully.
#[must_use]
pub fn confidence(sources: &[&Source]) -> f64 {
    if sources.is_empty() || !sources.iter().any(|s| s.is_success()) {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let total = sources.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let successful = sources.iter().filter(|s| s.is_success()).count() as f64;
    #[allow(clippy::cast_precision_loss)]
    let current = sources
        .iter()
        .filter(|s| s.data_freshness == DataFreshness::Current)
        .count() as f64;

    let volume = (total / 20.0).min(0.5);
    (volume + successful / total * 0.3 + current / total * 0.2).clamp(0.0, 1.0)
}

/// Fixed-threshold strengths and weaknesses.
#[must_use]
pub fn strengths_weaknesses(
    trust: &TrustSignals,
    conversion: &ConversionMechanics,
    structure: &SeoStructure,
) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    match trust.review_count {
        Some(n) if n > 50 => strengths.push(format!("Strong review presence ({n} reviews)")),
        Some(n) if n >= 10 => {}
        _ => weaknesses.push("Low review count".to_string()),
    }
    if let Some(rating) = trust.rating {
        if rating >= 4.5 {
            strengths.push(format!("Excellent rating ({rating:.1})"));
        } else if rating < 4.0 {
            weaknesses.push(format!("Below-average rating ({rating:.1})"));
        }
    }
    if trust.before_after_gallery {
        strengths.push("Before/after gallery".to_string());
    } else {
        weaknesses.push("No visual proof of work".to_string());
    }
    if !trust.certifications.is_empty() {
        strengths.push(format!(
            "Displays credentials ({})",
            trust.certifications.join(", ")
        ));
    }

    if conversion.sticky_cta {
        strengths.push("Sticky CTA".to_string());
    } else {
        weaknesses.push("No sticky CTA".to_string());
    }
    if conversion.chat_widget {
        strengths.push("Live chat available".to_string());
    }
    if !conversion.phone_visible {
        weaknesses.push("Phone not prominently displayed".to_string());
    }
    if conversion.multiple_cta_types {
        strengths.push("Multiple contact methods".to_string());
    }

    if structure.service_area_pages.is_empty() {
        weaknesses.push("No service area pages".to_string());
    } else {
        strengths.push(format!(
            "{} service area pages",
            structure.service_area_pages.len()
        ));
    }
    if structure.blog_active {
        strengths.push("Active blog".to_string());
    } else {
        weaknesses.push("No active blog content".to_string());
    }

    (strengths, weaknesses)
}
