//! Experience-business rules: booking flow, immersive media, packages.

use sitegrid_core::{Client, CompetitorProfile, Finding, FindingCategory, FindingType, Severity};

use super::{domains, matching, share_at_least, Rule};

pub(super) const RULES: &[Rule] = &[
    Rule::new("experience_photo", experience_photo),
    Rule::new("online_booking", online_booking),
    Rule::new("group_packages", group_packages),
    Rule::new("unique_experience", unique_experience),
    Rule::new("repeat_visit", repeat_visit),
];

const MAJORITY: f64 = 0.5;

fn experience_photo(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let visual = matching(competitors, |c| {
        c.trust_signals.experience_photos || c.trust_signals.promo_video
    });
    if !share_at_least(visual.len(), competitors.len(), MAJORITY) {
        return Vec::new();
    }
    vec![Finding::new(
        "experience_photo",
        FindingType::Pattern,
        FindingCategory::Trust,
        Severity::High,
        format!(
            "{}/{} competitors showcase the experience with photos or video",
            visual.len(),
            competitors.len()
        ),
    )
    .with_competitors(domains(&visual))]
}

fn online_booking(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let booking = matching(competitors, |c| c.conversion_mechanics.online_booking);
    if !share_at_least(booking.len(), competitors.len(), MAJORITY) {
        return Vec::new();
    }

    let mut providers: Vec<&str> = booking
        .iter()
        .filter_map(|c| c.conversion_mechanics.booking_provider.as_deref())
        .collect();
    providers.sort_unstable();
    providers.dedup();

    let mut finding = Finding::new(
        "online_booking",
        FindingType::Pattern,
        FindingCategory::Conversion,
        Severity::High,
        format!(
            "{}/{} competitors take bookings online",
            booking.len(),
            competitors.len()
        ),
    )
    .with_competitors(domains(&booking));
    if !providers.is_empty() {
        finding = finding.with_details(format!("Booking platforms seen: {}", providers.join(", ")));
    }

    let mut findings = vec![finding];
    let with_calendar = booking
        .iter()
        .filter(|c| c.conversion_mechanics.availability_calendar)
        .count();
    if with_calendar > 0 {
        findings.push(Finding::new(
            "online_booking",
            FindingType::Pattern,
            FindingCategory::Conversion,
            Severity::Medium,
            format!("{with_calendar} competitors show live availability"),
        ));
    }
    findings
}

fn group_packages(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let packaged = matching(competitors, |c| {
        let m = &c.conversion_mechanics;
        m.group_booking_options || m.party_packages || m.corporate_booking
    });

    if packaged.is_empty() {
        return vec![Finding::new(
            "group_packages",
            FindingType::Opportunity,
            FindingCategory::Conversion,
            Severity::Medium,
            "No competitor promotes group, party, or corporate packages",
        )];
    }
    if !share_at_least(packaged.len(), competitors.len(), MAJORITY) {
        return Vec::new();
    }
    vec![Finding::new(
        "group_packages",
        FindingType::Pattern,
        FindingCategory::Conversion,
        Severity::Medium,
        format!(
            "{}/{} competitors promote group or corporate packages",
            packaged.len(),
            competitors.len()
        ),
    )
    .with_competitors(domains(&packaged))]
}

fn unique_experience(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    competitors
        .iter()
        .filter(|c| c.trust_signals.unique_features.len() >= 2)
        .map(|c| {
            Finding::new(
                "unique_experience",
                FindingType::Strength,
                FindingCategory::Content,
                Severity::Medium,
                format!(
                    "{} differentiates with {}",
                    c.domain,
                    c.trust_signals.unique_features.join(", ")
                ),
            )
            .with_competitors(vec![c.domain.clone()])
        })
        .collect()
}

/// Gift cards and scarcity messaging drive return visits.
fn repeat_visit(_client: &Client, competitors: &[CompetitorProfile]) -> Vec<Finding> {
    let retaining = matching(competitors, |c| {
        c.conversion_mechanics.gift_cards || c.conversion_mechanics.experience_urgency
    });
    if !share_at_least(retaining.len(), competitors.len(), MAJORITY) {
        return Vec::new();
    }
    vec![Finding::new(
        "repeat_visit",
        FindingType::Pattern,
        FindingCategory::Conversion,
        Severity::Low,
        format!(
            "{}/{} competitors sell gift cards or use booking urgency",
            retaining.len(),
            competitors.len()
        ),
    )
    .with_competitors(domains(&retaining))]
}
