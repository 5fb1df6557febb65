//! Pattern tables for heuristic signal extraction.
//!
//! Every pattern is compiled case-insensitive. Tables are built once per
//! [`NormalizerConfig`] and handed to the normalizer at construction.

use regex::Regex;
use sitegrid_core::VerticalCategory;

/// A compiled pattern with the label recorded when it matches.
#[derive(Debug, Clone)]
pub struct LabeledPattern {
    pub label: &'static str,
    pub regex: Regex,
}

impl LabeledPattern {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            regex: ci(pattern),
        }
    }
}

fn ci(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("valid regex")
}

fn labeled(table: &[(&'static str, &str)]) -> Vec<LabeledPattern> {
    table
        .iter()
        .map(|(label, pattern)| LabeledPattern::new(label, pattern))
        .collect()
}

/// Labels of every pattern in `table` that matches `text`, in table order.
pub(crate) fn matching_labels(table: &[LabeledPattern], text: &str) -> Vec<String> {
    table
        .iter()
        .filter(|p| p.regex.is_match(text))
        .map(|p| p.label.to_string())
        .collect()
}

/// Label of the first pattern in `table` that matches `text`.
pub(crate) fn first_label(table: &[LabeledPattern], text: &str) -> Option<String> {
    table
        .iter()
        .find(|p| p.regex.is_match(text))
        .map(|p| p.label.to_string())
}

/// Trust-signal patterns shared by every vertical.
#[derive(Debug, Clone)]
pub struct TrustPatterns {
    pub certifications: Vec<LabeledPattern>,
    pub warranty: Regex,
    pub gallery: Regex,
    pub team: Regex,
    pub stock_photo: Regex,
    pub real_photo: Regex,
    pub video: Regex,
    pub badges: Vec<LabeledPattern>,
}

/// Conversion-mechanics patterns shared by every vertical.
#[derive(Debug, Clone)]
pub struct ConversionPatterns {
    pub phone: Regex,
    pub tel_link: Regex,
    pub sticky: Regex,
    pub form: Regex,
    pub chat_providers: Vec<LabeledPattern>,
    pub emergency: Regex,
    pub financing: Regex,
    pub price_anchor: Regex,
    pub price_range: Regex,
    pub free_quote: Regex,
    pub cta_types: Vec<LabeledPattern>,
}

/// Escape rooms, venues, and other experience businesses.
#[derive(Debug, Clone)]
pub struct EntertainmentPatterns {
    pub booking_providers: Vec<LabeledPattern>,
    pub booking_language: Regex,
    pub availability_calendar: Regex,
    pub group_booking: Regex,
    pub party_packages: Regex,
    pub corporate_booking: Regex,
    pub gift_cards: Regex,
    pub urgency: Regex,
    pub experience_photos: Regex,
    pub promo_video: Regex,
    pub awards: Vec<LabeledPattern>,
    pub press: Vec<LabeledPattern>,
    pub unique_features: Vec<LabeledPattern>,
    pub immersion: Vec<LabeledPattern>,
}

#[derive(Debug, Clone)]
pub struct HealthcarePatterns {
    pub credentials: Vec<LabeledPattern>,
    pub board_certification: Vec<LabeledPattern>,
    pub online_scheduling: Regex,
    pub patient_portal: Regex,
    pub insurance_checker: Regex,
    pub telehealth: Regex,
    pub patient_testimonials: Regex,
}

/// Configuration for [`crate::normalizer::ProfileNormalizer`].
///
/// `category` selects which score weights apply; all pattern tables are
/// always compiled so a profile carries every signal it can detect.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    pub category: VerticalCategory,
    pub trust: TrustPatterns,
    pub conversion: ConversionPatterns,
    pub entertainment: EntertainmentPatterns,
    pub healthcare: HealthcarePatterns,
    pub social: Vec<LabeledPattern>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self::for_vertical(VerticalCategory::General)
    }
}

impl NormalizerConfig {
    #[must_use]
    pub fn for_vertical(category: VerticalCategory) -> Self {
        Self {
            category,
            trust: trust_patterns(),
            conversion: conversion_patterns(),
            entertainment: entertainment_patterns(),
            healthcare: healthcare_patterns(),
            social: labeled(&[
                ("facebook", r#"facebook\.com/[^"'\s)]+"#),
                ("instagram", r#"instagram\.com/[^"'\s)]+"#),
                ("youtube", r#"youtube\.com/[^"'\s)]+"#),
                ("linkedin", r#"linkedin\.com/[^"'\s)]+"#),
                ("tiktok", r#"tiktok\.com/@[^"'\s)]+"#),
            ]),
        }
    }
}

fn trust_patterns() -> TrustPatterns {
    TrustPatterns {
        certifications: labeled(&[
            ("certified", r"\bcertified\b"),
            ("licensed", r"\blicensed\b"),
            ("insured", r"\binsured\b"),
            ("bonded", r"\bbonded\b"),
            ("warranty", r"\bwarrant(y|ies)\b"),
            ("guarantee", r"\bguarantee"),
            ("certification", r"\bcertifications?\b"),
            ("accredited", r"\baccredited\b"),
        ]),
        warranty: ci(r"(lifetime|limited|\d+[- ]year)?\s*(warranty|guarantee[d]?)"),
        gallery: ci(r"before\s*(and|&)\s*after|gallery|portfolio"),
        team: ci(r"our\s*team|meet\s*the|about\s*us|our\s*story"),
        stock_photo: ci(r"shutterstock|stock\s*photo|istock|unsplash"),
        real_photo: ci(r"our\s*work|our\s*team|our\s*shop"),
        video: ci(r"youtube\.com/(embed|watch)|vimeo\.com|<video|watch\s*(the\s*|our\s*)?video"),
        badges: labeled(&[
            ("bbb", r"\bbbb\b|better\s*business"),
            ("chamber_of_commerce", r"chamber\s*of\s*commerce"),
            ("angi", r"\bangi(e'?s)?\b"),
            ("homeadvisor", r"home\s*advisor"),
            ("yelp", r"\byelp\b"),
            ("google_partner", r"google\s*partner"),
        ]),
    }
}

fn conversion_patterns() -> ConversionPatterns {
    ConversionPatterns {
        phone: ci(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}"),
        tel_link: ci(r"tel:"),
        sticky: ci(r"sticky|position:\s*fixed|\bfixed\b"),
        form: ci(r"<form|contact\s*form|get\s*a?\s*quote|request\s*(an\s*)?estimate"),
        chat_providers: labeled(&[
            ("livechat", r"livechat"),
            ("intercom", r"intercom"),
            ("drift", r"\bdrift\b"),
            ("hubspot", r"hubspot"),
            ("zendesk", r"zendesk"),
            ("tawk", r"tawk"),
            ("crisp", r"crisp\.chat"),
            ("freshchat", r"freshchat"),
        ]),
        emergency: ci(r"24/7|same\s*day|emergency|urgent|immediate"),
        financing: ci(r"financing|payment\s*plan|affirm|klarna|afterpay"),
        price_anchor: ci(r"\$\d+|starting\s*at|prices?\s*from|\bcost\b"),
        price_range: ci(r"\$\d+\s*-\s*\$\d+"),
        free_quote: ci(r"free\s*(quote|estimate|consultation)"),
        cta_types: labeled(&[
            ("call", r"call\s*us|call\s*now|\bphone\b"),
            ("form", r"contact\s*form|get\s*(a\s*)?quote|submit"),
            ("chat", r"chat\s*with|live\s*chat"),
            ("schedule", r"schedule|book\s*online|appointment"),
        ]),
    }
}

fn entertainment_patterns() -> EntertainmentPatterns {
    EntertainmentPatterns {
        booking_providers: labeled(&[
            ("fareharbor", r"fareharbor"),
            ("resova", r"resova"),
            ("bookeo", r"bookeo"),
            ("xola", r"\bxola\b"),
            ("peek", r"peek\.com|peekpro"),
            ("checkfront", r"checkfront"),
            ("rezdy", r"rezdy"),
        ]),
        booking_language: ci(r"book\s*(now|online|your)|reserve\s*(now|your|a)"),
        availability_calendar: ci(r"availability|calendar|select\s*a\s*(date|time)"),
        group_booking: ci(r"group\s*(booking|rates?|discounts?|events?)|large\s*groups?"),
        party_packages: ci(r"birthday|party\s*packages?|bachelor(ette)?"),
        corporate_booking: ci(r"corporate|team\s*building|company\s*outing"),
        gift_cards: ci(r"gift\s*(cards?|certificates?|vouchers?)"),
        urgency: ci(
            r"limited\s*(spots|availability)|selling\s*(out\s*)?fast|book\s*early|only\s*\d+\s*(spots|slots)\s*left",
        ),
        experience_photos: ci(r"immersive|atmosphere|our\s*rooms|photo\s*gallery|step\s*inside"),
        promo_video: ci(r"trailer|teaser|promo\s*video"),
        awards: labeled(&[
            ("tripadvisor", r"tripadvisor"),
            ("travelers_choice", r"travell?ers'?\s*choice"),
            ("best_of", r"best\s*of\s*\d{4}|voted\s*best"),
            ("award", r"award[- ]winning|\bawards?\b"),
        ]),
        press: labeled(&[
            ("as_seen_on", r"as\s*seen\s*(on|in)"),
            ("featured_in", r"featured\s*(in|on)"),
            ("press", r"\bpress\b|in\s*the\s*news"),
        ]),
        unique_features: labeled(&[
            ("live_actor", r"live\s*actors?"),
            ("multi_room", r"multi[- ]room"),
            ("vr", r"virtual\s*reality|\bvr\b"),
            ("outdoor", r"outdoor\s*(game|adventure|experience)"),
            ("kids_friendly", r"kid[- ]friendly|family[- ]friendly"),
        ]),
        immersion: labeled(&[
            ("storyline", r"storyline|story[- ]driven"),
            ("theme", r"themed"),
            ("props", r"\bprops\b"),
            ("special_effects", r"special\s*effects"),
            ("sound", r"sound\s*design|soundtrack"),
        ]),
    }
}

fn healthcare_patterns() -> HealthcarePatterns {
    HealthcarePatterns {
        credentials: labeled(&[
            ("DDS", r"\bdds\b"),
            ("DMD", r"\bdmd\b"),
            ("MD", r"\bm\.?d\.?\b"),
            ("DO", r"\bd\.o\."),
            ("DC", r"\bd\.c\.|doctor\s*of\s*chiropractic"),
            ("NP", r"\bnp\b|nurse\s*practitioner"),
            ("PA-C", r"\bpa-c\b"),
            ("RN", r"\brn\b|registered\s*nurse"),
        ]),
        board_certification: labeled(&[
            ("board_certified", r"board[- ]certified"),
            ("fellowship", r"fellowship[- ]trained"),
            ("american_board", r"american\s*board\s*of"),
        ]),
        online_scheduling: ci(
            r"(book|schedule|request)\s*(an\s*|your\s*)?appointment|zocdoc|nexhealth|localmed",
        ),
        patient_portal: ci(r"patient\s*portal"),
        insurance_checker: ci(
            r"insurance\s*(verification|checker|we\s*accept)|accepted\s*insurance|verify\s*(your\s*)?insurance",
        ),
        telehealth: ci(r"telehealth|telemedicine|virtual\s*(visit|consult)"),
        patient_testimonials: ci(r"patient\s*(testimonials|stories|reviews)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_vertical_records_category() {
        let config = NormalizerConfig::for_vertical(VerticalCategory::Healthcare);
        assert_eq!(config.category, VerticalCategory::Healthcare);
        assert_eq!(
            NormalizerConfig::default().category,
            VerticalCategory::General
        );
    }

    #[test]
    fn matching_labels_keeps_table_order() {
        let config = NormalizerConfig::default();
        let labels = matching_labels(
            &config.trust.certifications,
            "Fully Licensed and Insured. Lifetime warranty.",
        );
        assert_eq!(labels, vec!["licensed", "insured", "warranty"]);
    }

    #[test]
    fn first_label_picks_chat_provider() {
        let config = NormalizerConfig::default();
        let html = r#"<script src="https://embed.tawk.to/abc"></script>"#;
        assert_eq!(
            first_label(&config.conversion.chat_providers, html).as_deref(),
            Some("tawk")
        );
        assert!(first_label(&config.conversion.chat_providers, "<p>hi</p>").is_none());
    }
}
