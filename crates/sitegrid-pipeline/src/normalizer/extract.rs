//! Independent heuristic extractors over one competitor's sources.
//!
//! Each extractor reads raw payloads and never fails: a missing field or
//! an unmatched pattern leaves the signal at its default.

use std::collections::{BTreeMap, HashSet};

use sitegrid_core::{
    BacklinkProfile, ConversionMechanics, PhotoType, PriceTransparency, SeoStructure,
    ServiceAreaPage, ServicePage, SocialPresence, Source, SourceType, TechnicalSeo,
    TrustSignals,
};

use super::config::{first_label, matching_labels, NormalizerConfig};

/// Text views of a fetched page.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageContent<'a> {
    pub url: &'a str,
    pub markdown: &'a str,
    pub html: &'a str,
    pub metadata: Option<&'a serde_json::Map<String, serde_json::Value>>,
}

impl<'a> PageContent<'a> {
    /// Content view of a successful fetch, if it carried any text.
    pub fn from_source(source: &'a Source) -> Option<Self> {
        if !source.is_success() || !source.source_type.is_content() {
            return None;
        }
        let markdown = source.raw_str("markdown").unwrap_or_default();
        let html = source.raw_str("html").unwrap_or_default();
        if markdown.trim().is_empty() && html.trim().is_empty() {
            return None;
        }
        Some(Self {
            url: &source.url,
            markdown,
            html,
            metadata: source
                .raw_data
                .as_ref()
                .and_then(|raw| raw.get("metadata"))
                .and_then(serde_json::Value::as_object),
        })
    }

    /// Markdown, falling back to HTML when the fetch returned none.
    pub fn text(&self) -> &'a str {
        if self.markdown.trim().is_empty() {
            self.html
        } else {
            self.markdown
        }
    }

    /// HTML, falling back to markdown.
    pub fn markup(&self) -> &'a str {
        if self.html.trim().is_empty() {
            self.markdown
        } else {
            self.html
        }
    }

    pub fn metadata_str(&self, key: &str) -> Option<&'a str> {
        self.metadata?.get(key)?.as_str()
    }
}

/// The homepage fetch if it produced content, else the first content page.
pub(crate) fn primary_page<'a>(sources: &[&'a Source]) -> Option<PageContent<'a>> {
    let first_of = |source_type: SourceType| {
        sources
            .iter()
            .copied()
            .filter(|s| s.source_type == source_type)
            .find_map(PageContent::from_source)
    };
    first_of(SourceType::CompetitorWebsite).or_else(|| first_of(SourceType::CompetitorPage))
}

pub(crate) fn trust_signals(config: &NormalizerConfig, page: &PageContent<'_>) -> TrustSignals {
    let text = page.text();
    let markup = page.markup();
    let trust = &config.trust;

    let certifications = matching_labels(&trust.certifications, text);
    let licenses_shown = certifications.iter().any(|c| c == "licensed");
    let insurance_shown = certifications.iter().any(|c| c == "insured" || c == "bonded");
    let warranty_guarantee_language = trust
        .warranty
        .find(text)
        .map(|m| m.as_str().trim().to_lowercase());

    let real_photos_vs_stock = if trust.stock_photo.is_match(markup) {
        PhotoType::Stock
    } else if trust.real_photo.is_match(text) {
        PhotoType::Real
    } else {
        PhotoType::Mixed
    };

    let ent = &config.entertainment;
    let health = &config.healthcare;

    TrustSignals {
        real_photos_vs_stock,
        team_photos: trust.team.is_match(text),
        video_content: trust.video.is_match(markup),
        badges_associations: matching_labels(&trust.badges, text),
        licenses_shown,
        insurance_shown,
        certifications,
        warranty_guarantee_language,
        before_after_gallery: trust.gallery.is_match(text),
        experience_photos: ent.experience_photos.is_match(text),
        promo_video: ent.promo_video.is_match(text),
        immersion_indicators: matching_labels(&ent.immersion, text),
        awards_shown: matching_labels(&ent.awards, text),
        press_mentions: matching_labels(&ent.press, text),
        unique_features: matching_labels(&ent.unique_features, text),
        credentials_shown: matching_labels(&health.credentials, text),
        board_certifications: matching_labels(&health.board_certification, text),
        patient_testimonials: health.patient_testimonials.is_match(text),
        ..TrustSignals::default()
    }
}

pub(crate) fn conversion_mechanics(
    config: &NormalizerConfig,
    page: &PageContent<'_>,
) -> ConversionMechanics {
    let text = page.text();
    let markup = page.markup();
    let conv = &config.conversion;
    let ent = &config.entertainment;
    let health = &config.healthcare;

    let chat_provider = first_label(&conv.chat_providers, markup);
    let booking_provider = first_label(&ent.booking_providers, markup);
    let price_transparency = if conv.price_range.is_match(text) {
        PriceTransparency::Ranges
    } else if conv.price_anchor.is_match(text) {
        PriceTransparency::Exact
    } else {
        PriceTransparency::None
    };
    // sticky positioning lives in the markup only
    let sticky = !page.html.is_empty() && conv.sticky.is_match(page.html);
    let cta_types = matching_labels(&conv.cta_types, text);

    ConversionMechanics {
        phone_visible: conv.phone.is_match(text),
        phone_clickable: conv.tel_link.is_match(markup),
        sticky_header: sticky,
        sticky_cta: sticky,
        form_present: conv.form.is_match(markup) || conv.form.is_match(text),
        chat_widget: chat_provider.is_some(),
        chat_provider,
        price_transparency,
        multiple_cta_types: cta_types.len() > 1,
        cta_types,
        emergency_language: conv.emergency.is_match(text),
        financing_shown: conv.financing.is_match(text),
        price_anchors: conv.price_anchor.is_match(text),
        free_quote_language: conv.free_quote.is_match(text),
        online_booking: booking_provider.is_some() || ent.booking_language.is_match(text),
        booking_provider,
        availability_calendar: ent.availability_calendar.is_match(text),
        group_booking_options: ent.group_booking.is_match(text),
        party_packages: ent.party_packages.is_match(text),
        corporate_booking: ent.corporate_booking.is_match(text),
        gift_cards: ent.gift_cards.is_match(text),
        experience_urgency: ent.urgency.is_match(text),
        online_scheduling: health.online_scheduling.is_match(text)
            || health.online_scheduling.is_match(markup),
        insurance_checker: health.insurance_checker.is_match(text),
        patient_portal: health.patient_portal.is_match(text),
        telehealth_option: health.telehealth.is_match(text),
        ..ConversionMechanics::default()
    }
}

/// Page-type classification from the URL path; the first matching rule wins.
pub(crate) fn classify_page(url: &str) -> Option<&'static str> {
    const RULES: &[(&[&str], &str)] = &[
        (&["/service", "/what-we-do"], "service"),
        (&["/area", "/location", "/city"], "service-area"),
        (&["/about"], "about"),
        (&["/contact"], "contact"),
        (&["/blog", "/news"], "blog"),
        (&["/faq"], "faq"),
        (&["/gallery", "/portfolio"], "gallery"),
        (&["/review", "/testimonial"], "reviews"),
    ];
    let lower = url.to_lowercase();
    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, page_type)| *page_type)
}

pub(crate) fn seo_structure(sources: &[&Source]) -> SeoStructure {
    let pages: Vec<&Source> = sources
        .iter()
        .copied()
        .filter(|s| s.source_type == SourceType::CompetitorPage)
        .collect();

    let mut structure = SeoStructure {
        page_count: pages.len(),
        ..SeoStructure::default()
    };
    let mut seen_types = HashSet::new();

    for page in pages {
        let Some(page_type) = classify_page(&page.url) else {
            continue;
        };
        if seen_types.insert(page_type) {
            structure.page_types_present.push(page_type.to_string());
        }
        match page_type {
            "service" => structure.service_pages.push(ServicePage {
                url: page.url.clone(),
                service: title_from_url(&page.url),
                word_count: page
                    .raw_str("markdown")
                    .filter(|m| !m.is_empty())
                    .map(|m| m.split_whitespace().count()),
            }),
            "service-area" => structure.service_area_pages.push(ServiceAreaPage {
                url: page.url.clone(),
                location: title_from_url(&page.url),
            }),
            "blog" => structure.blog_active = true,
            _ => {}
        }
    }
    structure
}

pub(crate) fn technical_seo(page: Option<&PageContent<'_>>) -> TechnicalSeo {
    let Some(page) = page else {
        return TechnicalSeo::default();
    };
    TechnicalSeo {
        ssl: page.url.starts_with("https://"),
        mobile_friendly: page.metadata_str("viewport").is_some_and(|v| !v.is_empty()),
    }
}

pub(crate) fn social_presence(config: &NormalizerConfig, page: &PageContent<'_>) -> SocialPresence {
    let markup = page.markup();
    let find = |label: &str| {
        config
            .social
            .iter()
            .find(|p| p.label == label)
            .and_then(|p| p.regex.find(markup))
            .map(|m| format!("https://{}", m.as_str()))
    };
    SocialPresence {
        facebook: find("facebook"),
        instagram: find("instagram"),
        youtube: find("youtube"),
        linkedin: find("linkedin"),
        tiktok: find("tiktok"),
    }
}

/// Mean SERP position per city across organic and local-pack sources.
pub(crate) fn grid_performance(sources: &[&Source]) -> BTreeMap<String, f64> {
    let mut positions: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for source in sources.iter().filter(|s| s.source_type.is_serp()) {
        let Some(position) = source.serp_position.filter(|&p| p > 0) else {
            continue;
        };
        for geo in &source.geo_tags {
            positions.entry(geo.city.clone()).or_default().push(position);
        }
    }
    positions
        .into_iter()
        .map(|(city, ranks)| {
            let sum: u32 = ranks.iter().sum();
            #[allow(clippy::cast_precision_loss)]
            let mean = f64::from(sum) / ranks.len() as f64;
            (city, mean)
        })
        .collect()
}

/// Latest review count and rating seen in the domain's local-pack results.
pub(crate) fn local_pack_reviews(sources: &[&Source]) -> (Option<u32>, Option<f64>) {
    let mut reviews = None;
    let mut rating = None;
    for source in sources
        .iter()
        .filter(|s| s.source_type == SourceType::SerpLocalPack && s.is_success())
    {
        if let Some(count) = source.raw_f64("reviews_count") {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = count.max(0.0) as u32;
            reviews = Some(reviews.map_or(count, |r: u32| r.max(count)));
        }
        if let Some(value) = source.raw_f64("rating") {
            rating = Some(value);
        }
    }
    (reviews, rating)
}

pub(crate) fn backlink_profile(sources: &[&Source]) -> BacklinkProfile {
    let Some(summary) = sources
        .iter()
        .find(|s| s.source_type == SourceType::BacklinkSummary && s.is_success())
    else {
        return BacklinkProfile::default();
    };
    let as_u64 = |key: &str| {
        summary
            .raw_data
            .as_ref()
            .and_then(|raw| raw.get(key))
            .and_then(serde_json::Value::as_u64)
    };
    #[allow(clippy::cast_possible_truncation)]
    let domain_authority = as_u64("rank").map(|rank| rank.min(100) as u32);
    BacklinkProfile {
        total_backlinks: as_u64("backlinks"),
        referring_domains: as_u64("referring_domains"),
        domain_authority,
    }
}

/// Homepage title up to the first `|`, else the domain.
pub(crate) fn business_name(page: Option<&PageContent<'_>>, domain: &str) -> String {
    page.and_then(|p| p.metadata_str("title"))
        .and_then(|title| title.split('|').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| domain.to_string(), str::to_string)
}

/// Distinct service names from `/service` URLs, in first-seen order.
pub(crate) fn services_offered(sources: &[&Source]) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .filter(|s| s.source_type == SourceType::CompetitorPage)
        .filter(|s| s.url.to_lowercase().contains("/service"))
        .map(|s| title_from_url(&s.url))
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect()
}

/// Title-cased last path segment: `/services/hail-repair/` → `Hail Repair`.
pub(crate) fn title_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    segment
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
