//! Stage 3: collapse raw sources into one [`CompetitorProfile`] per domain.
//!
//! Only domains the collector profiled (those with a content or backlink
//! source) become competitors; SERP-only domains contribute nothing. Each
//! profile is rebuilt from scratch on every run.

pub mod config;
mod extract;
pub mod scoring;

use std::collections::HashMap;

use chrono::Utc;
use sitegrid_core::{CompetitorProfile, GeoTag, Source, SourceType, ThreatLevel};
use tracing::{debug, info, warn};

pub use config::NormalizerConfig;

use crate::error::NormalizationGap;
use extract::PageContent;

#[derive(Debug, Clone, Default)]
pub struct ProfileNormalizer {
    config: NormalizerConfig,
}

impl ProfileNormalizer {
    #[must_use]
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Build profiles for every collected competitor domain.
    #[must_use]
    pub fn normalize(&self, sources: &[Source]) -> Vec<CompetitorProfile> {
        self.normalize_with_gaps(sources).0
    }

    /// Like [`Self::normalize`], also reporting domains whose content could
    /// not be used. A gap never drops the profile.
    #[tracing::instrument(skip_all, fields(sources = sources.len()))]
    pub fn normalize_with_gaps(
        &self,
        sources: &[Source],
    ) -> (Vec<CompetitorProfile>, Vec<NormalizationGap>) {
        let groups = group_by_domain(sources);

        let mut profiles = Vec::with_capacity(groups.len());
        let mut gaps = Vec::new();
        for (domain, domain_sources) in groups {
            if !domain_sources
                .iter()
                .any(|s| s.source_type.is_content() || s.source_type == SourceType::BacklinkSummary)
            {
                continue;
            }

            let profile = self.profile_domain(domain, &domain_sources);
            if let Some(gap) = content_gap(domain, &domain_sources) {
                warn!(domain = %gap.domain, reason = %gap.reason, "normalization gap");
                gaps.push(gap);
            }
            debug!(
                domain,
                confidence = profile.confidence_score,
                threat = ?profile.overall_threat_level,
                "profile built"
            );
            profiles.push(profile);
        }

        info!(
            profiles = profiles.len(),
            gaps = gaps.len(),
            "normalization complete"
        );
        (profiles, gaps)
    }

    /// Build a single profile from whatever sources exist for `domain`.
    ///
    /// With no sources this yields default signals and zero confidence.
    #[must_use]
    pub fn profile_domain(&self, domain: &str, sources: &[&Source]) -> CompetitorProfile {
        let category = self.config.category;
        let mut profile = CompetitorProfile::empty(domain);
        profile.source_ids = sources.iter().map(|s| s.id.clone()).collect();
        profile.geo_tags = distinct_geo_tags(sources);
        profile.grid_performance = extract::grid_performance(sources);
        profile.backlinks = extract::backlink_profile(sources);
        profile.seo_structure = extract::seo_structure(sources);
        profile.services_offered = extract::services_offered(sources);
        profile.confidence_score = scoring::confidence(sources);
        profile.analyzed_at = Utc::now();

        let page = extract::primary_page(sources);
        profile.name = extract::business_name(page.as_ref(), domain);
        profile.url = Some(
            page.as_ref()
                .map_or_else(|| format!("https://{domain}"), |p| p.url.to_string()),
        );
        profile.technical_seo = extract::technical_seo(page.as_ref());

        if let Some(page) = page.as_ref() {
            profile.trust_signals = extract::trust_signals(&self.config, page);
            profile.conversion_mechanics = extract::conversion_mechanics(&self.config, page);
            profile.social_presence = extract::social_presence(&self.config, page);
        }

        let (reviews, rating) = extract::local_pack_reviews(sources);
        profile.trust_signals.review_count = reviews;
        profile.trust_signals.rating = rating;

        profile.trust_signals.trust_score = scoring::trust_score(category, &profile.trust_signals);
        profile.conversion_mechanics.conversion_score =
            scoring::conversion_score(category, &profile.conversion_mechanics);

        let (strengths, weaknesses) = scoring::strengths_weaknesses(
            &profile.trust_signals,
            &profile.conversion_mechanics,
            &profile.seo_structure,
        );
        profile.strengths = strengths;
        profile.weaknesses = weaknesses;

        let composite = scoring::threat_composite(
            profile.trust_signals.trust_score,
            profile.conversion_mechanics.conversion_score,
            profile.backlinks.domain_authority,
            profile.average_rank(),
        );
        profile.overall_threat_level = ThreatLevel::from_composite(composite);

        profile
    }
}

/// Sources keyed by domain, in first-seen order.
fn group_by_domain(sources: &[Source]) -> Vec<(&str, Vec<&Source>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Source>)> = Vec::new();
    for source in sources {
        let Some(domain) = source.domain.as_deref().filter(|d| !d.is_empty()) else {
            continue;
        };
        let slot = *index.entry(domain).or_insert_with(|| {
            groups.push((domain, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(source);
    }
    groups
}

fn distinct_geo_tags(sources: &[&Source]) -> Vec<GeoTag> {
    let mut tags: Vec<GeoTag> = Vec::new();
    for tag in sources.iter().flat_map(|s| &s.geo_tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

fn content_gap(domain: &str, sources: &[&Source]) -> Option<NormalizationGap> {
    let content: Vec<&&Source> = sources
        .iter()
        .filter(|s| s.source_type.is_content())
        .collect();
    if content.iter().any(|s| PageContent::from_source(s).is_some()) {
        return None;
    }
    let reason = if content.is_empty() {
        "no pages fetched".to_string()
    } else if let Some(error) = content.iter().find_map(|s| s.raw_str("error")) {
        format!("fetch failed: {error}")
    } else {
        "fetched pages carried no content".to_string()
    };
    Some(NormalizationGap {
        domain: domain.to_string(),
        reason,
    })
}

#[cfg(test)]
#[path = "normalizer_test.rs"]
mod tests;
