use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoTag;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoType {
    Real,
    Stock,
    Mixed,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTransparency {
    #[default]
    None,
    Ranges,
    Exact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// Band a 0-100 threat composite.
    #[must_use]
    pub fn from_composite(score: f64) -> Self {
        if score >= 70.0 {
            ThreatLevel::Critical
        } else if score >= 50.0 {
            ThreatLevel::High
        } else if score >= 30.0 {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustSignals {
    pub review_count: Option<u32>,
    pub rating: Option<f64>,
    pub real_photos_vs_stock: PhotoType,
    pub team_photos: bool,
    pub video_content: bool,
    pub badges_associations: Vec<String>,
    pub trust_score: f64,

    pub licenses_shown: bool,
    pub insurance_shown: bool,
    pub certifications: Vec<String>,
    pub warranty_guarantee_language: Option<String>,
    pub before_after_gallery: bool,

    pub experience_photos: bool,
    pub promo_video: bool,
    pub immersion_indicators: Vec<String>,
    pub awards_shown: Vec<String>,
    pub press_mentions: Vec<String>,
    pub unique_features: Vec<String>,

    pub credentials_shown: Vec<String>,
    pub board_certifications: Vec<String>,
    pub patient_testimonials: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionMechanics {
    pub phone_visible: bool,
    pub phone_clickable: bool,
    pub sticky_header: bool,
    pub sticky_cta: bool,
    pub form_present: bool,
    pub chat_widget: bool,
    pub chat_provider: Option<String>,
    pub price_transparency: PriceTransparency,
    pub multiple_cta_types: bool,
    pub cta_types: Vec<String>,
    pub conversion_score: f64,

    pub emergency_language: bool,
    pub financing_shown: bool,
    pub price_anchors: bool,
    pub free_quote_language: bool,

    pub online_booking: bool,
    pub booking_provider: Option<String>,
    pub availability_calendar: bool,
    pub group_booking_options: bool,
    pub party_packages: bool,
    pub corporate_booking: bool,
    pub gift_cards: bool,
    pub experience_urgency: bool,

    pub online_scheduling: bool,
    pub insurance_checker: bool,
    pub patient_portal: bool,
    pub telehealth_option: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePage {
    pub url: String,
    pub service: String,
    pub word_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAreaPage {
    pub url: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoStructure {
    pub page_count: usize,
    pub page_types_present: Vec<String>,
    pub service_pages: Vec<ServicePage>,
    pub service_area_pages: Vec<ServiceAreaPage>,
    pub blog_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSeo {
    pub mobile_friendly: bool,
    pub ssl: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacklinkProfile {
    pub total_backlinks: Option<u64>,
    pub referring_domains: Option<u64>,
    /// 0-100.
    pub domain_authority: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialPresence {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
}

impl SocialPresence {
    #[must_use]
    pub fn platform_count(&self) -> usize {
        [
            &self.facebook,
            &self.instagram,
            &self.youtube,
            &self.linkedin,
            &self.tiktok,
        ]
        .iter()
        .filter(|p| p.is_some())
        .count()
    }
}

/// Structured view of one competitor domain, rebuilt in full on every
/// normalize run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub id: String,
    pub domain: String,
    pub name: String,
    pub url: Option<String>,
    pub source_ids: Vec<String>,
    pub geo_tags: Vec<GeoTag>,
    pub services_offered: Vec<String>,

    pub trust_signals: TrustSignals,
    pub conversion_mechanics: ConversionMechanics,
    pub seo_structure: SeoStructure,
    pub technical_seo: TechnicalSeo,
    /// Mean SERP position keyed by city.
    pub grid_performance: BTreeMap<String, f64>,
    pub backlinks: BacklinkProfile,
    pub social_presence: SocialPresence,

    pub overall_threat_level: ThreatLevel,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,

    pub analyzed_at: DateTime<Utc>,
    pub confidence_score: f64,
}

impl CompetitorProfile {
    /// Profile with no evidence: default signals and zero confidence.
    #[must_use]
    pub fn empty(domain: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            domain: domain.to_string(),
            name: domain.to_string(),
            url: None,
            source_ids: Vec::new(),
            geo_tags: Vec::new(),
            services_offered: Vec::new(),
            trust_signals: TrustSignals::default(),
            conversion_mechanics: ConversionMechanics::default(),
            seo_structure: SeoStructure::default(),
            technical_seo: TechnicalSeo::default(),
            grid_performance: BTreeMap::new(),
            backlinks: BacklinkProfile::default(),
            social_presence: SocialPresence::default(),
            overall_threat_level: ThreatLevel::Low,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            analyzed_at: Utc::now(),
            confidence_score: 0.0,
        }
    }

    /// Mean of the per-city grid positions, if any were observed.
    #[must_use]
    pub fn average_rank(&self) -> Option<f64> {
        if self.grid_performance.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.grid_performance.len() as f64;
        Some(self.grid_performance.values().sum::<f64>() / count)
    }
}
