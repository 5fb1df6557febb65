//! Shared data model, configuration, and provider contracts for the sitegrid
//! competitive-analysis pipeline.

pub mod app_config;
pub mod client;
pub mod config;
pub mod error;
pub mod finding;
pub mod geo;
pub mod insight;
pub mod matrix;
pub mod output_spec;
pub mod profile;
pub mod provider;
pub mod source;

pub use app_config::{AppConfig, Environment};
pub use client::{
    load_client, parse_client, slugify, validate_client, BrandInfo, BusinessProfile, Client,
    ContactInfo, DefinedVariables, Location, Service, Vertical, VerticalCategory,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ProviderError};
pub use finding::{DataPoints, Finding, FindingCategory, FindingType, FindingsReport, Severity};
pub use geo::{GeoBucket, GeoTag};
pub use insight::{
    ActionableInsight, EffortLevel, Evidence, ExpectedImpact, ImpactLevel, InsightReport,
    InsightType, SpecDetails,
};
pub use matrix::{
    CellCtaRules, IntentGeoMatrix, MatrixCell, MatrixColumn, MatrixRow, MatrixSummary,
    PageStrategy, UrgencyLevel,
};
pub use output_spec::{
    BacklinkTarget, ComponentSpec, ComponentType, ContentCalendarItem, CostRange, CtaRules,
    Faq, InternalLink, InternalLinkingRule, LlmAnswerBlock, MetricsTargets, OutputSpec,
    PageSpec, PageType, SchemaRequirement, SiteConfig,
};
pub use profile::{
    BacklinkProfile, CompetitorProfile, ConversionMechanics, PhotoType, PriceTransparency,
    SeoStructure, ServiceAreaPage, ServicePage, SocialPresence, TechnicalSeo, ThreatLevel,
    TrustSignals,
};
pub use provider::{
    BacklinkSummary, ContentProvider, FetchedPage, LocalPackResult, OrganicResult,
    RankingProvider,
};
pub use source::{extract_domain, DataFreshness, ScrapeStatus, Source, SourceType};
