use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::{GeoBucket, GeoTag};
use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    Pdr,
    Plumbing,
    Hvac,
    Roofing,
    AutoBody,
    Landscaping,
    Electrical,
    EscapeRoom,
    EntertainmentVenue,
    Amusement,
    Events,
    Dental,
    Medspa,
    Chiropractic,
    Law,
    Accounting,
    RealEstate,
    Restaurant,
    Hotel,
    Tourism,
}

/// Rule-dispatch key. Verticals without dedicated rules fall into `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalCategory {
    BlueCollar,
    Entertainment,
    Healthcare,
    General,
}

impl Vertical {
    #[must_use]
    pub fn category(self) -> VerticalCategory {
        match self {
            Vertical::Pdr
            | Vertical::Plumbing
            | Vertical::Hvac
            | Vertical::Roofing
            | Vertical::AutoBody
            | Vertical::Landscaping
            | Vertical::Electrical => VerticalCategory::BlueCollar,
            Vertical::EscapeRoom
            | Vertical::EntertainmentVenue
            | Vertical::Amusement
            | Vertical::Events => VerticalCategory::Entertainment,
            Vertical::Dental | Vertical::Medspa | Vertical::Chiropractic => {
                VerticalCategory::Healthcare
            }
            Vertical::Law
            | Vertical::Accounting
            | Vertical::RealEstate
            | Vertical::Restaurant
            | Vertical::Hotel
            | Vertical::Tourism => VerticalCategory::General,
        }
    }

    /// Plain-language trade name for page copy.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Vertical::Pdr => "paintless dent repair",
            Vertical::Plumbing => "plumbing",
            Vertical::Hvac => "HVAC",
            Vertical::Roofing => "roofing",
            Vertical::AutoBody => "auto body",
            Vertical::Landscaping => "landscaping",
            Vertical::Electrical => "electrical",
            Vertical::EscapeRoom => "escape room",
            Vertical::EntertainmentVenue => "entertainment",
            Vertical::Amusement => "amusement",
            Vertical::Events => "event",
            Vertical::Dental => "dental",
            Vertical::Medspa => "med spa",
            Vertical::Chiropractic => "chiropractic",
            Vertical::Law => "legal",
            Vertical::Accounting => "accounting",
            Vertical::RealEstate => "real estate",
            Vertical::Restaurant => "restaurant",
            Vertical::Hotel => "hospitality",
            Vertical::Tourism => "tourism",
        }
    }
}

impl std::fmt::Display for Vertical {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for VerticalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerticalCategory::BlueCollar => write!(f, "blue_collar"),
            VerticalCategory::Entertainment => write!(f, "entertainment"),
            VerticalCategory::Healthcare => write!(f, "healthcare"),
            VerticalCategory::General => write!(f, "general"),
        }
    }
}

/// Factual service data used to fill LLM answer blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinedVariables {
    #[serde(default)]
    pub time_range: Option<String>,
    #[serde(default)]
    pub cost_range: Option<String>,
    #[serde(default)]
    pub process_steps: Vec<String>,
    #[serde(default)]
    pub best_for: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Derived from `name` on load when omitted.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_money_service: bool,
    #[serde(default)]
    pub parent_service_id: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub defined_variables: Option<DefinedVariables>,
    #[serde(default)]
    pub faq_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    /// `"City, ST"`.
    pub name: String,
    pub geo_bucket: GeoBucket,
    #[serde(default)]
    pub is_primary: bool,
}

impl Location {
    #[must_use]
    pub fn to_geo_tag(&self) -> GeoTag {
        GeoTag::from_location_name(&self.name)
    }

    /// City portion of the name, used in keyword expansion and routes.
    #[must_use]
    pub fn city(&self) -> String {
        self.to_geo_tag().city
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandInfo {
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub business_hours: Option<String>,
}

/// Snapshot of the client's own business listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub vertical: Vertical,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub brand: BrandInfo,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub gbp_profile: Option<BusinessProfile>,
}

impl Client {
    /// First location flagged `is_primary`, else the first location.
    #[must_use]
    pub fn primary_location(&self) -> Option<&Location> {
        self.locations
            .iter()
            .find(|l| l.is_primary)
            .or_else(|| self.locations.first())
    }

    pub fn money_services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|s| s.is_money_service)
    }

    #[must_use]
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn review_count(&self) -> u32 {
        self.gbp_profile
            .as_ref()
            .and_then(|p| p.review_count)
            .unwrap_or(0)
    }

    #[must_use]
    pub fn rating(&self) -> f64 {
        self.gbp_profile
            .as_ref()
            .and_then(|p| p.rating)
            .unwrap_or(0.0)
    }

    /// Domain without scheme or leading `www.`.
    #[must_use]
    pub fn bare_domain(&self) -> String {
        crate::source::extract_domain(&self.domain)
    }
}

/// Generate a URL-safe slug: lowercase alphanumerics joined by single hyphens.
#[must_use]
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c.is_whitespace() || c == '_' || c == '/' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Load and validate a client definition from a YAML file.
///
/// Missing service slugs are derived from the service name.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_client(path: &Path) -> Result<Client, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ClientFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_client(&content)
}

/// Parse and validate a client definition from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if parsing or validation fails.
pub fn parse_client(content: &str) -> Result<Client, ConfigError> {
    let mut client: Client = serde_yaml::from_str(content)?;

    for service in &mut client.services {
        if service.slug.trim().is_empty() {
            service.slug = slugify(&service.name);
        }
    }

    validate_client(&client)?;

    Ok(client)
}

/// Check the structural invariants every pipeline stage relies on.
///
/// # Errors
///
/// Returns `ConfigError::Validation` describing the first violation found.
pub fn validate_client(client: &Client) -> Result<(), ConfigError> {
    if client.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "client name must be non-empty".to_string(),
        ));
    }
    if client.domain.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "client '{}' has an empty domain",
            client.name
        )));
    }
    if client.services.is_empty() {
        return Err(ConfigError::Validation(format!(
            "client '{}' defines no services",
            client.name
        )));
    }
    if client.locations.is_empty() {
        return Err(ConfigError::Validation(format!(
            "client '{}' defines no locations",
            client.name
        )));
    }

    let mut seen_ids = HashSet::new();
    let mut seen_slugs = HashSet::new();
    for service in &client.services {
        if service.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "service '{}' has an empty name",
                service.id
            )));
        }
        if !seen_ids.insert(service.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate service id: '{}'",
                service.id
            )));
        }
        if !seen_slugs.insert(service.slug.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate service slug: '{}' (from service '{}')",
                service.slug, service.name
            )));
        }
    }

    for service in &client.services {
        if let Some(parent) = &service.parent_service_id {
            if parent == &service.id || !seen_ids.contains(parent.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "service '{}' references unknown parent service '{parent}'",
                    service.id
                )));
            }
        }
    }

    let mut seen_locations = HashSet::new();
    for location in &client.locations {
        if location.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "location '{}' has an empty name",
                location.id
            )));
        }
        if !seen_locations.insert(location.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate location id: '{}'",
                location.id
            )));
        }
    }

    if let Some(rating) = client.gbp_profile.as_ref().and_then(|p| p.rating) {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ConfigError::Validation(format!(
                "rating {rating} is outside 0..=5"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
