use serde::{Deserialize, Serialize};

/// Distance band from the client's primary location, nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeoBucket {
    #[serde(rename = "0-10")]
    Miles0To10,
    #[serde(rename = "10-30")]
    Miles10To30,
    #[serde(rename = "30-60")]
    Miles30To60,
    #[serde(rename = "60-90")]
    Miles60To90,
    #[serde(rename = "90+")]
    Miles90Plus,
}

impl GeoBucket {
    /// All buckets in nearest-first order.
    pub const ALL: [GeoBucket; 5] = [
        GeoBucket::Miles0To10,
        GeoBucket::Miles10To30,
        GeoBucket::Miles30To60,
        GeoBucket::Miles60To90,
        GeoBucket::Miles90Plus,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GeoBucket::Miles0To10 => "0-10",
            GeoBucket::Miles10To30 => "10-30",
            GeoBucket::Miles30To60 => "30-60",
            GeoBucket::Miles60To90 => "60-90",
            GeoBucket::Miles90Plus => "90+",
        }
    }

    /// Human-readable column label used in matrix artifacts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GeoBucket::Miles0To10 => "Primary (0-10 mi)",
            GeoBucket::Miles10To30 => "Secondary (10-30 mi)",
            GeoBucket::Miles30To60 => "Extended (30-60 mi)",
            GeoBucket::Miles60To90 => "Far (60-90 mi)",
            GeoBucket::Miles90Plus => "Domestic (90+)",
        }
    }

    /// Route-safe form, e.g. `10-30` or `90-plus`.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            GeoBucket::Miles90Plus => "90-plus",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for GeoBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// City/state tag attached to sources, profiles, and pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoTag {
    pub city: String,
    pub state: String,
}

impl GeoTag {
    /// Parse a `"City, ST"` location name. A missing state becomes empty.
    #[must_use]
    pub fn from_location_name(name: &str) -> Self {
        let mut parts = name.splitn(2, ',');
        let city = parts.next().unwrap_or_default().trim().to_string();
        let state = parts.next().map(str::trim).unwrap_or_default().to_string();
        Self { city, state }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        if self.state.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.state)
        }
    }

    /// `city-st`, or just the city slug when no state is known.
    #[must_use]
    pub fn slug(&self) -> String {
        crate::client::slugify(&self.full_name())
    }
}
