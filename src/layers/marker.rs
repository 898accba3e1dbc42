use crate::{
    core::geo::LatLng,
    layers::tier::DisplayTier,
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// Stable, opaque marker identity. The only key used when diffing marker lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MarkerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of place a marker points at; selects the glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    City,
    Landmark,
    Museum,
    Park,
    Mountain,
    Water,
    Religious,
    Airport,
    Station,
    Education,
    /// Anything the glyph table does not know about
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::City => "city",
            Category::Landmark => "landmark",
            Category::Museum => "museum",
            Category::Park => "park",
            Category::Mountain => "mountain",
            Category::Water => "water",
            Category::Religious => "religious",
            Category::Airport => "airport",
            Category::Station => "station",
            Category::Education => "education",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One marker the caller wants on the map.
///
/// Descriptors are re-supplied on every pass; only `id` has to stay stable.
/// Position, category, naming and tier may all change between passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    pub id: MarkerId,
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
    #[serde(default)]
    pub category: Category,
    /// Human-readable name, if the data source has one
    #[serde(default)]
    pub name: Option<String>,
    /// Article title, underscores and all
    pub page_title: String,
    /// Assigned prominence before hover is applied
    #[serde(default)]
    pub tier: DisplayTier,
}

impl MarkerDescriptor {
    pub fn new(id: impl Into<MarkerId>, lat: f64, lon: f64, page_title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            category: Category::default(),
            name: None,
            page_title: page_title.into(),
            tier: DisplayTier::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_tier(mut self, tier: DisplayTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }

    /// Checks the contract every descriptor must meet before it may touch the store
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(MapError::InvalidMarker(format!(
                "marker for '{}' has no id",
                self.page_title
            )));
        }
        if !self.position().is_valid() {
            return Err(MapError::InvalidMarker(format!(
                "marker '{}' has invalid coordinates ({}, {})",
                self.id, self.lat, self.lon
            )));
        }
        Ok(())
    }
}
