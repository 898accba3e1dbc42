//! Configuration for marker rendering and viewport timing
//!
//! Options can be built in code, picked from a [`ViewProfile`] preset, or
//! loaded from JSON. Every field has a default, so a JSON document only needs
//! the values it wants to change.

use crate::{
    core::constants,
    layers::{marker::Category, tier::DisplayTier},
    prelude::{Duration, HashMap},
    MapError, Result,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_GLYPHS: Lazy<HashMap<Category, &'static str>> = Lazy::new(|| {
    let mut glyphs = HashMap::default();
    glyphs.insert(Category::City, "city.svg");
    glyphs.insert(Category::Landmark, "landmark.svg");
    glyphs.insert(Category::Museum, "museum.svg");
    glyphs.insert(Category::Park, "park.svg");
    glyphs.insert(Category::Mountain, "mountain.svg");
    glyphs.insert(Category::Water, "water.svg");
    glyphs.insert(Category::Religious, "religious.svg");
    glyphs.insert(Category::Airport, "airport.svg");
    glyphs.insert(Category::Station, "station.svg");
    glyphs.insert(Category::Education, "education.svg");
    glyphs
});

#[derive(Debug, Clone, PartialEq)]
pub enum ViewProfile {
    Standard,
    /// Shorter animations and debounce, for dense UIs that refetch cheaply
    Snappy,
    Custom(ViewTimingConfig),
}

impl ViewProfile {
    pub fn resolve(&self) -> ViewTimingConfig {
        match self {
            Self::Standard => ViewTimingConfig {
                transition_duration_ms: constants::TRANSITION_DURATION_MS,
                transition_padding_ms: constants::TRANSITION_SETTLE_PADDING_MS,
                debounce_ms: constants::VIEWPORT_DEBOUNCE_MS,
                resize_settle_ms: constants::RESIZE_SETTLE_MS,
            },
            Self::Snappy => ViewTimingConfig {
                transition_duration_ms: 500,
                transition_padding_ms: 50,
                debounce_ms: 100,
                resize_settle_ms: 150,
            },
            Self::Custom(timing) => timing.clone(),
        }
    }
}

impl Default for ViewProfile {
    fn default() -> Self {
        Self::Standard
    }
}

/// Timers owned by the view controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewTimingConfig {
    pub transition_duration_ms: u64,
    pub transition_padding_ms: u64,
    pub debounce_ms: u64,
    pub resize_settle_ms: u64,
}

impl ViewTimingConfig {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// Time from starting a fly-to until it is declared finished
    pub fn transition_deadline(&self) -> Duration {
        Duration::from_millis(
            self.transition_duration_ms
                .saturating_add(self.transition_padding_ms),
        )
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn resize_settle(&self) -> Duration {
        Duration::from_millis(self.resize_settle_ms)
    }

    fn fields(&self) -> [(&'static str, u64); 4] {
        [
            ("transition_duration_ms", self.transition_duration_ms),
            ("transition_padding_ms", self.transition_padding_ms),
            ("debounce_ms", self.debounce_ms),
            ("resize_settle_ms", self.resize_settle_ms),
        ]
    }
}

impl Default for ViewTimingConfig {
    fn default() -> Self {
        ViewProfile::default().resolve()
    }
}

/// Icon edge lengths in pixels, one entry per tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierSizes {
    pub dot: (u32, u32),
    pub reduced: (u32, u32),
    pub full: (u32, u32),
    pub selected: (u32, u32),
}

impl TierSizes {
    pub fn get(&self, tier: DisplayTier) -> (u32, u32) {
        match tier {
            DisplayTier::Dot => self.dot,
            DisplayTier::Reduced => self.reduced,
            DisplayTier::Full => self.full,
            DisplayTier::Selected => self.selected,
        }
    }
}

impl Default for TierSizes {
    fn default() -> Self {
        Self {
            dot: constants::DOT_ICON_SIZE,
            reduced: constants::REDUCED_ICON_SIZE,
            full: constants::FULL_ICON_SIZE,
            selected: constants::SELECTED_ICON_SIZE,
        }
    }
}

/// Static icon resources: where glyphs live and which glyph each category uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub base_path: String,
    pub glyphs: HashMap<Category, String>,
    pub fallback_glyph: String,
    pub sizes: TierSizes,
    pub max_label_chars: usize,
    pub cache_size: usize,
}

impl IconConfig {
    /// Glyph file for a category, or the fallback when the table has no entry
    pub fn glyph_for(&self, category: Category) -> &str {
        self.glyphs
            .get(&category)
            .map(String::as_str)
            .unwrap_or(&self.fallback_glyph)
    }

    /// Full image reference for a category
    pub fn image_ref(&self, category: Category) -> String {
        format!(
            "{}/{}",
            self.base_path.trim_end_matches('/'),
            self.glyph_for(category)
        )
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            base_path: constants::DEFAULT_ICON_BASE_PATH.to_string(),
            glyphs: DEFAULT_GLYPHS
                .iter()
                .map(|(category, glyph)| (*category, glyph.to_string()))
                .collect(),
            fallback_glyph: constants::FALLBACK_GLYPH.to_string(),
            sizes: TierSizes::default(),
            max_label_chars: constants::MAX_LABEL_CHARS,
            cache_size: constants::ICON_CACHE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerMapOptions {
    pub view: ViewTimingConfig,
    pub icons: IconConfig,
}

impl MarkerMapOptions {
    pub fn with_profile(profile: ViewProfile) -> Self {
        Self {
            view: profile.resolve(),
            ..Self::default()
        }
    }

    /// Parses options from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.view.transition_duration_ms == 0 {
            return Err(MapError::InvalidConfig(
                "transition_duration_ms must be positive".to_string(),
            ));
        }
        if self.view.debounce_ms == 0 {
            return Err(MapError::InvalidConfig(
                "debounce_ms must be positive".to_string(),
            ));
        }
        for (field, value) in self.view.fields() {
            if value > constants::MAX_TIMER_MS {
                return Err(MapError::InvalidConfig(format!(
                    "{} must be at most {}, got {}",
                    field,
                    constants::MAX_TIMER_MS,
                    value
                )));
            }
        }
        if self.icons.max_label_chars == 0 {
            return Err(MapError::InvalidConfig(
                "max_label_chars must be positive".to_string(),
            ));
        }
        if self.icons.cache_size == 0 {
            return Err(MapError::InvalidConfig(
                "icon cache_size must be positive".to_string(),
            ));
        }
        if self.icons.fallback_glyph.is_empty() {
            return Err(MapError::InvalidConfig(
                "fallback_glyph must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_profile_matches_constants() {
        let timing = ViewProfile::Standard.resolve();
        assert_eq!(timing.transition_duration(), Duration::from_secs(1));
        assert_eq!(timing.transition_deadline(), Duration::from_millis(1_100));
        assert_eq!(timing.debounce(), Duration::from_millis(200));
    }

    #[test]
    fn test_custom_profile_passthrough() {
        let custom = ViewTimingConfig {
            transition_duration_ms: 2_000,
            transition_padding_ms: 0,
            debounce_ms: 50,
            resize_settle_ms: 10,
        };
        assert_eq!(ViewProfile::Custom(custom.clone()).resolve(), custom);
    }

    #[test]
    fn test_glyph_lookup_with_fallback() {
        let mut icons = IconConfig::default();
        assert_eq!(icons.image_ref(Category::Museum), "/static/markers/museum.svg");
        assert_eq!(icons.image_ref(Category::Other), "/static/markers/pin.svg");

        icons.glyphs.remove(&Category::Museum);
        icons.base_path = "/img/".to_string();
        assert_eq!(icons.image_ref(Category::Museum), "/img/pin.svg");
    }

    #[test]
    fn test_partial_json_options() {
        let json = r#"{
            "view": { "debounce_ms": 350 },
            "icons": { "base_path": "/assets", "glyphs": { "park": "tree.png" } }
        }"#;
        let options = MarkerMapOptions::from_json_str(json).unwrap();

        assert_eq!(options.view.debounce_ms, 350);
        assert_eq!(options.view.transition_duration_ms, 1_000);
        assert_eq!(options.icons.image_ref(Category::Park), "/assets/tree.png");
        assert_eq!(options.icons.image_ref(Category::City), "/assets/pin.svg");
        assert_eq!(options.icons.max_label_chars, 30);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let json = r#"{ "view": { "debounce_ms": 0 } }"#;
        assert!(matches!(
            MarkerMapOptions::from_json_str(json),
            Err(MapError::InvalidConfig(_))
        ));
        assert!(matches!(
            MarkerMapOptions::from_json_str("{ not json"),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_oversized_timers_rejected() {
        let huge = r#"{ "view": { "transition_duration_ms": 18446744073709551615, "transition_padding_ms": 100 } }"#;
        assert!(matches!(
            MarkerMapOptions::from_json_str(huge),
            Err(MapError::InvalidConfig(msg)) if msg.contains("transition_duration_ms")
        ));

        let slow = r#"{ "view": { "resize_settle_ms": 60001 } }"#;
        assert!(matches!(
            MarkerMapOptions::from_json_str(slow),
            Err(MapError::InvalidConfig(_))
        ));

        let edge = r#"{ "view": { "debounce_ms": 60000 } }"#;
        assert!(MarkerMapOptions::from_json_str(edge).is_ok());
    }

    #[test]
    fn test_transition_deadline_saturates() {
        let timing = ViewTimingConfig {
            transition_duration_ms: u64::MAX,
            transition_padding_ms: 100,
            ..ViewTimingConfig::default()
        };
        assert_eq!(timing.transition_deadline(), Duration::from_millis(u64::MAX));
    }
}
