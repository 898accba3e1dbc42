//! Icon derivation for markers.
//!
//! Everything here is a pure function of the descriptor content and the tier,
//! which is what makes the LRU in [`IconBuilder`] safe.

use crate::{
    core::config::IconConfig,
    layers::{
        marker::{Category, MarkerDescriptor},
        tier::DisplayTier,
    },
};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Rendered icon handed to the map engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconSpec {
    /// Image path of the category glyph
    pub image_ref: String,
    /// Width and height in pixels
    pub size: (u32, u32),
    /// Text shown next to the glyph; absent at tiers that hide labels
    pub label: Option<String>,
}

/// Derives the label text for a marker.
///
/// Without a name the page title is used with underscores turned into spaces.
/// With a name, a title that already contains the name wins; otherwise the two
/// are joined as `"name - title"`, falling back to the bare name when that
/// would exceed `max_chars` characters. Labels are never truncated.
pub fn marker_label(descriptor: &MarkerDescriptor, max_chars: usize) -> String {
    let title = descriptor.page_title.replace('_', " ");
    let name = match descriptor.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return title,
    };

    if title.contains(name) {
        return title;
    }

    let combined = format!("{name} - {title}");
    if combined.chars().count() > max_chars {
        name.to_string()
    } else {
        combined
    }
}

/// Builds the icon for a descriptor at a given tier
pub fn build_icon(descriptor: &MarkerDescriptor, tier: DisplayTier, config: &IconConfig) -> IconSpec {
    IconSpec {
        image_ref: config.image_ref(descriptor.category),
        size: config.sizes.get(tier),
        label: tier
            .shows_label()
            .then(|| marker_label(descriptor, config.max_label_chars)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IconKey {
    category: Category,
    name: Option<String>,
    page_title: String,
    tier: DisplayTier,
}

impl IconKey {
    fn new(descriptor: &MarkerDescriptor, tier: DisplayTier) -> Self {
        Self {
            category: descriptor.category,
            name: descriptor.name.clone(),
            page_title: descriptor.page_title.clone(),
            tier,
        }
    }
}

/// Caching front for [`build_icon`]
pub struct IconBuilder {
    config: IconConfig,
    cache: LruCache<IconKey, IconSpec>,
    hits: u64,
    misses: u64,
}

impl IconBuilder {
    pub fn new(config: IconConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            config,
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn config(&self) -> &IconConfig {
        &self.config
    }

    /// Returns the icon for `descriptor` at `tier`, building it on a cache miss
    pub fn build(&mut self, descriptor: &MarkerDescriptor, tier: DisplayTier) -> IconSpec {
        let key = IconKey::new(descriptor, tier);
        if let Some(icon) = self.cache.get(&key) {
            self.hits += 1;
            return icon.clone();
        }

        self.misses += 1;
        let icon = build_icon(descriptor, tier, &self.config);
        self.cache.put(key, icon.clone());
        icon
    }

    /// Cache hit and miss counters since construction
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for IconBuilder {
    fn default() -> Self {
        Self::new(IconConfig::default())
    }
}
