//! Engine-wide timing and sizing defaults.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Duration of a programmatic fly-to, in milliseconds.
pub const TRANSITION_DURATION_MS: u64 = 1_000;

/// Extra time after the nominal fly-to duration before the transition is
/// considered finished. Absorbs animation-completion jitter in the engine.
pub const TRANSITION_SETTLE_PADDING_MS: u64 = 100;

/// Quiet period that collapses a burst of viewport signals into one event.
pub const VIEWPORT_DEBOUNCE_MS: u64 = 200;

/// Delay before re-measuring the map canvas after a container resize.
/// Covers the CSS transition of the surrounding layout.
pub const RESIZE_SETTLE_MS: u64 = 300;

/// Upper bound accepted for any configured timer, in milliseconds.
pub const MAX_TIMER_MS: u64 = 60_000;

/// Longest "name - title" label before falling back to the bare name.
pub const MAX_LABEL_CHARS: usize = 30;

/// Default location of the category glyph images.
pub const DEFAULT_ICON_BASE_PATH: &str = "/static/markers";

/// Glyph used for categories missing from the glyph table.
pub const FALLBACK_GLYPH: &str = "pin.svg";

/// Icon edge length in pixels, per display tier.
pub const DOT_ICON_SIZE: (u32, u32) = (10, 10);
pub const REDUCED_ICON_SIZE: (u32, u32) = (20, 20);
pub const FULL_ICON_SIZE: (u32, u32) = (32, 32);
pub const SELECTED_ICON_SIZE: (u32, u32) = (44, 44);

/// Capacity of the per-(descriptor, tier) icon cache.
pub const ICON_CACHE_SIZE: usize = 512;
