//! Shared trait abstractions
//!
//! [`MapAdapter`] is the seam between this crate and whatever engine actually
//! draws the map; [`Configurable`] unifies runtime reconfiguration.

use crate::{
    core::{
        geo::LatLng,
        viewport::{TransitionId, ViewportSnapshot},
    },
    layers::{icon::IconSpec, marker::MarkerId, tier::Pane},
    prelude::Duration,
    Result,
};

/// The host engine's rendering surface.
///
/// Implementations wrap a concrete engine (a Leaflet bridge, a GPU renderer,
/// the in-memory [`HeadlessAdapter`](crate::rendering::headless::HeadlessAdapter)).
/// Calls are made from a single logical thread and never concurrently.
pub trait MapAdapter {
    /// Engine-side marker object
    type Handle: Clone + std::fmt::Debug;

    /// Whether the engine has finished initializing. While this is false no
    /// other method is called; work is deferred until the engine reports
    /// [`MapEvent::Ready`](crate::input::events::MapEvent::Ready).
    fn is_ready(&self) -> bool {
        true
    }

    /// Creates a marker object at `position` on `pane`. The engine should
    /// report clicks and hover-enters on it tagged with `id`.
    fn create_marker(
        &mut self,
        id: &MarkerId,
        position: LatLng,
        icon: &IconSpec,
        pane: Pane,
    ) -> Self::Handle;

    fn set_position(&mut self, handle: &Self::Handle, position: LatLng);

    fn set_icon(&mut self, handle: &Self::Handle, icon: &IconSpec);

    /// Adds a detached object to `pane`
    fn attach_to_pane(&mut self, handle: &Self::Handle, pane: Pane);

    /// Takes an object off the map
    fn detach(&mut self, handle: &Self::Handle);

    /// Frees a detached object for good. The handle is not used again.
    fn release(&mut self, handle: Self::Handle) {
        let _ = handle;
    }

    /// Starts an animated fly-to. Engines that report completion send
    /// [`MapEvent::AnimationEnd`](crate::input::events::MapEvent::AnimationEnd)
    /// carrying the same `transition`.
    fn animate_view_to(
        &mut self,
        center: LatLng,
        zoom: f64,
        duration: Duration,
        transition: TransitionId,
    );

    /// Bounds, center and zoom as currently displayed
    fn viewport(&self) -> ViewportSnapshot;

    /// Re-measures the canvas after its container changed size
    fn invalidate_size(&mut self);
}

/// Trait for configurable components
pub trait Configurable {
    type Config: Clone;

    /// Get the current configuration
    fn config(&self) -> &Self::Config;

    /// Set new configuration
    fn set_config(&mut self, config: Self::Config) -> Result<()>;

    /// Validate configuration
    fn validate_config(config: &Self::Config) -> Result<()> {
        let _ = config; // Default implementation accepts all configs
        Ok(())
    }

    /// Update configuration with a partial change
    fn update_config<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut Self::Config),
    {
        let mut config = self.config().clone();
        updater(&mut config);
        Self::validate_config(&config)?;
        self.set_config(config)
    }
}
