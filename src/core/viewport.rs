use crate::core::geo::{LatLng, LatLngBounds};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// A one-shot fly-to instruction. Once the view controller consumes it, it is gone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTarget {
    /// Where the view should end up
    pub center: LatLng,
    /// Zoom level to settle on
    pub zoom: f64,
}

impl ViewportTarget {
    pub fn new(lat: f64, lng: f64, zoom: f64) -> Self {
        Self {
            center: LatLng::new(lat, lng),
            zoom,
        }
    }

    /// Rejects targets the engine could not fly to
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_valid() {
            return Err(MapError::InvalidConfig(format!(
                "viewport target center out of range: ({}, {})",
                self.center.lat, self.center.lng
            )));
        }
        if !self.zoom.is_finite() || self.zoom < 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "viewport target zoom must be a non-negative number, got {}",
                self.zoom
            )));
        }
        Ok(())
    }
}

/// What the map currently shows, as reported by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    /// Visible geographic area
    pub bounds: LatLngBounds,
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
}

impl ViewportSnapshot {
    pub fn new(bounds: LatLngBounds, center: LatLng, zoom: f64) -> Self {
        Self {
            bounds,
            center,
            zoom,
        }
    }

    /// Whether moving to `target` lowers the zoom level
    pub fn is_zoom_out(&self, target: &ViewportTarget) -> bool {
        target.zoom < self.zoom
    }
}

/// Sequence number of a fly-to, echoed back by the engine when it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionId(pub u64);

impl TransitionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_validation() {
        assert!(ViewportTarget::new(48.85, 2.35, 12.0).validate().is_ok());
        assert!(ViewportTarget::new(120.0, 2.35, 12.0).validate().is_err());
        assert!(ViewportTarget::new(48.85, 2.35, f64::NAN).validate().is_err());
        assert!(ViewportTarget::new(48.85, 2.35, -1.0).validate().is_err());
    }

    #[test]
    fn test_zoom_out_detection() {
        let center = LatLng::new(48.85, 2.35);
        let snapshot = ViewportSnapshot::new(LatLngBounds::around(center, 1.0, 1.0), center, 12.0);

        assert!(snapshot.is_zoom_out(&ViewportTarget::new(48.85, 2.35, 8.0)));
        assert!(!snapshot.is_zoom_out(&ViewportTarget::new(48.85, 2.35, 12.0)));
        assert!(!snapshot.is_zoom_out(&ViewportTarget::new(48.85, 2.35, 15.0)));
    }
}
