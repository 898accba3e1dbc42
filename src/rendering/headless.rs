//! In-memory [`MapAdapter`] that draws nothing and records every call.
//!
//! Used by the demo app and the tests. Released objects are dropped, so the
//! object table tracks the live marker count. The operation log grows until
//! it is drained with [`HeadlessAdapter::take_ops`] or
//! [`HeadlessAdapter::clear_ops`].

use crate::{
    core::{
        geo::{LatLng, LatLngBounds},
        viewport::{TransitionId, ViewportSnapshot},
    },
    layers::{icon::IconSpec, marker::MarkerId, tier::Pane},
    prelude::{Duration, HashMap},
    traits::MapAdapter,
};

/// One call made against the adapter
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterOp {
    Create { id: MarkerId, handle: u64, pane: Pane },
    SetPosition { handle: u64, position: LatLng },
    SetIcon { handle: u64 },
    Attach { handle: u64, pane: Pane },
    Detach { handle: u64 },
    AnimateView {
        center: LatLng,
        zoom: f64,
        duration: Duration,
        transition: TransitionId,
    },
    InvalidateSize,
}

impl AdapterOp {
    /// Whether the operation touched a marker object
    pub fn is_marker_op(&self) -> bool {
        !matches!(self, AdapterOp::AnimateView { .. } | AdapterOp::InvalidateSize)
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessMarker {
    pub id: MarkerId,
    pub position: LatLng,
    pub icon: IconSpec,
    /// `None` while detached
    pub pane: Option<Pane>,
}

pub struct HeadlessAdapter {
    ready: bool,
    next_handle: u64,
    objects: HashMap<u64, HeadlessMarker>,
    ops: Vec<AdapterOp>,
    center: LatLng,
    zoom: f64,
    size: (f64, f64),
    measured_size: (f64, f64),
}

impl HeadlessAdapter {
    pub fn new(center: LatLng, zoom: f64, size: (f64, f64)) -> Self {
        Self {
            ready: true,
            next_handle: 1,
            objects: HashMap::default(),
            ops: Vec::new(),
            center,
            zoom,
            size,
            measured_size: size,
        }
    }

    /// An adapter whose engine has not finished loading yet
    pub fn not_ready(center: LatLng, zoom: f64, size: (f64, f64)) -> Self {
        Self {
            ready: false,
            ..Self::new(center, zoom, size)
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Moves the view as a user drag or scroll would
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    /// Changes the container size; takes effect once the canvas is re-measured
    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = (width, height);
    }

    pub fn measured_size(&self) -> (f64, f64) {
        self.measured_size
    }

    pub fn ops(&self) -> &[AdapterOp] {
        &self.ops
    }

    /// Drains the operation log
    pub fn take_ops(&mut self) -> Vec<AdapterOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Number of recorded operations matching `predicate`
    pub fn count_ops<F>(&self, predicate: F) -> usize
    where
        F: Fn(&AdapterOp) -> bool,
    {
        self.ops.iter().filter(|op| predicate(op)).count()
    }

    /// Objects currently attached to some pane
    pub fn attached(&self) -> impl Iterator<Item = &HeadlessMarker> {
        self.objects.values().filter(|m| m.pane.is_some())
    }

    pub fn attached_count(&self) -> usize {
        self.attached().count()
    }

    /// Objects not yet released, attached or not
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The attached object tagged with `id`, if any
    pub fn marker(&self, id: &MarkerId) -> Option<&HeadlessMarker> {
        self.attached().find(|m| &m.id == id)
    }

    fn object_mut(&mut self, handle: u64) -> Option<&mut HeadlessMarker> {
        let object = self.objects.get_mut(&handle);
        if object.is_none() {
            log::warn!("headless adapter: unknown marker handle {}", handle);
        }
        object
    }
}

impl Default for HeadlessAdapter {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 2.0, (1024.0, 768.0))
    }
}

impl MapAdapter for HeadlessAdapter {
    type Handle = u64;

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn create_marker(&mut self, id: &MarkerId, position: LatLng, icon: &IconSpec, pane: Pane) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.objects.insert(
            handle,
            HeadlessMarker {
                id: id.clone(),
                position,
                icon: icon.clone(),
                pane: Some(pane),
            },
        );
        self.ops.push(AdapterOp::Create {
            id: id.clone(),
            handle,
            pane,
        });
        handle
    }

    fn set_position(&mut self, handle: &u64, position: LatLng) {
        if let Some(object) = self.object_mut(*handle) {
            object.position = position;
        }
        self.ops.push(AdapterOp::SetPosition {
            handle: *handle,
            position,
        });
    }

    fn set_icon(&mut self, handle: &u64, icon: &IconSpec) {
        if let Some(object) = self.object_mut(*handle) {
            object.icon = icon.clone();
        }
        self.ops.push(AdapterOp::SetIcon { handle: *handle });
    }

    fn attach_to_pane(&mut self, handle: &u64, pane: Pane) {
        if let Some(object) = self.object_mut(*handle) {
            object.pane = Some(pane);
        }
        self.ops.push(AdapterOp::Attach {
            handle: *handle,
            pane,
        });
    }

    fn detach(&mut self, handle: &u64) {
        if let Some(object) = self.object_mut(*handle) {
            object.pane = None;
        }
        self.ops.push(AdapterOp::Detach { handle: *handle });
    }

    fn release(&mut self, handle: u64) {
        if self.objects.remove(&handle).is_none() {
            log::warn!("headless adapter: released unknown marker handle {}", handle);
        }
    }

    fn animate_view_to(
        &mut self,
        center: LatLng,
        zoom: f64,
        duration: Duration,
        transition: TransitionId,
    ) {
        // No frames to draw, so the view lands on the target right away
        self.center = center;
        self.zoom = zoom;
        self.ops.push(AdapterOp::AnimateView {
            center,
            zoom,
            duration,
            transition,
        });
    }

    fn viewport(&self) -> ViewportSnapshot {
        let (width, height) = self.measured_size;
        let world_px = 256.0 * 2_f64.powf(self.zoom);
        let lng_span = 360.0 * width / world_px;
        let lat_span = 170.0 * height / world_px;
        ViewportSnapshot::new(
            LatLngBounds::around(self.center, lat_span, lng_span),
            self.center,
            self.zoom,
        )
    }

    fn invalidate_size(&mut self) {
        self.measured_size = self.size;
        self.ops.push(AdapterOp::InvalidateSize);
    }
}
