use crate::{
    core::geo::LatLng,
    layers::{
        icon::IconSpec,
        marker::{MarkerDescriptor, MarkerId},
        tier::{DisplayTier, Pane},
    },
    prelude::HashMap,
};

/// A marker as it currently exists on the map
#[derive(Debug, Clone)]
pub struct RenderedMarker<H> {
    /// Descriptor from the pass that last touched this marker
    pub descriptor: MarkerDescriptor,
    /// Live engine object; owned by the store
    pub handle: H,
    pub tier: DisplayTier,
    pub pane: Pane,
    pub position: LatLng,
    pub icon: IconSpec,
}

impl<H> RenderedMarker<H> {
    pub fn id(&self) -> &MarkerId {
        &self.descriptor.id
    }
}

/// Authoritative mapping from marker identity to what is drawn for it.
///
/// Pure bookkeeping: the store never talks to the map engine.
pub struct MarkerStore<H> {
    markers: HashMap<MarkerId, RenderedMarker<H>>,
}

impl<H> MarkerStore<H> {
    pub fn new() -> Self {
        Self {
            markers: HashMap::default(),
        }
    }

    pub fn get(&self, id: &MarkerId) -> Option<&RenderedMarker<H>> {
        self.markers.get(id)
    }

    pub fn get_mut(&mut self, id: &MarkerId) -> Option<&mut RenderedMarker<H>> {
        self.markers.get_mut(id)
    }

    pub fn contains(&self, id: &MarkerId) -> bool {
        self.markers.contains_key(id)
    }

    /// Inserts or replaces the entry for the marker's id, returning the old one
    pub fn upsert(&mut self, marker: RenderedMarker<H>) -> Option<RenderedMarker<H>> {
        self.markers.insert(marker.id().clone(), marker)
    }

    pub fn remove(&mut self, id: &MarkerId) -> Option<RenderedMarker<H>> {
        self.markers.remove(id)
    }

    /// Every stored id, in no particular order
    pub fn all_ids(&self) -> Vec<MarkerId> {
        self.markers.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedMarker<H>> {
        self.markers.values()
    }

    /// Empties the store, handing back everything it held
    pub fn drain(&mut self) -> Vec<RenderedMarker<H>> {
        self.markers.drain().map(|(_, marker)| marker).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl<H> Default for MarkerStore<H> {
    fn default() -> Self {
        Self::new()
    }
}
