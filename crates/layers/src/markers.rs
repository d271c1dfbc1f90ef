use std::collections::BTreeSet;

use formats::records::Place;
use foundation::ids::{EntityKind, EntityRef};
use scene::selection::PositionSet;
use scene::store::DataStore;

use crate::layer::{Layer, LayerId};
use crate::surface::Marker;
use crate::symbology::MarkerStyle;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MarkerLayer {
    id: LayerId,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MarkerLayerSnapshot {
    pub markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self {
            id: LayerId::MARKERS,
        }
    }

    /// One marker per visible place, in store order. Places whose id is in
    /// `highlights` get the highlight style.
    pub fn extract(
        &self,
        store: &DataStore,
        visible: &PositionSet,
        highlights: &BTreeSet<String>,
    ) -> MarkerLayerSnapshot {
        let markers = visible
            .iter()
            .filter_map(|position| store.places.at(position))
            .map(|place| place_marker(place, highlights.contains(&place.id)))
            .collect();
        MarkerLayerSnapshot { markers }
    }
}

impl Default for MarkerLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for MarkerLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

pub fn place_marker(place: &Place, highlighted: bool) -> Marker {
    Marker {
        position: place.coords,
        tooltip: place.canonical_name().to_string(),
        style: if highlighted {
            MarkerStyle::HIGHLIGHT
        } else {
            MarkerStyle::DEFAULT
        },
        target: EntityRef::new(EntityKind::Place, &place.id),
    }
}
