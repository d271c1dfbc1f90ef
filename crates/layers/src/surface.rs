//! The map library boundary.
//!
//! Tile fetching, projection and drawing belong to whatever implements
//! [`MapSurface`]. This crate only hands it features to draw. Every feature
//! carries the entity its click should surface, so the host routes clicks
//! back as `EntityRef`s instead of registering closures.

use std::collections::BTreeMap;

use foundation::geo::{LatLng, MapView};
use foundation::ids::EntityRef;

use crate::layer::LayerId;
use crate::symbology::{LineStyle, MarkerStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub tooltip: String,
    pub style: MarkerStyle,
    pub target: EntityRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<LatLng>,
    pub tooltip: String,
    pub style: LineStyle,
    pub target: EntityRef,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Marker(Marker),
    Polyline(Polyline),
}

impl Feature {
    /// Entity surfaced when the feature is clicked.
    pub fn target(&self) -> &EntityRef {
        match self {
            Feature::Marker(m) => &m.target,
            Feature::Polyline(p) => &p.target,
        }
    }

    pub fn as_marker(&self) -> Option<&Marker> {
        match self {
            Feature::Marker(m) => Some(m),
            Feature::Polyline(_) => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Feature::Polyline(p) => Some(p),
            Feature::Marker(_) => None,
        }
    }
}

pub trait MapSurface {
    fn view(&self) -> MapView;
    fn set_view(&mut self, view: MapView);
    fn clear_layer(&mut self, layer: LayerId);
    fn add_feature(&mut self, layer: LayerId, feature: Feature);
}

/// Headless surface that keeps everything it is asked to draw.
///
/// Used by tests and the CLI in place of a real map widget.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    view: MapView,
    layers: BTreeMap<LayerId, Vec<Feature>>,
    clears: BTreeMap<LayerId, usize>,
}

impl RecordingSurface {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            layers: BTreeMap::new(),
            clears: BTreeMap::new(),
        }
    }

    pub fn features(&self, layer: LayerId) -> &[Feature] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.features(LayerId::MARKERS)
            .iter()
            .filter_map(Feature::as_marker)
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.features(LayerId::ROUTES)
            .iter()
            .filter_map(Feature::as_polyline)
    }

    /// How many times `layer` has been cleared.
    pub fn clear_count(&self, layer: LayerId) -> usize {
        self.clears.get(&layer).copied().unwrap_or(0)
    }

    /// Simulates a click on the `index`-th feature of `layer`.
    pub fn click(&self, layer: LayerId, index: usize) -> Option<EntityRef> {
        self.features(layer).get(index).map(|f| f.target().clone())
    }
}

impl MapSurface for RecordingSurface {
    fn view(&self) -> MapView {
        self.view
    }

    fn set_view(&mut self, view: MapView) {
        self.view = view;
    }

    fn clear_layer(&mut self, layer: LayerId) {
        self.layers.remove(&layer);
        *self.clears.entry(layer).or_insert(0) += 1;
    }

    fn add_feature(&mut self, layer: LayerId, feature: Feature) {
        self.layers.entry(layer).or_default().push(feature);
    }
}
