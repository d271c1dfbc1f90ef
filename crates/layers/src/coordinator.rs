use std::collections::BTreeSet;

use scene::filter::{FilterState, compute_visible};
use scene::store::DataStore;
use tracing::debug;

use crate::layer::Layer;
use crate::markers::MarkerLayer;
use crate::routes::RouteLayer;
use crate::surface::{Feature, MapSurface};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub events: usize,
    pub markers: usize,
    pub routes: usize,
}

/// Owns the marker and route overlays.
///
/// Every `render` clears both layers and draws them again from scratch.
/// Highlighted place ids survive redraws until cleared.
#[derive(Debug, Default, Clone)]
pub struct RenderCoordinator {
    markers: MarkerLayer,
    routes: RouteLayer,
    highlights: BTreeSet<String>,
}

impl RenderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render<S: MapSurface + ?Sized>(
        &self,
        surface: &mut S,
        store: &DataStore,
        filter: &FilterState,
    ) -> RenderStats {
        let visible = compute_visible(store.events.as_slice(), &store.places, filter);
        let markers = self.markers.extract(store, &visible.places, &self.highlights);
        let routes = self.routes.extract(store, filter.timeline);

        let stats = RenderStats {
            events: visible.events.len(),
            markers: markers.markers.len(),
            routes: routes.polylines.len(),
        };

        surface.clear_layer(self.markers.id());
        for marker in markers.markers {
            surface.add_feature(self.markers.id(), Feature::Marker(marker));
        }
        surface.clear_layer(self.routes.id());
        for polyline in routes.polylines {
            surface.add_feature(self.routes.id(), Feature::Polyline(polyline));
        }

        debug!(
            timeline = %filter.timeline.label(),
            events = stats.events,
            markers = stats.markers,
            routes = stats.routes,
            "overlays redrawn"
        );
        stats
    }

    /// Replaces the highlighted set. Takes effect on the next `render`.
    pub fn set_highlights<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.highlights = ids.into_iter().map(Into::into).collect();
    }

    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    pub fn highlights(&self) -> &BTreeSet<String> {
        &self.highlights
    }

    /// Empties both overlays.
    pub fn clear<S: MapSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear_layer(self.markers.id());
        surface.clear_layer(self.routes.id());
    }
}

#[cfg(test)]
mod tests {
    use super::RenderCoordinator;
    use crate::layer::LayerId;
    use crate::surface::{MapSurface, RecordingSurface};
    use crate::symbology::MarkerStyle;
    use crate::test_support::demo_store;
    use foundation::geo::MapView;
    use foundation::ids::EntityRef;
    use foundation::time::YearRange;
    use pretty_assertions::assert_eq;
    use scene::filter::FilterState;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(MapView::new(34.0, 36.0, 6))
    }

    #[test]
    fn each_render_clears_and_redraws_both_layers() {
        let store = demo_store();
        let coordinator = RenderCoordinator::new();
        let mut surface = surface();
        let mut filter = FilterState::for_store(&store, YearRange::new(46, 56));

        let wide = coordinator.render(&mut surface, &store, &filter);
        assert_eq!(wide.markers, surface.markers().count());
        assert_eq!(wide.routes, 3);

        filter.set_timeline_start(59, 10);
        let late = coordinator.render(&mut surface, &store, &filter);
        assert_eq!(surface.clear_count(LayerId::MARKERS), 2);
        assert_eq!(surface.clear_count(LayerId::ROUTES), 2);
        assert_eq!(late.routes, 1);
        let names: Vec<&str> = surface.markers().map(|m| m.tooltip.as_str()).collect();
        assert_eq!(names, vec!["Caesarea", "Malta", "Rome"]);
    }

    #[test]
    fn clicks_surface_places_and_journeys() {
        let store = demo_store();
        let mut surface = surface();
        let filter = FilterState::for_store(&store, YearRange::new(59, 69));
        RenderCoordinator::new().render(&mut surface, &store, &filter);

        assert_eq!(
            surface.click(LayerId::MARKERS, 0),
            Some(EntityRef::place("place.caesarea"))
        );
        assert_eq!(
            surface.click(LayerId::ROUTES, 0),
            Some(EntityRef::journey("journey.rome-voyage"))
        );
    }

    #[test]
    fn highlights_persist_until_cleared() {
        let store = demo_store();
        let mut coordinator = RenderCoordinator::new();
        let mut surface = surface();
        let filter = FilterState::for_store(&store, YearRange::new(59, 69));

        coordinator.set_highlights(["place.malta", "place.nowhere"]);
        coordinator.render(&mut surface, &store, &filter);
        coordinator.render(&mut surface, &store, &filter);
        let highlighted: Vec<&str> = surface
            .markers()
            .filter(|m| m.style == MarkerStyle::HIGHLIGHT)
            .map(|m| m.target.id.as_str())
            .collect();
        assert_eq!(highlighted, vec!["place.malta"]);

        coordinator.clear_highlights();
        coordinator.render(&mut surface, &store, &filter);
        assert!(surface.markers().all(|m| m.style == MarkerStyle::DEFAULT));
    }

    #[test]
    fn clear_empties_overlays() {
        let store = demo_store();
        let coordinator = RenderCoordinator::new();
        let mut surface = surface();
        let filter = FilterState::for_store(&store, YearRange::new(30, 70));
        coordinator.render(&mut surface, &store, &filter);
        coordinator.clear(&mut surface);
        assert!(surface.features(LayerId::MARKERS).is_empty());
        assert!(surface.features(LayerId::ROUTES).is_empty());
        assert_eq!(surface.view(), MapView::new(34.0, 36.0, 6));
    }
}
