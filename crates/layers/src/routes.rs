use formats::records::{Journey, Place, Route};
use foundation::geo::LatLng;
use foundation::ids::{EntityKind, EntityRef};
use foundation::time::YearRange;
use scene::filter::visible_journeys;
use scene::store::{Collection, DataStore};

use crate::layer::{Layer, LayerId};
use crate::surface::Polyline;
use crate::symbology::{LineStyle, route_color};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RouteLayer {
    id: LayerId,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RouteLayerSnapshot {
    pub polylines: Vec<Polyline>,
}

impl RouteLayer {
    pub fn new() -> Self {
        Self { id: LayerId::ROUTES }
    }

    /// One polyline per journey overlapping `window` whose route resolves to
    /// at least two points.
    pub fn extract(&self, store: &DataStore, window: YearRange) -> RouteLayerSnapshot {
        let polylines = visible_journeys(store.journeys.as_slice(), window)
            .into_iter()
            .filter_map(|journey| {
                let route = store.routes.get(&journey.route_ref)?;
                journey_polyline(journey, route, &store.places)
            })
            .collect();
        RouteLayerSnapshot { polylines }
    }
}

impl Default for RouteLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for RouteLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

/// Places along a route, assuming segments chain.
///
/// The first contributing segment adds its `from` endpoint; every segment
/// adds its `to` endpoint. Endpoints that don't resolve are left out and
/// the chain continues from the last resolved point.
pub fn resolve_route<'a>(route: &Route, places: &'a Collection<Place>) -> Vec<&'a Place> {
    let mut out: Vec<&Place> = Vec::with_capacity(route.segments.len() + 1);
    for segment in &route.segments {
        if out.is_empty() {
            if let Some(from) = places.get(&segment.from) {
                out.push(from);
            }
        }
        if let Some(to) = places.get(&segment.to) {
            out.push(to);
        }
    }
    out
}

pub fn build_route_polyline(route: &Route, places: &Collection<Place>) -> Vec<LatLng> {
    resolve_route(route, places)
        .into_iter()
        .map(|p| p.coords)
        .collect()
}

pub fn route_tooltip(journey: &Journey) -> String {
    format!(
        "{} ({}-{} AD)",
        journey.label, journey.date_range.start, journey.date_range.end
    )
}

fn journey_polyline(journey: &Journey, route: &Route, places: &Collection<Place>) -> Option<Polyline> {
    let points = build_route_polyline(route, places);
    if points.len() < 2 {
        return None;
    }
    Some(Polyline {
        points,
        tooltip: route_tooltip(journey),
        style: LineStyle::route(route_color(&journey.id)),
        target: EntityRef::new(EntityKind::Journey, &journey.id),
    })
}

#[cfg(test)]
mod tests {
    use super::{RouteLayer, build_route_polyline, resolve_route};
    use crate::test_support::{demo_store, place};
    use formats::records::{Route, RouteSegment};
    use foundation::geo::LatLng;
    use foundation::time::YearRange;
    use pretty_assertions::assert_eq;
    use scene::store::Collection;

    fn route(segments: &[(&str, &str)]) -> Route {
        Route {
            id: "r".to_string(),
            segments: segments
                .iter()
                .map(|(from, to)| RouteSegment {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn unresolved_middle_point_is_skipped() {
        let places = Collection::from_records(
            "places",
            vec![place("A", "A", 1.0, 1.0), place("C", "C", 3.0, 3.0), place("D", "D", 4.0, 4.0)],
        );
        let points = build_route_polyline(&route(&[("A", "B"), ("B", "C"), ("C", "D")]), &places);
        assert_eq!(
            points,
            vec![LatLng::new(1.0, 1.0), LatLng::new(3.0, 3.0), LatLng::new(4.0, 4.0)]
        );
    }

    #[test]
    fn chain_starts_at_first_resolved_point() {
        let places = Collection::from_records("places", vec![place("B", "B", 2.0, 2.0), place("C", "C", 3.0, 3.0)]);
        let ids: Vec<&str> = resolve_route(&route(&[("X", "B"), ("B", "C")]), &places)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["B", "C"]);

        let lonely = resolve_route(&route(&[("X", "B")]), &places);
        assert_eq!(lonely.len(), 1);
    }

    #[test]
    fn extracts_overlapping_journeys() {
        let store = demo_store();
        let snap = RouteLayer::new().extract(&store, YearRange::new(55, 65));
        let targets: Vec<&str> = snap.polylines.iter().map(|p| p.target.id.as_str()).collect();
        assert_eq!(targets, vec!["journey.3", "journey.rome-voyage"]);

        let rome = &snap.polylines[1];
        assert_eq!(rome.points.len(), 3);
        assert_eq!(rome.style.color, "#9b59b6");
        assert_eq!(rome.tooltip, "Voyage to Rome (59-62 AD)");
    }

    #[test]
    fn short_routes_are_not_drawn() {
        let mut store = demo_store();
        store.routes = Collection::from_records("routes", vec![Route { id: "route.1".into(), segments: vec![] }]);
        let snap = RouteLayer::new().extract(&store, YearRange::new(46, 48));
        assert!(snap.polylines.is_empty());
    }
}
