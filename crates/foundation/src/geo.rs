use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Map viewport: center coordinate plus integer zoom level.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

impl MapView {
    pub const fn new(lat: f64, lng: f64, zoom: u8) -> Self {
        Self {
            center: LatLng::new(lat, lng),
            zoom,
        }
    }

    pub fn approx_eq(&self, other: &MapView, eps: f64) -> bool {
        self.zoom == other.zoom
            && (self.center.lat - other.center.lat).abs() <= eps
            && (self.center.lng - other.center.lng).abs() <= eps
    }
}

#[cfg(test)]
mod tests {
    use super::MapView;

    #[test]
    fn approx_eq_requires_same_zoom() {
        let a = MapView::new(34.0, 36.0, 6);
        assert!(a.approx_eq(&MapView::new(34.0 + 1e-12, 36.0, 6), 1e-9));
        assert!(!a.approx_eq(&MapView::new(34.0, 36.0, 7), 1e-9));
    }
}
