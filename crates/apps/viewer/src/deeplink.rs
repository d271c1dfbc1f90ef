//! URL fragment codec for the selected entity and viewport.
//!
//! Fragment shape: `#<kind>=<id>&lat=<f64>&lng=<f64>&zoom=<int>`. Every field
//! is optional and decoded on its own; anything malformed is dropped.

use foundation::geo::MapView;
use foundation::ids::{EntityKind, EntityRef};
use url::form_urlencoded;

/// Zoom levels accepted from a fragment.
pub const MAX_ZOOM: u8 = 24;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeepLink {
    pub selection: Option<EntityRef>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub zoom: Option<u8>,
}

impl DeepLink {
    pub fn new(selection: Option<EntityRef>, view: MapView) -> Self {
        Self {
            selection,
            lat: Some(view.center.lat),
            lng: Some(view.center.lng),
            zoom: Some(view.zoom),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_none() && self.lat.is_none() && self.lng.is_none() && self.zoom.is_none()
    }

    /// `current` with each present viewport field replaced.
    pub fn apply_to(&self, current: MapView) -> MapView {
        let mut view = current;
        if let Some(lat) = self.lat {
            view.center.lat = lat;
        }
        if let Some(lng) = self.lng {
            view.center.lng = lng;
        }
        if let Some(zoom) = self.zoom {
            view.zoom = zoom;
        }
        view
    }

    pub fn has_view(&self) -> bool {
        self.lat.is_some() || self.lng.is_some() || self.zoom.is_some()
    }

    /// Fragment including the leading `#`.
    pub fn to_fragment(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(sel) = &self.selection {
            out.append_pair(sel.kind.as_str(), &sel.id);
        }
        if let Some(lat) = self.lat {
            out.append_pair("lat", &lat.to_string());
        }
        if let Some(lng) = self.lng {
            out.append_pair("lng", &lng.to_string());
        }
        if let Some(zoom) = self.zoom {
            out.append_pair("zoom", &zoom.to_string());
        }
        format!("#{}", out.finish())
    }

    /// Accepts the fragment with or without its leading `#`. The first
    /// entity key with a non-empty id wins.
    pub fn parse(fragment: &str) -> Self {
        let raw = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut link = DeepLink::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "lat" => link.lat = link.lat.or(parse_coord(&value)),
                "lng" => link.lng = link.lng.or(parse_coord(&value)),
                "zoom" => link.zoom = link.zoom.or(parse_zoom(&value)),
                other => {
                    if link.selection.is_some() || value.is_empty() {
                        continue;
                    }
                    if let Ok(kind) = other.parse::<EntityKind>() {
                        link.selection = Some(EntityRef::new(kind, value.into_owned()));
                    }
                }
            }
        }
        link
    }
}

pub fn encode(selection: Option<&EntityRef>, view: MapView) -> String {
    DeepLink::new(selection.cloned(), view).to_fragment()
}

pub fn decode(fragment: &str) -> DeepLink {
    DeepLink::parse(fragment)
}

fn parse_coord(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_zoom(raw: &str) -> Option<u8> {
    let z = raw.trim().parse::<f64>().ok()?;
    if !z.is_finite() || z < 0.0 || z > f64::from(MAX_ZOOM) {
        return None;
    }
    Some(z.trunc() as u8)
}
