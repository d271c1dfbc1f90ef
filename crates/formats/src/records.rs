//! Record shapes of the JSON resources.
//!
//! Keys are camelCase on the wire. Records are immutable once loaded; every
//! cross-reference (`placeId`, `peopleIds`, `routeRef`, segment endpoints,
//! tour highlights) is a plain string id that may or may not resolve.

use std::collections::BTreeMap;

use foundation::geo::{LatLng, MapView};
use foundation::time::YearRange;
use serde::{Deserialize, Serialize};

/// Anything stored in an id-keyed collection.
pub trait Record {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    /// First entry is the canonical display name.
    pub names: Vec<String>,
    pub coords: LatLng,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default)]
    pub modern_country: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub names: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date_range: YearRange,
    pub place_id: String,
    #[serde(default)]
    pub people_ids: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    pub id: String,
    pub book: String,
    pub chapter: u32,
    /// Verse range as written, e.g. `"1-3"`.
    pub verses: String,
    #[serde(default)]
    pub text_by_translation: BTreeMap<String, String>,
    #[serde(default)]
    pub translation_default: String,
    #[serde(default)]
    pub crossrefs: Vec<String>,
}

impl Passage {
    /// `"Acts 13:1-3"`.
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book, self.chapter, self.verses)
    }

    pub fn default_text(&self) -> Option<&str> {
        self.text_by_translation
            .get(&self.translation_default)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: String,
    pub label: String,
    pub date_range: YearRange,
    pub route_ref: String,
    /// Narrative order.
    #[serde(default)]
    pub event_ids: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    #[serde(default)]
    pub segments: Vec<RouteSegment>,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourView {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

impl From<TourView> for MapView {
    fn from(v: TourView) -> Self {
        MapView::new(v.lat, v.lng, v.zoom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStep {
    pub view: TourView,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub steps: Vec<TourStep>,
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_record!(Place, Person, Event, Passage, Journey, Route, Tour);

impl Place {
    pub fn canonical_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.id)
    }

    pub fn aliases(&self) -> &[String] {
        self.names.get(1..).unwrap_or(&[])
    }
}

impl Person {
    pub fn canonical_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.id)
    }

    pub fn aliases(&self) -> &[String] {
        self.names.get(1..).unwrap_or(&[])
    }
}

/// All seven collections, in file order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub places: Vec<Place>,
    pub people: Vec<Person>,
    pub events: Vec<Event>,
    pub passages: Vec<Passage>,
    pub journeys: Vec<Journey>,
    pub routes: Vec<Route>,
    pub tours: Vec<Tour>,
}
