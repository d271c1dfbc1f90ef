//! Joins behind the context-panel detail views.

use std::collections::BTreeSet;

use formats::records::{Event, Journey, Passage, Person, Place};
use foundation::ids::{EntityKind, EntityRef};
use url::form_urlencoded;

use crate::store::DataStore;

pub const UNKNOWN_PLACE: &str = "Unknown";
pub const MISSING_PASSAGE_TEXT: &str = "See full text online";
pub const BIBLE_GATEWAY_BASE: &str = "https://www.biblegateway.com/passage/";

#[derive(Debug, Clone, PartialEq)]
pub enum Detail<'a> {
    Place(PlaceDetail<'a>),
    Person(PersonDetail<'a>),
    Event(EventDetail<'a>),
    Journey(JourneyDetail<'a>),
    Passage(PassageDetail<'a>),
}

impl Detail<'_> {
    pub fn title(&self) -> String {
        match self {
            Detail::Place(d) => d.place.canonical_name().to_string(),
            Detail::Person(d) => d.person.canonical_name().to_string(),
            Detail::Event(d) => d.event.title.clone(),
            Detail::Journey(d) => d.journey.label.clone(),
            Detail::Passage(d) => d.reference.clone(),
        }
    }

    pub fn target(&self) -> EntityRef {
        match self {
            Detail::Place(d) => EntityRef::new(EntityKind::Place, &d.place.id),
            Detail::Person(d) => EntityRef::new(EntityKind::Person, &d.person.id),
            Detail::Event(d) => EntityRef::new(EntityKind::Event, &d.event.id),
            Detail::Journey(d) => EntityRef::new(EntityKind::Journey, &d.journey.id),
            Detail::Passage(d) => EntityRef::new(EntityKind::Passage, &d.passage.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetail<'a> {
    pub place: &'a Place,
    /// Province, or `UNKNOWN_PLACE` when absent.
    pub province: &'a str,
    pub events: Vec<&'a Event>,
    /// People of `events`, first mention first.
    pub people: Vec<&'a Person>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonDetail<'a> {
    pub person: &'a Person,
    pub events: Vec<&'a Event>,
    pub places: Vec<&'a Place>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDetail<'a> {
    pub event: &'a Event,
    pub date_label: String,
    pub place: Option<&'a Place>,
    pub people: Vec<&'a Person>,
}

impl EventDetail<'_> {
    pub fn location_label(&self) -> &str {
        self.place.map(|p| p.canonical_name()).unwrap_or(UNKNOWN_PLACE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JourneyDetail<'a> {
    pub journey: &'a Journey,
    pub date_label: String,
    /// Member events in narrative order; ids that don't resolve are skipped.
    pub events: Vec<&'a Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassageDetail<'a> {
    pub passage: &'a Passage,
    pub reference: String,
    pub text: &'a str,
    pub gateway_url: String,
}

/// `None` when the reference does not resolve.
pub fn resolve_detail<'a>(store: &'a DataStore, target: &EntityRef) -> Option<Detail<'a>> {
    let id = target.id.as_str();
    match target.kind {
        EntityKind::Place => store.places.get(id).map(|p| Detail::Place(place_detail(store, p))),
        EntityKind::Person => store.people.get(id).map(|p| Detail::Person(person_detail(store, p))),
        EntityKind::Event => store.events.get(id).map(|e| Detail::Event(event_detail(store, e))),
        EntityKind::Journey => store
            .journeys
            .get(id)
            .map(|j| Detail::Journey(journey_detail(store, j))),
        EntityKind::Passage => store.passages.get(id).map(|p| Detail::Passage(passage_detail(p))),
    }
}

fn place_detail<'a>(store: &'a DataStore, place: &'a Place) -> PlaceDetail<'a> {
    let events: Vec<&Event> = store.events.iter().filter(|e| e.place_id == place.id).collect();
    let people = distinct(events.iter().flat_map(|e| e.people_ids.iter()))
        .filter_map(|id| store.people.get(id))
        .collect();
    PlaceDetail {
        place,
        province: place.province.as_deref().unwrap_or(UNKNOWN_PLACE),
        events,
        people,
    }
}

fn person_detail<'a>(store: &'a DataStore, person: &'a Person) -> PersonDetail<'a> {
    let events: Vec<&Event> = store
        .events
        .iter()
        .filter(|e| e.people_ids.iter().any(|id| *id == person.id))
        .collect();
    let places = distinct(events.iter().map(|e| &e.place_id))
        .filter_map(|id| store.places.get(id))
        .collect();
    PersonDetail {
        person,
        events,
        places,
    }
}

fn event_detail<'a>(store: &'a DataStore, event: &'a Event) -> EventDetail<'a> {
    EventDetail {
        event,
        date_label: event.date_range.label(),
        place: store.places.get(&event.place_id),
        people: event
            .people_ids
            .iter()
            .filter_map(|id| store.people.get(id))
            .collect(),
    }
}

fn journey_detail<'a>(store: &'a DataStore, journey: &'a Journey) -> JourneyDetail<'a> {
    JourneyDetail {
        journey,
        date_label: journey.date_range.label(),
        events: journey
            .event_ids
            .iter()
            .filter_map(|id| store.events.get(id))
            .collect(),
    }
}

fn passage_detail(passage: &Passage) -> PassageDetail<'_> {
    PassageDetail {
        passage,
        reference: passage.reference(),
        text: passage.default_text().unwrap_or(MISSING_PASSAGE_TEXT),
        gateway_url: gateway_url(passage),
    }
}

/// Bible Gateway link for the passage in its default translation.
pub fn gateway_url(passage: &Passage) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("search", &passage.reference())
        .append_pair("version", &passage.translation_default)
        .finish();
    format!("{BIBLE_GATEWAY_BASE}?{query}")
}

fn distinct<'a>(ids: impl Iterator<Item = &'a String>) -> impl Iterator<Item = &'a String> {
    let mut seen: BTreeSet<&'a String> = BTreeSet::new();
    ids.filter(move |id| seen.insert(*id))
}
