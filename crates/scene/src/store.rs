use std::collections::HashMap;

use formats::records::{Dataset, Event, Journey, Passage, Person, Place, Record, Route, Tour};
use foundation::ids::{EntityKind, EntityRef};
use tracing::warn;

/// Insertion-ordered records with an id index.
///
/// Ordering contract:
/// - `iter()` and `as_slice()` yield records in source order.
/// - On duplicate ids the first record wins; later duplicates are dropped.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn from_records(label: &'static str, records: Vec<T>) -> Self {
        let mut out = Self {
            items: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
        };
        for record in records {
            if out.index.contains_key(record.id()) {
                warn!(collection = label, id = record.id(), "duplicate id ignored");
                continue;
            }
            out.index.insert(record.id().to_string(), out.items.len());
            out.items.push(record);
        }
        out
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

impl<T> Collection<T> {
    pub fn at(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Every loaded collection. Built once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    pub places: Collection<Place>,
    pub people: Collection<Person>,
    pub events: Collection<Event>,
    pub passages: Collection<Passage>,
    pub journeys: Collection<Journey>,
    pub routes: Collection<Route>,
    pub tours: Collection<Tour>,
}

impl DataStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            places: Collection::from_records("places", dataset.places),
            people: Collection::from_records("people", dataset.people),
            events: Collection::from_records("events", dataset.events),
            passages: Collection::from_records("passages", dataset.passages),
            journeys: Collection::from_records("journeys", dataset.journeys),
            routes: Collection::from_records("routes", dataset.routes),
            tours: Collection::from_records("tours", dataset.tours),
        }
    }

    pub fn resolves(&self, target: &EntityRef) -> bool {
        match target.kind {
            EntityKind::Place => self.places.contains(&target.id),
            EntityKind::Person => self.people.contains(&target.id),
            EntityKind::Passage => self.passages.contains(&target.id),
            EntityKind::Event => self.events.contains(&target.id),
            EntityKind::Journey => self.journeys.contains(&target.id),
        }
    }

    /// Distinct event types in first-appearance order.
    pub fn event_types(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for event in self.events.iter() {
            if !out.iter().any(|t| t == &event.kind) {
                out.push(event.kind.clone());
            }
        }
        out
    }
}

impl From<Dataset> for DataStore {
    fn from(dataset: Dataset) -> Self {
        Self::new(dataset)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use formats::records::{Dataset, Event, Person, Place};
    use foundation::geo::LatLng;
    use foundation::time::YearRange;

    pub fn place(id: &str, name: &str, kind: &str) -> Place {
        Place {
            id: id.to_string(),
            names: vec![name.to_string()],
            coords: LatLng::new(36.0, 30.0),
            kind: kind.to_string(),
            province: None,
            modern_country: "Turkey".to_string(),
            description: String::new(),
            citations: Vec::new(),
        }
    }

    pub fn person(id: &str, name: &str) -> Person {
        Person {
            id: id.to_string(),
            names: vec![name.to_string()],
            roles: vec!["missionary".to_string()],
            notes: String::new(),
            citations: Vec::new(),
        }
    }

    pub fn event(id: &str, kind: &str, years: (i32, i32), place_id: &str, people: &[&str]) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            kind: kind.to_string(),
            date_range: YearRange::new(years.0, years.1),
            place_id: place_id.to_string(),
            people_ids: people.iter().map(|p| p.to_string()).collect(),
            summary: String::new(),
            citations: Vec::new(),
        }
    }

    pub fn demo_dataset() -> Dataset {
        let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../apps/viewer/assets/data");
        formats::package::DatasetDir::new(root).load().dataset
    }
}

#[cfg(test)]
mod tests {
    use super::DataStore;
    use super::fixtures::{demo_dataset, place};
    use formats::records::Dataset;
    use foundation::ids::EntityRef;

    #[test]
    fn first_duplicate_wins() {
        let store = DataStore::new(Dataset {
            places: vec![
                place("p.a", "First", "city"),
                place("p.a", "Second", "city"),
                place("p.b", "Other", "port"),
            ],
            ..Dataset::default()
        });
        assert_eq!(store.places.len(), 2);
        assert_eq!(store.places.get("p.a").unwrap().canonical_name(), "First");
        assert_eq!(store.places.position("p.b"), Some(1));
    }

    #[test]
    fn resolves_by_kind() {
        let store = DataStore::new(demo_dataset());
        assert!(store.resolves(&EntityRef::place("place.corinth")));
        assert!(!store.resolves(&EntityRef::place("place.fair-havens")));
        assert!(store.resolves(&EntityRef::journey("journey.rome-voyage")));
    }

    #[test]
    fn event_types_in_first_appearance_order() {
        let store = DataStore::new(demo_dataset());
        let types = store.event_types();
        assert_eq!(types[0], "calling");
        assert_eq!(types[1], "preaching");
        assert!(types.contains(&"church-founding".to_string()));
        let distinct: std::collections::HashSet<&String> = types.iter().collect();
        assert_eq!(distinct.len(), types.len());
    }
}
