use formats::records::{Event, Passage, Person, Place};
use foundation::ids::{EntityKind, EntityRef};

use crate::store::DataStore;

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_RESULTS: usize = 10;

/// Trimmed, lower-cased query of at least `MIN_QUERY_CHARS` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(raw: &str) -> Option<Self> {
        let q = raw.trim().to_lowercase();
        if q.chars().count() < MIN_QUERY_CHARS {
            return None;
        }
        Some(Self(q))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn hits(&self, field: &str) -> bool {
        field.to_lowercase().contains(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub target: EntityRef,
    pub title: String,
    pub subtitle: String,
}

/// Substring scan over the store.
///
/// Ordering contract:
/// - Categories in fixed order: places, people, passages, events.
/// - Within a category, source order. No relevance ranking.
/// - At most `limit` hits across all categories.
#[derive(Debug, Clone, Copy)]
pub struct SearchIndex<'a> {
    store: &'a DataStore,
    limit: usize,
}

impl<'a> SearchIndex<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self {
            store,
            limit: MAX_RESULTS,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Queries shorter than `MIN_QUERY_CHARS` after trimming return nothing.
    pub fn search(&self, raw: &str) -> Vec<SearchHit> {
        match SearchQuery::parse(raw) {
            Some(q) => self.search_query(&q),
            None => Vec::new(),
        }
    }

    pub fn search_query(&self, q: &SearchQuery) -> Vec<SearchHit> {
        let store = self.store;
        let places = store.places.iter().filter(|p| place_matches(q, p)).map(place_hit);
        let people = store.people.iter().filter(|p| person_matches(q, p)).map(person_hit);
        let passages = store
            .passages
            .iter()
            .filter(|p| passage_matches(q, p))
            .map(passage_hit);
        let events = store.events.iter().filter(|e| event_matches(q, e)).map(event_hit);

        places
            .chain(people)
            .chain(passages)
            .chain(events)
            .take(self.limit)
            .collect()
    }
}

fn place_matches(q: &SearchQuery, p: &Place) -> bool {
    p.names.iter().any(|n| q.hits(n)) || q.hits(&p.description) || q.hits(&p.kind)
}

fn person_matches(q: &SearchQuery, p: &Person) -> bool {
    p.names.iter().any(|n| q.hits(n)) || p.roles.iter().any(|r| q.hits(r)) || q.hits(&p.notes)
}

fn passage_matches(q: &SearchQuery, p: &Passage) -> bool {
    q.hits(&p.reference()) || q.hits(&p.book)
}

fn event_matches(q: &SearchQuery, e: &Event) -> bool {
    q.hits(&e.title) || q.hits(&e.summary) || q.hits(&e.kind)
}

fn place_hit(p: &Place) -> SearchHit {
    SearchHit {
        target: EntityRef::new(EntityKind::Place, &p.id),
        title: p.canonical_name().to_string(),
        subtitle: format!("{} in {}", p.kind, p.modern_country),
    }
}

fn person_hit(p: &Person) -> SearchHit {
    SearchHit {
        target: EntityRef::new(EntityKind::Person, &p.id),
        title: p.canonical_name().to_string(),
        subtitle: p.roles.join(", "),
    }
}

fn passage_hit(p: &Passage) -> SearchHit {
    SearchHit {
        target: EntityRef::new(EntityKind::Passage, &p.id),
        title: p.reference(),
        subtitle: format!("{} chapter {}", p.book, p.chapter),
    }
}

fn event_hit(e: &Event) -> SearchHit {
    SearchHit {
        target: EntityRef::new(EntityKind::Event, &e.id),
        title: e.title.clone(),
        subtitle: format!("{} in {} AD", e.kind, e.date_range.start),
    }
}
