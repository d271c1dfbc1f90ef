use std::collections::BTreeSet;

use formats::export::ExportFilters;
use formats::records::{Event, Journey, Place};
use foundation::time::YearRange;

use crate::selection::PositionSet;
use crate::store::{Collection, DataStore};

pub const DEFAULT_TIMELINE: YearRange = YearRange::new(30, 70);

/// Width of the window picked by the timeline slider and presets.
pub const TIMELINE_WINDOW_YEARS: i32 = 10;

/// Active filter predicates.
///
/// The two sets have opposite empty semantics:
/// - `people` empty means no person restriction (every event passes).
/// - `event_types` empty means no event passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub timeline: YearRange,
    pub people: BTreeSet<String>,
    pub event_types: BTreeSet<String>,
}

impl FilterState {
    pub fn new(timeline: YearRange) -> Self {
        Self {
            timeline,
            people: BTreeSet::new(),
            event_types: BTreeSet::new(),
        }
    }

    /// Startup state: default timeline, no person restriction, every event
    /// type present in the store selected.
    pub fn for_store(store: &DataStore, timeline: YearRange) -> Self {
        Self {
            timeline,
            people: BTreeSet::new(),
            event_types: store.event_types().into_iter().collect(),
        }
    }

    pub fn set_timeline_start(&mut self, year: i32, width: i32) {
        self.timeline = YearRange::starting_at(year, width);
    }

    /// Returns `true` if the set changed.
    pub fn set_person(&mut self, id: &str, selected: bool) -> bool {
        if selected {
            self.people.insert(id.to_string())
        } else {
            self.people.remove(id)
        }
    }

    /// Returns `true` if the set changed.
    pub fn set_event_type(&mut self, kind: &str, selected: bool) -> bool {
        if selected {
            self.event_types.insert(kind.to_string())
        } else {
            self.event_types.remove(kind)
        }
    }

    pub fn allows(&self, event: &Event) -> bool {
        event.date_range.overlaps(&self.timeline)
            && (self.people.is_empty() || event.people_ids.iter().any(|p| self.people.contains(p)))
            && self.event_types.contains(&event.kind)
    }

    pub fn to_export(&self) -> ExportFilters {
        ExportFilters {
            timeline: self.timeline,
            people: self.people.iter().cloned().collect(),
            event_types: self.event_types.iter().cloned().collect(),
        }
    }
}

/// Output of one filter pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Visible<'a> {
    /// Visible events in source order.
    pub events: Vec<&'a Event>,
    /// Positions of visible places in the place collection.
    pub places: PositionSet,
}

impl Visible<'_> {
    pub fn places_in<'s>(&self, places: &'s Collection<Place>) -> impl Iterator<Item = &'s Place> {
        self.places.iter().filter_map(move |p| places.at(p))
    }
}

/// Events passing every predicate, and the deduplicated set of places they
/// happen at. An event whose `place_id` does not resolve stays visible but
/// contributes no place.
pub fn compute_visible<'a>(
    events: &'a [Event],
    places: &Collection<Place>,
    filter: &FilterState,
) -> Visible<'a> {
    let mut out = Visible::default();
    if filter.event_types.is_empty() {
        return out;
    }
    for event in events.iter().filter(|e| filter.allows(e)) {
        if let Some(position) = places.position(&event.place_id) {
            out.places.insert(position);
        }
        out.events.push(event);
    }
    out
}

/// Journeys whose date range overlaps `window`, in source order.
pub fn visible_journeys(journeys: &[Journey], window: YearRange) -> Vec<&Journey> {
    journeys
        .iter()
        .filter(|j| j.date_range.overlaps(&window))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// Choices offered by the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub people: Vec<FilterOption>,
    pub event_types: Vec<FilterOption>,
}

impl FilterOptions {
    pub fn from_store(store: &DataStore) -> Self {
        Self {
            people: store
                .people
                .iter()
                .map(|p| FilterOption {
                    value: p.id.clone(),
                    label: p.canonical_name().to_string(),
                })
                .collect(),
            event_types: store
                .event_types()
                .into_iter()
                .map(|t| FilterOption {
                    label: event_type_label(&t),
                    value: t,
                })
                .collect(),
        }
    }
}

/// `"church-founding"` -> `"Church founding"`. Only the first `-` is replaced.
pub fn event_type_label(kind: &str) -> String {
    let mut chars = kind.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str().replacen('-', " ", 1);
    first.to_uppercase().chain(rest.chars()).collect()
}
