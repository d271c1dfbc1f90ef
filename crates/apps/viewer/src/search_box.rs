use std::time::Duration;

use runtime::debounce::Debouncer;
use scene::search::{SearchHit, SearchIndex, SearchQuery};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchResults {
    #[default]
    Hidden,
    /// A search ran and found nothing.
    Empty,
    Hits(Vec<SearchHit>),
}

impl SearchResults {
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchResults::Hits(hits) => hits,
            _ => &[],
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, SearchResults::Hidden)
    }
}

/// Search input with a debounced result list.
#[derive(Debug, Clone)]
pub struct SearchBox {
    text: String,
    focused: bool,
    debouncer: Debouncer<SearchQuery>,
    results: SearchResults,
}

impl SearchBox {
    pub fn new(quiet: Duration) -> Self {
        Self {
            text: String::new(),
            focused: false,
            debouncer: Debouncer::new(quiet),
            results: SearchResults::Hidden,
        }
    }

    /// New input text. Typing implies focus. Short queries hide results and
    /// cancel any pending search; anything else reschedules the search.
    pub fn input(&mut self, text: impl Into<String>, now: Duration) {
        self.focused = true;
        self.text = text.into();
        match SearchQuery::parse(&self.text) {
            Some(query) => self.debouncer.push(query, now),
            None => {
                self.debouncer.cancel();
                self.results = SearchResults::Hidden;
            }
        }
    }

    /// Runs the pending search once its quiet period is over. Returns `true`
    /// if the result list changed.
    pub fn poll(&mut self, now: Duration, index: &SearchIndex<'_>) -> bool {
        let Some(query) = self.debouncer.poll(now) else {
            return false;
        };
        let hits = index.search_query(&query);
        self.results = if hits.is_empty() {
            SearchResults::Empty
        } else {
            SearchResults::Hits(hits)
        };
        true
    }

    pub fn first_hit(&self) -> Option<&SearchHit> {
        self.results.hits().first()
    }

    pub fn hit(&self, position: usize) -> Option<&SearchHit> {
        self.results.hits().get(position)
    }

    pub fn hide(&mut self) {
        self.results = SearchResults::Hidden;
    }

    /// After a result is chosen: input cleared, list hidden.
    pub fn reset(&mut self) {
        self.text.clear();
        self.debouncer.cancel();
        self.results = SearchResults::Hidden;
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
