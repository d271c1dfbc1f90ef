//! UI binding layer.
//!
//! Hosts translate raw input into [`UiEvent`]s and hand them to
//! [`App::dispatch`](crate::App::dispatch). Outbound changes flow back through
//! [`Subscriptions`], where the host registers callbacks per concern.

use std::fmt;

use catalog::Theme;
use foundation::geo::MapView;
use foundation::ids::EntityRef;

/// Everything a host can ask the viewer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Timeline slider moved or a preset picked.
    TimelineStart(i32),
    TogglePerson { id: String, selected: bool },
    ToggleEventType { kind: String, selected: bool },
    SearchInput(String),
    /// Enter pressed inside the search box.
    SearchSubmit,
    ChooseSearchResult(usize),
    HideSearch,
    FocusSearch,
    /// Focus left the search box, e.g. a click outside it.
    BlurSearch,
    /// A marker or route was clicked.
    FeatureClicked(EntityRef),
    StartTour(String),
    NextStep,
    PreviousStep,
    EndTour,
    FragmentChanged(String),
    ToggleTheme,
    ShowHelp,
    CloseHelp,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Enter,
    Char(char),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyPress {
    pub const fn plain(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    pub const fn ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }
}

/// Document-level shortcuts. Enter is left to the search box.
pub fn keyboard_events(press: KeyPress, tour_playing: bool) -> Vec<UiEvent> {
    match press.key {
        Key::Escape => {
            let mut out = vec![UiEvent::HideSearch];
            if tour_playing {
                out.push(UiEvent::EndTour);
            }
            out
        }
        Key::ArrowLeft if tour_playing => vec![UiEvent::PreviousStep],
        Key::ArrowRight if tour_playing => vec![UiEvent::NextStep],
        Key::Char(c) if press.ctrl && c.eq_ignore_ascii_case(&'f') => vec![UiEvent::FocusSearch],
        _ => Vec::new(),
    }
}

/// Notifications the viewer publishes after handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    PanelChanged,
    ViewChanged(MapView),
    OverlaysRedrawn,
    SearchResultsChanged,
    FocusSearch,
    TourControlsChanged,
    ThemeChanged(Theme),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// Ordered callback registry.
pub struct Subscriptions<E> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> Subscriptions<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    /// Calls every handler in registration order.
    pub fn publish(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<E> Default for Subscriptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscriptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
