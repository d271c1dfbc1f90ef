use std::time::Duration;

use catalog::{PreferenceStore, Theme, load_theme, save_theme};
use chrono::Utc;
use formats::export::ExportSnapshot;
use formats::package::LoadOutcome;
use foundation::geo::MapView;
use foundation::ids::{EntityKind, EntityRef};
use layers::{MapSurface, RenderCoordinator, RenderStats};
use runtime::notices::NoticeBoard;
use scene::details::{Detail, resolve_detail};
use scene::filter::{FilterOptions, FilterState};
use scene::search::SearchIndex;
use scene::store::DataStore;
use tracing::{debug, info, warn};

use crate::bindings::{Key, KeyPress, Signal, SubscriptionId, Subscriptions, UiEvent, keyboard_events};
use crate::config::ViewerConfig;
use crate::deeplink;
use crate::panel::Panel;
use crate::search_box::SearchBox;
use crate::tour::{TourControls, TourPlayer, TourTransition};

/// Application state: the loaded store plus every piece of mutable UI
/// state, driving a map surface and a preference store.
///
/// Lifecycle: [`App::start`] once after loading, events through
/// [`App::dispatch`] / [`App::press_key`] / [`App::tick`], then
/// [`App::teardown`].
pub struct App<S: MapSurface, P: PreferenceStore> {
    config: ViewerConfig,
    store: DataStore,
    filter: FilterState,
    coordinator: RenderCoordinator,
    tour: TourPlayer,
    search: SearchBox,
    panel: Panel,
    notices: NoticeBoard,
    theme: Theme,
    last_render: RenderStats,
    signals: Subscriptions<Signal>,
    surface: S,
    prefs: P,
}

impl<S: MapSurface, P: PreferenceStore> App<S, P> {
    pub fn start(
        config: ViewerConfig,
        outcome: LoadOutcome,
        surface: S,
        prefs: P,
        initial_fragment: Option<&str>,
    ) -> Self {
        let mut notices = NoticeBoard::new();
        let mut messages = Vec::new();
        for failure in &outcome.failures {
            let message = Panel::load_error_message(failure.resource().name());
            notices.error(message.clone());
            messages.push(message);
        }

        let store = DataStore::new(outcome.dataset);
        let filter = FilterState::for_store(&store, config.timeline);
        let theme = load_theme(&prefs);
        let panel = if messages.is_empty() {
            Panel::Welcome
        } else {
            Panel::LoadError { messages }
        };

        let mut app = Self {
            search: SearchBox::new(config.search_debounce),
            config,
            store,
            filter,
            coordinator: RenderCoordinator::new(),
            tour: TourPlayer::new(),
            panel,
            notices,
            theme,
            last_render: RenderStats::default(),
            signals: Subscriptions::new(),
            surface,
            prefs,
        };

        app.surface.set_view(app.config.initial_view);
        app.apply_filters();
        if let Some(fragment) = initial_fragment {
            app.on_fragment_change(fragment);
        }
        info!(
            places = app.store.places.len(),
            events = app.store.events.len(),
            failures = app.notices.errors().count(),
            %theme,
            "viewer started"
        );
        app
    }

    /// Ends any tour, empties both overlays and drops every subscription.
    pub fn teardown(mut self) -> (S, P) {
        self.tour.end();
        self.coordinator.clear_highlights();
        self.coordinator.clear(&mut self.surface);
        self.signals.clear();
        info!("viewer torn down");
        (self.surface, self.prefs)
    }

    pub fn dispatch(&mut self, event: UiEvent, now: Duration) {
        debug!(?event, "dispatch");
        match event {
            UiEvent::TimelineStart(year) => self.set_timeline_start(year),
            UiEvent::TogglePerson { id, selected } => self.set_person(&id, selected),
            UiEvent::ToggleEventType { kind, selected } => self.set_event_type(&kind, selected),
            UiEvent::SearchInput(text) => self.search_input(text, now),
            UiEvent::SearchSubmit => {
                self.choose_search_result(0);
            }
            UiEvent::ChooseSearchResult(position) => {
                self.choose_search_result(position);
            }
            UiEvent::HideSearch => self.hide_search(),
            UiEvent::FocusSearch => {
                self.search.focus();
                self.signals.publish(&Signal::FocusSearch);
            }
            UiEvent::BlurSearch => {
                self.search.blur();
                self.hide_search();
            }
            UiEvent::FeatureClicked(target) => {
                self.select(&target);
            }
            UiEvent::StartTour(id) => {
                self.start_tour(&id);
            }
            UiEvent::NextStep => {
                self.next_step();
            }
            UiEvent::PreviousStep => {
                self.previous_step();
            }
            UiEvent::EndTour => {
                self.end_tour();
            }
            UiEvent::FragmentChanged(fragment) => self.on_fragment_change(&fragment),
            UiEvent::ToggleTheme => {
                self.toggle_theme();
            }
            UiEvent::ShowHelp => self.show_help(),
            UiEvent::CloseHelp => self.close_help(),
        }
    }

    /// Document-level key handling. Enter submits the search only while the
    /// search box has focus.
    pub fn press_key(&mut self, press: KeyPress, now: Duration) {
        if press.key == Key::Enter && self.search.is_focused() {
            self.dispatch(UiEvent::SearchSubmit, now);
            return;
        }
        for event in keyboard_events(press, self.tour.is_playing()) {
            self.dispatch(event, now);
        }
    }

    /// Runs a pending debounced search once its quiet period is over.
    pub fn tick(&mut self, now: Duration) {
        let index = SearchIndex::new(&self.store).with_limit(self.config.search_max_results);
        if self.search.poll(now, &index) {
            self.signals.publish(&Signal::SearchResultsChanged);
        }
    }

    /// Full clear-and-redraw of both overlays under the current filter.
    pub fn apply_filters(&mut self) -> RenderStats {
        let stats = self.coordinator.render(&mut self.surface, &self.store, &self.filter);
        self.last_render = stats;
        self.signals.publish(&Signal::OverlaysRedrawn);
        stats
    }

    pub fn set_timeline_start(&mut self, year: i32) {
        self.filter.set_timeline_start(year, self.config.timeline_window_years);
        self.apply_filters();
    }

    pub fn set_person(&mut self, id: &str, selected: bool) {
        if self.filter.set_person(id, selected) {
            self.apply_filters();
        }
    }

    pub fn set_event_type(&mut self, kind: &str, selected: bool) {
        if self.filter.set_event_type(kind, selected) {
            self.apply_filters();
        }
    }

    /// Shows the detail view for `target`. Returns `false`, changing
    /// nothing, if it does not resolve.
    pub fn select(&mut self, target: &EntityRef) -> bool {
        if !self.store.resolves(target) {
            debug!(%target, "selection does not resolve");
            return false;
        }
        self.panel = Panel::Detail(target.clone());
        self.signals.publish(&Signal::PanelChanged);
        true
    }

    pub fn detail(&self) -> Option<Detail<'_>> {
        self.panel
            .detail_target()
            .and_then(|target| resolve_detail(&self.store, target))
    }

    pub fn search_input(&mut self, text: String, now: Duration) {
        let was_visible = self.search.results().is_visible();
        self.search.input(text, now);
        if was_visible != self.search.results().is_visible() {
            self.signals.publish(&Signal::SearchResultsChanged);
        }
    }

    pub fn hide_search(&mut self) {
        if self.search.results().is_visible() {
            self.search.hide();
            self.signals.publish(&Signal::SearchResultsChanged);
        }
    }

    /// Picks a result from the visible list. Places also move the map to
    /// the place at the focus zoom. The input is cleared either way.
    pub fn choose_search_result(&mut self, position: usize) -> bool {
        let Some(hit) = self.search.hit(position).cloned() else {
            return false;
        };
        self.search.reset();
        self.signals.publish(&Signal::SearchResultsChanged);

        if hit.target.kind == EntityKind::Place {
            if let Some(place) = self.store.places.get(&hit.target.id) {
                let view = MapView {
                    center: place.coords,
                    zoom: self.config.place_focus_zoom,
                };
                self.set_view(view);
            }
        }
        self.select(&hit.target)
    }

    pub fn set_view(&mut self, view: MapView) {
        self.surface.set_view(view);
        self.signals.publish(&Signal::ViewChanged(view));
    }

    /// Applies a URL fragment: present viewport fields move the map, a
    /// resolvable entity opens its detail view, everything else is ignored.
    pub fn on_fragment_change(&mut self, fragment: &str) {
        let link = deeplink::decode(fragment);
        if link.has_view() {
            let view = link.apply_to(self.surface.view());
            self.set_view(view);
        }
        if let Some(selection) = &link.selection {
            self.select(selection);
        }
    }

    /// Fragment restoring `target` at the current viewport.
    pub fn deep_link_for(&self, target: &EntityRef) -> String {
        deeplink::encode(Some(target), self.surface.view())
    }

    /// Fragment for whatever the panel shows now.
    pub fn current_deep_link(&self) -> String {
        deeplink::encode(self.panel.detail_target(), self.surface.view())
    }

    pub fn start_tour(&mut self, tour_id: &str) -> TourTransition {
        let transition = self.tour.start(&self.store.tours, tour_id);
        self.apply_tour(transition)
    }

    pub fn next_step(&mut self) -> TourTransition {
        let transition = self.tour.next();
        self.apply_tour(transition)
    }

    pub fn previous_step(&mut self) -> TourTransition {
        let transition = self.tour.previous();
        self.apply_tour(transition)
    }

    pub fn end_tour(&mut self) -> TourTransition {
        let transition = self.tour.end();
        self.apply_tour(transition)
    }

    pub fn tour_controls(&self) -> TourControls {
        self.tour.controls()
    }

    fn apply_tour(&mut self, transition: TourTransition) -> TourTransition {
        match transition {
            TourTransition::Ignored => return transition,
            TourTransition::Entered(index) => {
                let Some((tour, step)) = self.tour.tour().zip(self.tour.current_step()) else {
                    return transition;
                };
                let panel = Panel::TourStep {
                    tour_id: tour.id.clone(),
                    title: tour.title.clone(),
                    index,
                    total: tour.steps.len(),
                    note: step.note.clone(),
                };
                let view = MapView::from(step.view);
                let highlights: Vec<String> = step
                    .highlights
                    .iter()
                    .filter(|id| self.store.places.contains(id))
                    .cloned()
                    .collect();

                self.set_view(view);
                self.coordinator.set_highlights(highlights);
                self.panel = panel;
            }
            TourTransition::Ended => {
                self.coordinator.clear_highlights();
                self.panel = Panel::Welcome;
            }
        }
        self.apply_filters();
        self.signals.publish(&Signal::PanelChanged);
        self.signals.publish(&Signal::TourControlsChanged);
        transition
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(err) = save_theme(&mut self.prefs, self.theme) {
            warn!(%err, "theme preference not saved");
        }
        self.signals.publish(&Signal::ThemeChanged(self.theme));
        self.theme
    }

    pub fn show_help(&mut self) {
        self.panel = Panel::Help;
        self.signals.publish(&Signal::PanelChanged);
    }

    pub fn close_help(&mut self) {
        if self.panel == Panel::Help {
            self.panel = Panel::Welcome;
            self.signals.publish(&Signal::PanelChanged);
        }
    }

    pub fn export_snapshot(&self) -> ExportSnapshot<'_> {
        ExportSnapshot {
            places: self.store.places.as_slice(),
            people: self.store.people.as_slice(),
            events: self.store.events.as_slice(),
            journeys: self.store.journeys.as_slice(),
            routes: self.store.routes.as_slice(),
            passages: self.store.passages.as_slice(),
            tours: self.store.tours.as_slice(),
            current_view: self.surface.view(),
            filters: self.filter.to_export(),
            timestamp: Utc::now(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&Signal) + 'static) -> SubscriptionId {
        self.signals.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.signals.unsubscribe(id)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_store(&self.store)
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn tour(&self) -> &TourPlayer {
        &self.tour
    }

    pub fn search(&self) -> &SearchBox {
        &self.search
    }

    pub fn last_render(&self) -> RenderStats {
        self.last_render
    }

    pub fn highlights(&self) -> impl Iterator<Item = &str> {
        self.coordinator.highlights().iter().map(String::as_str)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// For host-driven pans and zooms.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::time::Duration;

    use super::App;
    use crate::bindings::{Key, KeyPress, Signal, UiEvent};
    use crate::config::ViewerConfig;
    use crate::panel::Panel;
    use crate::tour::{TourControls, TourTransition};
    use catalog::{InMemoryPreferenceStore, PreferenceStore, THEME_KEY, Theme};
    use formats::package::{DatasetDir, LoadOutcome, ResourceLoadError, load_with};
    use formats::resource::Resource;
    use foundation::geo::MapView;
    use foundation::ids::{EntityKind, EntityRef};
    use layers::{LayerId, MapSurface, RecordingSurface};
    use pretty_assertions::assert_eq;
    use scene::details::Detail;

    type TestApp = App<RecordingSurface, InMemoryPreferenceStore>;

    fn data_dir() -> DatasetDir {
        DatasetDir::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/data"))
    }

    fn start_with(outcome: LoadOutcome, prefs: InMemoryPreferenceStore, fragment: Option<&str>) -> TestApp {
        App::start(
            ViewerConfig::default(),
            outcome,
            RecordingSurface::new(MapView::new(0.0, 0.0, 2)),
            prefs,
            fragment,
        )
    }

    fn start(fragment: Option<&str>) -> TestApp {
        start_with(data_dir().load(), InMemoryPreferenceStore::new(), fragment)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn marker_ids(app: &TestApp) -> Vec<String> {
        app.surface().markers().map(|m| m.target.id.clone()).collect()
    }

    fn highlighted(app: &TestApp) -> Vec<String> {
        app.surface()
            .markers()
            .filter(|m| m.style.highlighted)
            .map(|m| m.target.id.clone())
            .collect()
    }

    #[test]
    fn start_sets_view_and_draws_everything_in_window() {
        let app = start(None);
        assert_eq!(app.surface().view(), MapView::new(34.0, 36.0, 6));
        assert_eq!(app.panel(), &Panel::Welcome);
        assert_eq!(app.last_render().markers, 14);
        assert_eq!(app.last_render().routes, 4);
        assert_eq!(app.surface().markers().count(), 14);
        assert!(!app.notices().has_errors());
    }

    #[test]
    fn failed_resource_shows_notice_and_rest_still_loads() {
        let dir = data_dir();
        let outcome = load_with(|resource| {
            if resource == Resource::Tours {
                return Err(ResourceLoadError::Unavailable {
                    resource,
                    reason: "offline".into(),
                });
            }
            Ok(std::fs::read_to_string(dir.path_of(resource)).unwrap())
        });
        let mut app = start_with(outcome, InMemoryPreferenceStore::new(), None);

        assert!(app.notices().has_errors());
        assert_eq!(
            app.panel(),
            &Panel::LoadError {
                messages: vec![Panel::load_error_message("tours")]
            }
        );
        assert!(app.store().tours.is_empty());
        assert_eq!(app.last_render().markers, 14);
        assert_eq!(app.start_tour("tour.rome"), TourTransition::Ignored);
    }

    #[test]
    fn initial_fragment_restores_selection_and_view() {
        let app = start(Some("#place=place.corinth&lat=37.9&lng=22.9&zoom=8"));
        assert_eq!(app.surface().view(), MapView::new(37.9, 22.9, 8));
        assert_eq!(app.panel(), &Panel::Detail(EntityRef::place("place.corinth")));
        assert!(matches!(app.detail(), Some(Detail::Place(_))));
    }

    #[test]
    fn unresolved_fragment_entity_is_ignored() {
        let mut app = start(None);
        app.dispatch(UiEvent::FragmentChanged("#person=person.nobody&zoom=9".into()), ms(0));
        assert_eq!(app.panel(), &Panel::Welcome);
        assert_eq!(app.surface().view(), MapView::new(34.0, 36.0, 9));
    }

    #[test]
    fn deep_link_round_trips_through_app() {
        let mut app = start(None);
        let target = EntityRef::new(EntityKind::Event, "event.shipwreck");
        app.set_view(MapView::new(35.9, 14.4, 9));
        let link = app.deep_link_for(&target);

        let restored = start(Some(&link));
        assert_eq!(restored.panel(), &Panel::Detail(target));
        assert_eq!(restored.surface().view(), MapView::new(35.9, 14.4, 9));
        assert_eq!(restored.current_deep_link(), link);
    }

    #[test]
    fn filter_changes_redraw_markers() {
        let mut app = start(None);
        app.dispatch(UiEvent::TimelineStart(59), ms(0));
        assert_eq!(marker_ids(&app), vec!["place.caesarea", "place.malta", "place.rome"]);

        app.dispatch(
            UiEvent::ToggleEventType {
                kind: "voyage".into(),
                selected: false,
            },
            ms(0),
        );
        assert_eq!(marker_ids(&app), vec!["place.caesarea", "place.rome"]);
        assert_eq!(app.surface().clear_count(LayerId::MARKERS), 3);

        app.dispatch(
            UiEvent::TogglePerson {
                id: "person.barnabas".into(),
                selected: true,
            },
            ms(0),
        );
        assert!(marker_ids(&app).is_empty());
        assert_eq!(app.surface().polylines().count(), 1);
    }

    #[test]
    fn tour_moves_map_and_highlights_until_ended() {
        let mut app = start(None);
        assert_eq!(app.start_tour("tour.rome"), TourTransition::Entered(0));
        assert_eq!(app.surface().view(), MapView::new(32.5, 34.9, 7));
        assert_eq!(highlighted(&app), vec!["place.caesarea"]);
        assert_eq!(app.panel().step_label().as_deref(), Some("Step 1 of 3"));

        app.press_key(KeyPress::plain(Key::ArrowRight), ms(0));
        assert!(highlighted(&app).is_empty());
        app.press_key(KeyPress::plain(Key::ArrowRight), ms(0));
        assert_eq!(highlighted(&app), vec!["place.malta", "place.rome"]);
        assert_eq!(app.next_step(), TourTransition::Ignored);

        app.dispatch(UiEvent::TimelineStart(59), ms(0));
        assert_eq!(highlighted(&app), vec!["place.malta", "place.rome"]);

        app.press_key(KeyPress::plain(Key::Escape), ms(0));
        assert!(!app.tour().is_playing());
        assert!(highlighted(&app).is_empty());
        assert_eq!(app.panel(), &Panel::Welcome);
        assert_eq!(app.tour_controls(), TourControls::default());
    }

    #[test]
    fn empty_tour_is_ignored() {
        let mut app = start(None);
        assert_eq!(app.start_tour("tour.placeholder"), TourTransition::Ignored);
        assert_eq!(app.panel(), &Panel::Welcome);
    }

    #[test]
    fn enter_picks_first_search_result() {
        let mut app = start(None);
        app.dispatch(UiEvent::FocusSearch, ms(0));
        app.dispatch(UiEvent::SearchInput("corinth".into()), ms(0));
        app.tick(ms(100));
        assert!(app.search().first_hit().is_none());
        app.tick(ms(300));
        assert!(app.search().first_hit().is_some());

        app.press_key(KeyPress::plain(Key::Enter), ms(400));
        assert_eq!(app.panel(), &Panel::Detail(EntityRef::place("place.corinth")));
        assert_eq!(app.surface().view(), MapView::new(37.9061, 22.8781, 10));
        assert_eq!(app.search().text(), "");
    }

    #[test]
    fn typing_then_enter_submits_without_explicit_focus() {
        let mut app = start(None);
        app.dispatch(UiEvent::SearchInput("corinth".into()), ms(0));
        app.tick(ms(300));
        app.press_key(KeyPress::plain(Key::Enter), ms(350));
        assert_eq!(app.panel(), &Panel::Detail(EntityRef::place("place.corinth")));
        assert_eq!(app.search().text(), "");
    }

    #[test]
    fn enter_after_blur_does_not_submit() {
        let mut app = start(None);
        app.dispatch(UiEvent::SearchInput("corinth".into()), ms(0));
        app.tick(ms(300));
        app.dispatch(UiEvent::BlurSearch, ms(320));
        assert!(!app.search().is_focused());
        assert!(!app.search().results().is_visible());
        app.press_key(KeyPress::plain(Key::Enter), ms(350));
        assert_eq!(app.panel(), &Panel::Welcome);
    }

    #[test]
    fn choosing_a_person_keeps_the_view() {
        let mut app = start(None);
        app.dispatch(UiEvent::SearchInput("lydia".into()), ms(0));
        app.tick(ms(300));
        app.dispatch(UiEvent::ChooseSearchResult(0), ms(310));
        assert_eq!(
            app.panel(),
            &Panel::Detail(EntityRef::new(EntityKind::Person, "person.lydia"))
        );
        assert_eq!(app.surface().view(), MapView::new(34.0, 36.0, 6));
    }

    #[test]
    fn help_replaces_and_restores_panel() {
        let mut app = start(None);
        app.dispatch(UiEvent::ShowHelp, ms(0));
        assert_eq!(app.panel(), &Panel::Help);
        app.dispatch(UiEvent::CloseHelp, ms(0));
        assert_eq!(app.panel(), &Panel::Welcome);
    }

    #[test]
    fn theme_persists_across_restarts() {
        let mut app = start(None);
        assert_eq!(app.theme(), Theme::Light);
        app.dispatch(UiEvent::ToggleTheme, ms(0));
        let (_, prefs) = app.teardown();
        assert_eq!(prefs.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let app = start_with(data_dir().load(), prefs, None);
        assert_eq!(app.theme(), Theme::Dark);
    }

    #[test]
    fn signals_reach_subscribers() {
        let mut app = start(None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        app.subscribe(move |signal| sink.borrow_mut().push(signal.clone()));

        app.select(&EntityRef::journey("journey.2"));
        app.dispatch(UiEvent::FeatureClicked(EntityRef::place("place.nowhere")), ms(0));
        assert_eq!(*seen.borrow(), vec![Signal::PanelChanged]);
    }

    #[test]
    fn export_carries_view_and_filters() {
        let mut app = start(None);
        app.dispatch(UiEvent::TimelineStart(49), ms(0));
        let json = app.export_snapshot().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["currentView"]["zoom"], 6);
        assert_eq!(value["filters"]["timeline"]["start"], 49);
        assert_eq!(value["filters"]["timeline"]["end"], 59);
        assert_eq!(value["places"].as_array().map(Vec::len), Some(21));
        let stamp = value["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");
        assert!(stamp.ends_with('Z'));
    }

    #[test]
    fn export_writes_to_default_file_name() {
        let app = start(None);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(formats::export::DEFAULT_EXPORT_FILE_NAME);
        app.export_snapshot().write_to(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"tours\""));
    }

    #[test]
    fn teardown_clears_overlays() {
        let mut app = start(None);
        app.start_tour("tour.first-journey");
        let (surface, _) = app.teardown();
        assert!(surface.features(LayerId::MARKERS).is_empty());
        assert!(surface.features(LayerId::ROUTES).is_empty());
    }
}
