use std::env;
use std::path::PathBuf;
use std::time::Duration;

use foundation::geo::MapView;
use foundation::time::YearRange;
use scene::filter::{DEFAULT_TIMELINE, TIMELINE_WINDOW_YEARS};
use scene::search::MAX_RESULTS;
use tracing::warn;

pub const DATA_DIR_VAR: &str = "JOURNEYS_DATA_DIR";
pub const PREFS_PATH_VAR: &str = "JOURNEYS_PREFS_PATH";
pub const SEARCH_DEBOUNCE_VAR: &str = "JOURNEYS_SEARCH_DEBOUNCE_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Viewport before any deep link is applied.
    pub initial_view: MapView,
    pub timeline: YearRange,
    pub timeline_window_years: i32,
    pub search_debounce: Duration,
    pub search_max_results: usize,
    /// Zoom used when a place is picked from search results.
    pub place_focus_zoom: u8,
    pub data_dir: PathBuf,
    pub prefs_path: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_view: MapView::new(34.0, 36.0, 6),
            timeline: DEFAULT_TIMELINE,
            timeline_window_years: TIMELINE_WINDOW_YEARS,
            search_debounce: Duration::from_millis(300),
            search_max_results: MAX_RESULTS,
            place_focus_zoom: 10,
            data_dir: PathBuf::from("data"),
            prefs_path: PathBuf::from("journeys-prefs.json"),
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns. Unparseable values
    /// are logged and skipped.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(PREFS_PATH_VAR) {
            config.prefs_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(SEARCH_DEBOUNCE_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.search_debounce = Duration::from_millis(ms),
                Err(err) => warn!(var = SEARCH_DEBOUNCE_VAR, %raw, %err, "ignoring invalid value"),
            }
        }
        config
    }
}
