use foundation::ids::EntityRef;

pub const WELCOME_TITLE: &str = "Details";
pub const WELCOME_TEXT: &str =
    "Click on a map marker or select an item from the left sidebar to see details here.";

pub const HELP_TITLE: &str = "How to Use Paul's Journeys";

/// Help sections as (heading, lines).
pub const HELP_SECTIONS: [(&str, &[&str]); 5] = [
    (
        "Navigation",
        &[
            "Map: Click and drag to pan, scroll to zoom",
            "Markers: Click on markers to see place details",
            "Routes: Click on colored lines to see journey details",
        ],
    ),
    (
        "Filtering",
        &[
            "Timeline: Use slider or preset buttons to filter by date",
            "People: Check boxes to show events involving specific people",
            "Event Types: Filter by types of events (preaching, miracles, etc.)",
        ],
    ),
    (
        "Search",
        &[
            "Type in the search box to find places, people, or passages",
            "Click on search results to navigate to that location",
            "Use Ctrl+F to quickly focus the search box",
        ],
    ),
    (
        "Guided Tours",
        &[
            "Click \"Start Tour\" to begin a guided journey",
            "Use Next/Previous buttons or arrow keys to navigate",
            "Press Escape to end the tour",
        ],
    ),
    (
        "Keyboard Shortcuts",
        &[
            "Ctrl+F - Focus search box",
            "Left/Right - Navigate tour steps",
            "Escape - Close search results or end tour",
        ],
    ),
];

/// What the context panel currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Panel {
    #[default]
    Welcome,
    LoadError {
        messages: Vec<String>,
    },
    Detail(EntityRef),
    TourStep {
        tour_id: String,
        title: String,
        index: usize,
        total: usize,
        note: String,
    },
    Help,
}

impl Panel {
    pub fn load_error_message(resource: &str) -> String {
        format!("Failed to load {resource} data. Please check the console for details.")
    }

    /// "Step 2 of 3" for a tour step, `None` otherwise.
    pub fn step_label(&self) -> Option<String> {
        match self {
            Panel::TourStep { index, total, .. } => Some(format!("Step {} of {}", index + 1, total)),
            _ => None,
        }
    }

    pub fn detail_target(&self) -> Option<&EntityRef> {
        match self {
            Panel::Detail(target) => Some(target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Panel;

    #[test]
    fn step_label_is_one_based() {
        let panel = Panel::TourStep {
            tour_id: "tour.rome".into(),
            title: "Voyage to Rome".into(),
            index: 1,
            total: 3,
            note: String::new(),
        };
        assert_eq!(panel.step_label().as_deref(), Some("Step 2 of 3"));
        assert_eq!(Panel::Welcome.step_label(), None);
    }

    #[test]
    fn load_error_names_resource() {
        assert_eq!(
            Panel::load_error_message("tours"),
            "Failed to load tours data. Please check the console for details."
        );
    }
}
