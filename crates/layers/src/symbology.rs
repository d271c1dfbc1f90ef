/// Marker appearance. Colors are CSS hex strings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerStyle {
    pub fill: &'static str,
    pub border: &'static str,
    pub border_width: f32,
    /// Diameter in screen pixels.
    pub size: f32,
    pub highlighted: bool,
}

impl MarkerStyle {
    pub const DEFAULT: MarkerStyle = MarkerStyle {
        fill: "#2c3e50",
        border: "#ffffff",
        border_width: 2.0,
        size: 14.0,
        highlighted: false,
    };

    pub const HIGHLIGHT: MarkerStyle = MarkerStyle {
        fill: "#ff6b6b",
        border: "#ffffff",
        border_width: 3.0,
        size: 20.0,
        highlighted: true,
    };
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: f32,
    pub opacity: f32,
}

impl LineStyle {
    pub const fn route(color: &'static str) -> Self {
        Self {
            color,
            weight: 3.0,
            opacity: 0.7,
        }
    }
}

pub const DEFAULT_ROUTE_COLOR: &str = "#34495e";

const ROUTE_COLORS: [(&str, &str); 4] = [
    ("journey.1", "#e74c3c"),
    ("journey.2", "#3498db"),
    ("journey.3", "#2ecc71"),
    ("journey.rome-voyage", "#9b59b6"),
];

/// Fixed color per journey id, `DEFAULT_ROUTE_COLOR` for anything unlisted.
pub fn route_color(journey_id: &str) -> &'static str {
    ROUTE_COLORS
        .iter()
        .find(|(id, _)| *id == journey_id)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_ROUTE_COLOR)
}
