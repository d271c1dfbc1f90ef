use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use foundation::geo::MapView;
use foundation::time::YearRange;
use serde::{Serialize, Serializer};

use crate::records::{Event, Journey, Passage, Person, Place, Route, Tour};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "pauls-journeys-export.json";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("export write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilters {
    pub timeline: YearRange,
    pub people: Vec<String>,
    pub event_types: Vec<String>,
}

/// Everything loaded plus the current view and filters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot<'a> {
    pub places: &'a [Place],
    pub people: &'a [Person],
    pub events: &'a [Event],
    pub journeys: &'a [Journey],
    pub routes: &'a [Route],
    pub passages: &'a [Passage],
    pub tours: &'a [Tour],
    pub current_view: MapView,
    pub filters: ExportFilters,
    /// ISO 8601 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl ExportSnapshot<'_> {
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

fn iso_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
