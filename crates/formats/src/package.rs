use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::records::Dataset;
use crate::resource::Resource;

#[derive(Debug, thiserror::Error)]
pub enum ResourceLoadError {
    #[error("failed to read {resource} from {}: {source}", path.display())]
    Io {
        resource: Resource,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {resource}: {source}")]
    Parse {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },
    #[error("{resource} unavailable: {reason}")]
    Unavailable { resource: Resource, reason: String },
}

impl ResourceLoadError {
    pub fn resource(&self) -> Resource {
        match self {
            ResourceLoadError::Io { resource, .. }
            | ResourceLoadError::Parse { resource, .. }
            | ResourceLoadError::Unavailable { resource, .. } => *resource,
        }
    }
}

/// Result of loading every resource. Failed resources are empty in `dataset`
/// and listed in `failures`, in load order.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub failures: Vec<ResourceLoadError>,
}

impl LoadOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn take<T: DeserializeOwned>(
        &mut self,
        resource: Resource,
        payload: Result<String, ResourceLoadError>,
    ) -> Vec<T> {
        match payload.and_then(|p| parse_resource(resource, &p)) {
            Ok(records) => records,
            Err(err) => {
                warn!(%resource, error = %err, "resource load failed; continuing with empty collection");
                self.failures.push(err);
                Vec::new()
            }
        }
    }
}

pub fn parse_resource<T: DeserializeOwned>(
    resource: Resource,
    payload: &str,
) -> Result<Vec<T>, ResourceLoadError> {
    serde_json::from_str(payload).map_err(|source| ResourceLoadError::Parse { resource, source })
}

/// Assemble a dataset from a reader that yields each resource's raw JSON.
///
/// Every resource is attempted; a failure for one never stops the others.
pub fn load_with(mut read: impl FnMut(Resource) -> Result<String, ResourceLoadError>) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    outcome.dataset.places = outcome.take(Resource::Places, read(Resource::Places));
    outcome.dataset.people = outcome.take(Resource::People, read(Resource::People));
    outcome.dataset.events = outcome.take(Resource::Events, read(Resource::Events));
    outcome.dataset.passages = outcome.take(Resource::Passages, read(Resource::Passages));
    outcome.dataset.journeys = outcome.take(Resource::Journeys, read(Resource::Journeys));
    outcome.dataset.routes = outcome.take(Resource::Routes, read(Resource::Routes));
    outcome.dataset.tours = outcome.take(Resource::Tours, read(Resource::Tours));
    log_summary(&outcome);
    outcome
}

/// Directory holding `<resource>.json` files.
#[derive(Debug, Clone)]
pub struct DatasetDir {
    root: PathBuf,
}

impl DatasetDir {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, resource: Resource) -> PathBuf {
        self.root.join(resource.file_name())
    }

    pub fn load(&self) -> LoadOutcome {
        load_with(|resource| {
            let path = self.path_of(resource);
            std::fs::read_to_string(&path).map_err(|source| ResourceLoadError::Io {
                resource,
                path,
                source,
            })
        })
    }

    /// Reads all seven resources concurrently; parsing happens once all reads
    /// have settled.
    pub async fn load_async(&self) -> LoadOutcome {
        let (places, people, events, passages, journeys, routes, tours) = tokio::join!(
            self.read_async(Resource::Places),
            self.read_async(Resource::People),
            self.read_async(Resource::Events),
            self.read_async(Resource::Passages),
            self.read_async(Resource::Journeys),
            self.read_async(Resource::Routes),
            self.read_async(Resource::Tours),
        );
        let mut slots = [
            Some(places),
            Some(people),
            Some(events),
            Some(passages),
            Some(journeys),
            Some(routes),
            Some(tours),
        ];
        load_with(|resource| {
            slots[resource.slot()]
                .take()
                .unwrap_or_else(|| {
                    Err(ResourceLoadError::Unavailable {
                        resource,
                        reason: "read twice".to_string(),
                    })
                })
        })
    }

    async fn read_async(&self, resource: Resource) -> Result<String, ResourceLoadError> {
        let path = self.path_of(resource);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ResourceLoadError::Io {
                resource,
                path,
                source,
            })
    }
}

fn log_summary(outcome: &LoadOutcome) {
    let d = &outcome.dataset;
    info!(
        places = d.places.len(),
        people = d.people.len(),
        events = d.events.len(),
        passages = d.passages.len(),
        journeys = d.journeys.len(),
        routes = d.routes.len(),
        tours = d.tours.len(),
        failures = outcome.failures.len(),
        "dataset loaded"
    );
}

#[cfg(test)]
mod tests {
    use super::{DatasetDir, ResourceLoadError, load_with};
    use crate::resource::Resource;

    fn assets() -> std::path::PathBuf {
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../apps/viewer/assets/data")
    }

    #[test]
    fn loads_demo_assets() {
        let outcome = DatasetDir::new(assets()).load();
        assert!(outcome.is_complete(), "{:?}", outcome.failures);
        assert!(!outcome.dataset.places.is_empty());
        assert!(!outcome.dataset.events.is_empty());
        assert!(!outcome.dataset.tours.is_empty());
    }

    #[test]
    fn missing_resource_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("places.json"), r#"[{"id":"p","names":["P"],"coords":{"lat":1.0,"lng":2.0},"type":"city"}]"#).unwrap();
        std::fs::write(dir.path().join("events.json"), "not json").unwrap();

        let outcome = DatasetDir::new(dir.path()).load();
        assert_eq!(outcome.dataset.places.len(), 1);
        assert!(outcome.dataset.events.is_empty());

        let failed: Vec<Resource> = outcome.failures.iter().map(|f| f.resource()).collect();
        assert_eq!(
            failed,
            vec![
                Resource::People,
                Resource::Events,
                Resource::Passages,
                Resource::Journeys,
                Resource::Routes,
                Resource::Tours,
            ]
        );
        assert!(matches!(outcome.failures[1], ResourceLoadError::Parse { .. }));
    }

    #[test]
    fn reader_failure_does_not_stop_later_resources() {
        let outcome = load_with(|resource| match resource {
            Resource::Places => Err(ResourceLoadError::Unavailable {
                resource,
                reason: "offline".to_string(),
            }),
            _ => Ok("[]".to_string()),
        });
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].resource(), Resource::Places);
    }

    #[tokio::test]
    async fn async_load_matches_sync_load() {
        let dir = DatasetDir::new(assets());
        let a = dir.load();
        let b = dir.load_async().await;
        assert_eq!(a.dataset, b.dataset);
        assert!(b.is_complete());
    }
}
