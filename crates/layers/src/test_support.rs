use formats::package::DatasetDir;
use formats::records::Place;
use foundation::geo::LatLng;
use scene::store::DataStore;

pub fn place(id: &str, name: &str, lat: f64, lng: f64) -> Place {
    Place {
        id: id.to_string(),
        names: vec![name.to_string()],
        coords: LatLng::new(lat, lng),
        kind: "city".to_string(),
        province: None,
        modern_country: "Greece".to_string(),
        description: String::new(),
        citations: Vec::new(),
    }
}

pub fn demo_store() -> DataStore {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../apps/viewer/assets/data");
    DataStore::new(DatasetDir::new(root).load().dataset)
}
