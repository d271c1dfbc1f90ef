pub mod app;
pub mod bindings;
pub mod config;
pub mod deeplink;
pub mod panel;
pub mod search_box;
pub mod tour;

pub use app::App;
pub use config::ViewerConfig;
