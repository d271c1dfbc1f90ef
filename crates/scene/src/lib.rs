pub mod details;
pub mod filter;
pub mod search;
pub mod selection;
pub mod store;

pub use filter::*;
pub use store::*;
