pub mod coordinator;
pub mod layer;
pub mod markers;
pub mod routes;
pub mod surface;
pub mod symbology;

pub use coordinator::*;
pub use layer::*;
pub use surface::*;

#[cfg(test)]
mod test_support;
