pub mod export;
pub mod package;
pub mod records;
pub mod resource;

pub use export::*;
pub use package::*;
pub use records::*;
pub use resource::*;
