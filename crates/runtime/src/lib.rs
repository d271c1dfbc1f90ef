pub mod debounce;
pub mod notices;

pub use debounce::*;
pub use notices::*;
