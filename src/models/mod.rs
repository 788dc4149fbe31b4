pub mod entry;
pub mod validation;

pub use entry::*;
pub use validation::*;
