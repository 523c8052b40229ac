pub mod confirm;

pub use confirm::*;
