pub mod config;
pub mod entry;
pub mod errors;
pub mod ids;
pub mod meta;
pub mod report;

pub use config::*;
pub use entry::*;
pub use errors::*;
pub use ids::*;
pub use meta::*;
pub use report::*;
