//! Replacement policy: which discovered entries qualify.
//!
//! The suffix set lives in `constants::SOURCE_SUFFIXES` and is not configurable.

pub mod eligibility;

pub use eligibility::{classify, has_source_suffix, Classification};
