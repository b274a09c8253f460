// Cohort - audience-targeting evaluation core for feature-flagging SDKs
//
// This library decides whether a user's attributes satisfy a nested boolean
// condition expression, with three-valued semantics for missing data.

// Re-export the evaluation engine
pub use cohort_core::*;

// Re-export optional crates
#[cfg(feature = "events")]
pub use cohort_events;
