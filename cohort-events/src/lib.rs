//! Analytics Event Model for Cohort
//!
//! Typed shapes for the impression/conversion records a bucketing decision
//! produces, and for the batch payload a dispatcher would later send to the
//! collection endpoint. Batching, retry, and network dispatch live outside
//! this crate; everything here is plain data with wire-accurate serde.
//!
//! # Example
//!
//! ```
//! use cohort_events::*;
//!
//! let context = EventContext {
//!     revision: "42".to_string(),
//!     account_id: "acct_1".to_string(),
//!     project_id: "proj_1".to_string(),
//!     client_name: "cohort".to_string(),
//!     client_version: "0.1.0".to_string(),
//!     anonymize_ip: true,
//! };
//!
//! let impression = ImpressionEvent {
//!     entity_id: "camp_1".to_string(),
//!     key: "campaign_activated".to_string(),
//!     attributes: vec![VisitorAttribute::custom("attr_1", "plan", "premium")],
//!     campaign_id: "camp_1".to_string(),
//!     experiment_id: "exp_1".to_string(),
//!     variation_id: "var_1".to_string(),
//! };
//!
//! let event = UserEvent::impression(context, "user_1", impression);
//! assert!(event.impression.is_some());
//! ```

pub mod payload;
pub mod user_event;

pub use payload::{
    Decision, DispatchEvent, EventBatch, Snapshot, Visitor, VisitorAttribute,
};
pub use user_event::{ConversionEvent, EventContext, ImpressionEvent, UserEvent};
