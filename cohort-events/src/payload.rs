//! Wire Payload
//!
//! Shapes of the batch sent to the analytics collection endpoint. Field
//! names follow the collector's JSON schema exactly; this crate only models
//! the payload, it never batches or sends it.

use cohort_core::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level batch posted to the collection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    pub account_id: String,
    pub project_id: String,
    pub revision: String,
    pub client_name: String,
    pub client_version: String,
    pub anonymize_ip: bool,
    pub enrich_decisions: bool,
    pub visitors: Vec<Visitor>,
}

/// One visitor's attributes and activity within a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visitor {
    pub visitor_id: String,
    pub attributes: Vec<VisitorAttribute>,
    pub snapshots: Vec<Snapshot>,
}

/// A single attribute reported with a visitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorAttribute {
    pub entity_id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
    pub value: AttributeValue,
}

impl VisitorAttribute {
    /// Attribute of the conventional `custom` type
    pub fn custom(
        entity_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            key: key.into(),
            attribute_type: "custom".to_string(),
            value: value.into(),
        }
    }
}

/// Decisions and events captured at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub decisions: Vec<Decision>,
    pub events: Vec<DispatchEvent>,
}

/// The variation a bucketing decision landed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub campaign_id: String,
    pub experiment_id: String,
    pub variation_id: String,
}

/// A single event inside a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub entity_id: String,
    pub key: String,
    pub timestamp: i64,
    pub uuid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}
