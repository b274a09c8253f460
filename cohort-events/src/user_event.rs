//! User Events
//!
//! In-process representation of a single visitor's impression or conversion
//! before it is folded into a wire batch.

use crate::payload::VisitorAttribute;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Project-level context stamped onto every event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    pub revision: String,
    pub account_id: String,
    pub project_id: String,
    pub client_name: String,
    pub client_version: String,
    pub anonymize_ip: bool,
}

/// An experiment activation seen by a visitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpressionEvent {
    pub entity_id: String,
    pub key: String,
    pub attributes: Vec<VisitorAttribute>,
    pub campaign_id: String,
    pub experiment_id: String,
    pub variation_id: String,
}

/// A tracked conversion with optional tags and revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionEvent {
    pub entity_id: String,
    pub key: String,
    pub attributes: Vec<VisitorAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// One visitor event, stamped with identity and time at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvent {
    pub timestamp: i64,
    pub uuid: String,
    pub event_context: EventContext,
    pub visitor_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impression: Option<ImpressionEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion: Option<ConversionEvent>,
}

impl UserEvent {
    fn new(context: EventContext, visitor_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            uuid: Uuid::new_v4().to_string(),
            event_context: context,
            visitor_id: visitor_id.into(),
            impression: None,
            conversion: None,
        }
    }

    /// Create an impression event for a visitor
    pub fn impression(
        context: EventContext,
        visitor_id: impl Into<String>,
        impression: ImpressionEvent,
    ) -> Self {
        let mut event = Self::new(context, visitor_id);
        event.impression = Some(impression);
        event
    }

    /// Create a conversion event for a visitor
    pub fn conversion(
        context: EventContext,
        visitor_id: impl Into<String>,
        conversion: ConversionEvent,
    ) -> Self {
        let mut event = Self::new(context, visitor_id);
        event.conversion = Some(conversion);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> EventContext {
        EventContext {
            revision: "42".to_string(),
            account_id: "acct_1".to_string(),
            project_id: "proj_1".to_string(),
            client_name: "cohort".to_string(),
            client_version: "0.1.0".to_string(),
            anonymize_ip: false,
        }
    }

    fn impression() -> ImpressionEvent {
        ImpressionEvent {
            entity_id: "camp_1".to_string(),
            key: "campaign_activated".to_string(),
            attributes: vec![],
            campaign_id: "camp_1".to_string(),
            experiment_id: "exp_1".to_string(),
            variation_id: "var_1".to_string(),
        }
    }

    #[test]
    fn test_events_are_stamped_at_creation() {
        let event = UserEvent::impression(context(), "user_1", impression());

        assert!(event.timestamp > 0);
        assert_eq!(event.uuid.len(), 36);
        assert!(event.impression.is_some());
        assert!(event.conversion.is_none());
    }

    #[test]
    fn test_each_event_gets_a_distinct_uuid() {
        let first = UserEvent::impression(context(), "user_1", impression());
        let second = UserEvent::impression(context(), "user_1", impression());
        assert_ne!(first.uuid, second.uuid);
    }

    #[test]
    fn test_conversion_extras_are_optional_on_the_wire() {
        let conversion = ConversionEvent {
            entity_id: "evt_1".to_string(),
            key: "purchase".to_string(),
            attributes: vec![],
            tags: None,
            revenue: Some(4200),
            value: None,
        };
        let event = UserEvent::conversion(context(), "user_1", conversion);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["conversion"]["revenue"], 4200);
        assert!(json["conversion"].get("tags").is_none());
        assert!(json["conversion"].get("value").is_none());
        assert!(json.get("impression").is_none());
    }
}
