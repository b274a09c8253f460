//! Condition Model
//!
//! Configuration-owned entities: leaf conditions, the boolean combinator
//! tree, audiences, and the per-call parameter bundle. All of these are
//! produced once by the external configuration layer and shared immutably
//! across concurrent evaluations.

use crate::context::UserContext;
use crate::value::AttributeValue;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Condition kind this engine evaluates
pub const CUSTOM_ATTRIBUTE_KIND: &str = "custom_attribute";

/// Comparison operator named by a condition
///
/// Kept string-backed on the wire: configuration payloads authored against a
/// newer schema may name a match type this engine does not implement, and
/// that must surface as a run-time error rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MatchType {
    #[default]
    Exact,
    Exists,
    Lt,
    Gt,
    Le,
    Ge,
    Substring,
    /// A match type this engine does not implement
    Unrecognized(String),
}

impl MatchType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact => "exact",
            Self::Exists => "exists",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Ge => "ge",
            Self::Substring => "substring",
            Self::Unrecognized(other) => other,
        }
    }
}

impl From<&str> for MatchType {
    fn from(value: &str) -> Self {
        match value {
            // An absent match field means exact.
            "" | "exact" => Self::Exact,
            "exists" => Self::Exists,
            "lt" => Self::Lt,
            "gt" => Self::Gt,
            "le" => Self::Le,
            "ge" => Self::Ge,
            "substring" => Self::Substring,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatchType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MatchType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = MatchType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a match type string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<MatchType, E> {
                Ok(MatchType::from(value))
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

/// A leaf predicate over one named user attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition kind; only `custom_attribute` is evaluable
    #[serde(rename = "type", default = "default_condition_kind")]
    pub kind: String,

    /// Attribute the condition inspects
    pub name: String,

    /// Literal the attribute is compared against
    pub value: AttributeValue,

    /// Comparison operator, `exact` when absent
    #[serde(rename = "match", default)]
    pub match_type: MatchType,

    /// Human-readable rendering of the condition, for diagnostics only
    #[serde(
        rename = "string_representation",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub display_text: String,
}

fn default_condition_kind() -> String {
    CUSTOM_ATTRIBUTE_KIND.to_string()
}

impl Condition {
    /// Create an exact-match custom-attribute condition
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            kind: default_condition_kind(),
            name: name.into(),
            value: value.into(),
            match_type: MatchType::Exact,
            display_text: String::new(),
        }
    }

    /// Set the comparison operator
    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    /// Set the diagnostic rendering
    pub fn with_display_text(mut self, display_text: impl Into<String>) -> Self {
        self.display_text = display_text.into();
        self
    }

    /// Diagnostic name for log messages
    ///
    /// Falls back to the attribute name when the configuration supplied no
    /// string representation.
    pub fn display(&self) -> &str {
        if self.display_text.is_empty() {
            &self.name
        } else {
            &self.display_text
        }
    }
}

/// Boolean combinator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeOperator {
    And,
    Or,
    Not,
}

impl TreeOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }
}

impl fmt::Display for TreeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in a nested boolean condition expression
///
/// Leaves are either plain attribute conditions or references to another
/// audience by ID; interior nodes combine children with AND/OR/NOT. `NOT`
/// is defined over its first child only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTree {
    Leaf(Condition),
    AudienceRef(String),
    Operator {
        op: TreeOperator,
        children: Vec<ConditionTree>,
    },
}

impl ConditionTree {
    pub fn leaf(condition: Condition) -> Self {
        Self::Leaf(condition)
    }

    pub fn audience(audience_id: impl Into<String>) -> Self {
        Self::AudienceRef(audience_id.into())
    }

    pub fn and(children: Vec<ConditionTree>) -> Self {
        Self::Operator {
            op: TreeOperator::And,
            children,
        }
    }

    pub fn or(children: Vec<ConditionTree>) -> Self {
        Self::Operator {
            op: TreeOperator::Or,
            children,
        }
    }

    pub fn not(child: ConditionTree) -> Self {
        Self::Operator {
            op: TreeOperator::Not,
            children: vec![child],
        }
    }
}

/// A named, reusable condition tree representing a user segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audience {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub conditions: ConditionTree,
}

impl Audience {
    pub fn new(id: impl Into<String>, conditions: ConditionTree) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            conditions,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Audiences of one project configuration, keyed by ID
pub type AudienceMap = HashMap<String, Audience>;

/// Build an [`AudienceMap`] from a collection of audiences
pub fn audience_map(audiences: impl IntoIterator<Item = Audience>) -> AudienceMap {
    audiences
        .into_iter()
        .map(|audience| (audience.id.clone(), audience))
        .collect()
}

/// Inputs for a single evaluation call
///
/// Bundles the user being decided and the audience map the configuration
/// supplied. Created by the caller, discarded when the call returns.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationParameters<'a> {
    pub user: &'a UserContext,
    pub audiences: &'a AudienceMap,
}

impl<'a> EvaluationParameters<'a> {
    pub fn new(user: &'a UserContext, audiences: &'a AudienceMap) -> Self {
        Self { user, audiences }
    }
}
