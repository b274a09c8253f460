//! User Context
//!
//! Read-only view over a single user's attribute set. Constructed per
//! decision request and discarded after it; evaluation never mutates it.

use crate::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Failure mode of a typed attribute lookup
///
/// Distinguishes "the key is not there" from "the key is there but holds a
/// value of the wrong kind" — the two map to different evaluation outcomes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    #[error("no attribute named \"{0}\"")]
    Missing(String),

    #[error("attribute \"{0}\" does not hold the expected type")]
    WrongType(String),
}

/// A user's attributes for one evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserContext {
    attributes: HashMap<String, AttributeValue>,
}

impl UserContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the conventional `user_id` attribute
    pub fn with_user_id(self, user_id: impl Into<String>) -> Self {
        self.with_attribute("user_id", AttributeValue::String(user_id.into()))
    }

    /// Add an attribute
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Whether the attribute exists, regardless of its value
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Raw attribute lookup
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Numeric attribute lookup
    pub fn float_attribute(&self, name: &str) -> Result<f64, AttributeError> {
        self.typed(name, AttributeValue::as_f64)
    }

    /// String attribute lookup
    pub fn string_attribute(&self, name: &str) -> Result<&str, AttributeError> {
        self.typed(name, AttributeValue::as_str)
    }

    /// Boolean attribute lookup
    pub fn bool_attribute(&self, name: &str) -> Result<bool, AttributeError> {
        self.typed(name, AttributeValue::as_bool)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        view: impl Fn(&'a AttributeValue) -> Option<T>,
    ) -> Result<T, AttributeError> {
        let value = self
            .attributes
            .get(name)
            .ok_or_else(|| AttributeError::Missing(name.to_string()))?;
        view(value).ok_or_else(|| AttributeError::WrongType(name.to_string()))
    }
}
