//! Matchers
//!
//! Stateless comparison primitives. Each matcher is a pure function of a
//! condition and a user context; data gaps come back as `Unknown` with a
//! reason, never as a hard error.

use crate::condition::{Condition, MatchType};
use crate::context::UserContext;
use crate::logger::{EvalLogger, LogEvent, NoopLogger};
use crate::tristate::{TriState, UnknownReason};
use crate::value::AttributeValue;

/// Closed set of comparison primitives, dispatched by match type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Exact,
    Exists,
    Gt,
    Lt,
    Ge,
    Le,
    Substring,
}

impl Matcher {
    /// Matcher for a condition's match type
    ///
    /// `None` means the configuration names a match type this engine does
    /// not implement; the condition evaluator turns that into an error.
    pub fn for_match_type(match_type: &MatchType) -> Option<Self> {
        match match_type {
            MatchType::Exact => Some(Self::Exact),
            MatchType::Exists => Some(Self::Exists),
            MatchType::Gt => Some(Self::Gt),
            MatchType::Lt => Some(Self::Lt),
            MatchType::Ge => Some(Self::Ge),
            MatchType::Le => Some(Self::Le),
            MatchType::Substring => Some(Self::Substring),
            MatchType::Unrecognized(_) => None,
        }
    }

    /// Apply the matcher to a user's attributes
    pub fn evaluate(
        &self,
        condition: &Condition,
        user: &UserContext,
        logger: &dyn EvalLogger,
    ) -> TriState {
        match self {
            Self::Exact => exact(condition, user, logger),
            Self::Exists => exists(condition, user),
            Self::Gt => ordered(condition, user, logger, Strictness::Greater),
            Self::Lt => ordered(condition, user, logger, Strictness::Less),
            Self::Ge => or_equal(condition, user, logger, Strictness::Greater),
            Self::Le => or_equal(condition, user, logger, Strictness::Less),
            Self::Substring => substring(condition, user, logger),
        }
    }
}

#[derive(Clone, Copy)]
enum Strictness {
    Greater,
    Less,
}

/// Key presence, value-agnostic. Never yields `Unknown`.
fn exists(condition: &Condition, user: &UserContext) -> TriState {
    TriState::from(user.has_attribute(&condition.name))
}

/// Same-kind equality; cross-kind comparison is `Unknown`, never a coercion.
fn exact(condition: &Condition, user: &UserContext, logger: &dyn EvalLogger) -> TriState {
    let Some(actual) = user.get(&condition.name) else {
        logger.log(LogEvent::MissingAttribute {
            condition: condition.display(),
            attribute: &condition.name,
        });
        return TriState::Unknown(UnknownReason::MissingAttribute(condition.name.clone()));
    };

    match (&condition.value, actual) {
        (AttributeValue::String(expected), AttributeValue::String(actual)) => {
            TriState::from(expected == actual)
        }
        (AttributeValue::Number(expected), AttributeValue::Number(actual)) => {
            TriState::from(expected == actual)
        }
        (AttributeValue::Bool(expected), AttributeValue::Bool(actual)) => {
            TriState::from(expected == actual)
        }
        _ => {
            logger.log(LogEvent::InvalidAttributeType {
                condition: condition.display(),
                attribute: &condition.name,
            });
            TriState::Unknown(UnknownReason::InvalidAttributeType(condition.name.clone()))
        }
    }
}

/// Strict numeric ordering; equality is `False`.
fn ordered(
    condition: &Condition,
    user: &UserContext,
    logger: &dyn EvalLogger,
    strictness: Strictness,
) -> TriState {
    if !user.has_attribute(&condition.name) {
        logger.log(LogEvent::MissingAttribute {
            condition: condition.display(),
            attribute: &condition.name,
        });
        return TriState::Unknown(UnknownReason::MissingAttribute(condition.name.clone()));
    }

    let Some(bound) = condition.value.as_f64() else {
        logger.log(LogEvent::UnsupportedConditionValue {
            condition: condition.display(),
        });
        return TriState::Unknown(UnknownReason::UnsupportedConditionValue(
            condition.name.clone(),
        ));
    };

    let Ok(actual) = user.float_attribute(&condition.name) else {
        logger.log(LogEvent::InvalidAttributeType {
            condition: condition.display(),
            attribute: &condition.name,
        });
        return TriState::Unknown(UnknownReason::InvalidAttributeType(condition.name.clone()));
    };

    TriState::from(match strictness {
        Strictness::Greater => actual > bound,
        Strictness::Less => actual < bound,
    })
}

/// Composite ge/le: strict comparison first, equality via the Exact path.
///
/// The strict probe is silent and its `Unknown` is not separately surfaced;
/// whatever the Exact matcher reports stands as the result.
fn or_equal(
    condition: &Condition,
    user: &UserContext,
    logger: &dyn EvalLogger,
    strictness: Strictness,
) -> TriState {
    if ordered(condition, user, &NoopLogger, strictness).is_true() {
        return TriState::True;
    }
    exact(condition, user, logger)
}

/// Substring containment over string attribute and string literal.
fn substring(condition: &Condition, user: &UserContext, logger: &dyn EvalLogger) -> TriState {
    if !user.has_attribute(&condition.name) {
        logger.log(LogEvent::MissingAttribute {
            condition: condition.display(),
            attribute: &condition.name,
        });
        return TriState::Unknown(UnknownReason::MissingAttribute(condition.name.clone()));
    }

    let Some(expected) = condition.value.as_str() else {
        logger.log(LogEvent::UnsupportedConditionValue {
            condition: condition.display(),
        });
        return TriState::Unknown(UnknownReason::UnsupportedConditionValue(
            condition.name.clone(),
        ));
    };

    let Ok(actual) = user.string_attribute(&condition.name) else {
        logger.log(LogEvent::InvalidAttributeType {
            condition: condition.display(),
            attribute: &condition.name,
        });
        return TriState::Unknown(UnknownReason::InvalidAttributeType(condition.name.clone()));
    };

    TriState::from(actual.contains(expected))
}
