//! Injected Logging
//!
//! Evaluation logs through a capability passed in by the caller, never
//! through process-global state. Call sites emit a message identifier with
//! typed arguments; the sentence itself lives in one place here.

use crate::tristate::TriState;
use std::fmt;

/// Log severity distinguishable by sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Evaluation trace
    Debug,
    /// Recoverable anomaly worth surfacing
    Warn,
}

/// A message template plus its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent<'a> {
    AudienceEvaluationStarted {
        audience_id: &'a str,
    },
    AudienceEvaluatedTo {
        audience_id: &'a str,
        result: &'a TriState,
    },
    MissingAttribute {
        condition: &'a str,
        attribute: &'a str,
    },
    InvalidAttributeType {
        condition: &'a str,
        attribute: &'a str,
    },
    UnsupportedConditionValue {
        condition: &'a str,
    },
    UnknownConditionKind {
        condition: &'a str,
        kind: &'a str,
    },
    UnknownMatchType {
        condition: &'a str,
    },
    AudienceNotFound {
        audience_id: &'a str,
    },
    CyclicAudienceReference {
        audience_id: &'a str,
    },
    MalformedOperatorNode {
        op: &'a str,
    },
}

impl LogEvent<'_> {
    pub fn severity(&self) -> Severity {
        match self {
            Self::AudienceEvaluationStarted { .. }
            | Self::AudienceEvaluatedTo { .. }
            | Self::MissingAttribute { .. } => Severity::Debug,
            Self::InvalidAttributeType { .. }
            | Self::UnsupportedConditionValue { .. }
            | Self::UnknownConditionKind { .. }
            | Self::UnknownMatchType { .. }
            | Self::AudienceNotFound { .. }
            | Self::CyclicAudienceReference { .. }
            | Self::MalformedOperatorNode { .. } => Severity::Warn,
        }
    }
}

impl fmt::Display for LogEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AudienceEvaluationStarted { audience_id } => {
                write!(f, "starting to evaluate audience \"{}\"", audience_id)
            }
            Self::AudienceEvaluatedTo {
                audience_id,
                result,
            } => {
                write!(f, "audience \"{}\" evaluated to {}", audience_id, result)
            }
            Self::MissingAttribute {
                condition,
                attribute,
            } => write!(
                f,
                "condition \"{}\" evaluated to UNKNOWN because no value was provided for attribute \"{}\"",
                condition, attribute
            ),
            Self::InvalidAttributeType {
                condition,
                attribute,
            } => write!(
                f,
                "condition \"{}\" evaluated to UNKNOWN because the value of attribute \"{}\" is of an unexpected type",
                condition, attribute
            ),
            Self::UnsupportedConditionValue { condition } => write!(
                f,
                "condition \"{}\" has a value of a type the matcher does not support",
                condition
            ),
            Self::UnknownConditionKind { condition, kind } => write!(
                f,
                "unable to evaluate condition \"{}\" of kind \"{}\"",
                condition, kind
            ),
            Self::UnknownMatchType { condition } => write!(
                f,
                "condition \"{}\" uses a match type this engine does not implement",
                condition
            ),
            Self::AudienceNotFound { audience_id } => write!(
                f,
                "no audience with ID \"{}\" exists in the supplied configuration",
                audience_id
            ),
            Self::CyclicAudienceReference { audience_id } => write!(
                f,
                "audience \"{}\" is referenced again while still being evaluated",
                audience_id
            ),
            Self::MalformedOperatorNode { op } => {
                write!(f, "\"{}\" operator has no operands", op)
            }
        }
    }
}

/// Logging capability the evaluators call
///
/// Passed explicitly into every evaluator so evaluation stays a pure
/// function of its inputs and tests need no global sink.
pub trait EvalLogger: Send + Sync {
    fn log(&self, event: LogEvent<'_>);
}

/// Logger that forwards to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl EvalLogger for TracingLogger {
    fn log(&self, event: LogEvent<'_>) {
        match event.severity() {
            Severity::Debug => tracing::debug!(target: "cohort", "{}", event),
            Severity::Warn => tracing::warn!(target: "cohort", "{}", event),
        }
    }
}

/// Logger that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl EvalLogger for NoopLogger {
    fn log(&self, _event: LogEvent<'_>) {}
}
