//! Audience-Targeting Evaluation Core
//!
//! Decides whether a user's attributes satisfy a nested boolean condition
//! expression — "is this user in segment X?" — for upstream bucketing logic
//! to gate feature flags and experiments with.
//!
//! Evaluation is three-valued: a condition is `True`, `False`, or `Unknown`
//! when per-user data is missing or of an incomparable type. `Unknown`
//! propagates through AND/OR/NOT instead of being collapsed into a guess;
//! the caller decides how to treat it (typically "not in audience").
//!
//! # Quick Start
//!
//! ```
//! use cohort_core::*;
//!
//! // age >= 18 AND state contains "california"
//! let tree = ConditionTree::and(vec![
//!     ConditionTree::leaf(Condition::new("age", 18).with_match_type(MatchType::Ge)),
//!     ConditionTree::leaf(Condition::new("state", "california").with_match_type(MatchType::Substring)),
//! ]);
//!
//! let user = UserContext::new()
//!     .with_attribute("age", 25)
//!     .with_attribute("state", "california, usa");
//!
//! let audiences = audience_map([]);
//! let params = EvaluationParameters::new(&user, &audiences);
//!
//! let verdict = TreeEvaluator::new(&TracingLogger).evaluate(&tree, &params).unwrap();
//! assert!(verdict.is_true());
//! ```
//!
//! # Nested Audiences
//!
//! ```
//! use cohort_core::*;
//!
//! let audiences = audience_map([
//!     Audience::new(
//!         "aud_adults",
//!         ConditionTree::leaf(Condition::new("age", 18).with_match_type(MatchType::Ge)),
//!     ),
//!     // One audience may reference another; cycles are caught at run time.
//!     Audience::new(
//!         "aud_adult_beta",
//!         ConditionTree::and(vec![
//!             ConditionTree::audience("aud_adults"),
//!             ConditionTree::leaf(Condition::new("beta", true)),
//!         ]),
//!     ),
//! ]);
//!
//! let user = UserContext::new().with_attribute("age", 30).with_attribute("beta", true);
//! let params = EvaluationParameters::new(&user, &audiences);
//!
//! let verdict = AudienceEvaluator::new(&TracingLogger)
//!     .evaluate("aud_adult_beta", &params)
//!     .unwrap();
//! assert!(verdict.is_true());
//! ```
//!
//! All configuration entities are immutable and safely shared across
//! concurrent evaluations; the evaluators hold nothing but the injected
//! logger.

pub mod condition;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod logger;
pub mod matchers;
pub mod tristate;
pub mod value;

pub use condition::{
    audience_map, Audience, AudienceMap, Condition, ConditionTree, EvaluationParameters,
    MatchType, TreeOperator, CUSTOM_ATTRIBUTE_KIND,
};
pub use context::{AttributeError, UserContext};
pub use error::EvaluatorError;
pub use evaluator::{AudienceEvaluator, ConditionEvaluator, TreeEvaluator};
pub use logger::{EvalLogger, LogEvent, NoopLogger, Severity, TracingLogger};
pub use matchers::Matcher;
pub use tristate::{TriState, UnknownReason};
pub use value::AttributeValue;
