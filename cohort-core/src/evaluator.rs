//! Evaluators
//!
//! The recursive walk over a condition tree: leaf conditions dispatch to a
//! matcher, audience references resolve through the audience map, and
//! interior nodes combine children with three-valued AND/OR/NOT semantics.
//!
//! Data gaps (`Unknown`) flow through the combinators. Configuration
//! defects split two ways: a broken leaf condition is absorbed by its
//! enclosing combinator as `Unknown`, while a dangling or cyclic audience
//! reference and a childless operator abort the evaluation call with an
//! error.

use crate::condition::{
    Condition, ConditionTree, EvaluationParameters, TreeOperator, CUSTOM_ATTRIBUTE_KIND,
};
use crate::error::EvaluatorError;
use crate::logger::{EvalLogger, LogEvent};
use crate::matchers::Matcher;
use crate::tristate::{TriState, UnknownReason};
use std::collections::HashSet;

/// Evaluates a custom-attribute leaf condition
pub struct ConditionEvaluator<'a> {
    logger: &'a dyn EvalLogger,
}

impl<'a> ConditionEvaluator<'a> {
    pub fn new(logger: &'a dyn EvalLogger) -> Self {
        Self { logger }
    }

    /// Dispatch the condition to the matcher named by its match type
    ///
    /// Only `custom_attribute` conditions are evaluable here; any other
    /// kind, and any unimplemented match type, is a configuration defect
    /// reported as an error rather than a silent `Unknown`.
    pub fn evaluate(
        &self,
        condition: &Condition,
        params: &EvaluationParameters<'_>,
    ) -> Result<TriState, EvaluatorError> {
        if condition.kind != CUSTOM_ATTRIBUTE_KIND {
            self.logger.log(LogEvent::UnknownConditionKind {
                condition: condition.display(),
                kind: &condition.kind,
            });
            return Err(EvaluatorError::UnsupportedConditionKind {
                kind: condition.kind.clone(),
                condition: condition.display().to_string(),
            });
        }

        let Some(matcher) = Matcher::for_match_type(&condition.match_type) else {
            self.logger.log(LogEvent::UnknownMatchType {
                condition: condition.display(),
            });
            return Err(EvaluatorError::UnknownMatchType {
                condition: condition.display().to_string(),
            });
        };

        Ok(matcher.evaluate(condition, params.user, self.logger))
    }
}

/// Resolves an audience reference and evaluates its condition tree
pub struct AudienceEvaluator<'a> {
    logger: &'a dyn EvalLogger,
}

impl<'a> AudienceEvaluator<'a> {
    pub fn new(logger: &'a dyn EvalLogger) -> Self {
        Self { logger }
    }

    /// Evaluate the audience with the given ID against the user
    pub fn evaluate(
        &self,
        audience_id: &str,
        params: &EvaluationParameters<'_>,
    ) -> Result<TriState, EvaluatorError> {
        let mut in_flight = HashSet::new();
        self.evaluate_nested(audience_id, params, &mut in_flight)
    }

    /// Resolution step shared with the tree walk
    ///
    /// `in_flight` holds the IDs currently being resolved on this call
    /// stack; re-entering one means the configuration contains a cycle.
    fn evaluate_nested(
        &self,
        audience_id: &str,
        params: &EvaluationParameters<'_>,
        in_flight: &mut HashSet<String>,
    ) -> Result<TriState, EvaluatorError> {
        let Some(audience) = params.audiences.get(audience_id) else {
            self.logger.log(LogEvent::AudienceNotFound { audience_id });
            return Err(EvaluatorError::AudienceNotFound {
                audience_id: audience_id.to_string(),
            });
        };

        if !in_flight.insert(audience_id.to_string()) {
            self.logger
                .log(LogEvent::CyclicAudienceReference { audience_id });
            return Err(EvaluatorError::CyclicAudienceReference {
                audience_id: audience_id.to_string(),
            });
        }

        self.logger
            .log(LogEvent::AudienceEvaluationStarted { audience_id });

        let result = TreeEvaluator::new(self.logger).evaluate_node(
            &audience.conditions,
            params,
            in_flight,
        );
        in_flight.remove(audience_id);

        if let Ok(state) = &result {
            self.logger.log(LogEvent::AudienceEvaluatedTo {
                audience_id,
                result: state,
            });
        }
        result
    }
}

/// Walks a mixed tree of conditions and audience references
pub struct TreeEvaluator<'a> {
    logger: &'a dyn EvalLogger,
}

impl<'a> TreeEvaluator<'a> {
    pub fn new(logger: &'a dyn EvalLogger) -> Self {
        Self { logger }
    }

    /// Evaluate a condition tree for one user
    pub fn evaluate(
        &self,
        tree: &ConditionTree,
        params: &EvaluationParameters<'_>,
    ) -> Result<TriState, EvaluatorError> {
        let mut in_flight = HashSet::new();
        self.evaluate_node(tree, params, &mut in_flight)
    }

    fn evaluate_node(
        &self,
        node: &ConditionTree,
        params: &EvaluationParameters<'_>,
        in_flight: &mut HashSet<String>,
    ) -> Result<TriState, EvaluatorError> {
        match node {
            ConditionTree::Leaf(condition) => {
                match ConditionEvaluator::new(self.logger).evaluate(condition, params) {
                    Ok(state) => Ok(state),
                    // A broken leaf must not take down the enclosing
                    // combinator; it degrades to Unknown after the warning
                    // the condition evaluator already emitted.
                    Err(_) => Ok(TriState::Unknown(UnknownReason::InvalidCondition(
                        condition.display().to_string(),
                    ))),
                }
            }
            ConditionTree::AudienceRef(audience_id) => AudienceEvaluator::new(self.logger)
                .evaluate_nested(audience_id, params, in_flight),
            ConditionTree::Operator { op, children } => match op {
                TreeOperator::And => self.evaluate_and(children, params, in_flight),
                TreeOperator::Or => self.evaluate_or(children, params, in_flight),
                TreeOperator::Not => self.evaluate_not(children, params, in_flight),
            },
        }
    }

    /// False-dominant conjunction, left to right, short-circuiting
    fn evaluate_and(
        &self,
        children: &[ConditionTree],
        params: &EvaluationParameters<'_>,
        in_flight: &mut HashSet<String>,
    ) -> Result<TriState, EvaluatorError> {
        if children.is_empty() {
            return Err(self.malformed(TreeOperator::And));
        }

        let mut unknown = None;
        for child in children {
            match self.evaluate_node(child, params, in_flight)? {
                TriState::False => return Ok(TriState::False),
                TriState::Unknown(reason) => {
                    unknown.get_or_insert(reason);
                }
                TriState::True => {}
            }
        }

        Ok(match unknown {
            Some(reason) => TriState::Unknown(reason),
            None => TriState::True,
        })
    }

    /// True-dominant disjunction, left to right, short-circuiting
    fn evaluate_or(
        &self,
        children: &[ConditionTree],
        params: &EvaluationParameters<'_>,
        in_flight: &mut HashSet<String>,
    ) -> Result<TriState, EvaluatorError> {
        if children.is_empty() {
            return Err(self.malformed(TreeOperator::Or));
        }

        let mut unknown = None;
        for child in children {
            match self.evaluate_node(child, params, in_flight)? {
                TriState::True => return Ok(TriState::True),
                TriState::Unknown(reason) => {
                    unknown.get_or_insert(reason);
                }
                TriState::False => {}
            }
        }

        Ok(match unknown {
            Some(reason) => TriState::Unknown(reason),
            None => TriState::False,
        })
    }

    /// Negation over the first child only; extra children are ignored
    fn evaluate_not(
        &self,
        children: &[ConditionTree],
        params: &EvaluationParameters<'_>,
        in_flight: &mut HashSet<String>,
    ) -> Result<TriState, EvaluatorError> {
        let Some(first) = children.first() else {
            return Err(self.malformed(TreeOperator::Not));
        };
        Ok(self.evaluate_node(first, params, in_flight)?.negate())
    }

    fn malformed(&self, op: TreeOperator) -> EvaluatorError {
        self.logger
            .log(LogEvent::MalformedOperatorNode { op: op.as_str() });
        EvaluatorError::MalformedOperatorNode { op }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{audience_map, Audience, AudienceMap, MatchType};
    use crate::context::UserContext;
    use crate::logger::{NoopLogger, Severity};
    use std::sync::Mutex;

    /// Captures log lines so tests can assert on severity routing
    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<(Severity, String)>>,
    }

    impl EvalLogger for RecordingLogger {
        fn log(&self, event: LogEvent<'_>) {
            self.lines
                .lock()
                .unwrap()
                .push((event.severity(), event.to_string()));
        }
    }

    fn leaf(name: &str, value: i64, match_type: MatchType) -> ConditionTree {
        ConditionTree::leaf(Condition::new(name, value).with_match_type(match_type))
    }

    fn unknown_leaf() -> ConditionTree {
        // References an attribute no test user carries.
        ConditionTree::leaf(Condition::new("nonexistent", 1))
    }

    fn age_user(age: i64) -> UserContext {
        UserContext::new().with_attribute("age", age)
    }

    fn no_audiences() -> AudienceMap {
        audience_map([])
    }

    fn evaluate(tree: &ConditionTree, user: &UserContext) -> Result<TriState, EvaluatorError> {
        let audiences = no_audiences();
        TreeEvaluator::new(&NoopLogger).evaluate(tree, &EvaluationParameters::new(user, &audiences))
    }

    #[test]
    fn test_and_is_false_dominant() {
        // AND(False, Unknown, True) = False
        let tree = ConditionTree::and(vec![
            leaf("age", 99, MatchType::Exact),
            unknown_leaf(),
            leaf("age", 25, MatchType::Exact),
        ]);
        assert_eq!(evaluate(&tree, &age_user(25)), Ok(TriState::False));
    }

    #[test]
    fn test_and_requires_all_true() {
        let tree = ConditionTree::and(vec![
            leaf("age", 25, MatchType::Exact),
            leaf("age", 18, MatchType::Gt),
        ]);
        assert_eq!(evaluate(&tree, &age_user(25)), Ok(TriState::True));

        let tree = ConditionTree::and(vec![leaf("age", 25, MatchType::Exact), unknown_leaf()]);
        assert!(evaluate(&tree, &age_user(25)).unwrap().is_unknown());
    }

    #[test]
    fn test_or_is_true_dominant() {
        // OR(True, Unknown, False) = True
        let tree = ConditionTree::or(vec![
            leaf("age", 25, MatchType::Exact),
            unknown_leaf(),
            leaf("age", 99, MatchType::Exact),
        ]);
        assert_eq!(evaluate(&tree, &age_user(25)), Ok(TriState::True));
    }

    #[test]
    fn test_or_is_false_only_when_all_children_are_false() {
        let tree = ConditionTree::or(vec![
            leaf("age", 98, MatchType::Exact),
            leaf("age", 99, MatchType::Exact),
        ]);
        assert_eq!(evaluate(&tree, &age_user(25)), Ok(TriState::False));

        let tree = ConditionTree::or(vec![leaf("age", 99, MatchType::Exact), unknown_leaf()]);
        assert!(evaluate(&tree, &age_user(25)).unwrap().is_unknown());
    }

    #[test]
    fn test_not_inverts_and_passes_unknown_through() {
        let tree = ConditionTree::not(leaf("age", 25, MatchType::Exact));
        assert_eq!(evaluate(&tree, &age_user(25)), Ok(TriState::False));

        let tree = ConditionTree::not(leaf("age", 99, MatchType::Exact));
        assert_eq!(evaluate(&tree, &age_user(25)), Ok(TriState::True));

        let tree = ConditionTree::not(unknown_leaf());
        assert!(evaluate(&tree, &age_user(25)).unwrap().is_unknown());
    }

    #[test]
    fn test_not_uses_first_child_only() {
        // A second child, if the parser ever lets one through, is ignored.
        let tree = ConditionTree::Operator {
            op: TreeOperator::Not,
            children: vec![
                leaf("age", 99, MatchType::Exact),
                leaf("age", 25, MatchType::Exact),
            ],
        };
        assert_eq!(evaluate(&tree, &age_user(25)), Ok(TriState::True));
    }

    #[test]
    fn test_childless_operator_is_a_hard_error() {
        for op in [TreeOperator::And, TreeOperator::Or, TreeOperator::Not] {
            let tree = ConditionTree::Operator {
                op,
                children: vec![],
            };
            assert_eq!(
                evaluate(&tree, &age_user(25)),
                Err(EvaluatorError::MalformedOperatorNode { op })
            );
        }
    }

    #[test]
    fn test_broken_leaf_degrades_to_unknown_inside_a_combinator() {
        let mut condition = Condition::new("age", 25);
        condition.kind = "third_party_dimension".to_string();

        let tree = ConditionTree::and(vec![
            ConditionTree::leaf(condition),
            leaf("age", 25, MatchType::Exact),
        ]);
        assert_eq!(
            evaluate(&tree, &age_user(25)),
            Ok(TriState::Unknown(UnknownReason::InvalidCondition(
                "age".to_string()
            )))
        );
    }

    #[test]
    fn test_unknown_match_type_is_rejected_by_the_condition_evaluator() {
        let condition =
            Condition::new("age", 25).with_match_type(MatchType::Unrecognized("near".to_string()));
        let user = age_user(25);
        let audiences = no_audiences();
        let params = EvaluationParameters::new(&user, &audiences);

        assert_eq!(
            ConditionEvaluator::new(&NoopLogger).evaluate(&condition, &params),
            Err(EvaluatorError::UnknownMatchType {
                condition: "age".to_string()
            })
        );
    }

    #[test]
    fn test_unsupported_kind_logs_a_warning() {
        let mut condition = Condition::new("age", 25);
        condition.kind = "third_party_dimension".to_string();
        let user = age_user(25);
        let audiences = no_audiences();
        let params = EvaluationParameters::new(&user, &audiences);

        let logger = RecordingLogger::default();
        let result = ConditionEvaluator::new(&logger).evaluate(&condition, &params);
        assert!(matches!(
            result,
            Err(EvaluatorError::UnsupportedConditionKind { .. })
        ));

        let lines = logger.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Severity::Warn);
        assert!(lines[0].1.contains("third_party_dimension"));
    }

    #[test]
    fn test_audience_resolution_recurses_into_the_referenced_tree() {
        let audiences = audience_map([Audience::new(
            "aud_adults",
            ConditionTree::and(vec![leaf("age", 18, MatchType::Ge)]),
        )]);
        let user = age_user(25);
        let params = EvaluationParameters::new(&user, &audiences);

        assert_eq!(
            AudienceEvaluator::new(&NoopLogger).evaluate("aud_adults", &params),
            Ok(TriState::True)
        );
    }

    #[test]
    fn test_dangling_audience_reference_is_always_an_error() {
        let audiences = no_audiences();
        let user = age_user(25);
        let params = EvaluationParameters::new(&user, &audiences);

        assert_eq!(
            AudienceEvaluator::new(&NoopLogger).evaluate("aud_missing", &params),
            Err(EvaluatorError::AudienceNotFound {
                audience_id: "aud_missing".to_string()
            })
        );

        // Same through a tree walk.
        let tree = ConditionTree::or(vec![ConditionTree::audience("aud_missing")]);
        assert_eq!(
            evaluate(&tree, &user),
            Err(EvaluatorError::AudienceNotFound {
                audience_id: "aud_missing".to_string()
            })
        );
    }

    #[test]
    fn test_mutual_audience_cycle_errors_from_any_entry_point() {
        let audiences = audience_map([
            Audience::new("aud_a", ConditionTree::audience("aud_b")),
            Audience::new("aud_b", ConditionTree::audience("aud_a")),
        ]);
        let user = age_user(25);
        let params = EvaluationParameters::new(&user, &audiences);
        let evaluator = AudienceEvaluator::new(&NoopLogger);

        for entry in ["aud_a", "aud_b"] {
            let result = evaluator.evaluate(entry, &params);
            assert!(
                matches!(result, Err(EvaluatorError::CyclicAudienceReference { .. })),
                "entry {entry} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_self_referencing_audience_errors() {
        let audiences = audience_map([Audience::new("aud_a", ConditionTree::audience("aud_a"))]);
        let user = age_user(25);
        let params = EvaluationParameters::new(&user, &audiences);

        assert_eq!(
            AudienceEvaluator::new(&NoopLogger).evaluate("aud_a", &params),
            Err(EvaluatorError::CyclicAudienceReference {
                audience_id: "aud_a".to_string()
            })
        );
    }

    #[test]
    fn test_diamond_references_are_not_cycles() {
        // Two branches referencing the same audience is legal; only re-entry
        // while still on the stack is a cycle.
        let audiences = audience_map([
            Audience::new("aud_adult", ConditionTree::leaf(
                Condition::new("age", 18).with_match_type(MatchType::Ge),
            )),
            Audience::new(
                "aud_both",
                ConditionTree::and(vec![
                    ConditionTree::audience("aud_adult"),
                    ConditionTree::audience("aud_adult"),
                ]),
            ),
        ]);
        let user = age_user(25);
        let params = EvaluationParameters::new(&user, &audiences);

        assert_eq!(
            AudienceEvaluator::new(&NoopLogger).evaluate("aud_both", &params),
            Ok(TriState::True)
        );
    }

    #[test]
    fn test_audience_trace_logs_at_debug() {
        let audiences = audience_map([Audience::new(
            "aud_adults",
            leaf("age", 18, MatchType::Ge),
        )]);
        let user = age_user(25);
        let params = EvaluationParameters::new(&user, &audiences);

        let logger = RecordingLogger::default();
        AudienceEvaluator::new(&logger)
            .evaluate("aud_adults", &params)
            .unwrap();

        let lines = logger.lines.lock().unwrap();
        assert!(lines
            .iter()
            .all(|(severity, _)| *severity == Severity::Debug));
        assert!(lines.iter().any(|(_, line)| line.contains("TRUE")));
    }
}
