//! Evaluation errors
//!
//! Structural and configuration defects. Ordinary data gaps (missing
//! attribute, wrong attribute type) are not errors; they surface as
//! [`TriState::Unknown`](crate::TriState) and flow through the combinators.

use crate::condition::TreeOperator;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    #[error("unable to evaluate condition \"{condition}\" of kind \"{kind}\"")]
    UnsupportedConditionKind { kind: String, condition: String },

    #[error("condition \"{condition}\" uses an unimplemented match type")]
    UnknownMatchType { condition: String },

    #[error("no audience with ID \"{audience_id}\" exists")]
    AudienceNotFound { audience_id: String },

    #[error("cyclic reference to audience \"{audience_id}\"")]
    CyclicAudienceReference { audience_id: String },

    #[error("malformed \"{op}\" operator node with no operands")]
    MalformedOperatorNode { op: TreeOperator },
}
