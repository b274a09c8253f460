//! Three-Valued Results
//!
//! Every matcher and combinator yields a [`TriState`], never a bare bool:
//! missing or incomparable per-user data produces `Unknown` and flows
//! through the combinators instead of being collapsed into a guess.

use std::fmt;

/// Why a condition could not be decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownReason {
    /// The user has no attribute with this name
    MissingAttribute(String),

    /// The attribute exists but its kind does not match what the condition
    /// needs
    InvalidAttributeType(String),

    /// The condition's own literal is of a kind the matcher cannot use
    UnsupportedConditionValue(String),

    /// A leaf condition could not be evaluated at all (unsupported kind or
    /// match type) and its failure was absorbed by the enclosing combinator
    InvalidCondition(String),
}

/// Result of evaluating a condition or combinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriState {
    True,
    False,
    Unknown(UnknownReason),
}

impl TriState {
    pub fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Self::False)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Logical negation; never resolves uncertainty
    pub fn negate(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            unknown => unknown,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("TRUE"),
            Self::False => f.write_str("FALSE"),
            Self::Unknown(_) => f.write_str("UNKNOWN"),
        }
    }
}
