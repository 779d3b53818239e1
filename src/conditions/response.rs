//! Three-valued condition outcomes.
//!
//! Every condition answers with one of:
//! - `Ignore`: no opinion, defer to others
//! - `Valid`: accept
//! - `Invalid`: reject; cannot be overridden by siblings in an `All`
//!
//! `Ignore` is never the same as `Invalid`. The fold functions below keep it
//! distinct at every level so an unrelated check cannot reject events it has
//! no opinion on.

use serde::{Deserialize, Serialize};

/// Tag of a condition response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOutcome {
    Ignore,
    Valid,
    Invalid,
}

/// Outcome plus an optional diagnostic reason.
///
/// Equality compares the outcome only; reasons are diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConditionResponse {
    outcome: ConditionOutcome,
    reason: Option<String>,
}

impl ConditionResponse {
    pub const VALID: Self = Self {
        outcome: ConditionOutcome::Valid,
        reason: None,
    };

    pub const IGNORE: Self = Self {
        outcome: ConditionOutcome::Ignore,
        reason: None,
    };

    pub const INVALID: Self = Self {
        outcome: ConditionOutcome::Invalid,
        reason: None,
    };

    /// Valid with no reason.
    #[must_use]
    pub const fn valid() -> Self {
        Self::VALID
    }

    /// No opinion, with a reason for diagnostics.
    pub fn ignore(reason: impl Into<String>) -> Self {
        Self {
            outcome: ConditionOutcome::Ignore,
            reason: Some(reason.into()),
        }
    }

    /// Rejection with a reason.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            outcome: ConditionOutcome::Invalid,
            reason: Some(reason.into()),
        }
    }

    /// Valid if `ok`, otherwise invalid with `reason`.
    pub fn check(ok: bool, reason: impl Into<String>) -> Self {
        if ok {
            Self::VALID
        } else {
            Self::fail(reason)
        }
    }

    #[must_use]
    pub fn outcome(&self) -> ConditionOutcome {
        self.outcome
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome == ConditionOutcome::Valid
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.outcome == ConditionOutcome::Invalid
    }

    #[must_use]
    pub fn is_ignore(&self) -> bool {
        self.outcome == ConditionOutcome::Ignore
    }
}

impl PartialEq for ConditionResponse {
    fn eq(&self, other: &Self) -> bool {
        self.outcome == other.outcome
    }
}

impl Eq for ConditionResponse {}

impl From<ConditionOutcome> for ConditionResponse {
    fn from(outcome: ConditionOutcome) -> Self {
        Self {
            outcome,
            reason: None,
        }
    }
}

impl std::fmt::Display for ConditionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{:?}: {}", self.outcome, reason),
            None => write!(f, "{:?}", self.outcome),
        }
    }
}

/// Fold for `All`: invalid if any child is invalid, valid if every child is
/// valid, otherwise ignore. Stops at the first invalid child. An empty list
/// is valid.
pub fn fold_all(responses: impl IntoIterator<Item = ConditionResponse>) -> ConditionResponse {
    let mut ignored = None;
    for response in responses {
        match response.outcome {
            ConditionOutcome::Invalid => return response,
            ConditionOutcome::Ignore => {
                ignored.get_or_insert(response);
            }
            ConditionOutcome::Valid => {}
        }
    }
    ignored.unwrap_or(ConditionResponse::VALID)
}

/// Fold for `Any`: valid if any child is valid, invalid if some child is
/// invalid and none valid, otherwise ignore. Stops at the first valid child.
/// An empty list is ignore.
pub fn fold_any(responses: impl IntoIterator<Item = ConditionResponse>) -> ConditionResponse {
    let mut invalid = None;
    let mut ignored = None;
    for response in responses {
        match response.outcome {
            ConditionOutcome::Valid => return response,
            ConditionOutcome::Invalid => {
                invalid.get_or_insert(response);
            }
            ConditionOutcome::Ignore => {
                ignored.get_or_insert(response);
            }
        }
    }
    invalid.or(ignored).unwrap_or(ConditionResponse::IGNORE)
}

/// Fold for `None`: valid iff no child is valid.
pub fn fold_none(responses: impl IntoIterator<Item = ConditionResponse>) -> ConditionResponse {
    for response in responses {
        if response.is_valid() {
            return ConditionResponse::fail("a negated condition was valid");
        }
    }
    ConditionResponse::VALID
}
