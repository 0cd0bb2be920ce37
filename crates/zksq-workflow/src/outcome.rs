//! # Operation Outcomes
//!
//! The tri-state result attached to each backend invocation — one per
//! prove cycle, one per verify cycle — plus the failure-cause taxonomy and
//! the short human-readable messages the display layer notifies with.
//!
//! Outcomes are session-scoped: a reset clears them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which cycle an outcome belongs to. Drives the notification wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    /// The prove cycle: witness computation then proof generation.
    Prove,
    /// The verify cycle: proof verification against the verification key.
    Verify,
}

impl CycleKind {
    /// The canonical lowercase name of this cycle.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prove => "prove",
            Self::Verify => "verify",
        }
    }
}

/// Why a cycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCause {
    /// Witness computation rejected the input vector: the puzzle's
    /// constraints are not satisfied.
    IncorrectSolution,
    /// Proof generation failed for a witness that should have sufficed.
    ProvingBackend,
    /// The verifier returned false for a well-formed proof.
    VerificationRejected,
    /// The verify call itself faulted on malformed inputs.
    VerificationBackend,
}

impl FailureCause {
    /// The canonical machine-readable name of this cause.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncorrectSolution => "INCORRECT_SOLUTION",
            Self::ProvingBackend => "PROVING_BACKEND_ERROR",
            Self::VerificationRejected => "VERIFICATION_REJECTED",
            Self::VerificationBackend => "VERIFICATION_BACKEND_ERROR",
        }
    }

    /// The short notification text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::IncorrectSolution => "Your solution seems to be incorrect",
            Self::ProvingBackend => "Proof generation failed",
            Self::VerificationRejected => "Verification failed",
            Self::VerificationBackend => "Verification could not be carried out",
        }
    }
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified cycle failure: the cause plus the backend's own detail
/// text. Produced at the orchestrator boundary — backend errors never
/// propagate past it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{cause}: {detail}")]
pub struct CycleFailure {
    /// The classified cause.
    pub cause: FailureCause,
    /// The underlying backend error, for logs and diagnostics.
    pub detail: String,
}

impl CycleFailure {
    /// Classify a backend error under the given cause.
    pub fn new(cause: FailureCause, detail: impl Into<String>) -> Self {
        Self {
            cause,
            detail: detail.into(),
        }
    }
}

/// The tri-state outcome of one backend invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    /// The cycle is in flight.
    Pending,
    /// The cycle completed successfully.
    Success,
    /// The cycle failed; the cause is user-facing, the detail is not.
    Failure {
        /// The classified cause.
        cause: FailureCause,
        /// The underlying backend error text.
        detail: String,
    },
}

impl OperationOutcome {
    /// Whether this outcome is `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Whether the cycle is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The notification text for this outcome of the given cycle.
    pub fn message(&self, kind: CycleKind) -> &'static str {
        match (self, kind) {
            (Self::Pending, CycleKind::Prove) => "Proving...",
            (Self::Pending, CycleKind::Verify) => "Verifying...",
            (Self::Success, CycleKind::Prove) => "Your solution seems to be correct",
            (Self::Success, CycleKind::Verify) => "Generated proof has been successfully verified",
            (Self::Failure { cause, .. }, _) => cause.message(),
        }
    }
}

impl From<CycleFailure> for OperationOutcome {
    fn from(failure: CycleFailure) -> Self {
        Self::Failure {
            cause: failure.cause,
            detail: failure.detail,
        }
    }
}
