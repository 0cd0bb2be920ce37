//! # Workflow Session State Machine
//!
//! The top-level two-phase controller: one [`ProverSession`] per
//! demonstration walks the Prover through filling the grid and generating
//! a proof, then the Verifier through checking it.
//!
//! ```text
//! PROVING ──advance()──▶ VERIFYING
//!    ▲                       │
//!    └───────reset()─────────┘
//! ```
//!
//! All session state lives behind one mutex inside the controller — no
//! ambient globals — so independent sessions run in isolation. Backend
//! cycles execute on the blocking pool; the pending flag is set under the
//! lock before the task is spawned and cleared only when its result is
//! committed, so a second `submit()`/`verify()` during the gap is a silent
//! no-op rather than a duplicate cycle. There is no cancellation: a reset
//! bumps the session epoch and the stale cycle's eventual result is
//! discarded instead of committed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use zksq_core::{GridError, PuzzleLayout, ValueGrid};
use zksq_zkp::ProvingBackend;

use crate::orchestrator::{ProofBundle, ProofOrchestrator};
use crate::outcome::{FailureCause, OperationOutcome};

/// The workflow phase. One forward transition, reset to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowPhase {
    /// The Prover edits the grid and generates a proof.
    Proving,
    /// The Verifier checks the stored proof; the grid is read-only.
    Verifying,
}

impl WorkflowPhase {
    /// The canonical string name of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proving => "PROVING",
            Self::Verifying => "VERIFYING",
        }
    }
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors rejecting a session operation.
///
/// These are guard violations, not cycle failures: backend-originated
/// failures surface as [`OperationOutcome::Failure`] instead.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The operation is not valid in the current phase.
    #[error("{op} is not valid while the session is {phase}")]
    WrongPhase {
        /// The rejected operation.
        op: &'static str,
        /// The phase the session was in.
        phase: WorkflowPhase,
    },
    /// `advance()` without a stored successful proof.
    #[error("cannot advance to verification without a successful proof")]
    ProofNotReady,
    /// `verify()` with no stored proof — unreachable through the exposed
    /// transitions; reaching it indicates a broken caller.
    #[error("no proof stored for verification")]
    NoProofToVerify,
    /// A grid edit was rejected.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A point-in-time copy of the session for display.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub id: Uuid,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Current phase.
    pub phase: WorkflowPhase,
    /// Whether a cycle is in flight.
    pub pending: bool,
    /// The puzzle's target sum.
    pub target_sum: u64,
    /// The grid as the Prover sees it.
    pub grid: ValueGrid,
    /// Outcome of the last prove cycle, if one ran.
    pub prove_outcome: Option<OperationOutcome>,
    /// Outcome of the last verify cycle, if one ran.
    pub verify_outcome: Option<OperationOutcome>,
    /// The stored proof bundle rendered as JSON, for display.
    pub proof: Option<serde_json::Value>,
}

struct SessionState<P: ProvingBackend, S: ProvingBackend> {
    grid: ValueGrid,
    phase: WorkflowPhase,
    pending: bool,
    // Bumped by reset(); in-flight cycles from an older epoch discard
    // their result instead of committing it.
    epoch: u64,
    proof: Option<Arc<ProofBundle<P, S>>>,
    prove_outcome: Option<OperationOutcome>,
    verify_outcome: Option<OperationOutcome>,
}

/// One interactive demonstration session.
pub struct ProverSession<P: ProvingBackend + 'static, S: ProvingBackend + 'static> {
    id: Uuid,
    created_at: DateTime<Utc>,
    layout: PuzzleLayout,
    orchestrator: Arc<ProofOrchestrator<P, S>>,
    state: Mutex<SessionState<P, S>>,
}

impl<P: ProvingBackend + 'static, S: ProvingBackend + 'static> ProverSession<P, S> {
    /// Create a session in the `PROVING` phase with the layout's given
    /// cells pre-filled and locked.
    pub fn new(layout: PuzzleLayout, orchestrator: ProofOrchestrator<P, S>) -> Self {
        let grid = ValueGrid::from_layout(&layout);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            layout,
            orchestrator: Arc::new(orchestrator),
            state: Mutex::new(SessionState {
                grid,
                phase: WorkflowPhase::Proving,
                pending: false,
                epoch: 0,
                proof: None,
                prove_outcome: None,
                verify_outcome: None,
            }),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The puzzle's target sum.
    pub fn target_sum(&self) -> u64 {
        self.layout.target_sum()
    }

    /// Replace one cell's value. Valid only while `PROVING`; given cells
    /// and out-of-bounds positions are rejected by the grid itself.
    pub fn edit_cell(&self, row: usize, col: usize, value: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if state.phase != WorkflowPhase::Proving {
            return Err(SessionError::WrongPhase {
                op: "edit",
                phase: state.phase,
            });
        }
        state.grid.set(row, col, value)?;
        Ok(())
    }

    /// Copy the solution into every non-given cell. Valid only while
    /// `PROVING`.
    pub fn load_solution(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if state.phase != WorkflowPhase::Proving {
            return Err(SessionError::WrongPhase {
                op: "load solution",
                phase: state.phase,
            });
        }
        state.grid.load_solution();
        Ok(())
    }

    /// Toggle solution display. Never affects the data sent to a backend.
    pub fn set_solution_revealed(&self, revealed: bool) {
        let mut state = self.state.lock();
        if revealed {
            state.grid.reveal_solution();
        } else {
            state.grid.hide_solution();
        }
    }

    /// Run the prove cycle over the current grid.
    ///
    /// Valid only while `PROVING`. Returns [`OperationOutcome::Pending`]
    /// without starting a second cycle if one is already in flight. On
    /// success the proof bundle is stored and [`ProverSession::advance`]
    /// becomes available; on failure the phase is unchanged and the grid
    /// stays editable for a retry.
    pub async fn submit(&self) -> Result<OperationOutcome, SessionError> {
        let (grid, epoch) = {
            let mut state = self.state.lock();
            if state.phase != WorkflowPhase::Proving {
                return Err(SessionError::WrongPhase {
                    op: "submit",
                    phase: state.phase,
                });
            }
            if state.pending {
                tracing::debug!(session = %self.id, "submit ignored: cycle already pending");
                return Ok(OperationOutcome::Pending);
            }
            state.pending = true;
            state.proof = None;
            state.prove_outcome = Some(OperationOutcome::Pending);
            (state.grid.clone(), state.epoch)
        };

        let orchestrator = Arc::clone(&self.orchestrator);
        let target_sum = self.layout.target_sum();
        let result =
            tokio::task::spawn_blocking(move || orchestrator.prove_cycle(&grid, target_sum)).await;

        let (outcome, bundle) = match result {
            Ok(Ok(bundle)) => (OperationOutcome::Success, Some(Arc::new(bundle))),
            Ok(Err(failure)) => (OperationOutcome::from(failure), None),
            Err(join_error) => (
                OperationOutcome::Failure {
                    cause: FailureCause::ProvingBackend,
                    detail: format!("prove task failed: {join_error}"),
                },
                None,
            ),
        };

        let mut state = self.state.lock();
        if state.epoch != epoch {
            tracing::debug!(session = %self.id, "discarding prove result from before reset");
            return Ok(outcome);
        }
        state.pending = false;
        state.proof = bundle;
        state.prove_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Move to the `VERIFYING` phase. Requires a stored successful proof.
    pub fn advance(&self) -> Result<WorkflowPhase, SessionError> {
        let mut state = self.state.lock();
        if state.phase != WorkflowPhase::Proving {
            return Err(SessionError::WrongPhase {
                op: "advance",
                phase: state.phase,
            });
        }
        let proved = state.proof.is_some()
            && state
                .prove_outcome
                .as_ref()
                .is_some_and(OperationOutcome::is_success);
        if !proved {
            return Err(SessionError::ProofNotReady);
        }
        state.phase = WorkflowPhase::Verifying;
        tracing::info!(session = %self.id, "advanced to verification");
        Ok(state.phase)
    }

    /// Run the verify cycle over the stored proof bundle.
    ///
    /// Valid only while `VERIFYING`, with the same pending guard as
    /// [`ProverSession::submit`].
    pub async fn verify(&self) -> Result<OperationOutcome, SessionError> {
        let (bundle, epoch) = {
            let mut state = self.state.lock();
            if state.phase != WorkflowPhase::Verifying {
                return Err(SessionError::WrongPhase {
                    op: "verify",
                    phase: state.phase,
                });
            }
            if state.pending {
                tracing::debug!(session = %self.id, "verify ignored: cycle already pending");
                return Ok(OperationOutcome::Pending);
            }
            let bundle = state.proof.clone().ok_or(SessionError::NoProofToVerify)?;
            state.pending = true;
            state.verify_outcome = Some(OperationOutcome::Pending);
            (bundle, state.epoch)
        };

        let orchestrator = Arc::clone(&self.orchestrator);
        let result =
            tokio::task::spawn_blocking(move || orchestrator.verify_cycle(&bundle)).await;

        let outcome = match result {
            Ok(Ok(())) => OperationOutcome::Success,
            Ok(Err(failure)) => OperationOutcome::from(failure),
            Err(join_error) => OperationOutcome::Failure {
                cause: FailureCause::VerificationBackend,
                detail: format!("verify task failed: {join_error}"),
            },
        };

        let mut state = self.state.lock();
        if state.epoch != epoch {
            tracing::debug!(session = %self.id, "discarding verify result from before reset");
            return Ok(outcome);
        }
        state.pending = false;
        state.verify_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Return to the initial `PROVING` state: grid back to the given-cells
    /// layout, proof and outcomes cleared, any in-flight cycle's eventual
    /// result discarded. The session's artifacts are untouched.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.pending = false;
        state.proof = None;
        state.prove_outcome = None;
        state.verify_outcome = None;
        state.grid = ValueGrid::from_layout(&self.layout);
        state.phase = WorkflowPhase::Proving;
        tracing::info!(session = %self.id, "session reset");
    }

    /// A point-in-time copy of the session for display.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        let proof = state.proof.as_ref().and_then(|bundle| {
            serde_json::to_value(&**bundle)
                .map_err(|e| {
                    tracing::warn!(session = %self.id, error = %e, "proof render failed");
                    e
                })
                .ok()
        });
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            phase: state.phase,
            pending: state.pending,
            target_sum: self.layout.target_sum(),
            grid: state.grid.clone(),
            prove_outcome: state.prove_outcome.clone(),
            verify_outcome: state.verify_outcome.clone(),
            proof,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use zksq_zkp::mock::{MockProof, MockWitness};
    use zksq_zkp::{CrosscheckBackend, MockBackend, ProveError, VerifyError, WitnessError};

    type DemoSession = ProverSession<MockBackend, CrosscheckBackend>;

    fn demo_session() -> DemoSession {
        let orchestrator = ProofOrchestrator::new(
            MockBackend,
            Arc::new(MockBackend::generate_artifacts(3)),
        )
        .with_crosscheck(
            CrosscheckBackend,
            Arc::new(CrosscheckBackend::generate_artifacts(3)),
        );
        ProverSession::new(PuzzleLayout::magic_3x3(), orchestrator)
    }

    /// A backend that counts witness computations and holds each one for a
    /// while, to exercise the pending guard.
    #[derive(Clone)]
    struct SlowBackend {
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl ProvingBackend for SlowBackend {
        type Witness = MockWitness;
        type Proof = MockProof;

        fn name(&self) -> &'static str {
            "slow-mock"
        }

        fn compute_witness(
            &self,
            program: &[u8],
            public_inputs: &[String],
        ) -> Result<Self::Witness, WitnessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            MockBackend.compute_witness(program, public_inputs)
        }

        fn generate_proof(
            &self,
            program: &[u8],
            witness: &Self::Witness,
            proving_key: &[u8],
        ) -> Result<Self::Proof, ProveError> {
            MockBackend.generate_proof(program, witness, proving_key)
        }

        fn verify(
            &self,
            verification_key: &serde_json::Value,
            proof: &Self::Proof,
        ) -> Result<bool, VerifyError> {
            MockBackend.verify(verification_key, proof)
        }
    }

    fn slow_session(delay: Duration) -> (ProverSession<SlowBackend, CrosscheckBackend>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = SlowBackend {
            calls: Arc::clone(&calls),
            delay,
        };
        let orchestrator =
            ProofOrchestrator::new(backend, Arc::new(MockBackend::generate_artifacts(3)));
        (ProverSession::new(PuzzleLayout::magic_3x3(), orchestrator), calls)
    }

    #[tokio::test]
    async fn full_walkthrough_succeeds() {
        let session = demo_session();
        session.load_solution().unwrap();

        let outcome = session.submit().await.unwrap();
        assert_eq!(outcome, OperationOutcome::Success);

        let snap = session.snapshot();
        assert!(snap.proof.is_some());
        assert!(!snap.pending);

        assert_eq!(session.advance().unwrap(), WorkflowPhase::Verifying);
        let outcome = session.verify().await.unwrap();
        assert_eq!(outcome, OperationOutcome::Success);
    }

    #[tokio::test]
    async fn incomplete_grid_fails_and_stays_editable() {
        let session = demo_session();
        session.edit_cell(0, 0, "31").unwrap();

        let outcome = session.submit().await.unwrap();
        match &outcome {
            OperationOutcome::Failure { cause, .. } => {
                assert_eq!(*cause, FailureCause::IncorrectSolution)
            }
            other => panic!("expected failure, got: {other:?}"),
        }

        let snap = session.snapshot();
        assert_eq!(snap.phase, WorkflowPhase::Proving);
        assert!(snap.proof.is_none());
        // The grid is still editable for a retry.
        session.edit_cell(0, 1, "73").unwrap();
    }

    #[tokio::test]
    async fn wrong_solution_fails_with_incorrect_solution() {
        let session = demo_session();
        session.load_solution().unwrap();
        session.edit_cell(2, 2, "44").unwrap();

        let outcome = session.submit().await.unwrap();
        assert!(matches!(
            outcome,
            OperationOutcome::Failure {
                cause: FailureCause::IncorrectSolution,
                ..
            }
        ));
    }

    #[test]
    fn advance_without_proof_is_rejected() {
        let session = demo_session();
        assert!(matches!(
            session.advance().unwrap_err(),
            SessionError::ProofNotReady
        ));
    }

    #[tokio::test]
    async fn phase_guards_reject_misordered_operations() {
        let session = demo_session();
        assert!(matches!(
            session.verify().await.unwrap_err(),
            SessionError::WrongPhase { op: "verify", .. }
        ));

        session.load_solution().unwrap();
        session.submit().await.unwrap();
        session.advance().unwrap();

        assert!(matches!(
            session.submit().await.unwrap_err(),
            SessionError::WrongPhase { op: "submit", .. }
        ));
        assert!(matches!(
            session.edit_cell(0, 0, "1").unwrap_err(),
            SessionError::WrongPhase { op: "edit", .. }
        ));
        assert!(matches!(
            session.load_solution().unwrap_err(),
            SessionError::WrongPhase { .. }
        ));
        assert!(matches!(
            session.advance().unwrap_err(),
            SessionError::WrongPhase { op: "advance", .. }
        ));
    }

    #[tokio::test]
    async fn locked_cell_edit_is_rejected_in_any_phase() {
        let session = demo_session();
        assert!(matches!(
            session.edit_cell(1, 1, "99").unwrap_err(),
            SessionError::Grid(GridError::LockedCell { row: 1, col: 1 })
        ));
    }

    #[tokio::test]
    async fn reset_restores_initial_state_from_any_phase() {
        let session = demo_session();
        session.load_solution().unwrap();
        session.submit().await.unwrap();
        session.advance().unwrap();
        session.verify().await.unwrap();

        session.reset();

        let snap = session.snapshot();
        assert_eq!(snap.phase, WorkflowPhase::Proving);
        assert!(snap.proof.is_none());
        assert!(snap.prove_outcome.is_none());
        assert!(snap.verify_outcome.is_none());
        assert!(!snap.pending);
        assert_eq!(snap.grid.cell(0, 2).unwrap().value(), Some("7"));
        assert_eq!(snap.grid.cell(1, 0).unwrap().value(), Some("13"));
        assert_eq!(snap.grid.cell(1, 1).unwrap().value(), Some("37"));
        assert_eq!(snap.grid.cell(0, 0).unwrap().value(), None);
    }

    #[tokio::test]
    async fn double_submit_runs_exactly_one_cycle() {
        let (session, calls) = slow_session(Duration::from_millis(20));
        session.load_solution().unwrap();

        let (first, second) = tokio::join!(session.submit(), session.submit());
        let outcomes = [first.unwrap(), second.unwrap()];

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outcomes.contains(&OperationOutcome::Success));
        assert!(outcomes.contains(&OperationOutcome::Pending));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn reset_discards_in_flight_result() {
        let (session, calls) = slow_session(Duration::from_millis(100));
        session.load_solution().unwrap();
        let session = Arc::new(session);

        let submitting = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit().await })
        };

        // Let the cycle start, then reset underneath it.
        tokio::time::sleep(Duration::from_millis(20)).await;
        session.reset();

        let outcome = submitting.await.unwrap().unwrap();
        assert_eq!(outcome, OperationOutcome::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The completed cycle's result was discarded, not committed.
        let snap = session.snapshot();
        assert!(snap.proof.is_none());
        assert!(snap.prove_outcome.is_none());
        assert_eq!(snap.phase, WorkflowPhase::Proving);
        assert!(!snap.pending);
    }

    #[tokio::test]
    async fn resubmit_after_failure_succeeds() {
        let session = demo_session();
        session.load_solution().unwrap();
        session.edit_cell(2, 2, "44").unwrap();
        assert!(!session.submit().await.unwrap().is_success());

        session.edit_cell(2, 2, "43").unwrap();
        assert!(session.submit().await.unwrap().is_success());
    }

    #[tokio::test]
    async fn snapshot_renders_proof_bundle() {
        let session = demo_session();
        session.load_solution().unwrap();
        session.submit().await.unwrap();

        let snap = session.snapshot();
        let proof = snap.proof.unwrap();
        assert!(proof["primary"]["witness_commitment"].is_string());
        assert!(proof["crosscheck"]["inputs_digest"].is_string());
    }

    #[tokio::test]
    async fn reveal_toggle_survives_phases_but_not_reset() {
        let session = demo_session();
        session.set_solution_revealed(true);
        assert!(session.snapshot().grid.solution_revealed());

        session.set_solution_revealed(false);
        assert!(!session.snapshot().grid.solution_revealed());

        session.set_solution_revealed(true);
        session.reset();
        assert!(!session.snapshot().grid.solution_revealed());
    }
}
