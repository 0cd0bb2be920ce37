//! # zksq-workflow — Interactive Proof Workflow
//!
//! The core of the demonstration: the orchestration of one prove cycle and
//! one verify cycle against the proving backends, and the two-phase
//! session state machine that sequences them.
//!
//! ## Architecture
//!
//! - **Outcome** (`outcome.rs`): the tri-state [`OperationOutcome`]
//!   attached to each backend invocation and the [`FailureCause`]
//!   taxonomy with user-facing notification text.
//!
//! - **Orchestrator** (`orchestrator.rs`): [`ProofOrchestrator`] turns a
//!   grid snapshot into the backend call sequence and classifies the
//!   result; backend failures are recovered here, never propagated.
//!
//! - **Session** (`session.rs`): [`ProverSession`] owns the grid, the
//!   stored proof bundle and the phase; `submit` / `advance` / `verify` /
//!   `reset` are the only transitions, guarded by a pending-operation
//!   flag that admits one cycle at a time.
//!
//! ## Concurrency
//!
//! Backend cycles run on the tokio blocking pool and suspend only the
//! initiating caller. The pending flag is the sole admission control;
//! there is no cancellation — `reset()` discards a stale cycle's result
//! via an epoch counter.

#![forbid(unsafe_code)]

pub mod orchestrator;
pub mod outcome;
pub mod session;

pub use orchestrator::{BackendRig, ProofBundle, ProofOrchestrator};
pub use outcome::{CycleFailure, CycleKind, FailureCause, OperationOutcome};
pub use session::{ProverSession, SessionError, SessionSnapshot, WorkflowPhase};

use zksq_zkp::{CrosscheckBackend, MockBackend};

/// The session type the demonstration ships: mock primary backend with the
/// cross-check backend available.
pub type DemoSession = ProverSession<MockBackend, CrosscheckBackend>;

/// The matching orchestrator type.
pub type DemoOrchestrator = ProofOrchestrator<MockBackend, CrosscheckBackend>;
