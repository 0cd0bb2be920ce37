//! # Proof Orchestrator
//!
//! Turns one grid snapshot into one backend call sequence and classifies
//! the result. The prove cycle runs witness computation then proof
//! generation; the verify cycle checks a stored proof bundle against the
//! verification key. Backend failures are caught here and converted into
//! [`CycleFailure`]s — they never propagate to the workflow as faults.
//!
//! With a cross-check rig configured, the prove cycle produces a second
//! proof in the cross-check backend's own format and the verify cycle
//! requires both proofs to validate.
//!
//! Both cycles are deterministic for unchanged inputs: the backends are
//! pure functions of their arguments.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use zksq_core::ValueGrid;
use zksq_zkp::{ProvingArtifacts, ProvingBackend};

use crate::outcome::{CycleFailure, FailureCause};

/// One backend plus its immutable artifact set.
#[derive(Debug, Clone)]
pub struct BackendRig<B: ProvingBackend> {
    backend: B,
    artifacts: Arc<ProvingArtifacts>,
}

impl<B: ProvingBackend> BackendRig<B> {
    /// Pair a backend with the artifacts it proves and verifies against.
    pub fn new(backend: B, artifacts: Arc<ProvingArtifacts>) -> Self {
        Self { backend, artifacts }
    }

    /// Run witness computation then proof generation for the input vector.
    fn prove(&self, public_inputs: &[String]) -> Result<B::Proof, CycleFailure> {
        let started = Instant::now();
        let witness = self
            .backend
            .compute_witness(&self.artifacts.program, public_inputs)
            .map_err(|e| {
                tracing::info!(backend = self.backend.name(), error = %e, "witness rejected");
                CycleFailure::new(FailureCause::IncorrectSolution, e.to_string())
            })?;

        let proof = self
            .backend
            .generate_proof(&self.artifacts.program, &witness, &self.artifacts.proving_key)
            .map_err(|e| {
                tracing::error!(backend = self.backend.name(), error = %e, "proof generation failed");
                CycleFailure::new(FailureCause::ProvingBackend, e.to_string())
            })?;

        tracing::info!(
            backend = self.backend.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "proof generated"
        );
        Ok(proof)
    }

    /// Check one proof against this rig's verification key.
    fn verify(&self, proof: &B::Proof) -> Result<(), CycleFailure> {
        match self.backend.verify(&self.artifacts.verification_key, proof) {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::info!(backend = self.backend.name(), "proof rejected");
                Err(CycleFailure::new(
                    FailureCause::VerificationRejected,
                    format!("{} verifier rejected the proof", self.backend.name()),
                ))
            }
            Err(e) => {
                tracing::error!(backend = self.backend.name(), error = %e, "verification faulted");
                Err(CycleFailure::new(FailureCause::VerificationBackend, e.to_string()))
            }
        }
    }
}

/// The proof artifact of one successful prove cycle.
///
/// Opaque to everything above the orchestrator: stored, rendered as JSON
/// for display, and re-submitted to the verify cycle unchanged. Never
/// mutated once produced.
#[derive(Serialize)]
#[serde(bound = "")]
pub struct ProofBundle<P: ProvingBackend, S: ProvingBackend> {
    primary: P::Proof,
    crosscheck: Option<S::Proof>,
    generated_at: DateTime<Utc>,
}

impl<P: ProvingBackend, S: ProvingBackend> std::fmt::Debug for ProofBundle<P, S>
where
    P::Proof: std::fmt::Debug,
    S::Proof: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofBundle")
            .field("primary", &self.primary)
            .field("crosscheck", &self.crosscheck)
            .field("generated_at", &self.generated_at)
            .finish()
    }
}

impl<P: ProvingBackend, S: ProvingBackend> ProofBundle<P, S> {
    /// The primary backend's proof.
    pub fn primary(&self) -> &P::Proof {
        &self.primary
    }

    /// The cross-check backend's proof, when one was produced.
    pub fn crosscheck(&self) -> Option<&S::Proof> {
        self.crosscheck.as_ref()
    }

    /// When the bundle was produced.
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

/// Drives one prove cycle and one verify cycle against the configured
/// backends.
pub struct ProofOrchestrator<P: ProvingBackend, S: ProvingBackend> {
    primary: BackendRig<P>,
    crosscheck: Option<BackendRig<S>>,
}

impl<P: ProvingBackend, S: ProvingBackend> ProofOrchestrator<P, S> {
    /// Orchestrate over a single primary backend.
    pub fn new(backend: P, artifacts: Arc<ProvingArtifacts>) -> Self {
        Self {
            primary: BackendRig::new(backend, artifacts),
            crosscheck: None,
        }
    }

    /// Add a cross-check backend with its own artifact set. Verify-cycle
    /// success then requires both backends to agree.
    pub fn with_crosscheck(mut self, backend: S, artifacts: Arc<ProvingArtifacts>) -> Self {
        self.crosscheck = Some(BackendRig::new(backend, artifacts));
        self
    }

    /// Whether a cross-check rig is configured.
    pub fn has_crosscheck(&self) -> bool {
        self.crosscheck.is_some()
    }

    /// The backend input vector for a grid: every cell value in row-major
    /// order with the target sum appended as its decimal string.
    pub fn public_inputs(grid: &ValueGrid, target_sum: u64) -> Vec<String> {
        let mut inputs = grid.flatten();
        inputs.push(target_sum.to_string());
        inputs
    }

    /// Run one prove cycle over a grid snapshot.
    pub fn prove_cycle(
        &self,
        grid: &ValueGrid,
        target_sum: u64,
    ) -> Result<ProofBundle<P, S>, CycleFailure> {
        let inputs = Self::public_inputs(grid, target_sum);
        let primary = self.primary.prove(&inputs)?;
        let crosscheck = match &self.crosscheck {
            Some(rig) => Some(rig.prove(&inputs)?),
            None => None,
        };
        Ok(ProofBundle {
            primary,
            crosscheck,
            generated_at: Utc::now(),
        })
    }

    /// Run one verify cycle over a stored bundle. Success requires every
    /// configured backend to accept its proof.
    pub fn verify_cycle(&self, bundle: &ProofBundle<P, S>) -> Result<(), CycleFailure> {
        self.primary.verify(&bundle.primary)?;
        if let Some(rig) = &self.crosscheck {
            match &bundle.crosscheck {
                Some(proof) => rig.verify(proof)?,
                None => {
                    // A bundle produced without the cross-check rig cannot
                    // satisfy a session that requires it.
                    return Err(CycleFailure::new(
                        FailureCause::VerificationBackend,
                        "bundle carries no cross-check proof".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
