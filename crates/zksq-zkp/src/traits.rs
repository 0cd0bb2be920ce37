//! # Proving Backend Trait
//!
//! Abstract interface for the external proving collaborator. The workflow
//! drives exactly three operations per backend: compute a witness from the
//! public-input vector, generate a proof from that witness, and verify a
//! proof against the public verification key.
//!
//! Implementations provide their own witness and proof types. The program
//! and proving key are raw byte sequences; the verification key is opaque
//! JSON — the encodings the session artifacts are stored in.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Error during witness computation.
///
/// This is where an incorrect puzzle solution is first rejected: an input
/// vector that does not satisfy the compiled circuit's constraints fails
/// here, before any proof is attempted.
#[derive(Error, Debug)]
pub enum WitnessError {
    /// The input vector does not satisfy the circuit's constraints.
    #[error("constraints not satisfied: {0}")]
    Unsatisfied(String),
    /// An input is missing or not a decimal number.
    #[error("malformed public input at position {index}: {reason}")]
    MalformedInput {
        /// Index into the public-input vector.
        index: usize,
        /// Why the input was rejected.
        reason: String,
    },
    /// The input vector has the wrong number of entries for the circuit.
    #[error("input vector has {got} entries, circuit expects {expected}")]
    ArityMismatch {
        /// Entries received.
        got: usize,
        /// Entries the circuit expects.
        expected: usize,
    },
    /// The compiled program could not be interpreted.
    #[error("malformed program: {0}")]
    BadProgram(String),
}

/// Error during proof generation.
///
/// Expected to be rare: generation is assumed to succeed for any witness
/// the same backend just computed. A failure here is fatal for the cycle.
#[derive(Error, Debug)]
pub enum ProveError {
    /// The proving key could not be interpreted.
    #[error("malformed proving key: {0}")]
    BadProvingKey(String),
    /// Internal prover failure.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during proof verification.
///
/// A well-formed but false proof is NOT an error — `verify` returns
/// `Ok(false)` for it. These variants cover structurally malformed inputs
/// only.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof value is structurally invalid.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The verification key is structurally invalid or for another scheme.
    #[error("malformed verification key: {0}")]
    BadVerificationKey(String),
}

/// Abstract interface for a proving backend.
///
/// Each implementation provides its own witness and proof types; the
/// workflow stores proofs opaquely and re-submits them to `verify`
/// unchanged. All three operations are deterministic — re-running a call
/// with the same inputs yields the same result.
pub trait ProvingBackend: Send + Sync {
    /// The witness type produced by this backend.
    type Witness: Send;
    /// The proof type produced by this backend. Serializable so the
    /// display layer can render it.
    type Proof: Clone + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Short identifier used in logs and artifact file names.
    fn name(&self) -> &'static str;

    /// Compute the full witness for the circuit from the public inputs.
    fn compute_witness(
        &self,
        program: &[u8],
        public_inputs: &[String],
    ) -> Result<Self::Witness, WitnessError>;

    /// Generate a proof for a previously computed witness.
    fn generate_proof(
        &self,
        program: &[u8],
        witness: &Self::Witness,
        proving_key: &[u8],
    ) -> Result<Self::Proof, ProveError>;

    /// Check a proof against the public verification key.
    ///
    /// Returns `Ok(false)` for a well-formed but false proof; `Err` only
    /// for structurally malformed inputs.
    fn verify(
        &self,
        verification_key: &serde_json::Value,
        proof: &Self::Proof,
    ) -> Result<bool, VerifyError>;
}
