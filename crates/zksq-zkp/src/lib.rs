//! # zksq-zkp — Proving Backend Boundary
//!
//! The collaborator boundary between the workflow core and the
//! zero-knowledge proving machinery. Everything above this crate treats
//! witnesses, proofs and keys as opaque values.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): the [`ProvingBackend`] trait with the three
//!   operations the workflow needs — witness computation, proof generation
//!   and proof verification — and the error taxonomy for each.
//!
//! - **Artifacts** (`artifacts.rs`): [`ProvingArtifacts`] bundles the
//!   compiled program, the proving key and the JSON verification key.
//!   Loaded once per backend before a session starts, immutable afterwards.
//!
//! - **Mock** (`mock.rs`): [`MockBackend`], the deterministic SHA-256
//!   stand-in for a real circuit backend. Witness computation genuinely
//!   enforces the magic-square constraint system, so the demonstration's
//!   accept/reject behavior is real even though the proofs are transparent.
//!
//! - **Crosscheck** (`crosscheck.rs`): [`CrosscheckBackend`], a second
//!   backend with its own key and proof encodings. When configured, the
//!   workflow requires both backends' proofs to validate.
//!
//! ## Crate Policy
//!
//! - Proof and witness types are backend-specific associated types; only
//!   this crate knows their shape.
//! - No `unsafe`.

#![forbid(unsafe_code)]

pub mod artifacts;
pub mod crosscheck;
pub mod mock;
pub mod traits;

pub use artifacts::{ArtifactError, ProvingArtifacts};
pub use crosscheck::CrosscheckBackend;
pub use mock::MockBackend;
pub use traits::{ProveError, ProvingBackend, VerifyError, WitnessError};
