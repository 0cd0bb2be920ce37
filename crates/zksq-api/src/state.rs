//! # Application State
//!
//! The shared state behind the API: the session store plus the artifact
//! sets every session proves and verifies against. Artifacts are loaded
//! (or generated) once at startup and shared read-only; sessions are
//! created on demand and live for the process lifetime.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use zksq_core::PuzzleLayout;
use zksq_workflow::{DemoSession, ProofOrchestrator, ProverSession};
use zksq_zkp::{CrosscheckBackend, MockBackend, ProvingArtifacts};

/// Shared application state. Cheap to clone — everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<DashMap<Uuid, Arc<DemoSession>>>,
    layout: PuzzleLayout,
    primary_artifacts: Arc<ProvingArtifacts>,
    crosscheck_artifacts: Option<Arc<ProvingArtifacts>>,
}

impl AppState {
    /// State with deterministically generated artifacts for the canonical
    /// 3×3 puzzle, cross-check enabled.
    pub fn new() -> Self {
        let layout = PuzzleLayout::magic_3x3();
        let order = layout.order();
        Self::with_artifacts(
            layout,
            Arc::new(MockBackend::generate_artifacts(order)),
            Some(Arc::new(CrosscheckBackend::generate_artifacts(order))),
        )
    }

    /// State over explicit artifact sets, e.g. loaded from a `setup`-built
    /// directory. Passing `None` for the cross-check artifacts disables
    /// the cross-check backend.
    pub fn with_artifacts(
        layout: PuzzleLayout,
        primary_artifacts: Arc<ProvingArtifacts>,
        crosscheck_artifacts: Option<Arc<ProvingArtifacts>>,
    ) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            layout,
            primary_artifacts,
            crosscheck_artifacts,
        }
    }

    /// Create and register a new session in the `PROVING` phase.
    pub fn create_session(&self) -> Arc<DemoSession> {
        let mut orchestrator =
            ProofOrchestrator::new(MockBackend, Arc::clone(&self.primary_artifacts));
        if let Some(artifacts) = &self.crosscheck_artifacts {
            orchestrator = orchestrator.with_crosscheck(CrosscheckBackend, Arc::clone(artifacts));
        }
        let session = Arc::new(ProverSession::new(self.layout.clone(), orchestrator));
        self.sessions.insert(session.id(), Arc::clone(&session));
        tracing::info!(session = %session.id(), "session created");
        session
    }

    /// Look up a session by id.
    pub fn session(&self, id: Uuid) -> Option<Arc<DemoSession>> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The primary backend's verification key, for readiness checks.
    pub fn primary_verification_key(&self) -> &serde_json::Value {
        &self.primary_artifacts.verification_key
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
