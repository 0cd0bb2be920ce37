//! # zksq-cli — Command Modules
//!
//! Subcommand handlers for the `zksq` binary. Each module exposes an args
//! struct and a `run_*` function returning a process exit code; `main.rs`
//! only parses and dispatches.

#![forbid(unsafe_code)]

use std::path::Path;
use std::sync::Arc;

use zksq_zkp::{ArtifactError, CrosscheckBackend, MockBackend, ProvingArtifacts};

pub mod demo;
pub mod serve;
pub mod setup;

/// Artifact file prefix for the primary backend.
pub const PRIMARY_PREFIX: &str = "magic_square";

/// Artifact file prefix for the cross-check backend.
pub const CROSSCHECK_PREFIX: &str = "magic_square.crosscheck";

/// The artifact sets a command runs against.
pub struct ResolvedArtifacts {
    /// The primary backend's artifacts.
    pub primary: Arc<ProvingArtifacts>,
    /// The cross-check backend's artifacts, unless disabled.
    pub crosscheck: Option<Arc<ProvingArtifacts>>,
}

/// Load artifacts from a `setup`-built directory, or generate the
/// deterministic sets when no directory is given.
pub fn resolve_artifacts(
    dir: Option<&Path>,
    order: usize,
    crosscheck: bool,
) -> Result<ResolvedArtifacts, ArtifactError> {
    let (primary, secondary) = match dir {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "loading artifacts");
            let primary = ProvingArtifacts::load_dir(dir, PRIMARY_PREFIX)?;
            let secondary = if crosscheck {
                Some(ProvingArtifacts::load_dir(dir, CROSSCHECK_PREFIX)?)
            } else {
                None
            };
            (primary, secondary)
        }
        None => (
            MockBackend::generate_artifacts(order),
            crosscheck.then(|| CrosscheckBackend::generate_artifacts(order)),
        ),
    };
    Ok(ResolvedArtifacts {
        primary: Arc::new(primary),
        crosscheck: secondary.map(Arc::new),
    })
}
