//! # `zksq serve` — Run the Demonstration API
//!
//! Binds the Axum application and serves it until the process is stopped.
//! The web front end (the excluded rendering collaborator) talks to this
//! surface.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;

use zksq_api::AppState;
use zksq_core::PuzzleLayout;

use crate::resolve_artifacts;

/// Arguments for `zksq serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Load artifacts from a setup-built directory instead of generating
    /// them in memory.
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// Serve without the cross-check backend.
    #[arg(long)]
    pub no_crosscheck: bool,
}

/// Run the server. Only returns on bind or serve failure.
pub fn run_serve(args: &ServeArgs) -> anyhow::Result<u8> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(args))
}

async fn serve(args: &ServeArgs) -> anyhow::Result<u8> {
    let layout = PuzzleLayout::magic_3x3();
    let artifacts = resolve_artifacts(
        args.artifacts.as_deref(),
        layout.order(),
        !args.no_crosscheck,
    )?;
    let state = AppState::with_artifacts(layout, artifacts.primary, artifacts.crosscheck);
    let app = zksq_api::app(state);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!(addr = %args.listen, "zksq API listening");
    axum::serve(listener, app).await?;
    Ok(0)
}
