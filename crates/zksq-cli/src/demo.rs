//! # `zksq demo` — Terminal Walkthrough
//!
//! Runs the whole demonstration in one command: Alice fills the grid and
//! generates a proof, Bob verifies it. `--tamper` breaks one cell first to
//! show the failure path.

use std::path::PathBuf;

use clap::Args;

use zksq_core::PuzzleLayout;
use zksq_workflow::{CycleKind, ProofOrchestrator, ProverSession};
use zksq_zkp::{CrosscheckBackend, MockBackend};

use crate::resolve_artifacts;

/// Arguments for `zksq demo`.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Load artifacts from a setup-built directory instead of generating
    /// them in memory.
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// Break one cell before proving, to demonstrate rejection.
    #[arg(long)]
    pub tamper: bool,

    /// Run without the cross-check backend.
    #[arg(long)]
    pub no_crosscheck: bool,
}

/// Run the walkthrough. Returns 0 when every step succeeded.
pub fn run_demo(args: &DemoArgs) -> anyhow::Result<u8> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(walkthrough(args))
}

async fn walkthrough(args: &DemoArgs) -> anyhow::Result<u8> {
    let layout = PuzzleLayout::magic_3x3();
    let artifacts = resolve_artifacts(
        args.artifacts.as_deref(),
        layout.order(),
        !args.no_crosscheck,
    )?;

    let mut orchestrator = ProofOrchestrator::new(MockBackend, artifacts.primary);
    if let Some(crosscheck) = artifacts.crosscheck {
        orchestrator = orchestrator.with_crosscheck(CrosscheckBackend, crosscheck);
    }
    let session = ProverSession::new(layout, orchestrator);

    println!("== Alice the Prover ==");
    println!(
        "Filling the magic square (every row, column and diagonal sums to {}).",
        session.target_sum()
    );
    session.load_solution()?;
    if args.tamper {
        println!("Tampering with cell (2, 2) first.");
        session.edit_cell(2, 2, "44")?;
    }
    print_grid(&session.snapshot().grid);

    let outcome = session.submit().await?;
    println!("{}", outcome.message(CycleKind::Prove));
    if !outcome.is_success() {
        return Ok(1);
    }

    let snapshot = session.snapshot();
    if let Some(proof) = &snapshot.proof {
        println!("{}", serde_json::to_string_pretty(proof)?);
    }

    session.advance()?;
    println!();
    println!("== Bob the Verifier ==");
    println!("Did Alice run the computation successfully? Let's find out.");

    let outcome = session.verify().await?;
    println!("{}", outcome.message(CycleKind::Verify));
    Ok(if outcome.is_success() { 0 } else { 1 })
}

fn print_grid(grid: &zksq_core::ValueGrid) {
    for row in grid.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| format!("{:>4}", cell.value().unwrap_or(".")))
            .collect();
        println!("  {}", line.join(" "));
    }
}
