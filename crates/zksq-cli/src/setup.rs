//! # `zksq setup` — Write Artifact Sets to Disk
//!
//! The analog of the original demonstration's precompiled artifact
//! directory: writes the deterministic program, proving key and
//! verification key for both backends so `serve` and `demo` can load them
//! instead of regenerating.

use std::path::PathBuf;

use clap::Args;

use zksq_zkp::{CrosscheckBackend, MockBackend};

use crate::{CROSSCHECK_PREFIX, PRIMARY_PREFIX};

/// Arguments for `zksq setup`.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Directory to write the artifact files into.
    #[arg(long)]
    pub out: PathBuf,

    /// Order N of the N×N circuit to compile artifacts for.
    #[arg(long, default_value_t = 3)]
    pub order: usize,
}

/// Write both backends' artifact sets under `--out`.
pub fn run_setup(args: &SetupArgs) -> anyhow::Result<u8> {
    MockBackend::generate_artifacts(args.order).write_dir(&args.out, PRIMARY_PREFIX)?;
    CrosscheckBackend::generate_artifacts(args.order).write_dir(&args.out, CROSSCHECK_PREFIX)?;

    tracing::info!(dir = %args.out.display(), order = args.order, "artifact sets written");
    println!(
        "Wrote {PRIMARY_PREFIX}.* and {CROSSCHECK_PREFIX}.* to {}",
        args.out.display()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zksq_zkp::ProvingArtifacts;

    #[test]
    fn setup_writes_loadable_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let args = SetupArgs {
            out: dir.path().to_path_buf(),
            order: 3,
        };
        assert_eq!(run_setup(&args).unwrap(), 0);

        let primary = ProvingArtifacts::load_dir(dir.path(), PRIMARY_PREFIX).unwrap();
        assert_eq!(primary, MockBackend::generate_artifacts(3));

        let crosscheck = ProvingArtifacts::load_dir(dir.path(), CROSSCHECK_PREFIX).unwrap();
        assert_eq!(crosscheck, CrosscheckBackend::generate_artifacts(3));
    }

    #[test]
    fn setup_respects_order() {
        let dir = tempfile::tempdir().unwrap();
        let args = SetupArgs {
            out: dir.path().to_path_buf(),
            order: 4,
        };
        run_setup(&args).unwrap();
        let primary = ProvingArtifacts::load_dir(dir.path(), PRIMARY_PREFIX).unwrap();
        assert_eq!(primary, MockBackend::generate_artifacts(4));
    }
}
