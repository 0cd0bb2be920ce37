//! # Session Artifacts
//!
//! The precompiled inputs a backend needs for one circuit: the compiled
//! program, the proving key and the public verification key. Loaded once
//! before the workflow starts and shared read-only for the whole session —
//! a reset never reloads them.
//!
//! On disk the program and proving key are hex-encoded text and the
//! verification key is a JSON document, under a per-backend file prefix:
//!
//! ```text
//! <dir>/<prefix>.program           hex
//! <dir>/<prefix>.proving.key      hex
//! <dir>/<prefix>.verification.key JSON
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors loading or writing an artifact set.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// An artifact file could not be read or written.
    #[error("artifact file {path}: {source}")]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A hex-encoded artifact file did not decode.
    #[error("artifact file {path} is not valid hex: {source}")]
    BadHex {
        /// The offending path.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: hex::FromHexError,
    },
    /// The verification key file is not valid JSON.
    #[error("verification key {path} is not valid JSON: {source}")]
    BadJson {
        /// The offending path.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// The immutable artifact set for one backend and one circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvingArtifacts {
    /// The compiled circuit program.
    pub program: Vec<u8>,
    /// The proving key. Needed only by the prove cycle.
    pub proving_key: Vec<u8>,
    /// The public verification key, opaque JSON in the backend's own schema.
    pub verification_key: serde_json::Value,
}

impl ProvingArtifacts {
    /// Load an artifact set from `dir` under the given file prefix.
    pub fn load_dir(dir: &Path, prefix: &str) -> Result<Self, ArtifactError> {
        let program = read_hex(&dir.join(format!("{prefix}.program")))?;
        let proving_key = read_hex(&dir.join(format!("{prefix}.proving.key")))?;

        let vk_path = dir.join(format!("{prefix}.verification.key"));
        let vk_text = fs::read_to_string(&vk_path).map_err(|source| ArtifactError::Io {
            path: vk_path.clone(),
            source,
        })?;
        let verification_key =
            serde_json::from_str(&vk_text).map_err(|source| ArtifactError::BadJson {
                path: vk_path,
                source,
            })?;

        Ok(Self {
            program,
            proving_key,
            verification_key,
        })
    }

    /// Write this artifact set to `dir` under the given file prefix,
    /// creating the directory if needed.
    pub fn write_dir(&self, dir: &Path, prefix: &str) -> Result<(), ArtifactError> {
        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        write_file(&dir.join(format!("{prefix}.program")), hex::encode(&self.program))?;
        write_file(
            &dir.join(format!("{prefix}.proving.key")),
            hex::encode(&self.proving_key),
        )?;

        let vk_path = dir.join(format!("{prefix}.verification.key"));
        let vk_text = serde_json::to_string_pretty(&self.verification_key)
            .map_err(|source| ArtifactError::BadJson {
                path: vk_path.clone(),
                source,
            })?;
        write_file(&vk_path, vk_text)
    }
}

fn read_hex(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    hex::decode(text.trim()).map_err(|source| ArtifactError::BadHex {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: String) -> Result<(), ArtifactError> {
    fs::write(path, contents).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}
