//! # Cross-Check Backend
//!
//! A second proving backend with its own program, key and proof encodings,
//! used only to cross-check the primary backend: when configured, the
//! workflow requires proofs from both backends to validate before a verify
//! cycle succeeds.
//!
//! The two backends share no artifact formats. Here the program is a plain
//! text descriptor (`magic-square order=N`), the verification key carries a
//! single pre-derived seal key, and the witness digest is computed over the
//! decimal input strings rather than their binary encoding. Constraint
//! enforcement is the same magic-square check — both backends must agree on
//! what a correct solution is.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use zksq_core::puzzle::is_magic;

use crate::artifacts::ProvingArtifacts;
use crate::traits::{ProveError, ProvingBackend, VerifyError, WitnessError};

/// Format identifier carried in the verification key.
pub const CROSSCHECK_FORMAT: &str = "zksq-crosscheck-v1";

const DOMAIN_TAG: &[u8] = b"zksq.xcheck.v1";

/// A computed cross-check witness: a digest over the decimal input strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosscheckWitness {
    inputs_digest: [u8; 32],
}

/// A cross-check proof: the input digest and its seal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrosscheckProof {
    /// Hex SHA-256 over the colon-joined decimal public inputs.
    pub inputs_digest: String,
    /// Hex SHA-256 of `tag || "seal" || seal_key || inputs_digest`.
    pub seal: String,
}

/// The cross-check backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosscheckBackend;

impl CrosscheckBackend {
    /// Generate the deterministic artifact set for the order-N circuit,
    /// in this backend's own encodings.
    pub fn generate_artifacts(order: usize) -> ProvingArtifacts {
        let program = format!("magic-square order={order}").into_bytes();
        let proving_key = digest(&[DOMAIN_TAG, b"proving-key", &program]).to_vec();
        let verification_key = serde_json::json!({
            "format": CROSSCHECK_FORMAT,
            "seal_key": hex::encode(seal_key(&program, &proving_key)),
        });
        ProvingArtifacts {
            program,
            proving_key,
            verification_key,
        }
    }
}

impl ProvingBackend for CrosscheckBackend {
    type Witness = CrosscheckWitness;
    type Proof = CrosscheckProof;

    fn name(&self) -> &'static str {
        "crosscheck"
    }

    fn compute_witness(
        &self,
        program: &[u8],
        public_inputs: &[String],
    ) -> Result<Self::Witness, WitnessError> {
        let order = parse_program(program)?;
        let expected = order * order + 1;
        if public_inputs.len() != expected {
            return Err(WitnessError::ArityMismatch {
                got: public_inputs.len(),
                expected,
            });
        }

        let mut values = Vec::with_capacity(expected);
        for (index, input) in public_inputs.iter().enumerate() {
            let parsed = input.parse::<u64>().map_err(|_| WitnessError::MalformedInput {
                index,
                reason: if input.is_empty() {
                    "empty".to_string()
                } else {
                    format!("not a decimal number: {input:?}")
                },
            })?;
            values.push(parsed);
        }

        let target = values[expected - 1];
        if !is_magic(&values[..expected - 1], order, target) {
            return Err(WitnessError::Unsatisfied(format!(
                "square does not reach the target sum {target}"
            )));
        }

        Ok(CrosscheckWitness {
            inputs_digest: digest(&[DOMAIN_TAG, b"inputs", public_inputs.join(":").as_bytes()]),
        })
    }

    fn generate_proof(
        &self,
        program: &[u8],
        witness: &Self::Witness,
        proving_key: &[u8],
    ) -> Result<Self::Proof, ProveError> {
        if proving_key.is_empty() {
            return Err(ProveError::BadProvingKey("empty proving key".to_string()));
        }
        let key = seal_key(program, proving_key);
        let seal = digest(&[DOMAIN_TAG, b"seal", &key, &witness.inputs_digest]);
        Ok(CrosscheckProof {
            inputs_digest: hex::encode(witness.inputs_digest),
            seal: hex::encode(seal),
        })
    }

    fn verify(
        &self,
        verification_key: &serde_json::Value,
        proof: &Self::Proof,
    ) -> Result<bool, VerifyError> {
        let format = verification_key
            .get("format")
            .and_then(|v| v.as_str())
            .ok_or_else(|| VerifyError::BadVerificationKey("missing format".to_string()))?;
        if format != CROSSCHECK_FORMAT {
            return Err(VerifyError::BadVerificationKey(format!(
                "unsupported format {format:?}"
            )));
        }
        let key = decode_field(verification_key, "seal_key")
            .map_err(VerifyError::BadVerificationKey)?;

        let inputs_digest = decode32(&proof.inputs_digest)
            .map_err(|e| VerifyError::MalformedProof(format!("inputs_digest: {e}")))?;
        let claimed = decode32(&proof.seal)
            .map_err(|e| VerifyError::MalformedProof(format!("seal: {e}")))?;

        let expected = digest(&[DOMAIN_TAG, b"seal", &key, &inputs_digest]);
        Ok(expected == claimed)
    }
}

fn parse_program(program: &[u8]) -> Result<usize, WitnessError> {
    let text = std::str::from_utf8(program)
        .map_err(|_| WitnessError::BadProgram("not UTF-8".to_string()))?;
    let order = text
        .strip_prefix("magic-square order=")
        .and_then(|n| n.trim().parse::<usize>().ok())
        .ok_or_else(|| WitnessError::BadProgram(format!("unrecognized descriptor {text:?}")))?;
    if order == 0 {
        return Err(WitnessError::BadProgram("order must be positive".to_string()));
    }
    Ok(order)
}

fn seal_key(program: &[u8], proving_key: &[u8]) -> [u8; 32] {
    let pk_digest = digest(&[proving_key]);
    let program_digest = digest(&[program]);
    digest(&[DOMAIN_TAG, b"seal-key", &pk_digest, &program_digest])
}

fn digest(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

fn decode_field(vk: &serde_json::Value, field: &str) -> Result<[u8; 32], String> {
    let text = vk
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {field}"))?;
    decode32(text).map_err(|e| format!("{field}: {e}"))
}

fn decode32(text: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(text).map_err(|e| e.to_string())?;
    bytes
        .try_into()
        .map_err(|_| format!("expected 32 bytes, got {}", text.len() / 2))
}
