//! # Mock Proving Backend
//!
//! A deterministic, transparent stand-in for a real circuit backend.
//! Proofs are SHA-256 bindings — they provide no zero-knowledge privacy,
//! but the accept/reject behavior is real: witness computation parses the
//! public-input vector and enforces the magic-square constraint system, so
//! an incomplete or wrong solution is rejected exactly where a compiled
//! circuit would reject it.
//!
//! ## Encodings
//!
//! - **Program**: canonical JSON circuit descriptor
//!   `{"circuit":"magic_square","order":N}`.
//! - **Witness**: the parsed input values plus a SHA-256 commitment over
//!   them. The proof carries only the commitment — never the values.
//! - **Proof**: `{witness_commitment, binding}`, both hex digests, where
//!   the binding ties the commitment to the program and proving-key
//!   digests.
//! - **Verification key**: `{"scheme":"zksq-mock-sha256","program_digest",
//!   "proving_key_digest"}`.
//!
//! Verification recomputes the binding from the key's digests and the
//! proof's commitment and compares. A tampered or foreign proof yields
//! `Ok(false)`; structurally broken values yield `Err`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use zksq_core::puzzle::is_magic;

use crate::artifacts::ProvingArtifacts;
use crate::traits::{ProveError, ProvingBackend, VerifyError, WitnessError};

/// Scheme identifier carried in the verification key.
pub const MOCK_SCHEME: &str = "zksq-mock-sha256";

const DOMAIN_TAG: &[u8] = b"zksq.mock.v1";

/// The compiled "program": a canonical JSON descriptor of the circuit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CircuitDescriptor {
    /// Circuit family; only `magic_square` is compiled.
    pub circuit: String,
    /// Order N of the N×N square the circuit constrains.
    pub order: usize,
}

impl CircuitDescriptor {
    /// Descriptor for the order-N magic-square circuit.
    pub fn magic_square(order: usize) -> Self {
        Self {
            circuit: "magic_square".to_string(),
            order,
        }
    }
}

/// A computed witness: the parsed public inputs (cells then target) and a
/// SHA-256 commitment over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockWitness {
    values: Vec<u64>,
    commitment: [u8; 32],
}

impl MockWitness {
    /// The parsed input values the witness commits to.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// The commitment the proof will carry.
    pub fn commitment(&self) -> [u8; 32] {
        self.commitment
    }
}

/// A mock proof: the witness commitment plus its binding to the program
/// and proving-key digests. Both fields are 64-char hex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockProof {
    /// Hex SHA-256 commitment to the witness values.
    pub witness_commitment: String,
    /// Hex SHA-256 of `tag || "proof" || program_digest || proving_key_digest || commitment`.
    pub binding: String,
}

/// The deterministic mock backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

impl MockBackend {
    /// Generate the deterministic artifact set for the order-N circuit.
    pub fn generate_artifacts(order: usize) -> ProvingArtifacts {
        let program = descriptor_bytes(&CircuitDescriptor::magic_square(order));
        let proving_key = digest(&[DOMAIN_TAG, b"proving-key", &program]).to_vec();
        let verification_key = serde_json::json!({
            "scheme": MOCK_SCHEME,
            "program_digest": hex::encode(digest(&[&program])),
            "proving_key_digest": hex::encode(digest(&[&proving_key])),
        });
        ProvingArtifacts {
            program,
            proving_key,
            verification_key,
        }
    }
}

impl ProvingBackend for MockBackend {
    type Witness = MockWitness;
    type Proof = MockProof;

    fn name(&self) -> &'static str {
        "mock"
    }

    /// Parse and constrain the public-input vector.
    ///
    /// The vector is the flattened grid in row-major order with the target
    /// sum appended; the circuit expects `order² + 1` decimal entries and
    /// every row, column and diagonal to sum to the target.
    fn compute_witness(
        &self,
        program: &[u8],
        public_inputs: &[String],
    ) -> Result<Self::Witness, WitnessError> {
        let descriptor = parse_descriptor(program)?;
        let expected = descriptor.order * descriptor.order + 1;
        if public_inputs.len() != expected {
            return Err(WitnessError::ArityMismatch {
                got: public_inputs.len(),
                expected,
            });
        }

        let mut values = Vec::with_capacity(expected);
        for (index, input) in public_inputs.iter().enumerate() {
            if input.is_empty() {
                return Err(WitnessError::MalformedInput {
                    index,
                    reason: "empty".to_string(),
                });
            }
            let parsed = input.parse::<u64>().map_err(|e| WitnessError::MalformedInput {
                index,
                reason: e.to_string(),
            })?;
            values.push(parsed);
        }

        let target = values[expected - 1];
        if !is_magic(&values[..expected - 1], descriptor.order, target) {
            return Err(WitnessError::Unsatisfied(format!(
                "every row, column and diagonal must sum to {target}"
            )));
        }

        let commitment = commit(&values);
        Ok(MockWitness { values, commitment })
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
        let program_digest = digest(&[program]);
        let proving_key_digest = digest(&[proving_key]);
        let binding = bind(&program_digest, &proving_key_digest, &witness.commitment);
        Ok(MockProof {
            witness_commitment: hex::encode(witness.commitment),
            binding: hex::encode(binding),
        })
    }

    fn verify(
        &self,
        verification_key: &serde_json::Value,
        proof: &Self::Proof,
    ) -> Result<bool, VerifyError> {
        let scheme = verification_key
            .get("scheme")
            .and_then(|v| v.as_str())
            .ok_or_else(|| VerifyError::BadVerificationKey("missing scheme".to_string()))?;
        if scheme != MOCK_SCHEME {
            return Err(VerifyError::BadVerificationKey(format!(
                "unsupported scheme {scheme:?}"
            )));
        }
        let program_digest = vk_digest(verification_key, "program_digest")?;
        let proving_key_digest = vk_digest(verification_key, "proving_key_digest")?;

        let commitment = decode_digest(&proof.witness_commitment)
            .map_err(|e| VerifyError::MalformedProof(format!("witness_commitment: {e}")))?;
        let claimed = decode_digest(&proof.binding)
            .map_err(|e| VerifyError::MalformedProof(format!("binding: {e}")))?;

        let expected = bind(&program_digest, &proving_key_digest, &commitment);
        Ok(expected == claimed)
    }
}

fn descriptor_bytes(descriptor: &CircuitDescriptor) -> Vec<u8> {
    // Struct field order is fixed, so this serialization is canonical.
    serde_json::to_vec(descriptor).expect("circuit descriptor serializes")
}

fn parse_descriptor(program: &[u8]) -> Result<CircuitDescriptor, WitnessError> {
    let descriptor: CircuitDescriptor = serde_json::from_slice(program)
        .map_err(|e| WitnessError::BadProgram(e.to_string()))?;
    if descriptor.circuit != "magic_square" {
        return Err(WitnessError::BadProgram(format!(
            "unknown circuit {:?}",
            descriptor.circuit
        )));
    }
    if descriptor.order == 0 {
        return Err(WitnessError::BadProgram("order must be positive".to_string()));
    }
    Ok(descriptor)
}

fn digest(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

fn commit(values: &[u64]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_TAG);
    hasher.update(b"witness");
    hasher.update((values.len() as u64).to_be_bytes());
    for value in values {
        hasher.update(value.to_be_bytes());
    }
    hasher.finalize().into()
}

fn bind(program_digest: &[u8; 32], proving_key_digest: &[u8; 32], commitment: &[u8; 32]) -> [u8; 32] {
    digest(&[DOMAIN_TAG, b"proof", program_digest, proving_key_digest, commitment])
}

fn vk_digest(vk: &serde_json::Value, field: &str) -> Result<[u8; 32], VerifyError> {
    let text = vk
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| VerifyError::BadVerificationKey(format!("missing {field}")))?;
    decode_digest(text).map_err(|e| VerifyError::BadVerificationKey(format!("{field}: {e}")))
}

fn decode_digest(text: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(text).map_err(|e| e.to_string())?;
    bytes
        .try_into()
        .map_err(|_| format!("expected 32 bytes, got {}", text.len() / 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_inputs() -> Vec<String> {
        ["31", "73", "7", "13", "37", "61", "67", "1", "43", "111"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn prove_canonical() -> (ProvingArtifacts, MockProof) {
        let artifacts = MockBackend::generate_artifacts(3);
        let witness = MockBackend
            .compute_witness(&artifacts.program, &canonical_inputs())
            .unwrap();
        let proof = MockBackend
            .generate_proof(&artifacts.program, &witness, &artifacts.proving_key)
            .unwrap();
        (artifacts, proof)
    }

    #[test]
    fn canonical_solution_proves_and_verifies() {
        let (artifacts, proof) = prove_canonical();
        let ok = MockBackend.verify(&artifacts.verification_key, &proof).unwrap();
        assert!(ok);
    }

    #[test]
    fn artifacts_are_deterministic() {
        assert_eq!(MockBackend::generate_artifacts(3), MockBackend::generate_artifacts(3));
        assert_ne!(
            MockBackend::generate_artifacts(3),
            MockBackend::generate_artifacts(4)
        );
    }

    #[test]
    fn prove_is_deterministic() {
        let (_, proof1) = prove_canonical();
        let (_, proof2) = prove_canonical();
        assert_eq!(proof1, proof2);
    }

    #[test]
    fn wrong_sums_are_unsatisfied() {
        let artifacts = MockBackend::generate_artifacts(3);
        let mut inputs = canonical_inputs();
        inputs[0] = "32".to_string();
        let err = MockBackend
            .compute_witness(&artifacts.program, &inputs)
            .unwrap_err();
        assert!(matches!(err, WitnessError::Unsatisfied(_)));
    }

    #[test]
    fn empty_input_is_malformed() {
        let artifacts = MockBackend::generate_artifacts(3);
        let mut inputs = canonical_inputs();
        inputs[4] = String::new();
        let err = MockBackend
            .compute_witness(&artifacts.program, &inputs)
            .unwrap_err();
        match err {
            WitnessError::MalformedInput { index, reason } => {
                assert_eq!(index, 4);
                assert_eq!(reason, "empty");
            }
            other => panic!("expected MalformedInput, got: {other}"),
        }
    }

    #[test]
    fn non_decimal_input_is_malformed() {
        let artifacts = MockBackend::generate_artifacts(3);
        let mut inputs = canonical_inputs();
        inputs[8] = "forty-three".to_string();
        let err = MockBackend
            .compute_witness(&artifacts.program, &inputs)
            .unwrap_err();
        assert!(matches!(err, WitnessError::MalformedInput { index: 8, .. }));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let artifacts = MockBackend::generate_artifacts(3);
        let err = MockBackend
            .compute_witness(&artifacts.program, &canonical_inputs()[..9])
            .unwrap_err();
        assert!(matches!(
            err,
            WitnessError::ArityMismatch {
                got: 9,
                expected: 10
            }
        ));
    }

    #[test]
    fn garbage_program_is_rejected() {
        let err = MockBackend
            .compute_witness(b"not a descriptor", &canonical_inputs())
            .unwrap_err();
        assert!(matches!(err, WitnessError::BadProgram(_)));
    }

    #[test]
    fn unknown_circuit_is_rejected() {
        let program = serde_json::to_vec(&CircuitDescriptor {
            circuit: "sudoku".to_string(),
            order: 3,
        })
        .unwrap();
        let err = MockBackend
            .compute_witness(&program, &canonical_inputs())
            .unwrap_err();
        assert!(matches!(err, WitnessError::BadProgram(_)));
    }

    #[test]
    fn empty_proving_key_is_rejected() {
        let artifacts = MockBackend::generate_artifacts(3);
        let witness = MockBackend
            .compute_witness(&artifacts.program, &canonical_inputs())
            .unwrap();
        let err = MockBackend
            .generate_proof(&artifacts.program, &witness, &[])
            .unwrap_err();
        assert!(matches!(err, ProveError::BadProvingKey(_)));
    }

    #[test]
    fn tampered_proof_verifies_false() {
        let (artifacts, mut proof) = prove_canonical();
        proof.witness_commitment = "ab".repeat(32);
        let ok = MockBackend.verify(&artifacts.verification_key, &proof).unwrap();
        assert!(!ok);
    }

    #[test]
    fn foreign_proof_verifies_false() {
        // A proof generated for the order-4 circuit must not validate
        // against the order-3 verification key.
        let artifacts4 = MockBackend::generate_artifacts(4);
        let witness = MockWitness {
            values: vec![0; 17],
            commitment: commit(&[0; 17]),
        };
        let foreign = MockBackend
            .generate_proof(&artifacts4.program, &witness, &artifacts4.proving_key)
            .unwrap();

        let artifacts3 = MockBackend::generate_artifacts(3);
        let ok = MockBackend
            .verify(&artifacts3.verification_key, &foreign)
            .unwrap();
        assert!(!ok);
    }

    #[test]
    fn malformed_proof_hex_is_an_error() {
        let (artifacts, mut proof) = prove_canonical();
        proof.binding = "zz".repeat(32);
        let err = MockBackend
            .verify(&artifacts.verification_key, &proof)
            .unwrap_err();
        assert!(matches!(err, VerifyError::MalformedProof(_)));
    }

    #[test]
    fn short_commitment_is_an_error() {
        let (artifacts, mut proof) = prove_canonical();
        proof.witness_commitment = "abcd".to_string();
        let err = MockBackend
            .verify(&artifacts.verification_key, &proof)
            .unwrap_err();
        assert!(matches!(err, VerifyError::MalformedProof(_)));
    }

    #[test]
    fn wrong_scheme_vk_is_an_error() {
        let (_, proof) = prove_canonical();
        let vk = serde_json::json!({"scheme": "groth16"});
        let err = MockBackend.verify(&vk, &proof).unwrap_err();
        assert!(matches!(err, VerifyError::BadVerificationKey(_)));
    }

    #[test]
    fn vk_missing_digest_is_an_error() {
        let (_, proof) = prove_canonical();
        let vk = serde_json::json!({"scheme": MOCK_SCHEME, "program_digest": "00"});
        let err = MockBackend.verify(&vk, &proof).unwrap_err();
        assert!(matches!(err, VerifyError::BadVerificationKey(_)));
    }

    #[test]
    fn proof_serialization_roundtrip() {
        let (_, proof) = prove_canonical();
        let json = serde_json::to_string(&proof).unwrap();
        let deser: MockProof = serde_json::from_str(&json).unwrap();
        assert_eq!(deser, proof);
    }

    #[test]
    fn proof_does_not_leak_witness_values() {
        let (_, proof) = prove_canonical();
        let rendered = serde_json::to_string(&proof).unwrap();
        for digit in ["31", "73", "61", "67", "43"] {
            // The commitment is hex, so a decimal digit string can appear
            // by coincidence; check the canonical values are not present
            // as JSON numbers or quoted strings.
            assert!(!rendered.contains(&format!("\"{digit}\"")));
        }
    }
}
