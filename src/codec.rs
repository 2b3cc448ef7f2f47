use crate::analysis::marginal_one_probability;
use crate::error::Result;
use crate::gates::{apply_single, SingleQubitGate};
use crate::register::QuantumRegister;
use log::{debug, info, warn};
use serde::Serialize;

/// What a recovery attempt produced. `success` is false by contract: message
/// recovery is defined to always report failure, standing for the
/// irreversibility of decoherence, regardless of how many recovered bits
/// happen to agree with the original.
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryOutcome {
    /// printable characters assembled from the thresholded bits
    pub recovered: String,
    /// marginal P(qubit = 1) per encoded qubit, in encode order
    pub marginals: Vec<f64>,
    pub success: bool,
}

/// Encodes a classical message into qubit rotations: each message byte is
/// expanded to 8 bits (most significant first); a 1 bit applies Pauli-X to
/// its qubit, and every encoded qubit then gets a Hadamard regardless of
/// the bit value. Every encoded qubit therefore ends in an equal
/// superposition, with the classical information smeared into amplitude
/// rather than kept as a clean basis state. That smearing is the point of
/// the experiment, not a shortcut.
///
/// Returns the number of qubits actually encoded (bounded by the register).
pub fn encode(reg: &mut QuantumRegister, message: &str, start_qubit: usize) -> Result<usize> {
    let mut encoded = 0usize;
    'bytes: for (byte_idx, byte) in message.bytes().enumerate() {
        for bit_idx in 0..8usize {
            let k = byte_idx * 8 + bit_idx;
            let target = start_qubit + k;
            if target >= reg.qubits() {
                warn!(
                    "register full after {} bits, truncating message '{}'",
                    encoded, message
                );
                break 'bytes;
            }
            let bit = (byte >> (7 - bit_idx)) & 1;
            if bit == 1 {
                apply_single(reg, SingleQubitGate::PauliX, target)?;
            }
            apply_single(reg, SingleQubitGate::Hadamard, target)?;
            encoded += 1;
        }
    }
    info!("encoded {} bits starting at qubit {}", encoded, start_qubit);
    Ok(encoded)
}

/// Attempts to read the message back: each encoded qubit's marginal
/// probability of measuring 1 is thresholded at 0.5 to give a bit, and
/// bits are packed 8 at a time into candidate characters, kept only when
/// printable (32-126). The attempt reports failure by contract.
pub fn recover(
    reg: &QuantumRegister,
    original_len: usize,
    start_qubit: usize,
) -> Result<RecoveryOutcome> {
    let total_bits = (original_len * 8).min(reg.qubits().saturating_sub(start_qubit));
    let mut marginals = Vec::with_capacity(total_bits);
    let mut recovered = String::new();
    let mut candidate = 0u8;

    for k in 0..total_bits {
        let p_one = marginal_one_probability(reg, start_qubit + k)?;
        marginals.push(p_one);
        let bit = if p_one > 0.5 { 1u8 } else { 0u8 };
        candidate = (candidate << 1) | bit;
        if k % 8 == 7 {
            if (32..=126).contains(&candidate) {
                recovered.push(candidate as char);
            }
            debug!(
                "bits {}..{} -> byte 0x{:02x}",
                k.saturating_sub(7),
                k,
                candidate
            );
            candidate = 0;
        }
    }

    Ok(RecoveryOutcome {
        recovered,
        marginals,
        success: false,
    })
}
