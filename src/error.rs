//! Error types for register and gate operations

use thiserror::Error;

/// Failures surfaced by the simulator core. All are local, synchronous
/// errors returned to the immediate caller; none are retried. Experimental
/// outcomes (coherence loss, recovery failure) are reported as boolean
/// results, never as errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Gate name not present in the fixed catalog
    #[error("unknown gate '{name}', not in the catalog")]
    UnknownGate { name: String },

    /// Qubit index at or beyond the configured qubit count
    #[error("qubit index {index} out of range for {qubits}-qubit register")]
    IndexOutOfRange { index: usize, qubits: usize },

    /// Qubit count too large for a dense amplitude vector
    #[error("cannot allocate 2^{qubits} amplitudes, register is capped at {max} qubits")]
    AllocationError { qubits: usize, max: usize },

    /// Norm came out zero or non-finite during renormalization
    #[error("state norm is {norm} during renormalization, cannot divide")]
    NormalizationError { norm: f64 },
}

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;
