// retroq - a quantum state-vector simulator for retrocausal messaging experiments.
//
// the library simulates a dense register of qubits under gate application and
// amplitude-damping decoherence, then tries (and, by contract, fails) to
// recover a classical message encoded into the register after time evolution.

pub mod analysis; // coherence, entropy, fidelity, tomography
pub mod codec; // classical message encode / threshold recovery
pub mod decoherence; // amplitude damping + renormalization
pub mod emitter; // static hardware-description artifact
pub mod error; // SimError and the crate Result alias
pub mod experiment; // orchestrated experiments and their reports
pub mod gates; // gate catalog and application kernels
pub mod register; // dense amplitude vector and lifecycle

pub use error::{Result, SimError};
pub use experiment::SimConfig;
pub use gates::{GateDescriptor, SingleQubitGate};
pub use register::QuantumRegister;
