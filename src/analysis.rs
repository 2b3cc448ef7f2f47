use crate::error::Result;
use crate::register::QuantumRegister;

/// Probabilities below this are treated as numerically zero by `entropy`.
pub const ENTROPY_CUTOFF: f64 = 1e-6;

/// Tomography reports only basis states above this probability.
pub const TOMOGRAPHY_CUTOFF: f64 = 1e-3;

/// Temporal coherence between two qubits: the total probability mass of
/// basis states where both hold the same bit value. 1.0 means the qubits
/// are always observed equal, 0.0 always unequal. This is a classical
/// correlation proxy specific to this simulator, not a textbook coherence
/// measure.
///
/// Summed sequentially in index order so repeated runs produce
/// bit-identical values.
pub fn temporal_coherence(reg: &QuantumRegister, qubit_a: usize, qubit_b: usize) -> Result<f64> {
    reg.check_qubit(qubit_a)?;
    reg.check_qubit(qubit_b)?;
    let a_mask = 1usize << qubit_a;
    let b_mask = 1usize << qubit_b;
    let coherence = reg
        .amps()
        .iter()
        .enumerate()
        .filter(|(i, _)| ((i & a_mask) != 0) == ((i & b_mask) != 0))
        .map(|(_, amp)| amp.norm_sqr())
        .sum();
    Ok(coherence)
}

/// Von Neumann entropy of the measurement distribution, -sum p ln p over
/// basis states with probability above the cutoff (ignoring near-zero
/// probabilities avoids ln(0)).
pub fn entropy(reg: &QuantumRegister) -> f64 {
    reg.amps()
        .iter()
        .map(|amp| amp.norm_sqr())
        .filter(|p| *p > ENTROPY_CUTOFF)
        .map(|p| -p * p.ln())
        .sum()
}

/// Probability mass remaining at the all-zero basis state, the simulator's
/// closeness-to-ground-truth proxy.
pub fn fidelity(reg: &QuantumRegister) -> f64 {
    reg.amps()[0].norm_sqr()
}

/// Full measurement distribution restricted to basis states above the
/// tomography cutoff, as a lazy `(basis index, probability)` sequence.
/// Recomputed from the live register state on each call, so it can be
/// restarted freely.
pub fn tomography(reg: &QuantumRegister) -> impl Iterator<Item = (usize, f64)> + '_ {
    reg.amps()
        .iter()
        .map(|amp| amp.norm_sqr())
        .enumerate()
        .filter(|(_, p)| *p > TOMOGRAPHY_CUTOFF)
}

/// Marginal probability of measuring `qubit` as 1.
pub fn marginal_one_probability(reg: &QuantumRegister, qubit: usize) -> Result<f64> {
    reg.check_qubit(qubit)?;
    let mask = 1usize << qubit;
    let prob = reg
        .amps()
        .iter()
        .enumerate()
        .filter(|(i, _)| i & mask != 0)
        .map(|(_, amp)| amp.norm_sqr())
        .sum();
    Ok(prob)
}
