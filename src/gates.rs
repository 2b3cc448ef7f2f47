use crate::error::{Result, SimError};
use crate::register::QuantumRegister;
use log::trace;
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::FRAC_1_SQRT_2;
use std::f64::consts::FRAC_PI_4;

/// Single-qubit gates of the fixed catalog. Each variant carries its exact
/// complex 2x2 matrix as data (`matrix`), so Pauli-Y, Phase-S and T get real
/// imaginary parts instead of a name-keyed special case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleQubitGate {
    Hadamard,
    PauliX,
    PauliY,
    PauliZ,
    PhaseS,
    TGate,
}

impl SingleQubitGate {
    /// Row-major 2x2 unitary [m00, m01, m10, m11].
    pub fn matrix(&self) -> [Complex64; 4] {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        match self {
            SingleQubitGate::Hadamard => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                [h, h, h, -h]
            }
            SingleQubitGate::PauliX => [zero, one, one, zero],
            SingleQubitGate::PauliY => [
                zero,
                Complex64::new(0.0, -1.0),
                Complex64::new(0.0, 1.0),
                zero,
            ],
            SingleQubitGate::PauliZ => [one, zero, zero, -one],
            SingleQubitGate::PhaseS => [one, zero, zero, Complex64::new(0.0, 1.0)],
            SingleQubitGate::TGate => [one, zero, zero, Complex64::new(0.0, FRAC_PI_4).exp()],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SingleQubitGate::Hadamard => "hadamard",
            SingleQubitGate::PauliX => "paulix",
            SingleQubitGate::PauliY => "pauliy",
            SingleQubitGate::PauliZ => "pauliz",
            SingleQubitGate::PhaseS => "phases",
            SingleQubitGate::TGate => "tgate",
        }
    }
}

/// The full named gate catalog. Toffoli is catalogued but invoked by no
/// orchestrated experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDescriptor {
    Single(SingleQubitGate),
    Cnot,
    Toffoli,
}

impl GateDescriptor {
    /// Looks a gate up by name. This is the only string-keyed dispatch in
    /// the crate and the sole origin of `UnknownGate`.
    pub fn from_name(name: &str) -> Result<GateDescriptor> {
        match name.to_lowercase().as_str() {
            "hadamard" | "h" => Ok(GateDescriptor::Single(SingleQubitGate::Hadamard)),
            "paulix" | "x" => Ok(GateDescriptor::Single(SingleQubitGate::PauliX)),
            "pauliy" | "y" => Ok(GateDescriptor::Single(SingleQubitGate::PauliY)),
            "pauliz" | "z" => Ok(GateDescriptor::Single(SingleQubitGate::PauliZ)),
            "phases" | "s" => Ok(GateDescriptor::Single(SingleQubitGate::PhaseS)),
            "tgate" | "t" => Ok(GateDescriptor::Single(SingleQubitGate::TGate)),
            "cnot" => Ok(GateDescriptor::Cnot),
            "toffoli" => Ok(GateDescriptor::Toffoli),
            _ => Err(SimError::UnknownGate {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GateDescriptor::Single(g) => g.name(),
            GateDescriptor::Cnot => "cnot",
            GateDescriptor::Toffoli => "toffoli",
        }
    }

    /// Row-major unitary of dimension 2, 4 or 8. The multi-qubit gates are
    /// basis permutations, so their matrices are 0/1-valued.
    pub fn unitary(&self) -> Vec<Complex64> {
        match self {
            GateDescriptor::Single(g) => g.matrix().to_vec(),
            GateDescriptor::Cnot => permutation_matrix(4, |i| if i & 0b10 != 0 { i ^ 0b01 } else { i }),
            GateDescriptor::Toffoli => {
                permutation_matrix(8, |i| if i & 0b110 == 0b110 { i ^ 0b001 } else { i })
            }
        }
    }
}

fn permutation_matrix(dim: usize, image: fn(usize) -> usize) -> Vec<Complex64> {
    let mut m = vec![Complex64::new(0.0, 0.0); dim * dim];
    for col in 0..dim {
        m[image(col) * dim + col] = Complex64::new(1.0, 0.0);
    }
    m
}

/// Applies a single-qubit gate to `target`. For every basis index the new
/// amplitude is the 2x2 linear combination of the old amplitude and its
/// bit-flipped partner; the whole vector is computed into a fresh buffer and
/// swapped in, so no amplitude is read after being overwritten.
pub fn apply_single(
    reg: &mut QuantumRegister,
    gate: SingleQubitGate,
    target: usize,
) -> Result<()> {
    reg.check_qubit(target)?;
    let [m00, m01, m10, m11] = gate.matrix();
    let mask = 1usize << target;
    let old_amps = reg.amps();

    let new_amps: Vec<Complex64> = (0..old_amps.len())
        .into_par_iter()
        .map(|i| {
            if i & mask == 0 {
                let flipped = i | mask;
                m00 * old_amps[i] + m01 * old_amps[flipped]
            } else {
                let flipped = i ^ mask;
                m10 * old_amps[flipped] + m11 * old_amps[i]
            }
        })
        .collect();

    reg.replace_amps(new_amps);
    reg.tally_mut().record_single();
    trace!("applied {} to qubit {}", gate.name(), target);
    Ok(())
}

/// Applies CNOT: for every basis index with the control bit set, the
/// amplitude is exchanged with the index whose target bit is flipped.
/// Reads go against a snapshot of the prior state, so each pair is
/// exchanged exactly once.
///
/// A target equal to the control would make the kernel non-unitary and is
/// rejected as out of range.
pub fn apply_cnot(reg: &mut QuantumRegister, control: usize, target: usize) -> Result<()> {
    reg.check_qubit(control)?;
    reg.check_qubit(target)?;
    if control == target {
        return Err(SimError::IndexOutOfRange {
            index: target,
            qubits: reg.qubits(),
        });
    }

    let c_mask = 1usize << control;
    let t_mask = 1usize << target;
    let old_amps = reg.amps();

    let new_amps: Vec<Complex64> = (0..old_amps.len())
        .into_par_iter()
        .map(|i| {
            if i & c_mask != 0 {
                old_amps[i ^ t_mask]
            } else {
                old_amps[i]
            }
        })
        .collect();

    reg.replace_amps(new_amps);
    reg.tally_mut().record_multi();
    trace!("applied cnot control={} target={}", control, target);
    Ok(())
}

/// Applies Toffoli (controlled-controlled-X). Catalogued for completeness;
/// no orchestrated experiment invokes it.
///
/// The three qubits must be pairwise distinct; duplicates are rejected as
/// out of range.
pub fn apply_toffoli(
    reg: &mut QuantumRegister,
    control_a: usize,
    control_b: usize,
    target: usize,
) -> Result<()> {
    reg.check_qubit(control_a)?;
    reg.check_qubit(control_b)?;
    reg.check_qubit(target)?;
    if control_a == control_b || control_a == target || control_b == target {
        return Err(SimError::IndexOutOfRange {
            index: target,
            qubits: reg.qubits(),
        });
    }

    let ca_mask = 1usize << control_a;
    let cb_mask = 1usize << control_b;
    let t_mask = 1usize << target;
    let old_amps = reg.amps();

    let new_amps: Vec<Complex64> = (0..old_amps.len())
        .into_par_iter()
        .map(|i| {
            if i & ca_mask != 0 && i & cb_mask != 0 {
                old_amps[i ^ t_mask]
            } else {
                old_amps[i]
            }
        })
        .collect();

    reg.replace_amps(new_amps);
    reg.tally_mut().record_multi();
    Ok(())
}
