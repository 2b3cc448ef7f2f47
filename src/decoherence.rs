use crate::error::Result;
use crate::register::QuantumRegister;
use log::trace;
use rayon::prelude::*;

/// One discrete decoherence iteration with step index `step`. Every
/// amplitude except index 0 is damped by `exp(-step * rate)` (the ground
/// state is left untouched at this stage), then the entire vector, index 0
/// included, is renormalized. The repeated renormalization progressively
/// concentrates probability mass onto the ground state.
pub fn decoherence_step(reg: &mut QuantumRegister, step: usize, rate: f64) -> Result<()> {
    let decay_factor = (-(step as f64) * rate).exp();
    reg.amps_mut()
        .par_iter_mut()
        .skip(1)
        .for_each(|amp| *amp *= decay_factor);
    reg.renormalize()?;
    trace!("decoherence step {}: decay factor {:.6}", step, decay_factor);
    Ok(())
}

/// Runs `time_steps` decoherence iterations at the given rate. The per-step
/// decay compounds on the live state, so after n iterations the net
/// attenuation of a non-ground amplitude (before renormalization
/// redistributes mass) is exp(-rate * n(n-1)/2), a quadratic-in-time decay
/// law rather than a plain exponential.
pub fn apply_decoherence(reg: &mut QuantumRegister, time_steps: usize, rate: f64) -> Result<()> {
    for step in 0..time_steps {
        decoherence_step(reg, step, rate)?;
    }
    Ok(())
}
