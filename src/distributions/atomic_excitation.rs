use crate::distributions::{ElectronScatteringDistribution, ScatteringDistribution};
use crate::error::Result;
use crate::interpolation::TabulatedFunction;
use crate::particle::{ParticleBank, ParticleState, Subshell};
use crate::random::RandomNumberStream;

// Atomic excitation: the electron loses a tabulated amount of energy and
// keeps its direction
#[derive(Debug, Clone)]
pub struct AtomicExcitationDistribution {
    energy_loss: TabulatedFunction,
}

impl AtomicExcitationDistribution {
    pub fn new(energy_loss: TabulatedFunction) -> Self {
        Self { energy_loss }
    }

    pub fn energy_loss(&self, incoming_energy: f64) -> f64 {
        self.energy_loss.evaluate_clamped(incoming_energy).clamp(0.0, incoming_energy)
    }
}

impl ScatteringDistribution for AtomicExcitationDistribution {
    // All of the probability sits at mu = 1
    fn evaluate(&self, _incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if scattering_angle_cosine == 1.0 { 1.0 } else { 0.0 }
    }

    fn evaluate_integrated(&self, _incoming_energy: f64) -> f64 {
        1.0
    }

    fn evaluate_cdf(&self, _incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if scattering_angle_cosine >= 1.0 { 1.0 } else { 0.0 }
    }

    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        _rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)> {
        *trials += 1;
        Ok((incoming_energy - self.energy_loss(incoming_energy), 1.0))
    }
}

impl ElectronScatteringDistribution for AtomicExcitationDistribution {
    fn scatter_electron(
        &self,
        electron: &mut ParticleState,
        _bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        let (outgoing_energy, _) = self.sample(electron.energy(), rng)?;
        electron.set_energy(outgoing_energy);
        Ok(Subshell::Invalid)
    }
}
