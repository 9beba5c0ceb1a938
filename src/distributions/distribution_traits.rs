use std::fmt::Debug;

use log::warn;

use crate::error::{CollisionError, Result};
use crate::particle::{ParticleBank, ParticleState, Subshell};
use crate::random::RandomNumberStream;
use crate::utils::integrate_simpson;

// Sub-intervals used when a distribution has to be integrated numerically
const ANGULAR_INTEGRATION_INTERVALS: usize = 4096;

//=====================================================================
// Common interface of every scattering distribution. Distributions are
// immutable once built; sampling only consumes random numbers and
// bumps the caller's trial counter.
//=====================================================================
pub trait ScatteringDistribution: Debug + Send + Sync {
    // Differential value at (incoming energy, scattering angle cosine)
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64;

    // Integral of `evaluate` over the full angular range
    fn evaluate_integrated(&self, incoming_energy: f64) -> f64 {
        integrate_simpson(
            |mu| self.evaluate(incoming_energy, mu),
            -1.0,
            1.0,
            ANGULAR_INTEGRATION_INTERVALS,
        )
    }

    fn evaluate_pdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        let norm = self.evaluate_integrated(incoming_energy);
        if norm > 0.0 {
            self.evaluate(incoming_energy, scattering_angle_cosine) / norm
        } else {
            0.0
        }
    }

    fn evaluate_cdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        let norm = self.evaluate_integrated(incoming_energy);
        if norm <= 0.0 {
            return 0.0;
        }
        let mu = scattering_angle_cosine.clamp(-1.0, 1.0);
        let partial = integrate_simpson(
            |x| self.evaluate(incoming_energy, x),
            -1.0,
            mu,
            ANGULAR_INTEGRATION_INTERVALS,
        );
        (partial / norm).min(1.0)
    }

    // Returns (outgoing energy, scattering angle cosine)
    fn sample(&self, incoming_energy: f64, rng: &mut dyn RandomNumberStream) -> Result<(f64, f64)> {
        let mut trials = 0;
        self.sample_and_record_trials(incoming_energy, rng, &mut trials)
    }

    // Returns (outgoing energy, scattering angle cosine), adding every
    // attempt to `trials`
    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)>;
}

pub trait PhotonScatteringDistribution: ScatteringDistribution {
    // Update the photon and bank any secondaries. Returns the shell the
    // photon interacted with.
    fn scatter_photon(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell>;

    fn number_of_emitted_electrons(&self) -> u32 {
        0
    }
}

pub trait ElectronScatteringDistribution: ScatteringDistribution {
    fn scatter_electron(
        &self,
        electron: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell>;

    // Adjoint transport runs the same kinematics backwards. For the
    // distributions here that is the forward sampling itself.
    fn scatter_adjoint_electron(
        &self,
        adjoint_electron: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        self.scatter_electron(adjoint_electron, bank, rng)
    }

    fn number_of_emitted_electrons(&self) -> u32 {
        0
    }

    fn number_of_emitted_photons(&self) -> u32 {
        0
    }
}

//=====================================================================
// Optional cap on the number of attempts a rejection loop may make.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectionLimit {
    distribution: &'static str,
    max_trials: Option<u64>,
}

impl RejectionLimit {
    pub fn new(distribution: &'static str, max_trials: Option<u64>) -> Self {
        Self { distribution, max_trials }
    }

    pub fn unlimited(distribution: &'static str) -> Self {
        Self::new(distribution, None)
    }

    // Count one attempt made by the current sampling call
    #[inline]
    pub fn record_attempt(&self, attempts: &mut u64, trials: &mut u64) -> Result<()> {
        *attempts += 1;
        *trials += 1;
        match self.max_trials {
            Some(max_trials) if *attempts > max_trials => {
                warn!(
                    "{} rejection sampling did not accept within {} trials",
                    self.distribution, max_trials
                );
                Err(CollisionError::RejectionLimit {
                    distribution: self.distribution,
                    trials: *attempts - 1,
                })
            }
            _ => Ok(()),
        }
    }
}

// Draw a random number, checking its range when asked to
#[inline]
pub(crate) fn checked_random_number(rng: &mut dyn RandomNumberStream, check: bool) -> Result<f64> {
    let value = rng.random_number();
    if check && !(0.0..=1.0).contains(&value) {
        return Err(CollisionError::InvalidRandomNumber(value));
    }
    Ok(value)
}
