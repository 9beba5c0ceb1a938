use crate::distributions::kinematics::{max_momentum_transfer, momentum_transfer, thomson_differential};
use crate::distributions::{
    PhotonScatteringDistribution, RejectionLimit, ScatteringDistribution,
};
use crate::error::Result;
use crate::interpolation::TabularDistribution;
use crate::particle::{ParticleBank, ParticleState, Subshell, rotate_direction};
use crate::random::RandomNumberStream;

//=====================================================================
// Coherent (Rayleigh) scattering: Thomson angular distribution
// weighted by the atomic form factor squared. The form factor is
// tabulated as F^2 against the squared momentum transfer x^2 so that
// x^2 can be drawn directly from it.
//=====================================================================
#[derive(Debug, Clone)]
pub struct CoherentScatteringDistribution {
    form_factor_squared: TabularDistribution,
    limit: RejectionLimit,
}

impl CoherentScatteringDistribution {
    pub fn new(form_factor_squared: TabularDistribution, max_trials: Option<u64>) -> Self {
        Self {
            form_factor_squared,
            limit: RejectionLimit::new("coherent scattering", max_trials),
        }
    }

    pub fn form_factor_squared(&self) -> &TabularDistribution {
        &self.form_factor_squared
    }
}

impl ScatteringDistribution for CoherentScatteringDistribution {
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if !(-1.0..=1.0).contains(&scattering_angle_cosine) {
            return 0.0;
        }
        let x = momentum_transfer(incoming_energy, scattering_angle_cosine);
        thomson_differential(scattering_angle_cosine) * self.form_factor_squared.evaluate(x * x)
    }

    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)> {
        let max_x = max_momentum_transfer(incoming_energy);
        let max_x_squared = max_x * max_x;
        let mut attempts = 0;

        loop {
            self.limit.record_attempt(&mut attempts, trials)?;
            let x_squared = self
                .form_factor_squared
                .sample_in_subrange(rng.random_number(), max_x_squared);
            let mu = (1.0 - 2.0 * x_squared / max_x_squared).clamp(-1.0, 1.0);

            if rng.random_number() <= 0.5 * (1.0 + mu * mu) {
                return Ok((incoming_energy, mu));
            }
        }
    }
}

impl PhotonScatteringDistribution for CoherentScatteringDistribution {
    fn scatter_photon(
        &self,
        photon: &mut ParticleState,
        _bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        let (_, mu) = self.sample(photon.energy(), rng)?;
        photon.set_direction(rotate_direction(photon.direction(), mu, rng));
        Ok(Subshell::Invalid)
    }
}
