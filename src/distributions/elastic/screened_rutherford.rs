use crate::distributions::kinematics::moliere_screening_constant;
use crate::distributions::{ElectronScatteringDistribution, ScatteringDistribution};
use crate::distributions::elastic::scatter_elastically;
use crate::error::{CollisionError, Result};
use crate::particle::{ParticleBank, ParticleState, Subshell};
use crate::random::RandomNumberStream;

//=====================================================================
// Closed forms of the screened Rutherford tail above the cutoff
// cosine mu_c, pdf(mu) ~ 1 / (eta + 1 - mu)^2.
//=====================================================================

// Tail pdf scaled to equal `cutoff_pdf` at mu_c
#[inline]
pub fn screened_rutherford_pdf(
    scattering_angle_cosine: f64,
    eta: f64,
    cutoff_angle_cosine: f64,
    cutoff_pdf: f64,
) -> f64 {
    let delta_mu = 1.0 - cutoff_angle_cosine;
    let pdf_parameter = cutoff_pdf * (delta_mu + eta) * (delta_mu + eta);
    let distance = 1.0 - scattering_angle_cosine + eta;
    pdf_parameter / (distance * distance)
}

// Tail cdf rising from `cutoff_cdf` at mu_c to exactly 1 at mu = 1
#[inline]
pub fn screened_rutherford_cdf(
    scattering_angle_cosine: f64,
    eta: f64,
    cutoff_angle_cosine: f64,
    cutoff_cdf: f64,
) -> f64 {
    if scattering_angle_cosine >= 1.0 {
        return 1.0;
    }
    if scattering_angle_cosine <= cutoff_angle_cosine {
        return cutoff_cdf;
    }
    let delta_mu = 1.0 - cutoff_angle_cosine;
    let tail = eta * (scattering_angle_cosine - cutoff_angle_cosine)
        / (delta_mu * (eta + 1.0 - scattering_angle_cosine));
    cutoff_cdf + (1.0 - cutoff_cdf) * tail
}

// Invert the tail cdf for a random number rescaled onto [0, 1]
#[inline]
pub fn sample_screened_rutherford(scaled_random_number: f64, eta: f64, cutoff_angle_cosine: f64) -> f64 {
    let delta_mu = 1.0 - cutoff_angle_cosine;
    let mu = (cutoff_angle_cosine * eta + (1.0 + eta) * delta_mu * scaled_random_number)
        / (eta + delta_mu * scaled_random_number);
    mu.clamp(cutoff_angle_cosine, 1.0)
}

//=====================================================================
// The screened Rutherford tail on its own, normalized over [mu_c, 1]
// with the Moliere screening constant of the target atom.
//=====================================================================
#[derive(Debug, Clone)]
pub struct ScreenedRutherfordElasticDistribution {
    atomic_number: u32,
    cutoff_angle_cosine: f64,
}

impl ScreenedRutherfordElasticDistribution {
    pub fn new(atomic_number: u32, cutoff_angle_cosine: f64) -> Result<Self> {
        if atomic_number == 0 || !(cutoff_angle_cosine > -1.0 && cutoff_angle_cosine < 1.0) {
            return Err(CollisionError::configuration(format!(
                "ScreenedRutherfordElasticDistribution: invalid atomic number ({}) or cutoff cosine ({})",
                atomic_number, cutoff_angle_cosine
            )));
        }
        Ok(Self { atomic_number, cutoff_angle_cosine })
    }

    pub fn atomic_number(&self) -> u32 {
        self.atomic_number
    }

    pub fn cutoff_angle_cosine(&self) -> f64 {
        self.cutoff_angle_cosine
    }

    pub fn screening_constant(&self, incoming_energy: f64) -> f64 {
        moliere_screening_constant(incoming_energy, self.atomic_number)
    }
}

impl ScatteringDistribution for ScreenedRutherfordElasticDistribution {
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if scattering_angle_cosine < self.cutoff_angle_cosine || scattering_angle_cosine > 1.0 {
            return 0.0;
        }
        let eta = self.screening_constant(incoming_energy);
        let delta_mu = 1.0 - self.cutoff_angle_cosine;
        let cutoff_pdf = eta / (delta_mu * (delta_mu + eta));
        screened_rutherford_pdf(scattering_angle_cosine, eta, self.cutoff_angle_cosine, cutoff_pdf)
    }

    fn evaluate_integrated(&self, _incoming_energy: f64) -> f64 {
        1.0
    }

    fn evaluate_pdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        self.evaluate(incoming_energy, scattering_angle_cosine)
    }

    fn evaluate_cdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if scattering_angle_cosine <= self.cutoff_angle_cosine {
            return 0.0;
        }
        let eta = self.screening_constant(incoming_energy);
        screened_rutherford_cdf(scattering_angle_cosine, eta, self.cutoff_angle_cosine, 0.0)
    }

    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)> {
        *trials += 1;
        let eta = self.screening_constant(incoming_energy);
        let mu = sample_screened_rutherford(rng.random_number(), eta, self.cutoff_angle_cosine);
        Ok((incoming_energy, mu))
    }
}

impl ElectronScatteringDistribution for ScreenedRutherfordElasticDistribution {
    fn scatter_electron(
        &self,
        electron: &mut ParticleState,
        _bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        scatter_elastically(self, electron, rng)?;
        Ok(Subshell::Invalid)
    }
}
