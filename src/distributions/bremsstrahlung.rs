use log::debug;

use crate::distributions::kinematics::{dipole_cdf, dipole_pdf, sample_lepton_polar_angle};
use crate::distributions::secondary_energy::SecondaryEnergyTable;
use crate::distributions::{ElectronScatteringDistribution, ScatteringDistribution, checked_random_number};
use crate::error::{CollisionError, Result};
use crate::particle::{ParticleBank, ParticleState, ParticleType, Subshell, rotate_direction};
use crate::random::RandomNumberStream;
use crate::settings::ValidationLevel;

//=====================================================================
// Bremsstrahlung: the electron keeps its direction and loses the energy
// of the photon it emits. The photon energy comes from a table, its
// direction from the dipole law.
//
// As a scattering distribution the angle is the photon cosine.
//=====================================================================
#[derive(Debug, Clone)]
pub struct BremsstrahlungDistribution {
    photon_energy: SecondaryEnergyTable,
    validation: ValidationLevel,
}

fn max_photon_energy(incoming_energy: f64) -> f64 {
    incoming_energy
}

impl BremsstrahlungDistribution {
    pub fn new(photon_energy: SecondaryEnergyTable, validation: ValidationLevel) -> Self {
        debug!(
            "Bremsstrahlung: {} photon spectra over [{:e}, {:e}] MeV, dipole photon angles",
            photon_energy.energies().len(),
            photon_energy.min_energy(),
            photon_energy.max_energy()
        );
        Self { photon_energy, validation }
    }

    pub fn sample_photon_energy(&self, incoming_energy: f64, random_number: f64) -> f64 {
        self.photon_energy
            .sample(incoming_energy, random_number, &max_photon_energy)
            .clamp(0.0, incoming_energy)
    }

    pub fn evaluate_photon_energy_pdf(&self, incoming_energy: f64, photon_energy: f64) -> f64 {
        self.photon_energy.evaluate_pdf(incoming_energy, photon_energy, &max_photon_energy)
    }
}

impl ScatteringDistribution for BremsstrahlungDistribution {
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        dipole_pdf(incoming_energy, scattering_angle_cosine)
    }

    fn evaluate_integrated(&self, _incoming_energy: f64) -> f64 {
        1.0
    }

    fn evaluate_pdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        self.evaluate(incoming_energy, scattering_angle_cosine)
    }

    fn evaluate_cdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        dipole_cdf(incoming_energy, scattering_angle_cosine)
    }

    // Returns (photon energy, photon angle cosine)
    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)> {
        if !(incoming_energy > 0.0) {
            return Err(CollisionError::OutOfBounds {
                value: incoming_energy,
                lower: 0.0,
                upper: f64::INFINITY,
            });
        }
        *trials += 1;
        let check = self.validation.is_full();
        let photon_energy = self.sample_photon_energy(incoming_energy, checked_random_number(rng, check)?);
        let mu = sample_lepton_polar_angle(incoming_energy, checked_random_number(rng, check)?);
        Ok((photon_energy, mu))
    }
}

impl ElectronScatteringDistribution for BremsstrahlungDistribution {
    fn scatter_electron(
        &self,
        electron: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        let energy = electron.energy();
        let (photon_energy, photon_mu) = self.sample(energy, rng)?;
        let photon_direction = rotate_direction(electron.direction(), photon_mu, rng);
        bank.push(electron.spawn_secondary(ParticleType::Photon, photon_energy, photon_direction));

        let outgoing_energy = energy - photon_energy;
        if outgoing_energy > 0.0 {
            electron.set_energy(outgoing_energy);
        } else {
            electron.set_energy(0.0);
            electron.set_as_gone();
        }
        Ok(Subshell::Invalid)
    }

    fn number_of_emitted_photons(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::interpolation::TabularDistribution;
    use crate::random::FakeStream;
    use crate::utils::electron_speed_squared;

    // 1/k spectra (linearized) between 1 keV and the electron energy
    fn distribution() -> BremsstrahlungDistribution {
        let spectrum = |energy: f64| {
            TabularDistribution::new(vec![1e-3, 0.1 * energy, energy], vec![1.0 / 1e-3, 10.0 / energy, 1.0 / energy])
                .unwrap()
        };
        let table = SecondaryEnergyTable::new(vec![0.1, 1.0, 10.0], vec![spectrum(0.1), spectrum(1.0), spectrum(10.0)])
            .unwrap();
        BremsstrahlungDistribution::new(table, ValidationLevel::Full)
    }

    fn electron(energy: f64) -> ParticleState {
        ParticleState::new(ParticleType::Electron, 0, energy, [0.0; 3], [0.0, 0.0, 1.0])
    }

    #[test]
    fn test_photon_energy_bounds() {
        let dist = distribution();
        assert_relative_eq!(dist.sample_photon_energy(1.0, 0.0), 1e-3, max_relative = 1e-12);
        assert_relative_eq!(dist.sample_photon_energy(1.0, 1.0), 1.0, max_relative = 1e-12);
        let between = dist.sample_photon_energy(3.0, 0.5);
        assert!(between > 1e-3 && between < 3.0);
        // Beyond the table the photon still can't take more than the electron has
        assert!(dist.sample_photon_energy(20.0, 1.0) <= 20.0);
        assert!(dist.evaluate_photon_energy_pdf(1.0, 0.05) > dist.evaluate_photon_energy_pdf(1.0, 0.5));
    }

    #[test]
    fn test_scatter_electron() {
        let dist = distribution();
        let energy = 1.0;
        let mut electron = electron(energy);
        let mut bank = ParticleBank::new();
        // Photon energy, dipole angle (xi = 0.5 gives mu = beta), azimuth
        let mut rng = FakeStream::new(vec![0.5, 0.5, 0.0]);
        assert_eq!(dist.scatter_electron(&mut electron, &mut bank, &mut rng).unwrap(), Subshell::Invalid);

        let photon = bank.pop().unwrap();
        assert_eq!(photon.particle_type(), ParticleType::Photon);
        assert_eq!(photon.generation_number(), electron.generation_number() + 1);
        assert_relative_eq!(photon.energy() + electron.energy(), energy, max_relative = 1e-12);
        assert_abs_diff_eq!(photon.direction()[2], electron_speed_squared(energy).sqrt(), epsilon = 1e-12);
        assert_eq!(electron.direction(), [0.0, 0.0, 1.0]);
        assert!(!electron.is_gone());
    }

    #[test]
    fn test_electron_stops_when_the_photon_takes_everything() {
        let dist = distribution();
        // Below the lowest tabulated photon energy
        let mut electron = electron(5e-4);
        let mut bank = ParticleBank::new();
        let mut rng = FakeStream::new(vec![0.3, 0.5, 0.0]);
        dist.scatter_electron(&mut electron, &mut bank, &mut rng).unwrap();
        assert!(electron.is_gone());
        assert_eq!(electron.energy(), 0.0);
        assert_eq!(bank.pop().unwrap().energy(), 5e-4);
    }

    #[test]
    fn test_angular_cdf() {
        let dist = distribution();
        let mut rng = FakeStream::new(vec![0.5, 0.2]);
        let mut trials = 0;
        let (_, mu) = dist.sample_and_record_trials(2.0, &mut rng, &mut trials).unwrap();
        assert_eq!(trials, 1);
        assert_relative_eq!(dist.evaluate_cdf(2.0, mu), 0.2, max_relative = 1e-12);
        assert_eq!(dist.evaluate_integrated(2.0), 1.0);
        assert!(dist.evaluate(2.0, 0.9) > dist.evaluate(2.0, -0.9));
    }
}
