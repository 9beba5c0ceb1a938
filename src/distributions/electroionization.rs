use std::f64::consts::PI;

use log::debug;

use crate::distributions::kinematics::{knock_on_angle_cosine, knock_on_energy_at_cosine};
use crate::distributions::secondary_energy::SecondaryEnergyTable;
use crate::distributions::{ElectronScatteringDistribution, ScatteringDistribution, checked_random_number};
use crate::error::{CollisionError, Result};
use crate::particle::{ParticleBank, ParticleState, ParticleType, Subshell, rotate_direction_with_azimuth};
use crate::random::RandomNumberStream;
use crate::settings::ValidationLevel;

//=====================================================================
// Ionization of one subshell by an electron. The knock-on electron's
// energy is sampled from a table; the primary keeps what is left after
// the knock-on energy and the binding energy are paid. Both directions
// follow from free-electron kinematics.
//
// As a scattering distribution the angle is the knock-on cosine.
//=====================================================================
#[derive(Debug, Clone)]
pub struct ElectroionizationSubshellDistribution {
    subshell: Subshell,
    binding_energy: f64,
    knock_on: SecondaryEnergyTable,
    validation: ValidationLevel,
}

impl ElectroionizationSubshellDistribution {
    pub fn new(
        subshell: Subshell,
        binding_energy: f64,
        knock_on: SecondaryEnergyTable,
        validation: ValidationLevel,
    ) -> Result<Self> {
        if !subshell.is_valid() || !(binding_energy >= 0.0) {
            return Err(CollisionError::configuration(format!(
                "ElectroionizationSubshellDistribution: invalid subshell ({}) or binding energy ({})",
                subshell, binding_energy
            )));
        }
        if !(knock_on.min_energy() > binding_energy) {
            return Err(CollisionError::configuration(format!(
                "ElectroionizationSubshellDistribution: the {} knock-on table starts at {:e} MeV, below the binding energy {:e} MeV",
                subshell,
                knock_on.min_energy(),
                binding_energy
            )));
        }
        debug!(
            "{} electroionization: binding energy {:e} MeV, {} knock-on spectra",
            subshell,
            binding_energy,
            knock_on.energies().len()
        );
        Ok(Self { subshell, binding_energy, knock_on, validation })
    }

    pub fn subshell(&self) -> Subshell {
        self.subshell
    }

    pub fn binding_energy(&self) -> f64 {
        self.binding_energy
    }

    // The knock-on electron is by convention the slower of the two
    pub fn max_knock_on_energy(&self, incoming_energy: f64) -> f64 {
        0.5 * (incoming_energy - self.binding_energy).max(0.0)
    }

    // Below the first tabulated energy the spectrum at that energy is
    // scaled down linearly to nothing at the binding energy
    fn threshold_scale(&self, incoming_energy: f64) -> Option<f64> {
        let min_energy = self.knock_on.min_energy();
        if incoming_energy < min_energy {
            Some((incoming_energy - self.binding_energy) / (min_energy - self.binding_energy))
        } else {
            None
        }
    }

    pub fn sample_knock_on_energy(&self, incoming_energy: f64, random_number: f64) -> f64 {
        let max_knock_on = |energy: f64| self.max_knock_on_energy(energy);
        let knock_on_energy = match self.threshold_scale(incoming_energy) {
            Some(scale) => {
                scale * self.knock_on.sample(self.knock_on.min_energy(), random_number, &max_knock_on)
            }
            None => self.knock_on.sample(incoming_energy, random_number, &max_knock_on),
        };
        knock_on_energy.clamp(0.0, (incoming_energy - self.binding_energy).max(0.0))
    }

    // Knock-on energy pdf and cdf at an incoming energy above the binding
    // energy
    fn knock_on_pdf(&self, incoming_energy: f64, knock_on_energy: f64) -> f64 {
        let max_knock_on = |energy: f64| self.max_knock_on_energy(energy);
        match self.threshold_scale(incoming_energy) {
            Some(scale) => {
                self.knock_on.evaluate_pdf(self.knock_on.min_energy(), knock_on_energy / scale, &max_knock_on) / scale
            }
            None => self.knock_on.evaluate_pdf(incoming_energy, knock_on_energy, &max_knock_on),
        }
    }

    fn knock_on_cdf(&self, incoming_energy: f64, knock_on_energy: f64) -> f64 {
        let max_knock_on = |energy: f64| self.max_knock_on_energy(energy);
        match self.threshold_scale(incoming_energy) {
            Some(scale) => {
                self.knock_on.evaluate_cdf(self.knock_on.min_energy(), knock_on_energy / scale, &max_knock_on)
            }
            None => self.knock_on.evaluate_cdf(incoming_energy, knock_on_energy, &max_knock_on),
        }
    }

    fn check_energy(&self, incoming_energy: f64) -> Result<()> {
        if !(incoming_energy > self.binding_energy) {
            return Err(CollisionError::OutOfBounds {
                value: incoming_energy,
                lower: self.binding_energy,
                upper: f64::INFINITY,
            });
        }
        Ok(())
    }
}

impl ScatteringDistribution for ElectroionizationSubshellDistribution {
    // Knock-on energy pdf carried over to the knock-on cosine
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if incoming_energy <= self.binding_energy || !(scattering_angle_cosine > 0.0 && scattering_angle_cosine <= 1.0) {
            return 0.0;
        }
        let (knock_on_energy, jacobian) = knock_on_energy_at_cosine(incoming_energy, scattering_angle_cosine);
        self.knock_on_pdf(incoming_energy, knock_on_energy) * jacobian
    }

    fn evaluate_integrated(&self, incoming_energy: f64) -> f64 {
        if incoming_energy > self.binding_energy { 1.0 } else { 0.0 }
    }

    fn evaluate_pdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        self.evaluate(incoming_energy, scattering_angle_cosine)
    }

    fn evaluate_cdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if incoming_energy <= self.binding_energy || scattering_angle_cosine <= 0.0 {
            return 0.0;
        }
        if scattering_angle_cosine >= 1.0 {
            return 1.0;
        }
        let (knock_on_energy, _) = knock_on_energy_at_cosine(incoming_energy, scattering_angle_cosine);
        self.knock_on_cdf(incoming_energy, knock_on_energy)
    }

    // Returns (knock-on energy, knock-on angle cosine)
    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)> {
        self.check_energy(incoming_energy)?;
        *trials += 1;
        let random_number = checked_random_number(rng, self.validation.is_full())?;
        let knock_on_energy = self.sample_knock_on_energy(incoming_energy, random_number);
        Ok((knock_on_energy, knock_on_angle_cosine(incoming_energy, knock_on_energy)))
    }
}

impl ElectronScatteringDistribution for ElectroionizationSubshellDistribution {
    // The knock-on electron is banked; the primary leaves on the other
    // side of the incoming direction or stops
    fn scatter_electron(
        &self,
        electron: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        let energy = electron.energy();
        let (knock_on_energy, knock_on_mu) = self.sample(energy, rng)?;
        let azimuth = 2.0 * PI * checked_random_number(rng, self.validation.is_full())?;
        let direction = electron.direction();

        bank.push(electron.spawn_secondary(
            ParticleType::Electron,
            knock_on_energy,
            rotate_direction_with_azimuth(direction, knock_on_mu, azimuth),
        ));

        let outgoing_energy = (energy - self.binding_energy - knock_on_energy).max(0.0);
        if outgoing_energy > 0.0 {
            let mu = knock_on_angle_cosine(energy, outgoing_energy);
            electron.set_energy(outgoing_energy);
            electron.set_direction(rotate_direction_with_azimuth(direction, mu, azimuth + PI));
        } else {
            electron.set_energy(0.0);
            electron.set_as_gone();
        }
        Ok(self.subshell)
    }

    fn number_of_emitted_electrons(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::interpolation::TabularDistribution;
    use crate::random::FakeStream;

    const BINDING_ENERGY: f64 = 1e-3;

    // Flat knock-on spectra up to half of the available energy
    fn knock_on_table() -> SecondaryEnergyTable {
        let spectrum = |energy: f64| {
            TabularDistribution::new(vec![1e-5, 0.5 * (energy - BINDING_ENERGY)], vec![1.0, 1.0]).unwrap()
        };
        SecondaryEnergyTable::new(vec![1e-2, 1.0, 10.0], vec![spectrum(1e-2), spectrum(1.0), spectrum(10.0)])
            .unwrap()
    }

    fn distribution() -> ElectroionizationSubshellDistribution {
        ElectroionizationSubshellDistribution::new(Subshell::K, BINDING_ENERGY, knock_on_table(), ValidationLevel::Full)
            .unwrap()
    }

    fn electron(energy: f64) -> ParticleState {
        ParticleState::new(ParticleType::Electron, 3, energy, [0.0; 3], [0.0, 0.0, 1.0])
    }

    #[test]
    fn test_knock_on_energy_on_a_tabulated_energy() {
        let dist = distribution();
        let max = dist.max_knock_on_energy(1.0);
        assert_relative_eq!(max, 0.4995, max_relative = 1e-12);
        assert_relative_eq!(dist.sample_knock_on_energy(1.0, 1.0), max, max_relative = 1e-12);
        assert_relative_eq!(dist.sample_knock_on_energy(1.0, 0.0), 1e-5, max_relative = 1e-12);
        assert_relative_eq!(
            dist.sample_knock_on_energy(1.0, 0.5),
            1e-5 + 0.5 * (max - 1e-5),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_knock_on_energy_below_the_table() {
        let dist = distribution();
        // Halfway between the binding energy and the first table energy
        let energy = 0.5 * (BINDING_ENERGY + 1e-2);
        let at_table = dist.sample_knock_on_energy(1e-2, 0.75);
        assert_relative_eq!(dist.sample_knock_on_energy(energy, 0.75), 0.5 * at_table, max_relative = 1e-12);
        assert!(dist.sample_knock_on_energy(energy, 1.0) <= energy - BINDING_ENERGY);
    }

    #[test]
    fn test_scatter_electron_conserves_energy() {
        let dist = distribution();
        let energy = 5.0;
        let mut electron = electron(energy);
        let mut bank = ParticleBank::new();
        let mut rng = FakeStream::new(vec![0.3, 0.25]);
        let shell = dist.scatter_electron(&mut electron, &mut bank, &mut rng).unwrap();
        assert_eq!(shell, Subshell::K);

        assert_eq!(bank.len(), 1);
        let knock_on = bank.pop().unwrap();
        assert_eq!(knock_on.particle_type(), ParticleType::Electron);
        assert_relative_eq!(
            electron.energy() + knock_on.energy() + BINDING_ENERGY,
            energy,
            max_relative = 1e-12
        );
        assert!(knock_on.energy() <= electron.energy());
        assert_abs_diff_eq!(knock_on.direction()[2], knock_on_angle_cosine(energy, knock_on.energy()), epsilon = 1e-12);
        assert_abs_diff_eq!(electron.direction()[2], knock_on_angle_cosine(energy, electron.energy()), epsilon = 1e-12);
        // Opposite azimuths
        assert!(knock_on.direction()[1] * electron.direction()[1] < 0.0);
        assert!(!electron.is_gone());
    }

    #[test]
    fn test_primary_stops_when_the_knock_on_takes_everything() {
        // A spectrum that only holds energies above what is available
        let table = SecondaryEnergyTable::new(
            vec![1.0],
            vec![TabularDistribution::new(vec![0.9995, 1.0], vec![1.0, 1.0]).unwrap()],
        )
        .unwrap();
        let dist =
            ElectroionizationSubshellDistribution::new(Subshell::L1, BINDING_ENERGY, table, ValidationLevel::Full)
                .unwrap();
        let mut electron = electron(1.0);
        let mut bank = ParticleBank::new();
        let mut rng = FakeStream::new(vec![0.5, 0.0]);
        assert_eq!(dist.scatter_electron(&mut electron, &mut bank, &mut rng).unwrap(), Subshell::L1);

        let knock_on = bank.pop().unwrap();
        assert_eq!(knock_on.energy(), 1.0 - BINDING_ENERGY);
        assert!(electron.is_gone());
        assert_eq!(electron.energy(), 0.0);
    }

    #[test]
    fn test_below_binding_energy() {
        let dist = distribution();
        let mut rng = FakeStream::new(vec![0.5]);
        assert!(matches!(dist.sample(5e-4, &mut rng), Err(CollisionError::OutOfBounds { .. })));
        assert_eq!(dist.evaluate_integrated(5e-4), 0.0);
    }

    #[test]
    fn test_angular_cdf_matches_the_energy_spectrum() {
        let dist = distribution();
        let energy = 1.0;
        let mut rng = FakeStream::new(vec![0.4, 0.9]);
        let mut trials = 0;
        for expected in [0.4, 0.9] {
            let (_, mu) = dist.sample_and_record_trials(energy, &mut rng, &mut trials).unwrap();
            assert_relative_eq!(dist.evaluate_cdf(energy, mu), expected, max_relative = 1e-9);
        }
        assert_eq!(trials, 2);
        assert_eq!(dist.evaluate_cdf(energy, 0.0), 0.0);
        assert_eq!(dist.evaluate_cdf(energy, 1.0), 1.0);
        assert_eq!(dist.evaluate(energy, -0.5), 0.0);
        assert!(dist.evaluate(energy, 0.5) > 0.0);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(
            ElectroionizationSubshellDistribution::new(Subshell::Invalid, BINDING_ENERGY, knock_on_table(), ValidationLevel::Full)
                .is_err()
        );
        // Table starting below the binding energy
        assert!(ElectroionizationSubshellDistribution::new(Subshell::K, 0.1, knock_on_table(), ValidationLevel::Full).is_err());
    }
}
