use std::f64::consts::PI;

use log::debug;

use crate::distributions::RejectionLimit;
use crate::distributions::kinematics::{coupled_positron_polar_angle, sample_lepton_polar_angle};
use crate::error::{CollisionError, Result};
use crate::interpolation::TabularDistribution;
use crate::particle::{
    ParticleBank, ParticleState, ParticleType, isotropic_direction, rotate_direction,
    rotate_direction_with_azimuth,
};
use crate::random::RandomNumberStream;
use crate::settings::InteractionModel;
use crate::utils::physical_constants::ELECTRON_REST_MASS_ENERGY;

pub const PAIR_PRODUCTION_THRESHOLD: f64 = 2.0 * ELECTRON_REST_MASS_ENERGY;

// The positron is assumed to stop and annihilate where it was created:
// the photon itself becomes one annihilation photon and the other one
// is banked flying the opposite way
pub(crate) fn annihilate_at_rest(
    photon: &mut ParticleState,
    bank: &mut ParticleBank,
    rng: &mut dyn RandomNumberStream,
) {
    let direction = isotropic_direction(rng);
    let opposite = [-direction[0], -direction[1], -direction[2]];
    bank.push(photon.spawn_secondary(ParticleType::Photon, ELECTRON_REST_MASS_ENERGY, opposite));
    photon.set_energy(ELECTRON_REST_MASS_ENERGY);
    photon.set_direction(direction);
}

// Mean polar angle (in radians) of leptons created by a photon of the
// given energy
#[inline]
pub(crate) fn mean_lepton_polar_angle_cosine(photon_energy: f64) -> f64 {
    (ELECTRON_REST_MASS_ENERGY / photon_energy).cos()
}

//=====================================================================
// Energy-sharing tables: the fraction of the available kinetic energy
// given to the electron, tabulated against the photon energy.
//=====================================================================
#[derive(Debug, Clone)]
pub struct EnergySharingTable {
    energies: Vec<f64>,
    fractions: Vec<TabularDistribution>,
}

impl EnergySharingTable {
    pub fn new(energies: Vec<f64>, fractions: Vec<TabularDistribution>) -> Result<Self> {
        if energies.is_empty() || energies.len() != fractions.len() {
            return Err(CollisionError::configuration(format!(
                "EnergySharingTable: {} energies but {} sharing distributions",
                energies.len(),
                fractions.len()
            )));
        }
        if energies.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(CollisionError::configuration(
                "EnergySharingTable: energies must be strictly ascending",
            ));
        }
        if fractions.iter().any(|dist| dist.lower_bound() < 0.0 || dist.upper_bound() > 1.0) {
            return Err(CollisionError::configuration(
                "EnergySharingTable: energy fractions must lie in [0, 1]",
            ));
        }
        Ok(Self { energies, fractions })
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    // One random number picks a bracketing energy (weighted by distance),
    // a second one samples its fraction
    pub fn sample(&self, photon_energy: f64, rng: &mut dyn RandomNumberStream) -> f64 {
        let last = self.energies.len() - 1;
        let upper = self.energies.partition_point(|&e| e <= photon_energy);
        let index = if upper == 0 {
            0
        } else if upper > last {
            last
        } else {
            let lower = upper - 1;
            let fraction =
                (photon_energy - self.energies[lower]) / (self.energies[upper] - self.energies[lower]);
            if rng.random_number() < fraction { upper } else { lower }
        };
        self.fractions[index].sample(rng.random_number())
    }
}

type PairInteraction =
    fn(&PairProductionDistribution, &mut ParticleState, &mut ParticleBank, &mut dyn RandomNumberStream) -> Result<()>;

//=====================================================================
// Creation of an electron-positron pair in the field of the nucleus.
//=====================================================================
#[derive(Debug, Clone)]
pub struct PairProductionDistribution {
    model: InteractionModel,
    energy_sharing: Option<EnergySharingTable>,
    limit: RejectionLimit,
    interaction: PairInteraction,
}

impl PairProductionDistribution {
    pub fn new(
        model: InteractionModel,
        energy_sharing: Option<EnergySharingTable>,
        max_trials: Option<u64>,
    ) -> Self {
        let interaction: PairInteraction = match model {
            InteractionModel::Basic => Self::basic_interaction,
            InteractionModel::Detailed => Self::detailed_interaction,
        };
        debug!(
            "Pair production: {} model, {} energy sharing",
            model,
            if energy_sharing.is_some() { "tabulated" } else { "Bethe-Heitler" }
        );
        Self {
            model,
            energy_sharing,
            limit: RejectionLimit::new("pair production energy sharing", max_trials),
            interaction,
        }
    }

    pub fn model(&self) -> InteractionModel {
        self.model
    }

    pub fn threshold_energy(&self) -> f64 {
        PAIR_PRODUCTION_THRESHOLD
    }

    pub fn number_of_emitted_photons(&self) -> u32 {
        match self.model {
            InteractionModel::Basic => 2,
            InteractionModel::Detailed => 0,
        }
    }

    pub fn number_of_emitted_electrons(&self) -> u32 {
        1
    }

    pub fn number_of_emitted_positrons(&self) -> u32 {
        match self.model {
            InteractionModel::Basic => 0,
            InteractionModel::Detailed => 1,
        }
    }

    pub fn interact(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<()> {
        if photon.energy() < PAIR_PRODUCTION_THRESHOLD {
            return Err(CollisionError::OutOfBounds {
                value: photon.energy(),
                lower: PAIR_PRODUCTION_THRESHOLD,
                upper: f64::INFINITY,
            });
        }
        (self.interaction)(self, photon, bank, rng)
    }

    // Electron with half of the kinetic energy at the mean angle, the
    // positron annihilates at rest
    fn basic_interaction(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<()> {
        let energy = photon.energy();
        let electron_energy = (energy - PAIR_PRODUCTION_THRESHOLD) / 2.0;
        let direction = rotate_direction(photon.direction(), mean_lepton_polar_angle_cosine(energy), rng);
        bank.push(photon.spawn_secondary(ParticleType::Electron, electron_energy, direction));

        annihilate_at_rest(photon, bank, rng);
        Ok(())
    }

    // Sampled energy sharing and electron angles, both leptons banked.
    // The positron direction follows from the electron's polar angle and
    // azimuth.
    fn detailed_interaction(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<()> {
        let energy = photon.energy();
        let kinetic_energy = energy - PAIR_PRODUCTION_THRESHOLD;
        let electron_share = match &self.energy_sharing {
            Some(table) => table.sample(energy, rng),
            None => self.sample_bethe_heitler_share(energy, rng)?,
        };
        let electron_energy = electron_share * kinetic_energy;
        let positron_energy = kinetic_energy - electron_energy;

        let electron_mu = sample_lepton_polar_angle(electron_energy, rng.random_number());
        let azimuth = 2.0 * PI * rng.random_number();
        let positron_mu = coupled_positron_polar_angle(electron_energy, electron_mu, positron_energy);
        let direction = photon.direction();

        bank.push(photon.spawn_secondary(
            ParticleType::Electron,
            electron_energy,
            rotate_direction_with_azimuth(direction, electron_mu, azimuth),
        ));
        bank.push(photon.spawn_secondary(
            ParticleType::Positron,
            positron_energy,
            rotate_direction_with_azimuth(direction, positron_mu, azimuth + PI),
        ));
        photon.set_as_gone();
        Ok(())
    }

    // Unscreened Bethe-Heitler shape 1 - 4/3 e (1 - e), where e is the
    // share of the photon's total energy taken by the electron. Returns
    // the matching share of the kinetic energy, like the sharing tables.
    fn sample_bethe_heitler_share(
        &self,
        energy: f64,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<f64> {
        let min_fraction = ELECTRON_REST_MASS_ENERGY / energy;
        let width = 1.0 - 2.0 * min_fraction;
        let (mut attempts, mut trials) = (0, 0);
        loop {
            self.limit.record_attempt(&mut attempts, &mut trials)?;
            let share = rng.random_number();
            let fraction = min_fraction + width * share;
            if rng.random_number() <= 1.0 - 4.0 / 3.0 * fraction * (1.0 - fraction) {
                return Ok(share.clamp(0.0, 1.0));
            }
        }
    }
}
