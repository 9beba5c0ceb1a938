use std::f64::consts::PI;

use log::{debug, warn};

use crate::distributions::pair_production::{
    PAIR_PRODUCTION_THRESHOLD, annihilate_at_rest, mean_lepton_polar_angle_cosine,
};
use crate::error::{CollisionError, Result};
use crate::particle::{ParticleBank, ParticleState, ParticleType, rotate_direction_with_azimuth};
use crate::random::RandomNumberStream;
use crate::settings::InteractionModel;
use crate::utils::physical_constants::ELECTRON_REST_MASS_ENERGY;

pub const TRIPLET_PRODUCTION_THRESHOLD: f64 = 4.0 * ELECTRON_REST_MASS_ENERGY;

type TripletInteraction =
    fn(&TripletProductionDistribution, &mut ParticleState, &mut ParticleBank, &mut dyn RandomNumberStream) -> Result<()>;

//=====================================================================
// Pair production in the field of an atomic electron, which recoils
// with a share of the energy.
//=====================================================================
#[derive(Debug, Clone)]
pub struct TripletProductionDistribution {
    model: InteractionModel,
    interaction: TripletInteraction,
}

impl TripletProductionDistribution {
    /// The detailed model has no sampling routine yet. It can be built so
    /// that a photoatom configured with it still loads, but every call to
    /// [`interact`](Self::interact) fails with `UnimplementedModel` and the
    /// secondary counts report nothing emitted.
    pub fn new(model: InteractionModel) -> Self {
        let interaction: TripletInteraction = match model {
            InteractionModel::Basic => Self::basic_interaction,
            InteractionModel::Detailed => {
                warn!("Detailed triplet production can't be sampled, interactions will fail");
                Self::detailed_interaction
            }
        };
        debug!("Triplet production: {} model", model);
        Self { model, interaction }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self.model, InteractionModel::Basic)
    }

    pub fn model(&self) -> InteractionModel {
        self.model
    }

    pub fn threshold_energy(&self) -> f64 {
        TRIPLET_PRODUCTION_THRESHOLD
    }

    pub fn number_of_emitted_photons(&self) -> u32 {
        match self.model {
            InteractionModel::Basic => 2,
            InteractionModel::Detailed => 0,
        }
    }

    pub fn number_of_emitted_electrons(&self) -> u32 {
        match self.model {
            InteractionModel::Basic => 2,
            InteractionModel::Detailed => 0,
        }
    }

    // Nothing is emitted until the detailed model can be sampled
    pub fn number_of_emitted_positrons(&self) -> u32 {
        0
    }

    pub fn interact(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<()> {
        if photon.energy() < TRIPLET_PRODUCTION_THRESHOLD {
            return Err(CollisionError::OutOfBounds {
                value: photon.energy(),
                lower: TRIPLET_PRODUCTION_THRESHOLD,
                upper: f64::INFINITY,
            });
        }
        (self.interaction)(self, photon, bank, rng)
    }

    // The kinetic energy is split evenly between the pair and the recoil
    // electron. Both electrons leave at the mean angle on opposite sides,
    // the positron annihilates at rest.
    fn basic_interaction(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<()> {
        let energy = photon.energy();
        let electron_energy = (energy - PAIR_PRODUCTION_THRESHOLD) / 3.0;
        let mu = mean_lepton_polar_angle_cosine(energy);
        let azimuth = 2.0 * PI * rng.random_number();
        let direction = photon.direction();

        for phi in [azimuth, azimuth + PI] {
            bank.push(photon.spawn_secondary(
                ParticleType::Electron,
                electron_energy,
                rotate_direction_with_azimuth(direction, mu, phi),
            ));
        }

        annihilate_at_rest(photon, bank, rng);
        Ok(())
    }

    fn detailed_interaction(
        &self,
        _photon: &mut ParticleState,
        _bank: &mut ParticleBank,
        _rng: &mut dyn RandomNumberStream,
    ) -> Result<()> {
        Err(CollisionError::UnimplementedModel("detailed triplet production"))
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::random::FakeStream;

    fn photon(energy: f64) -> ParticleState {
        ParticleState::new(ParticleType::Photon, 0, energy, [0.0; 3], [0.0, 0.0, 1.0])
    }

    #[test]
    fn test_counts() {
        let basic = TripletProductionDistribution::new(InteractionModel::Basic);
        assert_eq!(
            (basic.number_of_emitted_photons(), basic.number_of_emitted_electrons(), basic.number_of_emitted_positrons()),
            (2, 2, 0)
        );
        let detailed = TripletProductionDistribution::new(InteractionModel::Detailed);
        assert_eq!(
            (
                detailed.number_of_emitted_photons(),
                detailed.number_of_emitted_electrons(),
                detailed.number_of_emitted_positrons()
            ),
            (0, 0, 0)
        );
        assert!(basic.is_implemented());
        assert!(!detailed.is_implemented());
        assert_relative_eq!(basic.threshold_energy(), 2.0439958, max_relative = 1e-7);
    }

    #[test]
    fn test_basic_interaction() {
        let dist = TripletProductionDistribution::new(InteractionModel::Basic);
        let mut photon = photon(10.0);
        let mut bank = ParticleBank::new();
        let mut rng = FakeStream::new(vec![0.0, 0.0, 0.0]);
        dist.interact(&mut photon, &mut bank, &mut rng).unwrap();

        assert_eq!(photon.energy(), ELECTRON_REST_MASS_ENERGY);
        assert_abs_diff_eq!(photon.direction()[2], -1.0, epsilon = 1e-12);
        assert_eq!(bank.count_of(ParticleType::Electron), 2);
        assert_eq!(bank.count_of(ParticleType::Photon), 1);

        let first = bank.pop().unwrap();
        let second = bank.pop().unwrap();
        let expected = (10.0 - PAIR_PRODUCTION_THRESHOLD) / 3.0;
        assert_relative_eq!(first.energy(), expected, max_relative = 1e-15);
        assert_relative_eq!(second.energy(), expected, max_relative = 1e-15);
        assert_abs_diff_eq!(first.direction()[2], second.direction()[2], epsilon = 1e-12);
        assert_abs_diff_eq!(first.direction()[0], -second.direction()[0], epsilon = 1e-12);
    }

    #[test]
    fn test_detailed_model_is_unimplemented() {
        let dist = TripletProductionDistribution::new(InteractionModel::Detailed);
        let mut photon = photon(10.0);
        let mut bank = ParticleBank::new();
        let mut rng = FakeStream::new(vec![]);
        assert_eq!(
            dist.interact(&mut photon, &mut bank, &mut rng),
            Err(CollisionError::UnimplementedModel("detailed triplet production"))
        );
        assert!(bank.is_empty());
    }

    #[test]
    fn test_below_threshold() {
        let dist = TripletProductionDistribution::new(InteractionModel::Basic);
        let mut rng = FakeStream::new(vec![]);
        assert!(dist.interact(&mut photon(1.5), &mut ParticleBank::new(), &mut rng).is_err());
    }
}
