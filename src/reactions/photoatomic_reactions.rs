use log::debug;

use crate::distributions::{
    CoherentScatteringDistribution, PairProductionDistribution, PhotonScatteringDistribution,
    SubshellIncoherentDistribution, TripletProductionDistribution, WallerHartreeIncoherentDistribution,
};
use crate::error::{CollisionError, Result};
use crate::particle::{ParticleBank, ParticleState, ParticleType, Subshell, isotropic_direction};
use crate::random::RandomNumberStream;
use crate::reactions::{CrossSectionEngine, Reaction, ReactionType};

//=====================================================================
// Photon scattering: the photon survives with a new direction (and
// energy, for incoherent scattering).
//=====================================================================
#[derive(Debug, Clone)]
pub struct PhotonScatteringReaction<D: PhotonScatteringDistribution> {
    reaction_type: ReactionType,
    engine: CrossSectionEngine,
    distribution: D,
}

pub type CoherentReaction = PhotonScatteringReaction<CoherentScatteringDistribution>;
pub type IncoherentReaction = PhotonScatteringReaction<WallerHartreeIncoherentDistribution>;
pub type SubshellIncoherentReaction = PhotonScatteringReaction<SubshellIncoherentDistribution>;

impl<D: PhotonScatteringDistribution> PhotonScatteringReaction<D> {
    pub fn new(reaction_type: ReactionType, engine: CrossSectionEngine, distribution: D) -> Self {
        Self { reaction_type, engine, distribution }
    }

    pub fn distribution(&self) -> &D {
        &self.distribution
    }
}

impl CoherentReaction {
    pub fn coherent(engine: CrossSectionEngine, distribution: CoherentScatteringDistribution) -> Self {
        Self::new(ReactionType::Coherent, engine, distribution)
    }
}

impl IncoherentReaction {
    pub fn total_incoherent(engine: CrossSectionEngine, distribution: WallerHartreeIncoherentDistribution) -> Self {
        Self::new(ReactionType::TotalIncoherent, engine, distribution)
    }
}

impl SubshellIncoherentReaction {
    pub fn subshell_incoherent(engine: CrossSectionEngine, distribution: SubshellIncoherentDistribution) -> Self {
        Self::new(ReactionType::SubshellIncoherent(distribution.subshell()), engine, distribution)
    }
}

impl<D: PhotonScatteringDistribution> Reaction for PhotonScatteringReaction<D> {
    fn reaction_type(&self) -> ReactionType {
        self.reaction_type
    }

    fn engine(&self) -> &CrossSectionEngine {
        &self.engine
    }

    fn number_of_emitted_electrons(&self, energy: f64) -> u32 {
        self.emitted_above_threshold(energy, self.distribution.number_of_emitted_electrons())
    }

    fn react(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        self.check_incoming_energy(photon)?;
        let shell = self.distribution.scatter_photon(photon, bank, rng)?;
        photon.increment_collision_number();
        Ok(shell)
    }
}

//=====================================================================
// Photoelectric absorption, either summed over the atom or off one
// subshell. The photon is absorbed and a photoelectron leaves
// isotropically.
//=====================================================================
#[derive(Debug, Clone)]
pub struct PhotoelectricReaction {
    reaction_type: ReactionType,
    engine: CrossSectionEngine,
    subshell: Subshell,
    binding_energy: f64,
}

impl PhotoelectricReaction {
    // Binding energy is neglected when the shell is unknown
    pub fn total(engine: CrossSectionEngine) -> Self {
        Self {
            reaction_type: ReactionType::TotalPhotoelectric,
            engine,
            subshell: Subshell::Invalid,
            binding_energy: 0.0,
        }
    }

    pub fn subshell(engine: CrossSectionEngine, subshell: Subshell, binding_energy: f64) -> Result<Self> {
        if !subshell.is_valid() || !(binding_energy >= 0.0) {
            return Err(CollisionError::configuration(format!(
                "PhotoelectricReaction: invalid subshell ({}) or binding energy ({})",
                subshell, binding_energy
            )));
        }
        debug!("{} photoelectric reaction, binding energy {:e} MeV", subshell, binding_energy);
        Ok(Self {
            reaction_type: ReactionType::SubshellPhotoelectric(subshell),
            engine,
            subshell,
            binding_energy,
        })
    }

    pub fn binding_energy(&self) -> f64 {
        self.binding_energy
    }
}

impl Reaction for PhotoelectricReaction {
    fn reaction_type(&self) -> ReactionType {
        self.reaction_type
    }

    fn engine(&self) -> &CrossSectionEngine {
        &self.engine
    }

    fn number_of_emitted_electrons(&self, energy: f64) -> u32 {
        self.emitted_above_threshold(energy, 1)
    }

    fn react(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        self.check_incoming_energy(photon)?;
        let electron_energy = photon.energy() - self.binding_energy;
        if electron_energy > 0.0 {
            let direction = isotropic_direction(rng);
            bank.push(photon.spawn_secondary(ParticleType::Electron, electron_energy, direction));
        }
        photon.set_as_gone();
        Ok(self.subshell)
    }
}

//=====================================================================
// Pair production in the field of the nucleus.
//=====================================================================
#[derive(Debug, Clone)]
pub struct PairProductionReaction {
    engine: CrossSectionEngine,
    distribution: PairProductionDistribution,
}

impl PairProductionReaction {
    pub fn new(engine: CrossSectionEngine, distribution: PairProductionDistribution) -> Self {
        Self { engine, distribution }
    }

    pub fn distribution(&self) -> &PairProductionDistribution {
        &self.distribution
    }
}

impl Reaction for PairProductionReaction {
    fn reaction_type(&self) -> ReactionType {
        ReactionType::PairProduction
    }

    fn engine(&self) -> &CrossSectionEngine {
        &self.engine
    }

    fn number_of_emitted_photons(&self, energy: f64) -> u32 {
        self.emitted_above_threshold(energy, self.distribution.number_of_emitted_photons())
    }

    fn number_of_emitted_electrons(&self, energy: f64) -> u32 {
        self.emitted_above_threshold(energy, self.distribution.number_of_emitted_electrons())
    }

    fn number_of_emitted_positrons(&self, energy: f64) -> u32 {
        self.emitted_above_threshold(energy, self.distribution.number_of_emitted_positrons())
    }

    fn react(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        self.check_incoming_energy(photon)?;
        self.distribution.interact(photon, bank, rng)?;
        // The basic model turns the photon into an annihilation photon
        if !photon.is_gone() {
            photon.increment_collision_number();
        }
        Ok(Subshell::Invalid)
    }
}

//=====================================================================
// Pair production in the field of an atomic electron.
//=====================================================================
#[derive(Debug, Clone)]
pub struct TripletProductionReaction {
    engine: CrossSectionEngine,
    distribution: TripletProductionDistribution,
}

impl TripletProductionReaction {
    pub fn new(engine: CrossSectionEngine, distribution: TripletProductionDistribution) -> Self {
        Self { engine, distribution }
    }

    pub fn distribution(&self) -> &TripletProductionDistribution {
        &self.distribution
    }
}

impl Reaction for TripletProductionReaction {
    fn reaction_type(&self) -> ReactionType {
        ReactionType::TripletProduction
    }

    fn engine(&self) -> &CrossSectionEngine {
        &self.engine
    }

    fn number_of_emitted_photons(&self, energy: f64) -> u32 {
        self.emitted_above_threshold(energy, self.distribution.number_of_emitted_photons())
    }

    fn number_of_emitted_electrons(&self, energy: f64) -> u32 {
        self.emitted_above_threshold(energy, self.distribution.number_of_emitted_electrons())
    }

    fn number_of_emitted_positrons(&self, energy: f64) -> u32 {
        self.emitted_above_threshold(energy, self.distribution.number_of_emitted_positrons())
    }

    fn react(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        self.check_incoming_energy(photon)?;
        self.distribution.interact(photon, bank, rng)?;
        if !photon.is_gone() {
            photon.increment_collision_number();
        }
        Ok(Subshell::Invalid)
    }
}
