use std::sync::Arc;

use log::debug;

use crate::distributions::{
    AnalogElasticDistribution, AtomicExcitationDistribution, BremsstrahlungDistribution, CutoffElasticDistribution,
    ElectroionizationSubshellDistribution, ElectronScatteringDistribution, ScreenedRutherfordElasticDistribution,
    checked_random_number,
};
use crate::error::{CollisionError, Result};
use crate::particle::{ParticleBank, ParticleState, ParticleType, Subshell};
use crate::random::RandomNumberStream;
use crate::reactions::{CrossSectionEngine, CrossSectionTable, Reaction, ReactionType};
use crate::settings::ValidationLevel;

// Hand the particle to the forward or adjoint scattering routine
fn scatter_by_particle_type<D: ElectronScatteringDistribution>(
    distribution: &D,
    particle: &mut ParticleState,
    bank: &mut ParticleBank,
    rng: &mut dyn RandomNumberStream,
) -> Result<Subshell> {
    match particle.particle_type() {
        ParticleType::Electron => distribution.scatter_electron(particle, bank, rng),
        ParticleType::AdjointElectron => distribution.scatter_adjoint_electron(particle, bank, rng),
        other => Err(CollisionError::configuration(format!(
            "an electroatomic reaction can't scatter a {}",
            other
        ))),
    }
}

//=====================================================================
// Electron reactions driven by one scattering distribution: elastic
// scattering, atomic excitation, bremsstrahlung and subshell
// electroionization.
//=====================================================================
#[derive(Debug, Clone)]
pub struct ElectronScatteringReaction<D: ElectronScatteringDistribution> {
    reaction_type: ReactionType,
    engine: CrossSectionEngine,
    distribution: D,
}

pub type AnalogElasticReaction = ElectronScatteringReaction<AnalogElasticDistribution>;
pub type CutoffElasticReaction = ElectronScatteringReaction<CutoffElasticDistribution>;
pub type ScreenedRutherfordElasticReaction = ElectronScatteringReaction<ScreenedRutherfordElasticDistribution>;
pub type AtomicExcitationReaction = ElectronScatteringReaction<AtomicExcitationDistribution>;
pub type BremsstrahlungReaction = ElectronScatteringReaction<BremsstrahlungDistribution>;
pub type ElectroionizationSubshellReaction = ElectronScatteringReaction<ElectroionizationSubshellDistribution>;

impl<D: ElectronScatteringDistribution> ElectronScatteringReaction<D> {
    pub fn new(reaction_type: ReactionType, engine: CrossSectionEngine, distribution: D) -> Self {
        Self { reaction_type, engine, distribution }
    }

    pub fn distribution(&self) -> &D {
        &self.distribution
    }
}

impl AnalogElasticReaction {
    pub fn analog(engine: CrossSectionEngine, distribution: AnalogElasticDistribution) -> Self {
        Self::new(ReactionType::AnalogElastic, engine, distribution)
    }
}

impl CutoffElasticReaction {
    pub fn cutoff(engine: CrossSectionEngine, distribution: CutoffElasticDistribution) -> Self {
        Self::new(ReactionType::CutoffElastic, engine, distribution)
    }
}

impl ScreenedRutherfordElasticReaction {
    pub fn screened_rutherford(engine: CrossSectionEngine, distribution: ScreenedRutherfordElasticDistribution) -> Self {
        Self::new(ReactionType::ScreenedRutherfordElastic, engine, distribution)
    }
}

impl AtomicExcitationReaction {
    pub fn atomic_excitation(engine: CrossSectionEngine, distribution: AtomicExcitationDistribution) -> Self {
        Self::new(ReactionType::AtomicExcitation, engine, distribution)
    }
}

impl BremsstrahlungReaction {
    pub fn bremsstrahlung(engine: CrossSectionEngine, distribution: BremsstrahlungDistribution) -> Self {
        Self::new(ReactionType::Bremsstrahlung, engine, distribution)
    }
}

impl ElectroionizationSubshellReaction {
    pub fn electroionization_subshell(engine: CrossSectionEngine, distribution: ElectroionizationSubshellDistribution) -> Self {
        Self::new(ReactionType::ElectroionizationSubshell(distribution.subshell()), engine, distribution)
    }
}

impl<D: ElectronScatteringDistribution> Reaction for ElectronScatteringReaction<D> {
    fn reaction_type(&self) -> ReactionType {
        self.reaction_type
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

    fn react(
        &self,
        electron: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        self.check_incoming_energy(electron)?;
        let shell = scatter_by_particle_type(&self.distribution, electron, bank, rng)?;
        electron.increment_collision_number();
        Ok(shell)
    }
}

// Add two cross sections tabulated on the same raw grid
pub(crate) fn sum_cross_sections(first: &CrossSectionEngine, second: &CrossSectionEngine) -> Result<(CrossSectionTable, usize)> {
    if first.is_processed() || second.is_processed() {
        return Err(CollisionError::configuration(
            "JointElasticReaction: processed cross sections can't be summed",
        ));
    }
    if !Arc::ptr_eq(first.grid(), second.grid()) && first.grid()[..] != second.grid()[..] {
        return Err(CollisionError::configuration(
            "JointElasticReaction: the cutoff and screened Rutherford cross sections need a common grid",
        ));
    }
    let value_at = |engine: &CrossSectionEngine, index: usize| {
        let threshold = engine.threshold_index();
        if index >= threshold && index <= engine.max_energy_index() {
            engine.cross_sections()[index - threshold]
        } else {
            0.0
        }
    };
    let threshold = first.threshold_index().min(second.threshold_index());
    let last = first.max_energy_index().max(second.max_energy_index());
    let total = (threshold..=last)
        .map(|index| value_at(first, index) + value_at(second, index))
        .collect::<Vec<_>>();
    Ok((Arc::from(total), threshold))
}

//=====================================================================
// Elastic scattering split into a cutoff part and a screened Rutherford
// part; each collision picks one of them by cross section weight.
//=====================================================================
#[derive(Debug, Clone)]
pub struct JointElasticReaction {
    total: CrossSectionEngine,
    cutoff: CrossSectionEngine,
    cutoff_distribution: CutoffElasticDistribution,
    screened_rutherford_distribution: ScreenedRutherfordElasticDistribution,
    validation: ValidationLevel,
}

impl JointElasticReaction {
    pub fn new(
        cutoff: CrossSectionEngine,
        screened_rutherford: CrossSectionEngine,
        cutoff_distribution: CutoffElasticDistribution,
        screened_rutherford_distribution: ScreenedRutherfordElasticDistribution,
    ) -> Result<Self> {
        let (total_values, threshold) = sum_cross_sections(&cutoff, &screened_rutherford)?;
        let total = CrossSectionEngine::with_grid_searcher(
            cutoff.grid().clone(),
            total_values,
            threshold,
            cutoff.grid_searcher().clone(),
            cutoff.policy(),
            false,
        )?;
        debug!(
            "Joint elastic reaction over {} grid points from index {}",
            total.grid().len(),
            threshold
        );
        Ok(Self {
            total,
            cutoff,
            cutoff_distribution,
            screened_rutherford_distribution,
            validation: ValidationLevel::default(),
        })
    }

    pub fn with_validation(mut self, validation: ValidationLevel) -> Self {
        self.total = self.total.with_validation(validation);
        self.cutoff = self.cutoff.with_validation(validation);
        self.validation = validation;
        self
    }

    pub fn cutoff_cross_section(&self, energy: f64) -> f64 {
        self.cutoff.cross_section(energy)
    }
}

impl Reaction for JointElasticReaction {
    fn reaction_type(&self) -> ReactionType {
        ReactionType::JointElastic
    }

    fn engine(&self) -> &CrossSectionEngine {
        &self.total
    }

    fn react(
        &self,
        electron: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        self.check_incoming_energy(electron)?;
        let energy = electron.energy();
        let total = self.total.cross_section(energy);
        let rn = checked_random_number(rng, self.validation.is_full())?;
        let shell = if rn * total < self.cutoff.cross_section(energy) {
            scatter_by_particle_type(&self.cutoff_distribution, electron, bank, rng)?
        } else {
            scatter_by_particle_type(&self.screened_rutherford_distribution, electron, bank, rng)?
        };
        electron.increment_collision_number();
        Ok(shell)
    }
}
