//=====================================================================
// An electroatom: every electron reaction of one element, built from
// ACE or native data.
//=====================================================================

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dashmap::DashMap;
use log::{debug, info};
use rayon::prelude::*;

use crate::distributions::{
    AnalogElasticDistribution, AtomicExcitationDistribution, BremsstrahlungDistribution, CutoffElasticDistribution,
    ElasticAngularTable, ElectroionizationSubshellDistribution, ScreenedRutherfordElasticDistribution,
    SecondaryEnergyTable,
};
use crate::factory::atom_data::{AceElectroatomData, NativeElectroatomData, SecondaryEnergyData, TableData};
use crate::factory::{EngineBuilder, ReactionSet, remove_leading_zeros, total_cross_section};
use crate::interpolation::InterpolationPolicy;
use crate::particle::Subshell;
use crate::reactions::{
    AbsorptionReaction, AnalogElasticReaction, AtomicExcitationReaction, BremsstrahlungReaction, CrossSectionEngine,
    CutoffElasticReaction, ElectroionizationSubshellReaction, JointElasticReaction, Reaction, ReactionType,
    sum_cross_sections,
};
use crate::settings::{CollisionSettings, ElasticModel};

// Screened Rutherford cross sections this small next to the cutoff one
// are round-off from the subtraction
const SCREENED_RUTHERFORD_RELATIVE_FLOOR: f64 = 1e-8;

#[derive(Clone, Debug)]
pub struct Electroatom {
    pub atomic_number: u32,
    pub reactions: ReactionSet,
}

type PartialReactionSet = DashMap<ReactionType, Arc<dyn Reaction>>;

fn insert<R: Reaction + 'static>(reactions: &PartialReactionSet, reaction: R) {
    debug!("Built the {} reaction from {:e} MeV", reaction.reaction_type(), reaction.threshold_energy());
    reactions.insert(reaction.reaction_type(), Arc::new(reaction));
}

// Share of the cutoff part in the total elastic cross section at each
// tabulated angular energy
fn cutoff_ratios(energies: &[f64], cutoff: &CrossSectionEngine, total: &CrossSectionEngine) -> Vec<f64> {
    energies
        .iter()
        .map(|&energy| {
            let total = total.cross_section(energy);
            if total > 0.0 { (cutoff.cross_section(energy) / total).min(1.0) } else { 1.0 }
        })
        .collect()
}

fn secondary_energy_table(data: &SecondaryEnergyData) -> Result<SecondaryEnergyTable> {
    let spectra = data
        .spectra
        .iter()
        .map(|spectrum| spectrum.to_distribution())
        .collect::<crate::error::Result<Vec<_>>>()?;
    Ok(SecondaryEnergyTable::new(data.energies.clone(), spectra)?)
}

// The elastic cross sections and angular data both data formats share
struct ElasticData<'a> {
    cutoff: CrossSectionEngine,
    screened_rutherford: CrossSectionEngine,
    total: CrossSectionEngine,
    angular_energies: &'a [f64],
    angles: &'a [Vec<f64>],
    pdfs: &'a [Vec<f64>],
}

fn elastic_reaction(data: ElasticData, atomic_number: u32, settings: &CollisionSettings) -> Result<Arc<dyn Reaction>> {
    let ratios = cutoff_ratios(data.angular_energies, &data.cutoff, &data.total);
    let table = ElasticAngularTable::new(
        data.angular_energies,
        data.angles,
        data.pdfs,
        &ratios,
        atomic_number,
        settings.elastic_cutoff_angle_cosine,
    )
    .context("Failed to build the elastic angular table")?;
    debug!(
        "Elastic angular table: {} energies, cutoff cosine {}",
        table.bins().len(),
        table.cutoff_angle_cosine()
    );

    let reaction: Arc<dyn Reaction> = match settings.elastic_model {
        ElasticModel::Analog => {
            let distribution = AnalogElasticDistribution::new(
                table,
                settings.elastic_interpolation,
                settings.elastic_sampling,
                settings.validation,
            )
            .context("Failed to build the analog elastic distribution")?;
            Arc::new(AnalogElasticReaction::analog(data.total, distribution))
        }
        ElasticModel::Joint => {
            let cutoff_distribution =
                CutoffElasticDistribution::new(table, settings.elastic_interpolation, settings.validation);
            let screened_rutherford_distribution =
                ScreenedRutherfordElasticDistribution::new(atomic_number, settings.elastic_cutoff_angle_cosine)?;
            let reaction = JointElasticReaction::new(
                data.cutoff,
                data.screened_rutherford,
                cutoff_distribution,
                screened_rutherford_distribution,
            )
            .context("Failed to build the joint elastic reaction")?;
            Arc::new(reaction.with_validation(settings.validation))
        }
        ElasticModel::Cutoff => {
            let distribution = CutoffElasticDistribution::new(table, settings.elastic_interpolation, settings.validation);
            Arc::new(CutoffElasticReaction::cutoff(data.cutoff, distribution))
        }
    };
    Ok(reaction)
}

fn atomic_excitation_reaction(engine: CrossSectionEngine, energy_loss: &TableData) -> Result<AtomicExcitationReaction> {
    let energy_loss = energy_loss
        .to_function(InterpolationPolicy::LinLin)
        .context("Failed to build the atomic excitation energy loss table")?;
    Ok(AtomicExcitationReaction::atomic_excitation(engine, AtomicExcitationDistribution::new(energy_loss)))
}

fn bremsstrahlung_reaction(
    engine: CrossSectionEngine,
    photon_energy: &SecondaryEnergyData,
    settings: &CollisionSettings,
) -> Result<BremsstrahlungReaction> {
    let photon_energy =
        secondary_energy_table(photon_energy).context("Failed to build the bremsstrahlung photon energy table")?;
    Ok(BremsstrahlungReaction::bremsstrahlung(
        engine,
        BremsstrahlungDistribution::new(photon_energy, settings.validation),
    ))
}

fn electroionization_reaction(
    engine: CrossSectionEngine,
    subshell: Subshell,
    binding_energy: f64,
    knock_on_energy: &SecondaryEnergyData,
    settings: &CollisionSettings,
) -> Result<ElectroionizationSubshellReaction> {
    let knock_on_energy = secondary_energy_table(knock_on_energy)?;
    let distribution =
        ElectroionizationSubshellDistribution::new(subshell, binding_energy, knock_on_energy, settings.validation)?;
    Ok(ElectroionizationSubshellReaction::electroionization_subshell(engine, distribution))
}

// Void absorption: the electron is never absorbed, but the reaction is
// part of every electroatom
fn void_absorption_reaction(builder: &EngineBuilder) -> Result<AbsorptionReaction> {
    let engine = builder.build_void().context("Failed to build the void absorption reaction")?;
    Ok(AbsorptionReaction::new(ReactionType::TotalElectroatomicAbsorption, engine))
}

// The screened Rutherford part of an ACE total elastic cross section
fn screened_rutherford_cross_section(total: &[f64], cutoff: &[f64]) -> Vec<f64> {
    total
        .iter()
        .zip(cutoff)
        .map(|(&total, &cutoff)| {
            let screened_rutherford = total - cutoff;
            if screened_rutherford <= cutoff * SCREENED_RUTHERFORD_RELATIVE_FLOOR { 0.0 } else { screened_rutherford }
        })
        .collect()
}

impl Electroatom {
    pub fn from_ace_data(data: &AceElectroatomData, settings: &CollisionSettings) -> Result<Self> {
        settings.validate()?;
        let policy = if data.epr_version == 14 { InterpolationPolicy::LogLog } else { InterpolationPolicy::LinLin };
        let builder = EngineBuilder::new(&data.energy_grid, policy, false, settings.validation)
            .context("Failed to build the ACE electroatomic energy grid")?;
        let reactions = DashMap::new();

        if data.cutoff_elastic_cross_section.len() != data.total_elastic_cross_section.len() {
            bail!(
                "The ACE cutoff elastic cross section has {} values, the total elastic one {}",
                data.cutoff_elastic_cross_section.len(),
                data.total_elastic_cross_section.len()
            );
        }
        let screened_rutherford =
            screened_rutherford_cross_section(&data.total_elastic_cross_section, &data.cutoff_elastic_cross_section);
        let elastic = ElasticData {
            cutoff: builder
                .build_padded(&data.cutoff_elastic_cross_section)
                .context("Failed to build the cutoff elastic cross section")?,
            screened_rutherford: builder
                .build_padded(&screened_rutherford)
                .context("Failed to build the screened Rutherford elastic cross section")?,
            total: builder
                .build_padded(&data.total_elastic_cross_section)
                .context("Failed to build the total elastic cross section")?,
            angular_energies: &data.elastic_angular_energies,
            angles: &data.elastic_angles,
            pdfs: &data.elastic_pdfs,
        };
        let elastic = elastic_reaction(elastic, data.atomic_number, settings)?;
        reactions.insert(elastic.reaction_type(), elastic);

        let engine = builder
            .build_padded(&data.atomic_excitation_cross_section)
            .context("Failed to build the atomic excitation reaction")?;
        insert(&reactions, atomic_excitation_reaction(engine, &data.atomic_excitation_energy_loss)?);

        let engine = builder
            .build_padded(&data.bremsstrahlung_cross_section)
            .context("Failed to build the bremsstrahlung reaction")?;
        insert(&reactions, bremsstrahlung_reaction(engine, &data.bremsstrahlung_photon_energy, settings)?);

        data.subshells.par_iter().try_for_each(|shell| -> Result<()> {
            let (values, threshold_index) = remove_leading_zeros(&shell.cross_section);
            debug!(
                "{} electroionization cross section starts at grid index {}",
                shell.subshell, threshold_index
            );
            let reaction = builder
                .build_table(Arc::from(values), threshold_index)
                .map_err(anyhow::Error::from)
                .and_then(|engine| {
                    electroionization_reaction(
                        engine,
                        shell.subshell,
                        shell.binding_energy,
                        &shell.knock_on_energy,
                        settings,
                    )
                })
                .with_context(|| format!("Failed to build the {} subshell electroionization reaction", shell.subshell))?;
            insert(&reactions, reaction);
            Ok(())
        })?;

        insert(&reactions, void_absorption_reaction(&builder)?);

        let reactions: ReactionSet = reactions.into_iter().collect();
        info!(
            "Built {} electroatomic reactions for Z = {} from ACE data (EPR version {}) with {} elastic scattering",
            reactions.len(),
            data.atomic_number,
            data.epr_version,
            settings.elastic_model
        );
        Ok(Self { atomic_number: data.atomic_number, reactions })
    }

    pub fn from_native_data(data: &NativeElectroatomData, settings: &CollisionSettings) -> Result<Self> {
        settings.validate()?;
        let builder = EngineBuilder::new(&data.energy_grid, InterpolationPolicy::LinLin, false, settings.validation)
            .context("Failed to build the native electroatomic energy grid")?;
        let reactions = DashMap::new();

        let cutoff = builder.build(&data.cutoff_elastic).context("Failed to build the cutoff elastic cross section")?;
        let screened_rutherford = builder
            .build(&data.screened_rutherford_elastic)
            .context("Failed to build the screened Rutherford elastic cross section")?;
        let (total, threshold_index) = sum_cross_sections(&cutoff, &screened_rutherford)?;
        let total = builder.build_table(total, threshold_index)?;
        let elastic = ElasticData {
            cutoff,
            screened_rutherford,
            total,
            angular_energies: &data.elastic_angular_energies,
            angles: &data.elastic_angles,
            pdfs: &data.elastic_pdfs,
        };
        let elastic = elastic_reaction(elastic, data.atomic_number, settings)?;
        reactions.insert(elastic.reaction_type(), elastic);

        let engine = builder
            .build(&data.atomic_excitation)
            .context("Failed to build the atomic excitation reaction")?;
        insert(&reactions, atomic_excitation_reaction(engine, &data.atomic_excitation_energy_loss)?);

        let engine = builder.build(&data.bremsstrahlung).context("Failed to build the bremsstrahlung reaction")?;
        insert(&reactions, bremsstrahlung_reaction(engine, &data.bremsstrahlung_photon_energy, settings)?);

        data.electroionization_subshells.par_iter().try_for_each(|shell| -> Result<()> {
            let reaction = builder
                .build(&shell.cross_section)
                .map_err(anyhow::Error::from)
                .and_then(|engine| {
                    electroionization_reaction(
                        engine,
                        shell.subshell,
                        shell.binding_energy,
                        &shell.knock_on_energy,
                        settings,
                    )
                })
                .with_context(|| format!("Failed to build the {} subshell electroionization reaction", shell.subshell))?;
            insert(&reactions, reaction);
            Ok(())
        })?;

        insert(&reactions, void_absorption_reaction(&builder)?);

        let reactions: ReactionSet = reactions.into_iter().collect();
        info!(
            "Built {} electroatomic reactions for Z = {} with {} elastic scattering",
            reactions.len(),
            data.atomic_number,
            settings.elastic_model
        );
        Ok(Self { atomic_number: data.atomic_number, reactions })
    }

    pub fn reaction(&self, reaction_type: ReactionType) -> Option<&Arc<dyn Reaction>> {
        self.reactions.get(&reaction_type)
    }

    pub fn total_cross_section(&self, energy: f64) -> f64 {
        total_cross_section(&self.reactions, energy)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::particle::{ParticleBank, ParticleState, ParticleType};
    use crate::random::RngStream;
    use crate::utils::testing::{ACE_ELECTROATOM, NATIVE_ELECTROATOM, ace_electroatom};

    fn electron(energy: f64) -> ParticleState {
        ParticleState::new(ParticleType::Electron, 0, energy, [0.0; 3], [0.0, 0.0, 1.0])
    }

    fn settings(elastic_model: ElasticModel) -> CollisionSettings {
        CollisionSettings { elastic_model, ..Default::default() }
    }

    fn electroatom(elastic_model: ElasticModel) -> Electroatom {
        Electroatom::from_native_data(&NATIVE_ELECTROATOM, &settings(elastic_model)).unwrap()
    }

    fn ace(elastic_model: ElasticModel) -> Electroatom {
        Electroatom::from_ace_data(&ACE_ELECTROATOM, &settings(elastic_model)).unwrap()
    }

    #[test]
    fn test_analog_elastic_cross_section() {
        let electroatom = electroatom(ElasticModel::Analog);
        // Elastic, atomic excitation, bremsstrahlung, K and L1 electroionization, void absorption
        assert_eq!(electroatom.reactions.len(), 6);
        let elastic = electroatom.reaction(ReactionType::AnalogElastic).unwrap();
        assert_relative_eq!(elastic.cross_section(1.0e-5), 2.489240000000e+09, max_relative = 1e-12);
        assert_relative_eq!(elastic.cross_section(1.0e-3), 2.902810000000e+08, max_relative = 1e-12);
        assert_relative_eq!(elastic.cross_section(1.0e5), 8.830510000000e-02, max_relative = 1e-12);
        assert_eq!(elastic.cross_section(2.0e5), 0.0);
        assert_relative_eq!(
            electroatom.total_cross_section(1.0),
            2.5e5 + 5e6 + 2e3 + 3e5 + 5e5,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_native_cross_sections_interpolate_lin_lin() {
        let electroatom = electroatom(ElasticModel::Analog);
        let excitation = electroatom.reaction(ReactionType::AtomicExcitation).unwrap();
        // 1e8 + (1e-4 - 1e-5) / (1e-3 - 1e-5) * (5e7 - 1e8)
        assert_relative_eq!(excitation.cross_section(1e-4), 9.5454545454545455e7, max_relative = 1e-12);
    }

    #[test]
    fn test_ace_thresholds_after_zero_removal() {
        let electroatom = ace(ElasticModel::Analog);
        assert_eq!(electroatom.reactions.len(), 6);

        let bremsstrahlung = electroatom.reaction(ReactionType::Bremsstrahlung).unwrap();
        assert_eq!(bremsstrahlung.engine().threshold_index(), 2);
        assert_eq!(bremsstrahlung.engine().cross_sections().len(), 4);
        assert_eq!(bremsstrahlung.threshold_energy(), 0.1);
        assert_eq!(bremsstrahlung.cross_section(0.05), 0.0);
        assert_relative_eq!(bremsstrahlung.cross_section(0.1), 4e3, max_relative = 1e-12);
        assert_eq!(bremsstrahlung.number_of_emitted_photons(0.05), 0);
        assert_eq!(bremsstrahlung.number_of_emitted_photons(1.0), 1);

        let k_shell = electroatom.reaction(ReactionType::ElectroionizationSubshell(Subshell::K)).unwrap();
        assert_eq!(k_shell.engine().threshold_index(), 1);
        assert_eq!(k_shell.threshold_energy(), 1e-3);
        assert_eq!(k_shell.number_of_emitted_electrons(1.0), 1);

        let excitation = electroatom.reaction(ReactionType::AtomicExcitation).unwrap();
        assert_eq!(excitation.engine().threshold_index(), 0);
        assert!(Arc::ptr_eq(excitation.engine().grid_searcher(), k_shell.engine().grid_searcher()));
    }

    #[test]
    fn test_ace_cross_sections_interpolate_log_log() {
        let electroatom = ace(ElasticModel::Analog);
        let excitation = electroatom.reaction(ReactionType::AtomicExcitation).unwrap();
        // 1e-4 is the logarithmic midpoint of 1e-5 and 1e-3: sqrt(1e8 * 5e7)
        assert_relative_eq!(excitation.cross_section(1e-4), 7.0710678118654752e7, max_relative = 1e-12);
        let elastic = electroatom.reaction(ReactionType::AnalogElastic).unwrap();
        assert_relative_eq!(elastic.cross_section(1e5), 8.83051e-2, max_relative = 1e-12);

        // Older tables interpolate lin-lin
        let older = Electroatom::from_ace_data(&ace_electroatom(12), &settings(ElasticModel::Analog)).unwrap();
        let excitation = older.reaction(ReactionType::AtomicExcitation).unwrap();
        assert_relative_eq!(excitation.cross_section(1e-4), 9.5454545454545455e7, max_relative = 1e-12);
    }

    #[test]
    fn test_screened_rutherford_from_ace_elastic() {
        let screened_rutherford = screened_rutherford_cross_section(&[1.0, 3.0, 2.0 + 1e-9], &[1.0, 2.0, 2.0]);
        assert_eq!(screened_rutherford, vec![0.0, 1.0, 0.0]);

        let joint = ace(ElasticModel::Joint);
        let elastic = joint.reaction(ReactionType::JointElastic).unwrap();
        assert_relative_eq!(elastic.cross_section(1.0), 2.5e5, max_relative = 1e-12);
    }

    #[test]
    fn test_elastic_reactions_conserve_energy() {
        let mut rng = RngStream::seeded(42);
        for (model, reaction_type) in [
            (ElasticModel::Analog, ReactionType::AnalogElastic),
            (ElasticModel::Joint, ReactionType::JointElastic),
            (ElasticModel::Cutoff, ReactionType::CutoffElastic),
        ] {
            for electroatom in [electroatom(model), ace(model)] {
                let reaction = electroatom.reaction(reaction_type).unwrap();
                for energy in [1e-4, 0.5, 10.0, 1e4] {
                    let mut electron = electron(energy);
                    reaction.react(&mut electron, &mut ParticleBank::new(), &mut rng).unwrap();
                    assert_eq!(electron.energy(), energy);
                    assert!((-1.0..=1.0).contains(&electron.direction()[2]));
                    assert_eq!(electron.collision_number(), 1);
                }
            }
        }
    }

    #[test]
    fn test_joint_and_cutoff_cross_sections() {
        let joint = electroatom(ElasticModel::Joint);
        let elastic = joint.reaction(ReactionType::JointElastic).unwrap();
        assert_relative_eq!(elastic.cross_section(1.0e5), 8.830510000000e-02, max_relative = 1e-12);

        let cutoff = electroatom(ElasticModel::Cutoff);
        let elastic = cutoff.reaction(ReactionType::CutoffElastic).unwrap();
        assert_relative_eq!(elastic.cross_section(1.0e5), 4.0e-2, max_relative = 1e-12);
        assert!(cutoff.reaction(ReactionType::AnalogElastic).is_none());
    }

    #[test]
    fn test_atomic_excitation() {
        let electroatom = electroatom(ElasticModel::Analog);
        let reaction = electroatom.reaction(ReactionType::AtomicExcitation).unwrap();
        let mut electron = electron(10.0);
        let mut rng = RngStream::seeded(1);
        reaction.react(&mut electron, &mut ParticleBank::new(), &mut rng).unwrap();
        assert!(electron.energy() < 10.0 && electron.energy() > 10.0 - 2e-5);
        assert_eq!(electron.direction(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_electroionization_pays_the_binding_energy() {
        let mut rng = RngStream::seeded(7);
        for electroatom in [electroatom(ElasticModel::Analog), ace(ElasticModel::Analog)] {
            for (subshell, binding_energy) in [(Subshell::K, 2.9e-4), (Subshell::L1, 1.6e-5)] {
                let reaction = electroatom.reaction(ReactionType::ElectroionizationSubshell(subshell)).unwrap();
                for energy in [1e-3, 0.5, 10.0, 1e4] {
                    let mut electron = electron(energy);
                    let mut bank = ParticleBank::new();
                    assert_eq!(reaction.react(&mut electron, &mut bank, &mut rng).unwrap(), subshell);
                    let knock_on = bank.pop().unwrap();
                    assert!(bank.is_empty());
                    assert_eq!(knock_on.particle_type(), ParticleType::Electron);
                    assert!(knock_on.energy() <= electron.energy() * (1.0 + 1e-12));
                    assert_relative_eq!(
                        electron.energy() + knock_on.energy() + binding_energy,
                        energy,
                        max_relative = 1e-10
                    );
                }
            }
        }
    }

    #[test]
    fn test_bremsstrahlung_conserves_energy() {
        let mut rng = RngStream::seeded(3);
        let electroatom = electroatom(ElasticModel::Analog);
        let reaction = electroatom.reaction(ReactionType::Bremsstrahlung).unwrap();
        for energy in [0.1, 0.5, 10.0, 1e4] {
            let mut electron = electron(energy);
            let mut bank = ParticleBank::new();
            reaction.react(&mut electron, &mut bank, &mut rng).unwrap();
            let photon = bank.pop().unwrap();
            assert_eq!(photon.particle_type(), ParticleType::Photon);
            assert!(photon.energy() > 0.0 && photon.energy() <= energy);
            assert_relative_eq!(electron.energy() + photon.energy(), energy, max_relative = 1e-12);
            assert_eq!(electron.direction(), [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_void_absorption() {
        for electroatom in [electroatom(ElasticModel::Analog), ace(ElasticModel::Analog)] {
            let absorption = electroatom.reaction(ReactionType::TotalElectroatomicAbsorption).unwrap();
            assert_eq!(absorption.threshold_energy(), 1e-5);
            assert_eq!(absorption.cross_section(1.0), 0.0);
            assert_eq!(absorption.cross_section(1e5), 0.0);

            let mut electron = electron(1.0);
            let mut rng = RngStream::seeded(5);
            absorption.react(&mut electron, &mut ParticleBank::new(), &mut rng).unwrap();
            assert!(electron.is_gone());
        }
    }

    #[test]
    fn test_bad_angular_table() {
        let mut data = NATIVE_ELECTROATOM.clone();
        data.elastic_pdfs.pop();
        let error = Electroatom::from_native_data(&data, &CollisionSettings::default()).unwrap_err();
        assert!(format!("{:#}", error).contains("elastic angular table"));
    }

    #[test]
    fn test_knock_on_table_below_the_binding_energy() {
        let mut data = ACE_ELECTROATOM.clone();
        data.subshells[0].binding_energy = 2e-3;
        let error = Electroatom::from_ace_data(&data, &CollisionSettings::default()).unwrap_err();
        assert!(format!("{:#}", error).contains("K subshell electroionization"));
    }
}
