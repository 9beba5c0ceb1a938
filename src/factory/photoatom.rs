//=====================================================================
// A photoatom: every photon reaction of one element, built from ACE or
// native data.
//=====================================================================

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dashmap::DashMap;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::distributions::{
    CoherentScatteringDistribution, EnergySharingTable, PairProductionDistribution, SubshellIncoherentDistribution,
    TripletProductionDistribution, WallerHartreeIncoherentDistribution,
};
use crate::factory::atom_data::{AcePhotoatomData, EnergySharingData, NativePhotoatomData, TableData};
use crate::factory::{EngineBuilder, ReactionSet, total_cross_section};
use crate::interpolation::InterpolationPolicy;
use crate::reactions::{
    CoherentReaction, CrossSectionEngine, IncoherentReaction, PairProductionReaction, PhotoelectricReaction, Reaction,
    ReactionType, SubshellIncoherentReaction, TripletProductionReaction, VoidReaction,
};
use crate::settings::{CollisionSettings, IncoherentModel};

#[derive(Clone, Debug)]
pub struct Photoatom {
    pub atomic_number: u32,
    pub reactions: ReactionSet,
}

type PartialReactionSet = DashMap<ReactionType, Arc<dyn Reaction>>;

fn insert<R: Reaction + 'static>(reactions: &PartialReactionSet, reaction: R) {
    debug!("Built the {} reaction from {:e} MeV", reaction.reaction_type(), reaction.threshold_energy());
    reactions.insert(reaction.reaction_type(), Arc::new(reaction));
}

fn coherent_reaction(
    engine: CrossSectionEngine,
    form_factor_squared: &TableData,
    settings: &CollisionSettings,
) -> Result<CoherentReaction> {
    let distribution =
        CoherentScatteringDistribution::new(form_factor_squared.to_distribution()?, settings.max_rejection_trials);
    Ok(CoherentReaction::coherent(engine, distribution))
}

fn waller_hartree_reaction(
    engine: CrossSectionEngine,
    scattering_function: &TableData,
    settings: &CollisionSettings,
) -> Result<IncoherentReaction> {
    let distribution = WallerHartreeIncoherentDistribution::new(
        scattering_function.to_function(InterpolationPolicy::LinLin)?,
        settings.max_rejection_trials,
    )?;
    Ok(IncoherentReaction::total_incoherent(engine, distribution))
}

fn energy_sharing_table(data: &EnergySharingData) -> Result<EnergySharingTable> {
    let fractions = data
        .fractions
        .iter()
        .map(|fraction| fraction.to_distribution())
        .collect::<crate::error::Result<Vec<_>>>()?;
    Ok(EnergySharingTable::new(data.energies.clone(), fractions)?)
}

impl Photoatom {
    pub fn from_ace_data(data: &AcePhotoatomData, settings: &CollisionSettings) -> Result<Self> {
        settings.validate()?;
        let builder = EngineBuilder::new(&data.energy_grid, InterpolationPolicy::LogLog, true, settings.validation)
            .context("Failed to build the ACE photoatomic energy grid")?;
        let reactions = DashMap::new();

        let engine = builder.build_padded(&data.coherent_cross_section)?;
        insert(
            &reactions,
            coherent_reaction(engine, &data.form_factor_squared, settings).context("Failed to build the coherent reaction")?,
        );

        if settings.incoherent_model == IncoherentModel::ImpulseApproximation {
            warn!("ACE photoatomic data has no subshell incoherent cross sections, falling back to Waller-Hartree");
        }
        let engine = builder.build_padded(&data.incoherent_cross_section)?;
        insert(
            &reactions,
            waller_hartree_reaction(engine, &data.scattering_function, settings)
                .context("Failed to build the incoherent reaction")?,
        );

        if data.subshells.is_empty() {
            let engine = builder
                .build_padded(&data.photoelectric_cross_section)
                .context("Failed to build the photoelectric reaction")?;
            insert(&reactions, PhotoelectricReaction::total(engine));
        } else {
            data.subshells.par_iter().try_for_each(|shell| -> Result<()> {
                let engine = builder.build_padded(&shell.photoelectric_cross_section)?;
                let reaction = PhotoelectricReaction::subshell(engine, shell.subshell, shell.binding_energy)
                    .with_context(|| format!("Failed to build the {} subshell photoelectric reaction", shell.subshell))?;
                insert(&reactions, reaction);
                Ok(())
            })?;
        }

        let engine = builder
            .build_padded(&data.pair_production_cross_section)
            .context("Failed to build the pair production reaction")?;
        let distribution =
            PairProductionDistribution::new(settings.pair_production_model, None, settings.max_rejection_trials);
        insert(&reactions, PairProductionReaction::new(engine, distribution));

        if data.heating_numbers.iter().any(|&value| value != 0.0) {
            let engine = builder.build_padded(&data.heating_numbers)?;
            insert(&reactions, VoidReaction::new(ReactionType::PhotoatomicHeating, engine));
        }

        let reactions: ReactionSet = reactions.into_iter().collect();
        info!(
            "Built {} photoatomic reactions for Z = {} from ACE data",
            reactions.len(),
            data.atomic_number
        );
        Ok(Self { atomic_number: data.atomic_number, reactions })
    }

    pub fn from_native_data(data: &NativePhotoatomData, settings: &CollisionSettings) -> Result<Self> {
        settings.validate()?;
        let builder = EngineBuilder::new(&data.energy_grid, InterpolationPolicy::LogLog, false, settings.validation)
            .context("Failed to build the native photoatomic energy grid")?;
        let reactions = DashMap::new();

        let engine = builder.build(&data.coherent)?;
        insert(
            &reactions,
            coherent_reaction(engine, &data.form_factor_squared, settings).context("Failed to build the coherent reaction")?,
        );

        match settings.incoherent_model {
            IncoherentModel::WallerHartree => {
                let engine = builder.build(&data.waller_hartree_incoherent)?;
                insert(
                    &reactions,
                    waller_hartree_reaction(engine, &data.scattering_function, settings)
                        .context("Failed to build the incoherent reaction")?,
                );
            }
            IncoherentModel::ImpulseApproximation => {
                if data.subshells.is_empty() {
                    bail!("The impulse approximation needs subshell data, Z = {} has none", data.atomic_number);
                }
                data.subshells.par_iter().try_for_each(|shell| -> Result<()> {
                    let engine = builder.build(&shell.incoherent)?;
                    let distribution = SubshellIncoherentDistribution::new(
                        shell.subshell,
                        shell.binding_energy,
                        shell.occupancy,
                        shell.occupation_number.to_function(InterpolationPolicy::LinLin)?,
                        settings.max_rejection_trials,
                    )
                    .with_context(|| format!("Failed to build the {} subshell incoherent reaction", shell.subshell))?;
                    insert(&reactions, SubshellIncoherentReaction::subshell_incoherent(engine, distribution));
                    Ok(())
                })?;
            }
        }

        if data.subshells.is_empty() {
            let engine = builder.build(&data.photoelectric).context("Failed to build the photoelectric reaction")?;
            insert(&reactions, PhotoelectricReaction::total(engine));
        } else {
            data.subshells.par_iter().try_for_each(|shell| -> Result<()> {
                let engine = builder.build(&shell.photoelectric)?;
                let reaction = PhotoelectricReaction::subshell(engine, shell.subshell, shell.binding_energy)
                    .with_context(|| format!("Failed to build the {} subshell photoelectric reaction", shell.subshell))?;
                insert(&reactions, reaction);
                Ok(())
            })?;
        }

        let energy_sharing = data
            .pair_energy_sharing
            .as_ref()
            .map(energy_sharing_table)
            .transpose()
            .context("Failed to build the pair production energy sharing table")?;
        let engine = builder.build(&data.pair_production).context("Failed to build the pair production reaction")?;
        let distribution = PairProductionDistribution::new(
            settings.pair_production_model,
            energy_sharing,
            settings.max_rejection_trials,
        );
        insert(&reactions, PairProductionReaction::new(engine, distribution));

        if let Some(triplet_production) = &data.triplet_production {
            let engine = builder
                .build(triplet_production)
                .context("Failed to build the triplet production reaction")?;
            let distribution = TripletProductionDistribution::new(settings.triplet_production_model);
            insert(&reactions, TripletProductionReaction::new(engine, distribution));
        }

        if let Some(heating) = &data.heating {
            insert(&reactions, VoidReaction::new(ReactionType::PhotoatomicHeating, builder.build(heating)?));
        }

        let reactions: ReactionSet = reactions.into_iter().collect();
        info!(
            "Built {} photoatomic reactions for Z = {} from native data",
            reactions.len(),
            data.atomic_number
        );
        Ok(Self { atomic_number: data.atomic_number, reactions })
    }

    pub fn reaction(&self, reaction_type: ReactionType) -> Option<&Arc<dyn Reaction>> {
        self.reactions.get(&reaction_type)
    }

    // Heating numbers are not part of the total
    pub fn total_cross_section(&self, energy: f64) -> f64 {
        total_cross_section(&self.reactions, energy)
    }
}
