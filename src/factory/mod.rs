mod atom_data;
mod electroatom;
mod photoatom;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CollisionError, Result};
use crate::grid::{EnergyGrid, HashBasedGridSearcher};
use crate::interpolation::InterpolationPolicy;
use crate::reactions::{CrossSectionEngine, CrossSectionTable, Reaction, ReactionType};
use crate::settings::ValidationLevel;

pub use atom_data::{
    AceElectroatomData, AceElectroionizationSubshellData, AcePhotoatomData, AceSubshellData, CrossSectionData,
    ElectroionizationSubshellData, EnergySharingData, NativeElectroatomData, NativePhotoatomData, NativeSubshellData,
    SecondaryEnergyData, TableData,
};
pub use electroatom::Electroatom;
pub use photoatom::Photoatom;

// Every reaction of one atom, keyed by type
pub type ReactionSet = HashMap<ReactionType, Arc<dyn Reaction>>;

// ACE tables pad a cross section with zeros below its threshold. Returns
// the nonzero tail and the index it starts at.
pub fn remove_leading_zeros(cross_section: &[f64]) -> (Vec<f64>, usize) {
    let threshold_index = cross_section.iter().take_while(|&&value| value == 0.0).count();
    (cross_section[threshold_index..].to_vec(), threshold_index)
}

//=====================================================================
// Builds cross section engines that all share one grid and one grid
// searcher.
//=====================================================================
#[derive(Debug, Clone)]
pub(crate) struct EngineBuilder {
    grid: EnergyGrid,
    grid_searcher: Arc<HashBasedGridSearcher>,
    policy: InterpolationPolicy,
    processed: bool,
    validation: ValidationLevel,
}

impl EngineBuilder {
    pub(crate) fn new(
        energy_grid: &[f64],
        policy: InterpolationPolicy,
        processed: bool,
        validation: ValidationLevel,
    ) -> Result<Self> {
        let grid: EnergyGrid = Arc::from(energy_grid);
        let grid_searcher = Arc::new(HashBasedGridSearcher::new(grid.clone(), processed)?);
        Ok(Self { grid, grid_searcher, policy, processed, validation })
    }

    pub(crate) fn build_table(&self, cross_section: CrossSectionTable, threshold_index: usize) -> Result<CrossSectionEngine> {
        let engine = CrossSectionEngine::with_grid_searcher(
            self.grid.clone(),
            cross_section,
            threshold_index,
            self.grid_searcher.clone(),
            self.policy,
            self.processed,
        )?;
        Ok(engine.with_validation(self.validation))
    }

    pub(crate) fn build(&self, data: &atom_data::CrossSectionData) -> Result<CrossSectionEngine> {
        self.build_table(Arc::from(data.values.as_slice()), data.threshold_index)
    }

    // Processed ACE cross section over the full grid
    pub(crate) fn build_padded(&self, cross_section: &[f64]) -> Result<CrossSectionEngine> {
        let (values, threshold_index) = remove_leading_zeros(cross_section);
        self.build_table(Arc::from(values), threshold_index)
    }

    // Zero cross section over the whole grid. Zeros only interpolate on a
    // raw grid.
    pub(crate) fn build_void(&self) -> Result<CrossSectionEngine> {
        if self.processed {
            return Err(CollisionError::configuration(
                "EngineBuilder: a void cross section can't be built over a processed grid",
            ));
        }
        let engine = CrossSectionEngine::with_grid_searcher(
            self.grid.clone(),
            Arc::from(vec![0.0; self.grid.len()]),
            0,
            self.grid_searcher.clone(),
            InterpolationPolicy::LinLin,
            false,
        )?;
        Ok(engine.with_validation(self.validation))
    }
}

// Sum of the cross sections of every reaction that removes or scatters
// the particle
pub(crate) fn total_cross_section(reactions: &ReactionSet, energy: f64) -> f64 {
    reactions
        .iter()
        .filter(|(reaction_type, _)| **reaction_type != ReactionType::PhotoatomicHeating)
        .map(|(_, reaction)| reaction.cross_section(energy))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_leading_zeros() {
        let (values, threshold_index) = remove_leading_zeros(&[0.0, 0.0, 1.5, 0.0, 2.0]);
        assert_eq!(values, vec![1.5, 0.0, 2.0]);
        assert_eq!(threshold_index, 2);

        let (values, threshold_index) = remove_leading_zeros(&[3.0, 4.0]);
        assert_eq!(values, vec![3.0, 4.0]);
        assert_eq!(threshold_index, 0);

        let (values, threshold_index) = remove_leading_zeros(&[0.0, 0.0]);
        assert!(values.is_empty());
        assert_eq!(threshold_index, 2);
    }

    #[test]
    fn test_engines_share_the_grid_searcher() {
        let builder = EngineBuilder::new(&[1.0, 2.0, 3.0], InterpolationPolicy::LinLin, false, ValidationLevel::Full)
            .unwrap();
        let first = builder.build(&CrossSectionData::new(vec![1.0, 2.0, 3.0], 0)).unwrap();
        let second = builder.build(&CrossSectionData::new(vec![5.0], 2)).unwrap();
        assert!(Arc::ptr_eq(first.grid_searcher(), second.grid_searcher()));
        assert!(Arc::ptr_eq(first.grid(), second.grid()));
        assert_eq!(second.threshold_energy(), 3.0);

        // An all-zero ACE cross section has nothing left to interpolate
        assert!(builder.build_padded(&[0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_void_engine() {
        let builder = EngineBuilder::new(&[1.0, 2.0, 3.0], InterpolationPolicy::LogLog, false, ValidationLevel::Full)
            .unwrap();
        let void = builder.build_void().unwrap();
        assert_eq!(void.threshold_energy(), 1.0);
        assert_eq!(void.cross_section(1.5), 0.0);
        assert_eq!(void.cross_section(3.0), 0.0);
        assert!(Arc::ptr_eq(void.grid_searcher(), builder.build_padded(&[1.0, 1.0, 1.0]).unwrap().grid_searcher()));

        let processed = EngineBuilder::new(&[1.0, 2.0, 3.0], InterpolationPolicy::LogLog, true, ValidationLevel::Full)
            .unwrap();
        assert!(processed.build_void().is_err());
    }
}
