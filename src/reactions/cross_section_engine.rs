use std::sync::Arc;

use log::debug;

use crate::error::{CollisionError, Result};
use crate::grid::{EnergyGrid, HashBasedGridSearcher};
use crate::interpolation::{InterpolationPolicy, Processing};
use crate::settings::ValidationLevel;

// Cross section values aligned with the grid starting at the threshold index
pub type CrossSectionTable = Arc<[f64]>;

// (policy, energy_0, energy_1, raw_energy, cross_section_0, cross_section_1)
type BinInterpolator = fn(InterpolationPolicy, f64, f64, f64, f64, f64) -> f64;

//=====================================================================
// Interpolation kernels. PROCESSED grids and cross sections hold the
// policy-processed (log) values, as in legacy ACE tables.
//=====================================================================
#[inline(always)]
fn interpolated_cross_section<const PROCESSED: bool>(
    policy: InterpolationPolicy,
    energy_0: f64,
    energy_1: f64,
    raw_energy: f64,
    cross_section_0: f64,
    cross_section_1: f64,
) -> f64 {
    if PROCESSED {
        let processed_slope = (cross_section_1 - cross_section_0) / (energy_1 - energy_0);
        policy.interpolate_processed(
            energy_0,
            policy.process_indep_var(raw_energy),
            cross_section_0,
            processed_slope,
        )
    } else {
        policy.interpolate(energy_0, energy_1, raw_energy, cross_section_0, cross_section_1)
    }
}

#[inline(always)]
fn energy_of_interest<const PROCESSED: bool>(policy: InterpolationPolicy, energy: f64) -> f64 {
    if PROCESSED { policy.recover_processed_indep_var(energy) } else { energy }
}

#[inline(always)]
fn cross_section_of_interest<const PROCESSED: bool>(policy: InterpolationPolicy, cross_section: f64) -> f64 {
    if PROCESSED { policy.recover_processed_dep_var(cross_section) } else { cross_section }
}

fn standard_bin<const PROCESSED: bool>(
    policy: InterpolationPolicy,
    energy_0: f64,
    energy_1: f64,
    raw_energy: f64,
    cross_section_0: f64,
    cross_section_1: f64,
) -> f64 {
    interpolated_cross_section::<PROCESSED>(policy, energy_0, energy_1, raw_energy, cross_section_0, cross_section_1)
}

// First bin of the whole grid: the energy or the cross section may be 0.0,
// which a log variable cannot represent. Only that variable falls back to lin.
fn first_grid_bin<const PROCESSED: bool>(
    policy: InterpolationPolicy,
    energy_0: f64,
    energy_1: f64,
    raw_energy: f64,
    cross_section_0: f64,
    cross_section_1: f64,
) -> f64 {
    if cross_section_0 != 0.0 {
        if energy_0 != 0.0 {
            interpolated_cross_section::<PROCESSED>(
                policy,
                energy_0,
                energy_1,
                raw_energy,
                cross_section_0,
                cross_section_1,
            )
        } else {
            interpolated_cross_section::<PROCESSED>(
                policy.with_lin_indep(),
                energy_0,
                energy_of_interest::<PROCESSED>(policy, energy_1),
                raw_energy,
                cross_section_0,
                cross_section_1,
            )
        }
    } else if energy_0 != 0.0 {
        interpolated_cross_section::<PROCESSED>(
            policy.with_lin_dep(),
            energy_0,
            energy_1,
            raw_energy,
            cross_section_0,
            cross_section_of_interest::<PROCESSED>(policy, cross_section_1),
        )
    } else {
        interpolated_cross_section::<PROCESSED>(
            InterpolationPolicy::LinLin,
            energy_0,
            energy_of_interest::<PROCESSED>(policy, energy_1),
            raw_energy,
            cross_section_of_interest::<PROCESSED>(policy, cross_section_0),
            cross_section_1,
        )
    }
}

// First tabulated bin of a threshold reaction: only the cross section can be 0.0
fn first_cross_section_bin<const PROCESSED: bool>(
    policy: InterpolationPolicy,
    energy_0: f64,
    energy_1: f64,
    raw_energy: f64,
    cross_section_0: f64,
    cross_section_1: f64,
) -> f64 {
    if cross_section_0 != 0.0 {
        interpolated_cross_section::<PROCESSED>(
            policy,
            energy_0,
            energy_1,
            raw_energy,
            cross_section_0,
            cross_section_1,
        )
    } else {
        interpolated_cross_section::<PROCESSED>(
            policy.with_lin_dep(),
            energy_0,
            energy_1,
            raw_energy,
            cross_section_0,
            cross_section_of_interest::<PROCESSED>(policy, cross_section_1),
        )
    }
}

// Lin-lin tables never need a substitution
fn lin_lin_bin(
    _policy: InterpolationPolicy,
    energy_0: f64,
    energy_1: f64,
    raw_energy: f64,
    cross_section_0: f64,
    cross_section_1: f64,
) -> f64 {
    InterpolationPolicy::LinLin.interpolate(energy_0, energy_1, raw_energy, cross_section_0, cross_section_1)
}

//=====================================================================
// Maps an energy to a reaction cross section. Every reaction owns one
// of these; the grid, the cross section and the grid searcher are
// shared between all reactions built from the same data.
//=====================================================================
#[derive(Debug, Clone)]
pub struct CrossSectionEngine {
    grid: EnergyGrid,
    cross_section: CrossSectionTable,
    threshold_index: usize,
    max_energy_index: usize,
    policy: InterpolationPolicy,
    processed: bool,
    grid_searcher: Arc<HashBasedGridSearcher>,
    interpolate_bin: BinInterpolator,
    interpolate_first_bin: BinInterpolator,
    validation: ValidationLevel,
}

impl CrossSectionEngine {
    pub fn new(
        grid: EnergyGrid,
        cross_section: CrossSectionTable,
        threshold_index: usize,
        policy: InterpolationPolicy,
        processed: bool,
    ) -> Result<Self> {
        Self::check_tables(&grid, &cross_section, threshold_index, policy, processed)?;
        let grid_searcher = Arc::new(HashBasedGridSearcher::new(grid.clone(), processed)?);
        Ok(Self::assemble(grid, cross_section, threshold_index, policy, processed, grid_searcher))
    }

    pub fn with_grid_searcher(
        grid: EnergyGrid,
        cross_section: CrossSectionTable,
        threshold_index: usize,
        grid_searcher: Arc<HashBasedGridSearcher>,
        policy: InterpolationPolicy,
        processed: bool,
    ) -> Result<Self> {
        Self::check_tables(&grid, &cross_section, threshold_index, policy, processed)?;
        if grid_searcher.is_processed() != processed {
            return Err(CollisionError::configuration(
                "CrossSectionEngine: the grid searcher and the cross section disagree on processing",
            ));
        }
        if !Arc::ptr_eq(grid_searcher.grid(), &grid) && grid_searcher.grid()[..] != grid[..] {
            return Err(CollisionError::configuration(
                "CrossSectionEngine: the grid searcher was built over a different grid",
            ));
        }
        Ok(Self::assemble(grid, cross_section, threshold_index, policy, processed, grid_searcher))
    }

    fn check_tables(
        grid: &EnergyGrid,
        cross_section: &CrossSectionTable,
        threshold_index: usize,
        policy: InterpolationPolicy,
        processed: bool,
    ) -> Result<()> {
        // Processed grids always hold ln(E)
        if processed && policy.indep_processing() != Processing::Log {
            return Err(CollisionError::configuration(format!(
                "CrossSectionEngine: a processed grid cannot be used with {} interpolation",
                policy
            )));
        }
        if grid.len() < 2 {
            return Err(CollisionError::configuration(format!(
                "CrossSectionEngine: the energy grid needs at least two points, got {}",
                grid.len()
            )));
        }
        if grid.windows(2).any(|pair| !(pair[0] <= pair[1])) {
            return Err(CollisionError::configuration(
                "CrossSectionEngine: the energy grid must be sorted in ascending order",
            ));
        }
        if threshold_index >= grid.len() {
            return Err(CollisionError::configuration(format!(
                "CrossSectionEngine: threshold index {} is past the end of the grid ({} points)",
                threshold_index,
                grid.len()
            )));
        }
        if cross_section.is_empty() {
            return Err(CollisionError::configuration(
                "CrossSectionEngine: the cross section is empty",
            ));
        }
        if cross_section.len() + threshold_index > grid.len() {
            return Err(CollisionError::configuration(format!(
                "CrossSectionEngine: {} cross section values starting at index {} overrun a grid of {} points",
                cross_section.len(),
                threshold_index,
                grid.len()
            )));
        }
        // Processed values are logarithms and may be negative
        let invalid = cross_section
            .iter()
            .any(|&cs| !cs.is_finite() || (!processed && cs < 0.0));
        if invalid {
            return Err(CollisionError::configuration(
                "CrossSectionEngine: cross section values must be finite and non-negative",
            ));
        }
        Ok(())
    }

    fn assemble(
        grid: EnergyGrid,
        cross_section: CrossSectionTable,
        threshold_index: usize,
        policy: InterpolationPolicy,
        processed: bool,
        grid_searcher: Arc<HashBasedGridSearcher>,
    ) -> Self {
        let max_energy_index = threshold_index + cross_section.len() - 1;

        // Resolve the interpolation routines once
        let (interpolate_bin, interpolate_first_bin): (BinInterpolator, BinInterpolator) =
            match (policy, processed, threshold_index == 0) {
                (InterpolationPolicy::LinLin, _, _) => (lin_lin_bin, lin_lin_bin),
                (_, true, true) => (standard_bin::<true>, first_grid_bin::<true>),
                (_, true, false) => (standard_bin::<true>, first_cross_section_bin::<true>),
                (_, false, true) => (standard_bin::<false>, first_grid_bin::<false>),
                (_, false, false) => (standard_bin::<false>, first_cross_section_bin::<false>),
            };

        debug!(
            "Cross section engine: {} grid points, {} values from index {}, {} (processed: {})",
            grid.len(),
            cross_section.len(),
            threshold_index,
            policy,
            processed
        );

        Self {
            grid,
            cross_section,
            threshold_index,
            max_energy_index,
            policy,
            processed,
            grid_searcher,
            interpolate_bin,
            interpolate_first_bin,
            validation: ValidationLevel::default(),
        }
    }

    pub fn with_validation(mut self, validation: ValidationLevel) -> Self {
        self.validation = validation;
        self
    }

    // Truncate the reaction's support below the last tabulated value
    pub fn set_max_energy_index(&mut self, max_energy_index: usize) -> Result<()> {
        let last = self.threshold_index + self.cross_section.len() - 1;
        if max_energy_index <= self.threshold_index || max_energy_index > last {
            return Err(CollisionError::configuration(format!(
                "CrossSectionEngine: max energy index {} must be in ({}, {}]",
                max_energy_index, self.threshold_index, last
            )));
        }
        self.max_energy_index = max_energy_index;
        Ok(())
    }

    pub fn grid(&self) -> &EnergyGrid {
        &self.grid
    }

    pub fn cross_sections(&self) -> &CrossSectionTable {
        &self.cross_section
    }

    pub fn grid_searcher(&self) -> &Arc<HashBasedGridSearcher> {
        &self.grid_searcher
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn threshold_index(&self) -> usize {
        self.threshold_index
    }

    pub fn max_energy_index(&self) -> usize {
        self.max_energy_index
    }

    #[inline]
    fn recover_energy(&self, grid_value: f64) -> f64 {
        if self.processed {
            self.policy.recover_processed_indep_var(grid_value)
        } else {
            grid_value
        }
    }

    pub fn threshold_energy(&self) -> f64 {
        self.recover_energy(self.grid[self.threshold_index])
    }

    pub fn max_energy(&self) -> f64 {
        self.recover_energy(self.grid[self.max_energy_index])
    }

    pub fn is_energy_within_energy_grid(&self, energy: f64) -> bool {
        self.grid_searcher.is_value_within_grid_bounds(energy)
    }

    // Cross section at `energy`, zero outside of the energy grid
    pub fn cross_section(&self, energy: f64) -> f64 {
        self.try_cross_section(energy).unwrap_or(0.0)
    }

    // Cross section at `energy`, failing outside of the energy grid
    pub fn try_cross_section(&self, energy: f64) -> Result<f64> {
        let bin_index = self.grid_searcher.find_lower_bin_index(energy)?;
        Ok(self.cross_section_in_bin(energy, bin_index))
    }

    // Cross section at `energy` when the caller already knows the bin
    #[inline]
    pub fn cross_section_in_bin(&self, energy: f64, bin_index: usize) -> f64 {
        if self.validation.is_full() {
            assert!(
                bin_index < self.grid.len() - 1,
                "bin index {} is past the last bin of a {} point grid",
                bin_index,
                self.grid.len()
            );
            let value = if self.processed { self.policy.process_indep_var(energy) } else { energy };
            assert!(
                self.grid[bin_index] <= value && value <= self.grid[bin_index + 1],
                "energy {} is not inside bin {}",
                energy,
                bin_index
            );
        }

        if bin_index >= self.max_energy_index {
            0.0
        } else if bin_index > self.threshold_index {
            let cs_index = bin_index - self.threshold_index;
            (self.interpolate_bin)(
                self.policy,
                self.grid[bin_index],
                self.grid[bin_index + 1],
                energy,
                self.cross_section[cs_index],
                self.cross_section[cs_index + 1],
            )
        } else if bin_index == self.threshold_index {
            // Handles the 0.0 values a log policy cannot represent
            (self.interpolate_first_bin)(
                self.policy,
                self.grid[bin_index],
                self.grid[bin_index + 1],
                energy,
                self.cross_section[0],
                self.cross_section[1],
            )
        } else {
            0.0
        }
    }
}
