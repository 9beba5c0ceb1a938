use log::debug;

use crate::error::{CollisionError, Result};
use crate::grid::EnergyGrid;

//=====================================================================
// Bin lookup over an ascending grid. The range [front, back] is cut into
// equal-width buckets, each remembering the first and last grid index it
// can contain, so a lookup is a bucket computation followed by a binary
// search over a handful of points.
//=====================================================================
#[derive(Debug, Clone)]
pub struct HashBasedGridSearcher {
    grid: EnergyGrid,
    // The grid holds ln(E) and queries arrive as raw energies
    processed: bool,
    front: f64,
    back: f64,
    bucket_width: f64,
    hash_grid: Vec<usize>,
}

impl HashBasedGridSearcher {
    pub fn new(grid: EnergyGrid, processed: bool) -> Result<Self> {
        let num_buckets = grid.len() / 10 + 1;
        Self::with_buckets(grid, processed, num_buckets)
    }

    pub fn with_buckets(grid: EnergyGrid, processed: bool, num_buckets: usize) -> Result<Self> {
        if grid.len() < 2 {
            return Err(CollisionError::configuration(format!(
                "HashBasedGridSearcher: the grid needs at least two points, got {}",
                grid.len()
            )));
        }
        if grid.iter().any(|g| !g.is_finite()) || grid.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(CollisionError::configuration(
                "HashBasedGridSearcher: the grid must be finite and sorted in ascending order",
            ));
        }
        if num_buckets == 0 {
            return Err(CollisionError::configuration(
                "HashBasedGridSearcher: at least one bucket is required",
            ));
        }
        let front = grid[0];
        let back = grid[grid.len() - 1];
        if !(front < back) {
            return Err(CollisionError::configuration(
                "HashBasedGridSearcher: the grid must span a non-empty range",
            ));
        }

        let bucket_width = (back - front) / num_buckets as f64;
        let last_bin = grid.len() - 2;
        let hash_grid = (0..=num_buckets)
            .map(|k| {
                let boundary = if k == num_buckets {
                    back
                } else {
                    front + k as f64 * bucket_width
                };
                grid.partition_point(|&g| g <= boundary).saturating_sub(1).min(last_bin)
            })
            .collect();

        debug!(
            "Built grid searcher over {} points with {} buckets (processed: {})",
            grid.len(),
            num_buckets,
            processed
        );

        Ok(Self {
            grid,
            processed,
            front,
            back,
            bucket_width,
            hash_grid,
        })
    }

    pub fn grid(&self) -> &EnergyGrid {
        &self.grid
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn number_of_buckets(&self) -> usize {
        self.hash_grid.len() - 1
    }

    #[inline(always)]
    fn process(&self, energy: f64) -> f64 {
        if self.processed { energy.ln() } else { energy }
    }

    #[inline(always)]
    fn recover(&self, value: f64) -> f64 {
        if self.processed { value.exp() } else { value }
    }

    // Raw energy bounds of the grid
    pub fn lower_bound(&self) -> f64 {
        self.recover(self.front)
    }

    pub fn upper_bound(&self) -> f64 {
        self.recover(self.back)
    }

    pub fn is_value_within_grid_bounds(&self, energy: f64) -> bool {
        let value = self.process(energy);
        self.front <= value && value <= self.back
    }

    // Index i such that grid[i] <= energy <= grid[i + 1]
    pub fn find_lower_bin_index(&self, energy: f64) -> Result<usize> {
        let value = self.process(energy);
        if !(self.front <= value && value <= self.back) {
            return Err(CollisionError::OutOfBounds {
                value: energy,
                lower: self.lower_bound(),
                upper: self.upper_bound(),
            });
        }
        Ok(self.find_lower_bin_index_processed(value))
    }

    // Same lookup for a value already in grid space. The value must lie in
    // [front, back].
    pub fn find_lower_bin_index_processed(&self, value: f64) -> usize {
        let num_buckets = self.number_of_buckets();
        let bucket = (((value - self.front) / self.bucket_width) as usize).min(num_buckets - 1);
        let last_index = self.grid.len() - 1;

        let mut lower = self.hash_grid[bucket];
        let mut upper = (self.hash_grid[bucket + 1] + 1).min(last_index);
        // Rounding in the bucket computation can land one bucket off
        if self.grid[lower] > value {
            lower = 0;
        }
        if self.grid[upper] < value {
            upper = last_index;
        }

        let offset = self.grid[lower..=upper].partition_point(|&g| g <= value);
        (lower + offset.max(1) - 1).min(last_index - 1)
    }
}
