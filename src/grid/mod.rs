mod hash_based_grid_searcher;

pub use hash_based_grid_searcher::HashBasedGridSearcher;

use std::sync::Arc;

// An ascending energy grid shared read-only by every reaction built over it.
// Processed grids hold ln(E).
pub type EnergyGrid = Arc<[f64]>;
