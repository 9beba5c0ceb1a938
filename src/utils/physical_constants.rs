//====================================================================
// Physical constants in transport units. Energies in MeV, lengths in
// cm. CODATA values come from the physical_constants crate (SI).
//====================================================================

use ::physical_constants::{
    CLASSICAL_ELECTRON_RADIUS as CLASSICAL_ELECTRON_RADIUS_IN_M, ELECTRON_MASS_ENERGY_EQUIVALENT_IN_MEV,
    ELEMENTARY_CHARGE, FINE_STRUCTURE_CONSTANT as ALPHA, PLANCK_CONSTANT, SPEED_OF_LIGHT_IN_VACUUM,
};

const CM_PER_M: f64 = 1e2;
const MEV_PER_EV: f64 = 1e-6;

pub const BARNS_PER_SQUARE_CM: f64 = 1e24;

pub const ELECTRON_REST_MASS_ENERGY: f64 = ELECTRON_MASS_ENERGY_EQUIVALENT_IN_MEV;

pub const FINE_STRUCTURE_CONSTANT: f64 = ALPHA;

pub const CLASSICAL_ELECTRON_RADIUS: f64 = CLASSICAL_ELECTRON_RADIUS_IN_M * CM_PER_M;

// h * c in MeV cm (J m / e gives eV m)
pub const PLANCK_CONSTANT_TIMES_SPEED_OF_LIGHT: f64 =
    PLANCK_CONSTANT * SPEED_OF_LIGHT_IN_VACUUM / ELEMENTARY_CHARGE * MEV_PER_EV * CM_PER_M;
