mod analog;
mod cutoff;
mod elastic_table;
mod screened_rutherford;

pub use analog::AnalogElasticDistribution;
pub use cutoff::CutoffElasticDistribution;
pub use elastic_table::{ElasticAngularBin, ElasticAngularTable, EnergyBracket};
pub use screened_rutherford::{
    ScreenedRutherfordElasticDistribution, sample_screened_rutherford, screened_rutherford_cdf,
    screened_rutherford_pdf,
};

use crate::distributions::ScatteringDistribution;
use crate::error::Result;
use crate::particle::{ParticleState, rotate_direction};
use crate::random::RandomNumberStream;
use crate::settings::TwoDInterpolation;

// Offset that keeps ln(1 + NUDGE - mu) finite at mu = 1
const COSINE_NUDGE: f64 = 1e-10;

// Interpolate a cosine sampled at the two bracketing energies
pub(crate) fn interpolate_cosine(interpolation: TwoDInterpolation, lower: f64, upper: f64, fraction: f64) -> f64 {
    let mu = match interpolation {
        TwoDInterpolation::LogLogLog => {
            let lower = (1.0 + COSINE_NUDGE - lower).ln();
            let upper = (1.0 + COSINE_NUDGE - upper).ln();
            1.0 + COSINE_NUDGE - (lower + fraction * (upper - lower)).exp()
        }
        TwoDInterpolation::LinLinLin | TwoDInterpolation::LinLinLog => lower + fraction * (upper - lower),
    };
    mu.clamp(-1.0, 1.0)
}

// Interpolate a pdf value (or screening constant) between the two
// bracketing energies
pub(crate) fn interpolate_value(interpolation: TwoDInterpolation, lower: f64, upper: f64, fraction: f64) -> f64 {
    match interpolation {
        TwoDInterpolation::LogLogLog if lower > 0.0 && upper > 0.0 => lower * (upper / lower).powf(fraction),
        _ => lower + fraction * (upper - lower),
    }
}

// Elastic scattering leaves the energy alone and only turns the electron
pub(crate) fn scatter_elastically(
    distribution: &dyn ScatteringDistribution,
    electron: &mut ParticleState,
    rng: &mut dyn RandomNumberStream,
) -> Result<()> {
    let (_, mu) = distribution.sample(electron.energy(), rng)?;
    electron.set_direction(rotate_direction(electron.direction(), mu, rng));
    Ok(())
}
