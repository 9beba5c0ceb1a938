use crate::error::{CollisionError, Result};
use crate::interpolation::TabularDistribution;

//=====================================================================
// Secondary energy spectra (knock-on electrons, bremsstrahlung photons)
// tabulated against the incoming electron energy. Between tabulated
// energies the spectra are sampled on a unit base: the same random
// number in both bins, the relative position inside each bin's range
// interpolated and mapped onto the range at the incoming energy.
//=====================================================================
#[derive(Debug, Clone)]
pub struct SecondaryEnergyTable {
    energies: Vec<f64>,
    spectra: Vec<TabularDistribution>,
}

// Bracketing bins and the weight of the upper one
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bracket {
    lower: usize,
    upper: usize,
    fraction: f64,
}

impl SecondaryEnergyTable {
    pub fn new(energies: Vec<f64>, spectra: Vec<TabularDistribution>) -> Result<Self> {
        if energies.is_empty() || energies.len() != spectra.len() {
            return Err(CollisionError::configuration(format!(
                "SecondaryEnergyTable: {} energies but {} spectra",
                energies.len(),
                spectra.len()
            )));
        }
        if energies.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(CollisionError::configuration(
                "SecondaryEnergyTable: energies must be strictly ascending",
            ));
        }
        if spectra.iter().any(|spectrum| spectrum.lower_bound() < 0.0) {
            return Err(CollisionError::configuration(
                "SecondaryEnergyTable: secondary energies can't be negative",
            ));
        }
        Ok(Self { energies, spectra })
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn min_energy(&self) -> f64 {
        self.energies[0]
    }

    pub fn max_energy(&self) -> f64 {
        self.energies[self.energies.len() - 1]
    }

    // Clamped to the first and last bins outside of the table
    fn bracket(&self, energy: f64) -> Bracket {
        let last = self.energies.len() - 1;
        let upper = self.energies.partition_point(|&e| e <= energy);
        if upper == 0 {
            Bracket { lower: 0, upper: 0, fraction: 0.0 }
        } else if upper > last || self.energies[upper - 1] == energy {
            Bracket { lower: upper - 1, upper: upper - 1, fraction: 0.0 }
        } else {
            let lower = upper - 1;
            let fraction = (energy - self.energies[lower]) / (self.energies[upper] - self.energies[lower]);
            Bracket { lower, upper, fraction }
        }
    }

    // Secondary energy range of one bin, capped by `max_secondary`
    fn bin_range(&self, index: usize, max_secondary: &dyn Fn(f64) -> f64) -> (f64, f64) {
        let spectrum = &self.spectra[index];
        let min = spectrum.lower_bound();
        let max = spectrum.upper_bound().min(max_secondary(self.energies[index])).max(min);
        (min, max)
    }

    fn range(&self, energy: f64, bracket: Bracket, max_secondary: &dyn Fn(f64) -> f64) -> (f64, f64) {
        let (lower_min, lower_max) = self.bin_range(bracket.lower, max_secondary);
        let (upper_min, upper_max) = self.bin_range(bracket.upper, max_secondary);
        let min = lower_min + bracket.fraction * (upper_min - lower_min);
        let max = (lower_max + bracket.fraction * (upper_max - lower_max)).min(max_secondary(energy));
        (min, max.max(min))
    }

    // Weighted (bin, weight) pairs of a bracket
    fn weighted_bins(bracket: Bracket) -> [(usize, f64); 2] {
        [(bracket.lower, 1.0 - bracket.fraction), (bracket.upper, bracket.fraction)]
    }

    // Relative position of the sample in one bin's range
    fn unit_sample(&self, index: usize, random_number: f64, max_secondary: &dyn Fn(f64) -> f64) -> f64 {
        let (min, max) = self.bin_range(index, max_secondary);
        if max > min {
            ((self.spectra[index].sample_in_subrange(random_number, max) - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    // Sample a secondary energy. `max_secondary` caps the secondary energy
    // as a function of the incoming energy.
    pub fn sample(&self, energy: f64, random_number: f64, max_secondary: &dyn Fn(f64) -> f64) -> f64 {
        let bracket = self.bracket(energy);
        let (min, max) = self.range(energy, bracket, max_secondary);
        let unit = if bracket.lower == bracket.upper {
            self.unit_sample(bracket.lower, random_number, max_secondary)
        } else {
            let lower = self.unit_sample(bracket.lower, random_number, max_secondary);
            let upper = self.unit_sample(bracket.upper, random_number, max_secondary);
            lower + bracket.fraction * (upper - lower)
        };
        min + unit * (max - min)
    }

    // Normalized pdf of the secondary energy
    pub fn evaluate_pdf(&self, energy: f64, secondary_energy: f64, max_secondary: &dyn Fn(f64) -> f64) -> f64 {
        let bracket = self.bracket(energy);
        let (min, max) = self.range(energy, bracket, max_secondary);
        if !(max > min) || secondary_energy < min || secondary_energy > max {
            return 0.0;
        }
        let unit = (secondary_energy - min) / (max - min);
        let unit_pdf: f64 = Self::weighted_bins(bracket)
            .iter()
            .filter(|(_, weight)| *weight > 0.0)
            .map(|&(index, weight)| {
                let (bin_min, bin_max) = self.bin_range(index, max_secondary);
                let spectrum = &self.spectra[index];
                let norm = spectrum.evaluate_cdf(bin_max);
                if norm > 0.0 {
                    weight * spectrum.evaluate(bin_min + unit * (bin_max - bin_min)) * (bin_max - bin_min) / norm
                } else {
                    0.0
                }
            })
            .sum();
        unit_pdf / (max - min)
    }

    pub fn evaluate_cdf(&self, energy: f64, secondary_energy: f64, max_secondary: &dyn Fn(f64) -> f64) -> f64 {
        let bracket = self.bracket(energy);
        let (min, max) = self.range(energy, bracket, max_secondary);
        if secondary_energy <= min {
            return 0.0;
        }
        if secondary_energy >= max {
            return 1.0;
        }
        let unit = (secondary_energy - min) / (max - min);
        Self::weighted_bins(bracket)
            .iter()
            .filter(|(_, weight)| *weight > 0.0)
            .map(|&(index, weight)| {
                let (bin_min, bin_max) = self.bin_range(index, max_secondary);
                let spectrum = &self.spectra[index];
                let norm = spectrum.evaluate_cdf(bin_max);
                if norm > 0.0 {
                    weight * spectrum.evaluate_cdf(bin_min + unit * (bin_max - bin_min)) / norm
                } else {
                    weight
                }
            })
            .sum::<f64>()
            .min(1.0)
    }
}
