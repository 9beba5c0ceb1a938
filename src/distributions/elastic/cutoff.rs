use crate::distributions::elastic::elastic_table::{ElasticAngularTable, EnergyBracket};
use crate::distributions::elastic::{interpolate_cosine, interpolate_value, scatter_elastically};
use crate::distributions::{ElectronScatteringDistribution, ScatteringDistribution, checked_random_number};
use crate::error::Result;
use crate::particle::{ParticleBank, ParticleState, Subshell};
use crate::random::RandomNumberStream;
use crate::settings::{TwoDInterpolation, ValidationLevel};

// Elastic scattering below the cutoff cosine only, each tabulated pdf
// normalized over [-1, mu_c]
#[derive(Debug, Clone)]
pub struct CutoffElasticDistribution {
    table: ElasticAngularTable,
    interpolation: TwoDInterpolation,
    validation: ValidationLevel,
}

impl CutoffElasticDistribution {
    pub fn new(table: ElasticAngularTable, interpolation: TwoDInterpolation, validation: ValidationLevel) -> Self {
        Self { table, interpolation, validation }
    }

    pub fn table(&self) -> &ElasticAngularTable {
        &self.table
    }

    pub fn cutoff_angle_cosine(&self) -> f64 {
        self.table.cutoff_angle_cosine()
    }
}

impl ScatteringDistribution for CutoffElasticDistribution {
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        match self.table.bracket(incoming_energy, self.interpolation) {
            EnergyBracket::Single(index) => self.table.bin(index).cutoff_only_pdf(scattering_angle_cosine),
            EnergyBracket::Between { lower, fraction } => interpolate_value(
                self.interpolation,
                self.table.bin(lower).cutoff_only_pdf(scattering_angle_cosine),
                self.table.bin(lower + 1).cutoff_only_pdf(scattering_angle_cosine),
                fraction,
            ),
        }
    }

    fn evaluate_integrated(&self, _incoming_energy: f64) -> f64 {
        1.0
    }

    fn evaluate_pdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        self.evaluate(incoming_energy, scattering_angle_cosine)
    }

    fn evaluate_cdf(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if scattering_angle_cosine <= -1.0 {
            return 0.0;
        }
        if scattering_angle_cosine >= self.cutoff_angle_cosine() {
            return 1.0;
        }
        match self.table.bracket(incoming_energy, self.interpolation) {
            EnergyBracket::Single(index) => self.table.bin(index).cutoff_only_cdf(scattering_angle_cosine),
            EnergyBracket::Between { lower, fraction } => {
                let lower_cdf = self.table.bin(lower).cutoff_only_cdf(scattering_angle_cosine);
                let upper_cdf = self.table.bin(lower + 1).cutoff_only_cdf(scattering_angle_cosine);
                lower_cdf + fraction * (upper_cdf - lower_cdf)
            }
        }
    }

    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)> {
        *trials += 1;
        let random_number = checked_random_number(rng, self.validation.is_full())?;
        let mu = match self.table.bracket(incoming_energy, self.interpolation) {
            EnergyBracket::Single(index) => self.table.bin(index).sample_cutoff_only(random_number),
            EnergyBracket::Between { lower, fraction } => {
                let lower_mu = self.table.bin(lower).sample_cutoff_only(random_number);
                let upper_mu = self.table.bin(lower + 1).sample_cutoff_only(random_number);
                interpolate_cosine(self.interpolation, lower_mu, upper_mu, fraction)
                    .min(self.cutoff_angle_cosine())
            }
        };
        Ok((incoming_energy, mu))
    }
}

impl ElectronScatteringDistribution for CutoffElasticDistribution {
    fn scatter_electron(
        &self,
        electron: &mut ParticleState,
        _bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        scatter_elastically(self, electron, rng)?;
        Ok(Subshell::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::distributions::elastic::ElasticAngularBin;
    use crate::random::FakeStream;

    const CUTOFF: f64 = 0.9;

    fn distribution() -> CutoffElasticDistribution {
        let angles = [-1.0, 0.0, 1.0];
        let bins = vec![
            ElasticAngularBin::new(1.0, &angles, &[1.0, 1.0, 1.0], 1e-3, 0.5, CUTOFF).unwrap(),
            ElasticAngularBin::new(3.0, &angles, &[0.0, 1.0, 2.0], 1e-4, 0.8, CUTOFF).unwrap(),
        ];
        let table = ElasticAngularTable::from_bins(bins).unwrap();
        CutoffElasticDistribution::new(table, TwoDInterpolation::LinLinLin, ValidationLevel::Full)
    }

    #[test]
    fn test_pdf_is_normalized_below_cutoff() {
        let dist = distribution();
        // Flat pdf over [-1, 0.9]
        assert_relative_eq!(dist.evaluate(1.0, 0.0), 1.0 / 1.9, max_relative = 1e-14);
        assert_eq!(dist.evaluate(1.0, 0.95), 0.0);
        assert_eq!(dist.evaluate_cdf(2.0, CUTOFF), 1.0);
        assert_eq!(dist.evaluate_cdf(2.0, -1.0), 0.0);
        assert_relative_eq!(dist.evaluate_integrated(2.0), 1.0);
    }

    #[test]
    fn test_sample() {
        let dist = distribution();
        let mut rng = FakeStream::new(vec![0.5, 0.0, 1.0]);
        let mut trials = 0;
        let (energy, mu) = dist.sample_and_record_trials(1.0, &mut rng, &mut trials).unwrap();
        assert_eq!(energy, 1.0);
        assert_abs_diff_eq!(mu, -0.05, epsilon = 1e-14);

        // Correlated between the two energies
        let (_, mu) = dist.sample_and_record_trials(2.0, &mut rng, &mut trials).unwrap();
        assert_abs_diff_eq!(mu, -1.0, epsilon = 1e-14);
        let (_, mu) = dist.sample_and_record_trials(2.0, &mut rng, &mut trials).unwrap();
        assert_abs_diff_eq!(mu, CUTOFF, epsilon = 1e-14);
        assert_eq!(trials, 3);
    }
}
