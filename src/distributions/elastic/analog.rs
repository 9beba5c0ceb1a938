use log::debug;

use crate::distributions::elastic::elastic_table::{ElasticAngularTable, EnergyBracket};
use crate::distributions::elastic::screened_rutherford::{
    sample_screened_rutherford, screened_rutherford_cdf, screened_rutherford_pdf,
};
use crate::distributions::elastic::{interpolate_cosine, interpolate_value, scatter_elastically};
use crate::distributions::{ElectronScatteringDistribution, ScatteringDistribution, checked_random_number};
use crate::error::Result;
use crate::interpolation::{InterpolationPolicy, TabulatedFunction};
use crate::particle::{ParticleBank, ParticleState, Subshell};
use crate::random::RandomNumberStream;
use crate::settings::{CoupledElasticSamplingMethod, TwoDInterpolation, ValidationLevel};

//=====================================================================
// Analog (coupled) elastic electron scattering. Below the cutoff
// cosine the angular pdf is tabulated; above it an analytic screened
// Rutherford tail carries the remaining 1 - cutoff ratio of the
// probability.
//=====================================================================
#[derive(Debug, Clone)]
pub struct AnalogElasticDistribution {
    table: ElasticAngularTable,
    // Cutoff-to-total ratio against energy, used by the modified union
    cutoff_ratios: TabulatedFunction,
    interpolation: TwoDInterpolation,
    sampling: CoupledElasticSamplingMethod,
    validation: ValidationLevel,
}

impl AnalogElasticDistribution {
    pub fn new(
        table: ElasticAngularTable,
        interpolation: TwoDInterpolation,
        sampling: CoupledElasticSamplingMethod,
        validation: ValidationLevel,
    ) -> Result<Self> {
        let (energies, ratios) = table
            .bins()
            .iter()
            .map(|bin| (bin.energy(), bin.cutoff_ratio()))
            .unzip();
        let cutoff_ratios = TabulatedFunction::new(energies, ratios, InterpolationPolicy::LogLog)?;
        debug!(
            "Analog elastic distribution: {} interpolation, {} sampling over [{:e}, {:e}] MeV",
            interpolation,
            sampling,
            table.min_energy(),
            table.max_energy()
        );
        Ok(Self { table, cutoff_ratios, interpolation, sampling, validation })
    }

    pub fn table(&self) -> &ElasticAngularTable {
        &self.table
    }

    pub fn cutoff_angle_cosine(&self) -> f64 {
        self.table.cutoff_angle_cosine()
    }

    pub fn interpolation(&self) -> TwoDInterpolation {
        self.interpolation
    }

    pub fn sampling_method(&self) -> CoupledElasticSamplingMethod {
        self.sampling
    }

    // Screened Rutherford tail pdf, equal to `cutoff_pdf` at the cutoff cosine
    pub fn evaluate_screened_rutherford_pdf(&self, scattering_angle_cosine: f64, eta: f64, cutoff_pdf: f64) -> f64 {
        screened_rutherford_pdf(scattering_angle_cosine, eta, self.cutoff_angle_cosine(), cutoff_pdf)
    }

    // Screened Rutherford tail cdf, equal to `cutoff_cdf` at the cutoff
    // cosine and 1 at mu = 1
    pub fn evaluate_screened_rutherford_cdf(&self, scattering_angle_cosine: f64, eta: f64, cutoff_cdf: f64) -> f64 {
        screened_rutherford_cdf(scattering_angle_cosine, eta, self.cutoff_angle_cosine(), cutoff_cdf)
    }

    // Cutoff-to-total cross section ratio at an energy within the table
    pub fn cutoff_ratio(&self, incoming_energy: f64) -> f64 {
        self.cutoff_ratios.evaluate_clamped(incoming_energy)
    }

    // Same random number in both bracketing bins, cosines interpolated
    pub fn sample_one_d_union(&self, incoming_energy: f64, rng: &mut dyn RandomNumberStream) -> Result<f64> {
        let random_number = checked_random_number(rng, self.validation.is_full())?;
        Ok(match self.table.bracket(incoming_energy, self.interpolation) {
            EnergyBracket::Single(index) => self.table.bin(index).sample_coupled(random_number),
            EnergyBracket::Between { lower, fraction } => {
                let lower_mu = self.table.bin(lower).sample_coupled(random_number);
                let upper_mu = self.table.bin(lower + 1).sample_coupled(random_number);
                interpolate_cosine(self.interpolation, lower_mu, upper_mu, fraction)
            }
        })
    }

    // Pick one of the bracketing bins with the interpolation fraction as
    // the probability of the upper one, then sample it
    pub fn sample_two_d_union(&self, incoming_energy: f64, rng: &mut dyn RandomNumberStream) -> Result<f64> {
        let index = match self.table.bracket(incoming_energy, self.interpolation) {
            EnergyBracket::Single(index) => index,
            EnergyBracket::Between { lower, fraction } => {
                if checked_random_number(rng, self.validation.is_full())? < fraction {
                    lower + 1
                } else {
                    lower
                }
            }
        };
        let random_number = checked_random_number(rng, self.validation.is_full())?;
        Ok(self.table.bin(index).sample_coupled(random_number))
    }

    // Choose between table and tail with the cutoff ratio at the incoming
    // energy itself, then sample the cutoff tables correlated or the tail
    // with an interpolated screening constant
    pub fn sample_modified_two_d_union(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<f64> {
        let random_number = checked_random_number(rng, self.validation.is_full())?;
        let (lower, fraction) = match self.table.bracket(incoming_energy, self.interpolation) {
            EnergyBracket::Single(index) => {
                return Ok(self.table.bin(index).sample_coupled(random_number));
            }
            EnergyBracket::Between { lower, fraction } => (lower, fraction),
        };
        let lower_bin = self.table.bin(lower);
        let upper_bin = self.table.bin(lower + 1);
        let cutoff_angle_cosine = self.cutoff_angle_cosine();
        let ratio = self.cutoff_ratio(incoming_energy);

        Ok(if random_number == ratio {
            cutoff_angle_cosine
        } else if random_number > ratio {
            let eta = interpolate_value(self.interpolation, lower_bin.eta(), upper_bin.eta(), fraction);
            let scaled = (random_number - ratio) / (1.0 - ratio);
            sample_screened_rutherford(scaled, eta, cutoff_angle_cosine)
        } else {
            let scaled = random_number / ratio;
            let lower_mu = lower_bin.sample_cutoff_only(scaled);
            let upper_mu = upper_bin.sample_cutoff_only(scaled);
            interpolate_cosine(self.interpolation, lower_mu, upper_mu, fraction).min(cutoff_angle_cosine)
        })
    }
}

impl ScatteringDistribution for AnalogElasticDistribution {
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        match self.table.bracket(incoming_energy, self.interpolation) {
            EnergyBracket::Single(index) => self.table.bin(index).coupled_pdf(scattering_angle_cosine),
            EnergyBracket::Between { lower, fraction } => interpolate_value(
                self.interpolation,
                self.table.bin(lower).coupled_pdf(scattering_angle_cosine),
                self.table.bin(lower + 1).coupled_pdf(scattering_angle_cosine),
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
        if scattering_angle_cosine >= 1.0 {
            return 1.0;
        }
        match self.table.bracket(incoming_energy, self.interpolation) {
            EnergyBracket::Single(index) => self.table.bin(index).coupled_cdf(scattering_angle_cosine),
            EnergyBracket::Between { lower, fraction } => {
                let lower_cdf = self.table.bin(lower).coupled_cdf(scattering_angle_cosine);
                let upper_cdf = self.table.bin(lower + 1).coupled_cdf(scattering_angle_cosine);
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
        let mu = match self.sampling {
            CoupledElasticSamplingMethod::OneDUnion => self.sample_one_d_union(incoming_energy, rng)?,
            CoupledElasticSamplingMethod::TwoDUnion => self.sample_two_d_union(incoming_energy, rng)?,
            CoupledElasticSamplingMethod::ModifiedTwoDUnion => {
                self.sample_modified_two_d_union(incoming_energy, rng)?
            }
        };
        Ok((incoming_energy, mu))
    }
}

impl ElectronScatteringDistribution for AnalogElasticDistribution {
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
