use log::debug;

use crate::distributions::kinematics::moliere_screening_constant;
use crate::distributions::elastic::screened_rutherford::{
    sample_screened_rutherford, screened_rutherford_cdf, screened_rutherford_pdf,
};
use crate::error::{CollisionError, Result};
use crate::interpolation::TabularDistribution;
use crate::settings::TwoDInterpolation;

//=====================================================================
// Angular data of the coupled elastic distribution at one incoming
// energy: the tabulated pdf below the cutoff cosine, the screening
// constant of the tail and the share of the cutoff part in the total.
//=====================================================================
#[derive(Debug, Clone)]
pub struct ElasticAngularBin {
    energy: f64,
    // Unnormalized tabulated pdf over [-1, mu_c]
    cutoff: TabularDistribution,
    eta: f64,
    cutoff_ratio: f64,
}

impl ElasticAngularBin {
    pub fn new(
        energy: f64,
        angles: &[f64],
        pdf: &[f64],
        eta: f64,
        cutoff_ratio: f64,
        cutoff_angle_cosine: f64,
    ) -> Result<Self> {
        if !(eta > 0.0) || !(cutoff_ratio > 0.0 && cutoff_ratio <= 1.0) {
            return Err(CollisionError::configuration(format!(
                "ElasticAngularBin: invalid screening constant ({}) or cutoff ratio ({}) at {:e} MeV",
                eta, cutoff_ratio, energy
            )));
        }
        let full = TabularDistribution::new(angles.to_vec(), pdf.to_vec())?;
        if full.lower_bound() < -1.0 || full.upper_bound() < cutoff_angle_cosine {
            return Err(CollisionError::configuration(format!(
                "ElasticAngularBin: the angular grid [{}, {}] must cover [-1, {}]",
                full.lower_bound(),
                full.upper_bound(),
                cutoff_angle_cosine
            )));
        }

        // Truncate the table at the cutoff cosine
        let (mut cutoff_angles, mut cutoff_pdf): (Vec<f64>, Vec<f64>) = angles
            .iter()
            .zip(pdf)
            .filter(|&(&mu, _)| mu < cutoff_angle_cosine)
            .map(|(&mu, &p)| (mu, p))
            .unzip();
        cutoff_angles.push(cutoff_angle_cosine);
        cutoff_pdf.push(full.evaluate(cutoff_angle_cosine));
        let cutoff = TabularDistribution::new(cutoff_angles, cutoff_pdf)?;

        Ok(Self { energy, cutoff, eta, cutoff_ratio })
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn cutoff_distribution(&self) -> &TabularDistribution {
        &self.cutoff
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn cutoff_ratio(&self) -> f64 {
        self.cutoff_ratio
    }

    pub fn cutoff_angle_cosine(&self) -> f64 {
        self.cutoff.upper_bound()
    }

    // Scales the tabulated pdf to its share of the coupled distribution
    fn norm(&self) -> f64 {
        self.cutoff_ratio / self.cutoff.total()
    }

    // Coupled pdf at the cutoff cosine
    pub fn cutoff_pdf(&self) -> f64 {
        let values = self.cutoff.pdf_values();
        self.norm() * values[values.len() - 1]
    }

    // Pdf of the cutoff part alone, normalized over [-1, mu_c]
    pub fn cutoff_only_pdf(&self, scattering_angle_cosine: f64) -> f64 {
        self.cutoff.evaluate(scattering_angle_cosine) / self.cutoff.total()
    }

    pub fn cutoff_only_cdf(&self, scattering_angle_cosine: f64) -> f64 {
        if scattering_angle_cosine >= self.cutoff_angle_cosine() {
            return 1.0;
        }
        self.cutoff.evaluate_cdf(scattering_angle_cosine) / self.cutoff.total()
    }

    pub fn sample_cutoff_only(&self, random_number: f64) -> f64 {
        self.cutoff.sample(random_number)
    }

    // Coupled cutoff + screened Rutherford pdf
    pub fn coupled_pdf(&self, scattering_angle_cosine: f64) -> f64 {
        let cutoff_angle_cosine = self.cutoff_angle_cosine();
        if !(-1.0..=1.0).contains(&scattering_angle_cosine) {
            0.0
        } else if scattering_angle_cosine <= cutoff_angle_cosine {
            self.norm() * self.cutoff.evaluate(scattering_angle_cosine)
        } else {
            screened_rutherford_pdf(scattering_angle_cosine, self.eta, cutoff_angle_cosine, self.cutoff_pdf())
        }
    }

    pub fn coupled_cdf(&self, scattering_angle_cosine: f64) -> f64 {
        let cutoff_angle_cosine = self.cutoff_angle_cosine();
        if scattering_angle_cosine <= -1.0 {
            0.0
        } else if scattering_angle_cosine < cutoff_angle_cosine {
            self.norm() * self.cutoff.evaluate_cdf(scattering_angle_cosine)
        } else if scattering_angle_cosine == cutoff_angle_cosine {
            self.cutoff_ratio
        } else {
            screened_rutherford_cdf(scattering_angle_cosine, self.eta, cutoff_angle_cosine, self.cutoff_ratio)
        }
    }

    // A random number below the cutoff ratio lands in the table, above it
    // in the analytic tail
    pub fn sample_coupled(&self, random_number: f64) -> f64 {
        let cutoff_angle_cosine = self.cutoff_angle_cosine();
        if random_number == self.cutoff_ratio {
            cutoff_angle_cosine
        } else if random_number > self.cutoff_ratio {
            let scaled = (random_number - self.cutoff_ratio) / (1.0 - self.cutoff_ratio);
            sample_screened_rutherford(scaled, self.eta, cutoff_angle_cosine)
        } else {
            self.cutoff
                .sample_unnormalized(random_number * self.cutoff.total() / self.cutoff_ratio)
        }
    }
}

// Where an incoming energy falls in the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyBracket {
    // On (or clamped to) a tabulated energy
    Single(usize),
    // Between bins `lower` and `lower + 1`
    Between { lower: usize, fraction: f64 },
}

//=====================================================================
// Elastic angular bins ordered by incoming energy.
//=====================================================================
#[derive(Debug, Clone)]
pub struct ElasticAngularTable {
    bins: Vec<ElasticAngularBin>,
    cutoff_angle_cosine: f64,
}

impl ElasticAngularTable {
    pub fn from_bins(bins: Vec<ElasticAngularBin>) -> Result<Self> {
        if bins.len() < 2 {
            return Err(CollisionError::configuration(
                "ElasticAngularTable: at least two incoming energies are required",
            ));
        }
        if bins.windows(2).any(|pair| !(pair[0].energy < pair[1].energy)) {
            return Err(CollisionError::configuration(
                "ElasticAngularTable: incoming energies must be strictly ascending",
            ));
        }
        let cutoff_angle_cosine = bins[0].cutoff_angle_cosine();
        if bins.iter().any(|bin| bin.cutoff_angle_cosine() != cutoff_angle_cosine) {
            return Err(CollisionError::configuration(
                "ElasticAngularTable: every bin must share the same cutoff cosine",
            ));
        }
        Ok(Self { bins, cutoff_angle_cosine })
    }

    // Build the bins from tabulated angular pdfs, computing the Moliere
    // screening constant of each energy from the atomic number
    pub fn new(
        energies: &[f64],
        angles: &[Vec<f64>],
        pdfs: &[Vec<f64>],
        cutoff_ratios: &[f64],
        atomic_number: u32,
        cutoff_angle_cosine: f64,
    ) -> Result<Self> {
        if angles.len() != energies.len() || pdfs.len() != energies.len() || cutoff_ratios.len() != energies.len() {
            return Err(CollisionError::configuration(format!(
                "ElasticAngularTable: {} energies but {} angular grids, {} pdfs and {} cutoff ratios",
                energies.len(),
                angles.len(),
                pdfs.len(),
                cutoff_ratios.len()
            )));
        }
        let bins = energies
            .iter()
            .zip(angles)
            .zip(pdfs)
            .zip(cutoff_ratios)
            .map(|(((&energy, angles), pdf), &ratio)| {
                let eta = moliere_screening_constant(energy, atomic_number);
                ElasticAngularBin::new(energy, angles, pdf, eta, ratio, cutoff_angle_cosine)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "Built elastic angular table with {} energies for Z = {}, cutoff cosine {}",
            bins.len(),
            atomic_number,
            cutoff_angle_cosine
        );
        Self::from_bins(bins)
    }

    pub fn bins(&self) -> &[ElasticAngularBin] {
        &self.bins
    }

    pub fn bin(&self, index: usize) -> &ElasticAngularBin {
        &self.bins[index]
    }

    pub fn cutoff_angle_cosine(&self) -> f64 {
        self.cutoff_angle_cosine
    }

    pub fn min_energy(&self) -> f64 {
        self.bins[0].energy
    }

    pub fn max_energy(&self) -> f64 {
        self.bins[self.bins.len() - 1].energy
    }

    // Energies outside of the table are clamped to its end bins
    pub fn bracket(&self, energy: f64, interpolation: TwoDInterpolation) -> EnergyBracket {
        let last = self.bins.len() - 1;
        if energy <= self.bins[0].energy {
            return EnergyBracket::Single(0);
        }
        if energy >= self.bins[last].energy {
            return EnergyBracket::Single(last);
        }
        let lower = self.bins.partition_point(|bin| bin.energy <= energy) - 1;
        let lower_energy = self.bins[lower].energy;
        if lower_energy == energy {
            return EnergyBracket::Single(lower);
        }
        let upper_energy = self.bins[lower + 1].energy;
        let fraction = match interpolation {
            TwoDInterpolation::LinLinLog | TwoDInterpolation::LogLogLog if lower_energy > 0.0 => {
                (energy / lower_energy).ln() / (upper_energy / lower_energy).ln()
            }
            // A zero energy can't be logged, treat that bin linearly
            _ => (energy - lower_energy) / (upper_energy - lower_energy),
        };
        EnergyBracket::Between { lower, fraction }
    }
}
