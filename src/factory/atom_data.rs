use crate::interpolation::{InterpolationPolicy, TabularDistribution, TabulatedFunction};
use crate::error::Result;
use crate::particle::Subshell;

//=====================================================================
// Plain containers handed over by the data-loading layer. Nothing here
// parses files; the factories only read these.
//=====================================================================

// A y(x) table as stored in the data file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl TableData {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn to_function(&self, policy: InterpolationPolicy) -> Result<TabulatedFunction> {
        TabulatedFunction::new(self.x.clone(), self.y.clone(), policy)
    }

    pub fn to_distribution(&self) -> Result<TabularDistribution> {
        TabularDistribution::new(self.x.clone(), self.y.clone())
    }
}

// Raw cross section starting at `threshold_index` of the shared grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossSectionData {
    pub values: Vec<f64>,
    pub threshold_index: usize,
}

impl CrossSectionData {
    pub fn new(values: Vec<f64>, threshold_index: usize) -> Self {
        Self { values, threshold_index }
    }
}

//=====================================================================
// Photoatomic data.
//=====================================================================

// Legacy ACE (EPR) photoatomic table. The grid holds ln(E) and every
// cross section holds ln(sigma) on the full grid, with zeros below the
// reaction threshold.
#[derive(Debug, Clone, Default)]
pub struct AcePhotoatomData {
    pub atomic_number: u32,
    pub energy_grid: Vec<f64>,
    pub coherent_cross_section: Vec<f64>,
    pub incoherent_cross_section: Vec<f64>,
    pub photoelectric_cross_section: Vec<f64>,
    pub pair_production_cross_section: Vec<f64>,
    pub heating_numbers: Vec<f64>,
    // F^2 against x^2, x the momentum transfer in inverse cm
    pub form_factor_squared: TableData,
    // S against x, x the momentum transfer in inverse cm
    pub scattering_function: TableData,
    pub subshells: Vec<AceSubshellData>,
}

#[derive(Debug, Clone)]
pub struct AceSubshellData {
    pub subshell: Subshell,
    pub binding_energy: f64,
    // Processed like the other ACE cross sections
    pub photoelectric_cross_section: Vec<f64>,
}

// Native photoatomic data: raw grid and cross sections with explicit
// threshold indices
#[derive(Debug, Clone, Default)]
pub struct NativePhotoatomData {
    pub atomic_number: u32,
    pub energy_grid: Vec<f64>,
    pub coherent: CrossSectionData,
    pub waller_hartree_incoherent: CrossSectionData,
    pub photoelectric: CrossSectionData,
    pub pair_production: CrossSectionData,
    pub triplet_production: Option<CrossSectionData>,
    pub heating: Option<CrossSectionData>,
    pub form_factor_squared: TableData,
    pub scattering_function: TableData,
    pub subshells: Vec<NativeSubshellData>,
    pub pair_energy_sharing: Option<EnergySharingData>,
}

#[derive(Debug, Clone)]
pub struct NativeSubshellData {
    pub subshell: Subshell,
    pub binding_energy: f64,
    pub occupancy: f64,
    // Occupation number against the electron momentum projection (m_e c units)
    pub occupation_number: TableData,
    pub incoherent: CrossSectionData,
    pub photoelectric: CrossSectionData,
}

// Electron share of the kinetic energy at each tabulated photon energy
#[derive(Debug, Clone, Default)]
pub struct EnergySharingData {
    pub energies: Vec<f64>,
    pub fractions: Vec<TableData>,
}

//=====================================================================
// Electroatomic data.
//=====================================================================

// Secondary energy spectrum (knock-on electron or bremsstrahlung photon)
// at each tabulated incoming electron energy
#[derive(Debug, Clone, Default)]
pub struct SecondaryEnergyData {
    pub energies: Vec<f64>,
    pub spectra: Vec<TableData>,
}

#[derive(Debug, Clone)]
pub struct ElectroionizationSubshellData {
    pub subshell: Subshell,
    pub binding_energy: f64,
    pub cross_section: CrossSectionData,
    pub knock_on_energy: SecondaryEnergyData,
}

// ACE (EPR) electroatomic table. Unlike the photon tables the grid and
// cross sections are raw values, padded with zeros below the reaction
// threshold. Version 14 tables interpolate log-log, older ones lin-lin.
#[derive(Debug, Clone, Default)]
pub struct AceElectroatomData {
    pub atomic_number: u32,
    pub epr_version: u32,
    pub energy_grid: Vec<f64>,
    pub total_elastic_cross_section: Vec<f64>,
    pub cutoff_elastic_cross_section: Vec<f64>,
    pub atomic_excitation_cross_section: Vec<f64>,
    pub bremsstrahlung_cross_section: Vec<f64>,
    pub atomic_excitation_energy_loss: TableData,
    pub elastic_angular_energies: Vec<f64>,
    pub elastic_angles: Vec<Vec<f64>>,
    pub elastic_pdfs: Vec<Vec<f64>>,
    pub bremsstrahlung_photon_energy: SecondaryEnergyData,
    pub subshells: Vec<AceElectroionizationSubshellData>,
}

#[derive(Debug, Clone)]
pub struct AceElectroionizationSubshellData {
    pub subshell: Subshell,
    pub binding_energy: f64,
    pub cross_section: Vec<f64>,
    pub knock_on_energy: SecondaryEnergyData,
}

#[derive(Debug, Clone, Default)]
pub struct NativeElectroatomData {
    pub atomic_number: u32,
    pub energy_grid: Vec<f64>,
    pub cutoff_elastic: CrossSectionData,
    pub screened_rutherford_elastic: CrossSectionData,
    pub atomic_excitation: CrossSectionData,
    pub atomic_excitation_energy_loss: TableData,
    // Tabulated elastic pdf over [-1, 1] at each angular energy
    pub elastic_angular_energies: Vec<f64>,
    pub elastic_angles: Vec<Vec<f64>>,
    pub elastic_pdfs: Vec<Vec<f64>>,
    pub bremsstrahlung: CrossSectionData,
    pub bremsstrahlung_photon_energy: SecondaryEnergyData,
    pub electroionization_subshells: Vec<ElectroionizationSubshellData>,
}
