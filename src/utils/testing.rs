//=====================================================================
// Fixtures shared by the unit tests: small grids, flat cross sections
// and a synthetic carbon-like photoatom and electroatom.
//=====================================================================

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::factory::{
    AceElectroatomData, AceElectroionizationSubshellData, AcePhotoatomData, AceSubshellData, CrossSectionData,
    ElectroionizationSubshellData, EnergySharingData, NativeElectroatomData, NativePhotoatomData, NativeSubshellData,
    SecondaryEnergyData, TableData,
};
use crate::grid::EnergyGrid;
use crate::interpolation::InterpolationPolicy;
use crate::particle::Subshell;
use crate::reactions::CrossSectionEngine;
use crate::settings::ValidationLevel;

const COHERENT: [f64; 8] = [10.0, 8.0, 5.0, 2.0, 1.5, 1.2, 0.5, 0.1];
const INCOHERENT: [f64; 8] = [1.2, 2.0, 3.0, 2.0, 1.8, 1.6, 0.9, 0.5];
const PHOTOELECTRIC: [f64; 8] = [100.0, 50.0, 10.0, 1.1, 0.8, 0.5, 0.1, 0.01];
// Starts at index 4 (1.5 MeV)
const PAIR_PRODUCTION: [f64; 4] = [0.01, 0.02, 0.1, 0.5];
const HEATING: [f64; 8] = [0.5; 8];

const CUTOFF_ELASTIC: [f64; 6] = [2.48924e9, 2.90281e8, 5e6, 2e5, 1e4, 4.0e-2];
// Starts at index 2 (0.1 MeV)
const SCREENED_RUTHERFORD_ELASTIC: [f64; 4] = [1e5, 5e4, 1e3, 4.83051e-2];
const TOTAL_ELASTIC: [f64; 6] = [2.48924e9, 2.90281e8, 5.1e6, 2.5e5, 1.1e4, 8.83051e-2];
const ATOMIC_EXCITATION: [f64; 6] = [1e8, 5e7, 1e7, 5e6, 1e6, 1e3];
// Starts at index 2 (0.1 MeV)
const BREMSSTRAHLUNG: [f64; 4] = [4e3, 2e3, 1e3, 5e2];
// Both start at index 1 (1 keV)
const K_ELECTROIONIZATION: [f64; 5] = [1e5, 6e5, 3e5, 1e5, 2e4];
const L1_ELECTROIONIZATION: [f64; 5] = [4e5, 1e6, 5e5, 2e5, 4e4];

lazy_static! {
    // MeV
    pub static ref PHOTON_GRID: EnergyGrid = Arc::from(vec![1e-3, 1e-2, 0.1, 1.0, 1.5, 2.0, 10.0, 100.0]);
    pub static ref ELECTRON_GRID: EnergyGrid = Arc::from(vec![1e-5, 1e-3, 0.1, 1.0, 10.0, 1e5]);

    pub static ref NATIVE_PHOTOATOM: NativePhotoatomData = native_photoatom();
    pub static ref ACE_PHOTOATOM: AcePhotoatomData = ace_photoatom();
    pub static ref NATIVE_ELECTROATOM: NativeElectroatomData = native_electroatom();
    pub static ref ACE_ELECTROATOM: AceElectroatomData = ace_electroatom(14);
}

// Raw cross section of `value` from `threshold_index` to the end of `grid`
pub fn flat_engine(
    grid: &EnergyGrid,
    threshold_index: usize,
    value: f64,
    policy: InterpolationPolicy,
) -> CrossSectionEngine {
    let cross_section = vec![value; grid.len() - threshold_index];
    CrossSectionEngine::new(grid.clone(), Arc::from(cross_section), threshold_index, policy, false)
        .unwrap()
        .with_validation(ValidationLevel::Full)
}

fn form_factor_squared() -> TableData {
    TableData::new(vec![0.0, 1e17, 1e18], vec![1.0, 0.5, 0.0])
}

fn scattering_function() -> TableData {
    TableData::new(vec![0.0, 1e8, 1e12], vec![0.0, 0.5, 1.0])
}

// ln(sigma) padded with zeros up to `threshold_index`
fn processed(values: &[f64], threshold_index: usize) -> Vec<f64> {
    let mut padded = vec![0.0; threshold_index];
    padded.extend(values.iter().map(|value| value.ln()));
    padded
}

fn native_photoatom() -> NativePhotoatomData {
    let shell = |subshell, binding_energy, share: f64| NativeSubshellData {
        subshell,
        binding_energy,
        occupancy: 2.0,
        occupation_number: TableData::new(vec![-1.0, 0.0, 1.0], vec![0.0, 0.5, 1.0]),
        incoherent: CrossSectionData::new(INCOHERENT.iter().map(|cs| cs * share).collect(), 0),
        photoelectric: CrossSectionData::new(PHOTOELECTRIC.iter().map(|cs| cs * share).collect(), 0),
    };
    NativePhotoatomData {
        atomic_number: 6,
        energy_grid: PHOTON_GRID.to_vec(),
        coherent: CrossSectionData::new(COHERENT.to_vec(), 0),
        waller_hartree_incoherent: CrossSectionData::new(INCOHERENT.to_vec(), 0),
        photoelectric: CrossSectionData::new(PHOTOELECTRIC.to_vec(), 0),
        pair_production: CrossSectionData::new(PAIR_PRODUCTION.to_vec(), 4),
        triplet_production: Some(CrossSectionData::new(vec![1e-3, 1e-2], 6)),
        heating: Some(CrossSectionData::new(HEATING.to_vec(), 0)),
        form_factor_squared: form_factor_squared(),
        scattering_function: scattering_function(),
        subshells: vec![shell(Subshell::K, 2.9e-4, 0.6), shell(Subshell::L1, 1.6e-5, 0.4)],
        pair_energy_sharing: Some(EnergySharingData {
            energies: vec![1.5, 100.0],
            fractions: vec![
                TableData::new(vec![0.0, 1.0], vec![1.0, 1.0]),
                TableData::new(vec![0.0, 0.5, 1.0], vec![1.0, 2.0, 1.0]),
            ],
        }),
    }
}

fn ace_photoatom() -> AcePhotoatomData {
    AcePhotoatomData {
        atomic_number: 6,
        energy_grid: PHOTON_GRID.iter().map(|energy| energy.ln()).collect(),
        coherent_cross_section: processed(&COHERENT, 0),
        incoherent_cross_section: processed(&INCOHERENT, 0),
        photoelectric_cross_section: processed(&PHOTOELECTRIC, 0),
        pair_production_cross_section: processed(&PAIR_PRODUCTION, 4),
        heating_numbers: processed(&HEATING, 0),
        form_factor_squared: form_factor_squared(),
        scattering_function: scattering_function(),
        subshells: vec![AceSubshellData {
            subshell: Subshell::K,
            binding_energy: 2.9e-4,
            photoelectric_cross_section: processed(&PHOTOELECTRIC, 0),
        }],
    }
}

// Raw cross section padded with zeros up to `threshold_index`
fn padded(values: &[f64], threshold_index: usize) -> Vec<f64> {
    let mut padded = vec![0.0; threshold_index];
    padded.extend_from_slice(values);
    padded
}

// Roughly 1/k photon spectra up to the electron energy
fn bremsstrahlung_photon_energy() -> SecondaryEnergyData {
    let energies = vec![1e-5, 1.0, 1e5];
    let spectra = energies
        .iter()
        .map(|&energy| {
            TableData::new(vec![1e-2 * energy, 0.1 * energy, energy], vec![1e2 / energy, 10.0 / energy, 1.0 / energy])
        })
        .collect();
    SecondaryEnergyData { energies, spectra }
}

// Knock-on spectra falling off with the knock-on energy, capped at half
// the available energy when sampled
fn knock_on_energy() -> SecondaryEnergyData {
    let energies = vec![1e-3, 1.0, 1e5];
    let spectra = energies
        .iter()
        .map(|&energy| TableData::new(vec![1e-6, 1e-4, 0.5 * energy], vec![1e4, 1e2, 1.0]))
        .collect();
    SecondaryEnergyData { energies, spectra }
}

fn elastic_angles() -> Vec<Vec<f64>> {
    vec![vec![-1.0, 0.0, 0.9, 1.0]; 3]
}

fn elastic_pdfs() -> Vec<Vec<f64>> {
    vec![
        vec![0.5, 0.5, 0.5, 0.5],
        vec![0.1, 0.5, 2.0, 3.0],
        vec![0.01, 0.1, 5.0, 10.0],
    ]
}

fn native_electroatom() -> NativeElectroatomData {
    let shell = |subshell, binding_energy, cross_section: &[f64]| ElectroionizationSubshellData {
        subshell,
        binding_energy,
        cross_section: CrossSectionData::new(cross_section.to_vec(), 1),
        knock_on_energy: knock_on_energy(),
    };
    NativeElectroatomData {
        atomic_number: 6,
        energy_grid: ELECTRON_GRID.to_vec(),
        cutoff_elastic: CrossSectionData::new(CUTOFF_ELASTIC.to_vec(), 0),
        screened_rutherford_elastic: CrossSectionData::new(SCREENED_RUTHERFORD_ELASTIC.to_vec(), 2),
        atomic_excitation: CrossSectionData::new(ATOMIC_EXCITATION.to_vec(), 0),
        atomic_excitation_energy_loss: TableData::new(vec![1e-5, 1e5], vec![1e-5, 2e-5]),
        elastic_angular_energies: vec![1e-5, 1.0, 1e5],
        elastic_angles: elastic_angles(),
        elastic_pdfs: elastic_pdfs(),
        bremsstrahlung: CrossSectionData::new(BREMSSTRAHLUNG.to_vec(), 2),
        bremsstrahlung_photon_energy: bremsstrahlung_photon_energy(),
        electroionization_subshells: vec![
            shell(Subshell::K, 2.9e-4, &K_ELECTROIONIZATION),
            shell(Subshell::L1, 1.6e-5, &L1_ELECTROIONIZATION),
        ],
    }
}

pub fn ace_electroatom(epr_version: u32) -> AceElectroatomData {
    let shell = |subshell, binding_energy, cross_section: &[f64]| AceElectroionizationSubshellData {
        subshell,
        binding_energy,
        cross_section: padded(cross_section, 1),
        knock_on_energy: knock_on_energy(),
    };
    AceElectroatomData {
        atomic_number: 6,
        epr_version,
        energy_grid: ELECTRON_GRID.to_vec(),
        total_elastic_cross_section: TOTAL_ELASTIC.to_vec(),
        cutoff_elastic_cross_section: CUTOFF_ELASTIC.to_vec(),
        atomic_excitation_cross_section: ATOMIC_EXCITATION.to_vec(),
        bremsstrahlung_cross_section: padded(&BREMSSTRAHLUNG, 2),
        atomic_excitation_energy_loss: TableData::new(vec![1e-5, 1e5], vec![1e-5, 2e-5]),
        elastic_angular_energies: vec![1e-5, 1.0, 1e5],
        elastic_angles: elastic_angles(),
        elastic_pdfs: elastic_pdfs(),
        bremsstrahlung_photon_energy: bremsstrahlung_photon_energy(),
        subshells: vec![
            shell(Subshell::K, 2.9e-4, &K_ELECTROIONIZATION),
            shell(Subshell::L1, 1.6e-5, &L1_ELECTROIONIZATION),
        ],
    }
}
