use std::fmt;

use strum_macros::EnumIter;

use crate::particle::{ParticleType, Subshell};

//=====================================================================
// Every reaction a photoatom or electroatom can undergo.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum ReactionType {
    // Photoatomic
    Coherent,
    TotalIncoherent,
    SubshellIncoherent(Subshell),
    TotalPhotoelectric,
    SubshellPhotoelectric(Subshell),
    PairProduction,
    TripletProduction,
    PhotoatomicHeating,
    TotalPhotoatomicAbsorption,
    // Electroatomic
    AnalogElastic,
    CutoffElastic,
    ScreenedRutherfordElastic,
    JointElastic,
    AtomicExcitation,
    Bremsstrahlung,
    ElectroionizationSubshell(Subshell),
    TotalElectroatomicAbsorption,
}

impl ReactionType {
    pub fn incoming_particle(&self) -> ParticleType {
        match self {
            ReactionType::Coherent
            | ReactionType::TotalIncoherent
            | ReactionType::SubshellIncoherent(_)
            | ReactionType::TotalPhotoelectric
            | ReactionType::SubshellPhotoelectric(_)
            | ReactionType::PairProduction
            | ReactionType::TripletProduction
            | ReactionType::PhotoatomicHeating
            | ReactionType::TotalPhotoatomicAbsorption => ParticleType::Photon,
            ReactionType::AnalogElastic
            | ReactionType::CutoffElastic
            | ReactionType::ScreenedRutherfordElastic
            | ReactionType::JointElastic
            | ReactionType::AtomicExcitation
            | ReactionType::Bremsstrahlung
            | ReactionType::ElectroionizationSubshell(_)
            | ReactionType::TotalElectroatomicAbsorption => ParticleType::Electron,
        }
    }

    // The shell a subshell reaction is tied to
    pub fn subshell(&self) -> Option<Subshell> {
        match self {
            ReactionType::SubshellIncoherent(shell)
            | ReactionType::SubshellPhotoelectric(shell)
            | ReactionType::ElectroionizationSubshell(shell) => Some(*shell),
            _ => None,
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionType::Coherent => write!(f, "Coherent"),
            ReactionType::TotalIncoherent => write!(f, "Total Incoherent"),
            ReactionType::SubshellIncoherent(shell) => write!(f, "{} Subshell Incoherent", shell),
            ReactionType::TotalPhotoelectric => write!(f, "Total Photoelectric"),
            ReactionType::SubshellPhotoelectric(shell) => write!(f, "{} Subshell Photoelectric", shell),
            ReactionType::PairProduction => write!(f, "Pair Production"),
            ReactionType::TripletProduction => write!(f, "Triplet Production"),
            ReactionType::PhotoatomicHeating => write!(f, "Photoatomic Heating"),
            ReactionType::TotalPhotoatomicAbsorption => write!(f, "Total Photoatomic Absorption"),
            ReactionType::AnalogElastic => write!(f, "Analog Elastic"),
            ReactionType::CutoffElastic => write!(f, "Cutoff Elastic"),
            ReactionType::ScreenedRutherfordElastic => write!(f, "Screened Rutherford Elastic"),
            ReactionType::JointElastic => write!(f, "Joint Elastic"),
            ReactionType::AtomicExcitation => write!(f, "Atomic Excitation"),
            ReactionType::Bremsstrahlung => write!(f, "Bremsstrahlung"),
            ReactionType::ElectroionizationSubshell(shell) => write!(f, "{} Subshell Electroionization", shell),
            ReactionType::TotalElectroatomicAbsorption => write!(f, "Total Electroatomic Absorption"),
        }
    }
}
