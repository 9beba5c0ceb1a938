mod atomic_excitation;
mod bremsstrahlung;
mod coherent;
mod distribution_traits;
pub mod elastic;
mod electroionization;
mod incoherent;
pub mod kinematics;
mod pair_production;
mod secondary_energy;
mod triplet_production;

pub use atomic_excitation::AtomicExcitationDistribution;
pub use bremsstrahlung::BremsstrahlungDistribution;
pub use coherent::CoherentScatteringDistribution;
pub use distribution_traits::{
    ElectronScatteringDistribution, PhotonScatteringDistribution, RejectionLimit, ScatteringDistribution,
};
pub(crate) use distribution_traits::checked_random_number;
pub use elastic::{
    AnalogElasticDistribution, CutoffElasticDistribution, ElasticAngularBin, ElasticAngularTable,
    ScreenedRutherfordElasticDistribution,
};
pub use electroionization::ElectroionizationSubshellDistribution;
pub use incoherent::{SubshellIncoherentDistribution, WallerHartreeIncoherentDistribution};
pub use pair_production::{EnergySharingTable, PAIR_PRODUCTION_THRESHOLD, PairProductionDistribution};
pub use secondary_energy::SecondaryEnergyTable;
pub use triplet_production::{TRIPLET_PRODUCTION_THRESHOLD, TripletProductionDistribution};
