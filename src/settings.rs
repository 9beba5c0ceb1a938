use strum_macros::{Display, EnumIter};

use crate::error::{CollisionError, Result};

//=====================================================================
// Options which pick between the interchangeable physics models.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum IncoherentModel {
    WallerHartree,
    ImpulseApproximation,
}

// Pair and triplet production interaction models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum InteractionModel {
    Basic,
    Detailed,
}

// How tabulated elastic data is interpolated between incoming energies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TwoDInterpolation {
    LinLinLin,
    LinLinLog,
    LogLogLog,
}

// How the coupled (cutoff + screened Rutherford) elastic distribution is
// sampled between tabulated incoming energies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum CoupledElasticSamplingMethod {
    OneDUnion,
    TwoDUnion,
    ModifiedTwoDUnion,
}

// Which elastic reaction an electroatom is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ElasticModel {
    // Coupled cutoff table and screened Rutherford tail
    Analog,
    // Cutoff and screened Rutherford parts chosen by cross section weight
    Joint,
    // Scattering below the cutoff cosine only
    Cutoff,
}

// Lightweight keeps the cheap range checks only. Full also asserts the
// per-call preconditions (bin brackets, random number range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ValidationLevel {
    Lightweight,
    Full,
}

impl ValidationLevel {
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        matches!(self, ValidationLevel::Full)
    }
}

impl Default for ValidationLevel {
    fn default() -> Self {
        if cfg!(any(debug_assertions, feature = "strict-checks")) {
            ValidationLevel::Full
        } else {
            ValidationLevel::Lightweight
        }
    }
}

//=====================================================================
// Settings handed to the reaction factories.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionSettings {
    pub incoherent_model: IncoherentModel,
    pub pair_production_model: InteractionModel,
    pub triplet_production_model: InteractionModel,
    pub elastic_model: ElasticModel,
    pub elastic_interpolation: TwoDInterpolation,
    pub elastic_sampling: CoupledElasticSamplingMethod,
    pub elastic_cutoff_angle_cosine: f64,
    // None lets rejection loops run until they accept
    pub max_rejection_trials: Option<u64>,
    pub validation: ValidationLevel,
}

pub const DEFAULT_ELASTIC_CUTOFF_ANGLE_COSINE: f64 = 0.999999;
pub const DEFAULT_MAX_REJECTION_TRIALS: u64 = 1_000_000;

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            incoherent_model: IncoherentModel::WallerHartree,
            pair_production_model: InteractionModel::Basic,
            triplet_production_model: InteractionModel::Basic,
            elastic_model: ElasticModel::Analog,
            elastic_interpolation: TwoDInterpolation::LogLogLog,
            elastic_sampling: CoupledElasticSamplingMethod::TwoDUnion,
            elastic_cutoff_angle_cosine: DEFAULT_ELASTIC_CUTOFF_ANGLE_COSINE,
            max_rejection_trials: Some(DEFAULT_MAX_REJECTION_TRIALS),
            validation: ValidationLevel::default(),
        }
    }
}

impl CollisionSettings {
    pub fn validate(&self) -> Result<()> {
        let mu = self.elastic_cutoff_angle_cosine;
        if !(mu > -1.0 && mu < 1.0) {
            return Err(CollisionError::configuration(format!(
                "elastic cutoff angle cosine must be in (-1, 1), got {}",
                mu
            )));
        }
        if self.max_rejection_trials == Some(0) {
            return Err(CollisionError::configuration(
                "the rejection trial cap must be positive",
            ));
        }
        Ok(())
    }
}
