pub mod distributions;
pub mod error;
pub mod factory;
pub mod grid;
pub mod interpolation;
pub mod particle;
pub mod random;
pub mod reactions;
pub mod settings;
mod utils;

pub use error::{CollisionError, Result};
pub use factory::{Electroatom, Photoatom, ReactionSet};
pub use particle::{ParticleBank, ParticleState, ParticleType, Subshell};
pub use random::{RandomNumberStream, RngStream};
pub use reactions::{CrossSectionEngine, Reaction, ReactionType};
pub use settings::CollisionSettings;

pub use utils::physical_constants;
