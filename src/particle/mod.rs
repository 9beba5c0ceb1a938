mod direction;
mod particle_bank;
mod particle_state;
mod subshell;

pub use direction::{isotropic_direction, rotate_direction, rotate_direction_with_azimuth};
pub use particle_bank::ParticleBank;
pub use particle_state::{ParticleState, ParticleType};
pub use subshell::Subshell;
