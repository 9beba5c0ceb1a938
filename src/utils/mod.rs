mod helper_functions;
pub mod physical_constants;
#[cfg(test)]
pub mod testing;

pub use helper_functions::{electron_momentum_squared, electron_speed_squared, integrate_simpson};
