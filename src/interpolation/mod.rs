mod interpolation_policy;
mod tabulated_function;

pub use interpolation_policy::{InterpolationPolicy, Processing};
pub use tabulated_function::{TabularDistribution, TabulatedFunction};
