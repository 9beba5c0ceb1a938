use crate::utils::physical_constants::ELECTRON_REST_MASS_ENERGY;

//====================================================================
// Assorted helper functions.
//====================================================================

// (p c)^2 of an electron or positron with the given kinetic energy
#[inline]
pub fn electron_momentum_squared(kinetic_energy: f64) -> f64 {
    kinetic_energy * (kinetic_energy + 2.0 * ELECTRON_REST_MASS_ENERGY)
}

// (v / c)^2 of an electron or positron with the given kinetic energy
#[inline]
pub fn electron_speed_squared(kinetic_energy: f64) -> f64 {
    let total_energy = kinetic_energy + ELECTRON_REST_MASS_ENERGY;
    electron_momentum_squared(kinetic_energy) / (total_energy * total_energy)
}

// Composite Simpson rule over [lower, upper] with `intervals` (rounded up to
// an even number) sub-intervals
pub fn integrate_simpson<F: Fn(f64) -> f64>(f: F, lower: f64, upper: f64, intervals: usize) -> f64 {
    if upper <= lower {
        return 0.0;
    }
    let n = (intervals.max(2) + 1) & !1;
    let h = (upper - lower) / n as f64;
    let interior: f64 = (1..n)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(lower + i as f64 * h)
        })
        .sum();
    (f(lower) + interior + f(upper)) * h / 3.0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_electron_kinematics() {
        let me = ELECTRON_REST_MASS_ENERGY;
        assert_relative_eq!(electron_momentum_squared(me), 3.0 * me * me, max_relative = 1e-15);
        assert_relative_eq!(electron_speed_squared(me), 0.75, max_relative = 1e-15);
        assert_eq!(electron_speed_squared(0.0), 0.0);
        assert!(electron_speed_squared(1e5) < 1.0);
    }

    #[test]
    fn test_integrate_simpson() {
        // Exact for cubics
        let result = integrate_simpson(|x| x * x * x - x, -1.0, 2.0, 4);
        assert_relative_eq!(result, 2.25, max_relative = 1e-14);
        let result = integrate_simpson(f64::sin, 0.0, std::f64::consts::PI, 1000);
        assert_relative_eq!(result, 2.0, max_relative = 1e-10);
        assert_eq!(integrate_simpson(|x| x, 1.0, 1.0, 10), 0.0);
        // Odd interval counts are bumped up
        let result = integrate_simpson(|x| x * x, 0.0, 3.0, 3);
        assert_relative_eq!(result, 9.0, max_relative = 1e-14);
    }
}
