use std::f64::consts::PI;

use crate::random::RandomNumberStream;

// Rotate a unit direction by a polar angle cosine `mu` and azimuth `phi`
pub fn rotate_direction_with_azimuth(direction: [f64; 3], mu: f64, phi: f64) -> [f64; 3] {
    let mu = mu.clamp(-1.0, 1.0);
    let [u, v, w] = direction;
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();
    let cos_phi = phi.cos();
    let sin_phi = phi.sin();

    let rotated = if w.abs() < 0.999 {
        let b = (1.0 - w * w).sqrt();
        let factor = sin_theta / b;
        [
            mu * u + factor * (u * w * cos_phi - v * sin_phi),
            mu * v + factor * (v * w * cos_phi + u * sin_phi),
            mu * w - sin_theta * b * cos_phi,
        ]
    } else {
        // Nearly parallel to z, rotate about the x axis instead
        let b = (1.0 - u * u).sqrt();
        let factor = sin_theta / b;
        [
            mu * u - sin_theta * b * cos_phi,
            mu * v + factor * (u * v * cos_phi + w * sin_phi),
            mu * w + factor * (u * w * cos_phi - v * sin_phi),
        ]
    };
    normalize(rotated)
}

// Rotate with a uniformly sampled azimuth
pub fn rotate_direction(direction: [f64; 3], mu: f64, rng: &mut dyn RandomNumberStream) -> [f64; 3] {
    let phi = 2.0 * PI * rng.random_number();
    rotate_direction_with_azimuth(direction, mu, phi)
}

pub fn isotropic_direction(rng: &mut dyn RandomNumberStream) -> [f64; 3] {
    let mu = 2.0 * rng.random_number() - 1.0;
    let phi = 2.0 * PI * rng.random_number();
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();
    normalize([sin_theta * phi.cos(), sin_theta * phi.sin(), mu])
}

fn normalize(direction: [f64; 3]) -> [f64; 3] {
    let norm = direction.iter().map(|c| c * c).sum::<f64>().sqrt();
    [direction[0] / norm, direction[1] / norm, direction[2] / norm]
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::random::FakeStream;

    fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn test_rotation_preserves_polar_angle() {
        let directions = [
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
            [1.0, 0.0, 0.0],
            [0.6, 0.0, 0.8],
            [1.0 / 3f64.sqrt(), 1.0 / 3f64.sqrt(), 1.0 / 3f64.sqrt()],
        ];
        for direction in directions {
            for mu in [-1.0, -0.3, 0.0, 0.5, 0.999999, 1.0] {
                for phi in [0.0, 1.0, 3.0, 5.5] {
                    let rotated = rotate_direction_with_azimuth(direction, mu, phi);
                    assert_abs_diff_eq!(dot(rotated, rotated), 1.0, epsilon = 1e-12);
                    assert_abs_diff_eq!(dot(rotated, direction), mu, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_opposite_azimuths() {
        // phi and phi + pi land on opposite sides of the original direction
        let direction = [0.0, 0.0, 1.0];
        let a = rotate_direction_with_azimuth(direction, 0.5, 0.3);
        let b = rotate_direction_with_azimuth(direction, 0.5, 0.3 + PI);
        assert_abs_diff_eq!(a[0], -b[0], epsilon = 1e-12);
        assert_abs_diff_eq!(a[1], -b[1], epsilon = 1e-12);
        assert_abs_diff_eq!(a[2], b[2], epsilon = 1e-12);
    }

    #[test]
    fn test_isotropic_direction() {
        let mut rng = FakeStream::new(vec![0.0, 0.25, 0.5, 0.0, 1.0, 0.5]);
        let direction = isotropic_direction(&mut rng);
        assert_abs_diff_eq!(direction[2], -1.0, epsilon = 1e-12);
        let direction = isotropic_direction(&mut rng);
        assert_abs_diff_eq!(direction[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(direction[2], 0.0, epsilon = 1e-12);
        let direction = isotropic_direction(&mut rng);
        assert_abs_diff_eq!(direction[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_direction_uses_one_random_number() {
        let mut rng = FakeStream::new(vec![0.25]);
        let rotated = rotate_direction([0.0, 0.0, 1.0], 0.0, &mut rng);
        assert_eq!(rng.remaining(), 0);
        assert_abs_diff_eq!(rotated[2], 0.0, epsilon = 1e-12);
    }
}
