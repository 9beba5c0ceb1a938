use std::f64::consts::PI;

use crate::distributions::RejectionLimit;
use crate::error::Result;
use crate::particle::rotate_direction_with_azimuth;
use crate::random::RandomNumberStream;
use crate::utils::physical_constants::{
    BARNS_PER_SQUARE_CM, CLASSICAL_ELECTRON_RADIUS, ELECTRON_REST_MASS_ENERGY, FINE_STRUCTURE_CONSTANT,
    PLANCK_CONSTANT_TIMES_SPEED_OF_LIGHT,
};
use crate::utils::{electron_momentum_squared, electron_speed_squared};

//=====================================================================
// Photon kinematics shared by the coherent and incoherent distributions.
//=====================================================================

// Energy of a photon Compton scattered off a free electron at rest
#[inline]
pub fn compton_line_energy(incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
    incoming_energy
        / (1.0 + incoming_energy / ELECTRON_REST_MASS_ENERGY * (1.0 - scattering_angle_cosine))
}

// Momentum transfer x = sin(theta/2) / lambda, in inverse cm
#[inline]
pub fn momentum_transfer(incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
    incoming_energy / PLANCK_CONSTANT_TIMES_SPEED_OF_LIGHT * ((1.0 - scattering_angle_cosine) / 2.0).max(0.0).sqrt()
}

// Momentum transfer at back scattering
#[inline]
pub fn max_momentum_transfer(incoming_energy: f64) -> f64 {
    incoming_energy / PLANCK_CONSTANT_TIMES_SPEED_OF_LIGHT
}

// Klein-Nishina d(sigma)/d(mu) in barns
pub fn klein_nishina_differential(incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
    let ratio = compton_line_energy(incoming_energy, scattering_angle_cosine) / incoming_energy;
    let mu = scattering_angle_cosine;
    PI * CLASSICAL_ELECTRON_RADIUS * CLASSICAL_ELECTRON_RADIUS * BARNS_PER_SQUARE_CM
        * ratio
        * ratio
        * (ratio + 1.0 / ratio - 1.0 + mu * mu)
}

// Thomson d(sigma)/d(mu) in barns
pub fn thomson_differential(scattering_angle_cosine: f64) -> f64 {
    let mu = scattering_angle_cosine;
    PI * CLASSICAL_ELECTRON_RADIUS * CLASSICAL_ELECTRON_RADIUS * BARNS_PER_SQUARE_CM * (1.0 + mu * mu)
}

// Kahn's rejection scheme for the Klein-Nishina distribution. Returns
// (outgoing energy, scattering angle cosine).
pub fn sample_klein_nishina(
    incoming_energy: f64,
    rng: &mut dyn RandomNumberStream,
    limit: &RejectionLimit,
    attempts: &mut u64,
    trials: &mut u64,
) -> Result<(f64, f64)> {
    let alpha = incoming_energy / ELECTRON_REST_MASS_ENERGY;
    let branching_ratio = (1.0 + 2.0 * alpha) / (9.0 + 2.0 * alpha);

    loop {
        limit.record_attempt(attempts, trials)?;
        let branch = rng.random_number();
        let shape = rng.random_number();
        let accept = rng.random_number();

        // x = E / E'
        let (x, accepted) = if branch <= branching_ratio {
            let x = 1.0 + 2.0 * alpha * shape;
            (x, accept <= 4.0 * (1.0 / x - 1.0 / (x * x)))
        } else {
            let x = (1.0 + 2.0 * alpha) / (1.0 + 2.0 * alpha * shape);
            let mu = 1.0 - (x - 1.0) / alpha;
            (x, accept <= 0.5 * (mu * mu + 1.0 / x))
        };

        if accepted {
            let mu = (1.0 - (x - 1.0) / alpha).clamp(-1.0, 1.0);
            return Ok((incoming_energy / x, mu));
        }
    }
}

// Direction of the electron recoiling from a Compton scattered photon.
// `photon_azimuth` is the azimuth used to rotate the photon.
pub fn compton_electron_direction(
    incoming_direction: [f64; 3],
    incoming_energy: f64,
    outgoing_energy: f64,
    scattering_angle_cosine: f64,
    photon_azimuth: f64,
) -> [f64; 3] {
    let momentum = (incoming_energy * incoming_energy + outgoing_energy * outgoing_energy
        - 2.0 * incoming_energy * outgoing_energy * scattering_angle_cosine)
        .max(0.0)
        .sqrt();
    let electron_mu = if momentum > 0.0 {
        ((incoming_energy - outgoing_energy * scattering_angle_cosine) / momentum).clamp(-1.0, 1.0)
    } else {
        1.0
    };
    rotate_direction_with_azimuth(incoming_direction, electron_mu, photon_azimuth + PI)
}

// Largest projection of the bound electron momentum that still lets the
// photon scatter at this angle (units of m_e c)
pub fn max_electron_momentum_projection(
    incoming_energy: f64,
    binding_energy: f64,
    scattering_angle_cosine: f64,
) -> f64 {
    let me = ELECTRON_REST_MASS_ENERGY;
    let transfer = incoming_energy * (incoming_energy - binding_energy) * (1.0 - scattering_angle_cosine);
    let denominator = me * (2.0 * transfer + binding_energy * binding_energy).sqrt();
    if denominator > 0.0 {
        (transfer - me * binding_energy) / denominator
    } else {
        f64::NEG_INFINITY
    }
}

//=====================================================================
// Electron kinematics.
//=====================================================================

// Moliere's screening constant for an electron of the given kinetic
// energy moving through atoms of charge Z
pub fn moliere_screening_constant(kinetic_energy: f64, atomic_number: u32) -> f64 {
    let z = atomic_number as f64;
    let alpha = FINE_STRUCTURE_CONSTANT;
    let me = ELECTRON_REST_MASS_ENERGY;
    let screening = 1.13 + 3.76 * (alpha * z).powi(2) / electron_speed_squared(kinetic_energy);
    alpha * alpha * z.powf(2.0 / 3.0) / (4.0 * 0.885 * 0.885) * me * me
        / electron_momentum_squared(kinetic_energy)
        * screening
}

// Scattering angle cosine of an electron leaving a free-electron
// collision with `outgoing_energy` out of `incoming_energy`
#[inline]
pub fn knock_on_angle_cosine(incoming_energy: f64, outgoing_energy: f64) -> f64 {
    let me = ELECTRON_REST_MASS_ENERGY;
    if !(incoming_energy > 0.0) {
        return 1.0;
    }
    (outgoing_energy / incoming_energy * (incoming_energy + 2.0 * me) / (outgoing_energy + 2.0 * me))
        .clamp(0.0, 1.0)
        .sqrt()
}

// Energy that `knock_on_angle_cosine` maps onto `mu`, and its derivative
// with respect to `mu`
pub fn knock_on_energy_at_cosine(incoming_energy: f64, mu: f64) -> (f64, f64) {
    let tau = incoming_energy / ELECTRON_REST_MASS_ENERGY;
    let denominator = tau * (1.0 - mu * mu) + 2.0;
    let energy = incoming_energy * 2.0 * mu * mu / denominator;
    let derivative = incoming_energy * 4.0 * mu * (tau + 2.0) / (denominator * denominator);
    (energy, derivative)
}

// Dipole law of a bremsstrahlung photon emitted by an electron with the
// given kinetic energy
pub fn dipole_pdf(kinetic_energy: f64, mu: f64) -> f64 {
    if !(-1.0..=1.0).contains(&mu) {
        return 0.0;
    }
    let beta = electron_speed_squared(kinetic_energy).sqrt();
    (1.0 - beta * beta) / (2.0 * (1.0 - beta * mu).powi(2))
}

pub fn dipole_cdf(kinetic_energy: f64, mu: f64) -> f64 {
    let mu = mu.clamp(-1.0, 1.0);
    let beta = electron_speed_squared(kinetic_energy).sqrt();
    if beta == 0.0 {
        return (mu + 1.0) / 2.0;
    }
    ((1.0 - beta * beta) / (2.0 * beta) * (1.0 / (1.0 - beta * mu) - 1.0 / (1.0 + beta))).clamp(0.0, 1.0)
}

// Polar angle cosine of a pair-produced lepton (Sauter/Heitler leading
// order law) for a random number xi. Inverts `dipole_cdf`, so it also
// samples bremsstrahlung photon directions.
#[inline]
pub fn sample_lepton_polar_angle(kinetic_energy: f64, xi: f64) -> f64 {
    let beta = electron_speed_squared(kinetic_energy).sqrt();
    let u = 2.0 * xi - 1.0;
    ((u + beta) / (u * beta + 1.0)).clamp(-1.0, 1.0)
}

// Positron polar angle cosine that balances the electron's momentum
// transverse to the photon. The positron leaves at the opposite azimuth.
pub fn coupled_positron_polar_angle(electron_energy: f64, electron_mu: f64, positron_energy: f64) -> f64 {
    let positron_momentum = electron_momentum_squared(positron_energy).sqrt();
    if !(positron_momentum > 0.0) {
        return 1.0;
    }
    let electron_sin = (1.0 - electron_mu * electron_mu).max(0.0).sqrt();
    let transverse = electron_momentum_squared(electron_energy).sqrt() * electron_sin;
    let positron_sin = (transverse / positron_momentum).min(1.0);
    (1.0 - positron_sin * positron_sin).sqrt()
}
