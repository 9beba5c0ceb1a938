use std::f64::consts::PI;

use crate::distributions::kinematics::{
    compton_electron_direction, klein_nishina_differential, max_electron_momentum_projection,
    momentum_transfer, sample_klein_nishina,
};
use crate::distributions::{PhotonScatteringDistribution, RejectionLimit, ScatteringDistribution};
use crate::error::{CollisionError, Result};
use crate::interpolation::TabulatedFunction;
use crate::particle::{
    ParticleBank, ParticleState, ParticleType, Subshell, rotate_direction_with_azimuth,
};
use crate::random::RandomNumberStream;

// Move the photon to its outgoing state and bank the recoil electron
fn apply_compton_kinematics(
    photon: &mut ParticleState,
    bank: &mut ParticleBank,
    rng: &mut dyn RandomNumberStream,
    outgoing_energy: f64,
    scattering_angle_cosine: f64,
    electron_energy: f64,
) {
    let incoming_energy = photon.energy();
    let incoming_direction = photon.direction();
    let azimuth = 2.0 * PI * rng.random_number();

    if electron_energy > 0.0 {
        let electron_direction = compton_electron_direction(
            incoming_direction,
            incoming_energy,
            outgoing_energy,
            scattering_angle_cosine,
            azimuth,
        );
        bank.push(photon.spawn_secondary(ParticleType::Electron, electron_energy, electron_direction));
    }

    photon.set_energy(outgoing_energy);
    photon.set_direction(rotate_direction_with_azimuth(
        incoming_direction,
        scattering_angle_cosine,
        azimuth,
    ));
}

//=====================================================================
// Waller-Hartree incoherent scattering: Klein-Nishina corrected by the
// atomic scattering function S(x).
//=====================================================================
#[derive(Debug, Clone)]
pub struct WallerHartreeIncoherentDistribution {
    scattering_function: TabulatedFunction,
    // S(x) at large x, the number of electrons of the atom
    max_scattering_function: f64,
    limit: RejectionLimit,
}

impl WallerHartreeIncoherentDistribution {
    pub fn new(scattering_function: TabulatedFunction, max_trials: Option<u64>) -> Result<Self> {
        let max_scattering_function = scattering_function
            .y()
            .iter()
            .copied()
            .fold(0.0, f64::max);
        if !(max_scattering_function > 0.0) {
            return Err(CollisionError::configuration(
                "WallerHartreeIncoherentDistribution: the scattering function is zero everywhere",
            ));
        }
        Ok(Self {
            scattering_function,
            max_scattering_function,
            limit: RejectionLimit::new("Waller-Hartree incoherent scattering", max_trials),
        })
    }

    pub fn scattering_function(&self) -> &TabulatedFunction {
        &self.scattering_function
    }

    fn scattering_function_value(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        self.scattering_function
            .evaluate_clamped(momentum_transfer(incoming_energy, scattering_angle_cosine))
    }
}

impl ScatteringDistribution for WallerHartreeIncoherentDistribution {
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if !(-1.0..=1.0).contains(&scattering_angle_cosine) {
            return 0.0;
        }
        klein_nishina_differential(incoming_energy, scattering_angle_cosine)
            * self.scattering_function_value(incoming_energy, scattering_angle_cosine)
    }

    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)> {
        let mut attempts = 0;
        loop {
            let (outgoing_energy, mu) =
                sample_klein_nishina(incoming_energy, rng, &self.limit, &mut attempts, trials)?;
            let threshold = self.scattering_function_value(incoming_energy, mu);
            if rng.random_number() * self.max_scattering_function <= threshold {
                return Ok((outgoing_energy, mu));
            }
        }
    }
}

impl PhotonScatteringDistribution for WallerHartreeIncoherentDistribution {
    fn scatter_photon(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        let incoming_energy = photon.energy();
        let (outgoing_energy, mu) = self.sample(incoming_energy, rng)?;
        apply_compton_kinematics(photon, bank, rng, outgoing_energy, mu, incoming_energy - outgoing_energy);
        Ok(Subshell::Invalid)
    }

    fn number_of_emitted_electrons(&self) -> u32 {
        1
    }
}

//=====================================================================
// Incoherent scattering off a single subshell in the impulse
// approximation. The occupation number n(pz) is the cumulative
// distribution of the shell's Compton profile over pz in [-1, 1]
// (units of m_e c).
//=====================================================================
#[derive(Debug, Clone)]
pub struct SubshellIncoherentDistribution {
    subshell: Subshell,
    binding_energy: f64,
    occupancy: f64,
    occupation_number: TabulatedFunction,
    limit: RejectionLimit,
}

impl SubshellIncoherentDistribution {
    pub fn new(
        subshell: Subshell,
        binding_energy: f64,
        occupancy: f64,
        occupation_number: TabulatedFunction,
        max_trials: Option<u64>,
    ) -> Result<Self> {
        if !subshell.is_valid() {
            return Err(CollisionError::configuration(
                "SubshellIncoherentDistribution: a valid subshell is required",
            ));
        }
        if !(binding_energy >= 0.0) || !(occupancy > 0.0) {
            return Err(CollisionError::configuration(format!(
                "SubshellIncoherentDistribution: invalid binding energy ({}) or occupancy ({}) for {}",
                binding_energy, occupancy, subshell
            )));
        }
        Ok(Self {
            subshell,
            binding_energy,
            occupancy,
            occupation_number,
            limit: RejectionLimit::new("subshell incoherent scattering", max_trials),
        })
    }

    pub fn subshell(&self) -> Subshell {
        self.subshell
    }

    pub fn binding_energy(&self) -> f64 {
        self.binding_energy
    }

    pub fn occupancy(&self) -> f64 {
        self.occupancy
    }

    fn occupation_number_value(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        let pz_max =
            max_electron_momentum_projection(incoming_energy, self.binding_energy, scattering_angle_cosine);
        self.occupation_number.evaluate_clamped(pz_max)
    }
}

impl ScatteringDistribution for SubshellIncoherentDistribution {
    fn evaluate(&self, incoming_energy: f64, scattering_angle_cosine: f64) -> f64 {
        if incoming_energy <= self.binding_energy || !(-1.0..=1.0).contains(&scattering_angle_cosine) {
            return 0.0;
        }
        klein_nishina_differential(incoming_energy, scattering_angle_cosine)
            * self.occupancy
            * self.occupation_number_value(incoming_energy, scattering_angle_cosine)
    }

    fn sample_and_record_trials(
        &self,
        incoming_energy: f64,
        rng: &mut dyn RandomNumberStream,
        trials: &mut u64,
    ) -> Result<(f64, f64)> {
        if incoming_energy <= self.binding_energy {
            return Err(CollisionError::OutOfBounds {
                value: incoming_energy,
                lower: self.binding_energy,
                upper: f64::INFINITY,
            });
        }
        let mut attempts = 0;
        loop {
            let (outgoing_energy, mu) =
                sample_klein_nishina(incoming_energy, rng, &self.limit, &mut attempts, trials)?;
            // Not enough energy transferred to free the electron
            if incoming_energy - outgoing_energy < self.binding_energy {
                continue;
            }
            if rng.random_number() <= self.occupation_number_value(incoming_energy, mu) {
                return Ok((outgoing_energy, mu));
            }
        }
    }
}

impl PhotonScatteringDistribution for SubshellIncoherentDistribution {
    fn scatter_photon(
        &self,
        photon: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        let incoming_energy = photon.energy();
        let (outgoing_energy, mu) = self.sample(incoming_energy, rng)?;
        let electron_energy = incoming_energy - outgoing_energy - self.binding_energy;
        apply_compton_kinematics(photon, bank, rng, outgoing_energy, mu, electron_energy);
        Ok(self.subshell)
    }

    fn number_of_emitted_electrons(&self) -> u32 {
        1
    }
}
