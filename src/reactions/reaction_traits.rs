use std::fmt::Debug;

use crate::error::{CollisionError, Result};
use crate::particle::{ParticleBank, ParticleState, Subshell};
use crate::random::RandomNumberStream;
use crate::reactions::{CrossSectionEngine, ReactionType};

//=====================================================================
// The interface the transport loop sees. Reactions are immutable after
// construction and only ever change the particle, the bank and the
// random number stream they are handed.
//=====================================================================
pub trait Reaction: Debug + Send + Sync {
    fn reaction_type(&self) -> ReactionType;

    fn engine(&self) -> &CrossSectionEngine;

    // Zero outside of the energy grid
    fn cross_section(&self, energy: f64) -> f64 {
        self.engine().cross_section(energy)
    }

    fn try_cross_section(&self, energy: f64) -> Result<f64> {
        self.engine().try_cross_section(energy)
    }

    fn cross_section_in_bin(&self, energy: f64, bin_index: usize) -> f64 {
        self.engine().cross_section_in_bin(energy, bin_index)
    }

    fn threshold_energy(&self) -> f64 {
        self.engine().threshold_energy()
    }

    fn max_energy(&self) -> f64 {
        self.engine().max_energy()
    }

    fn is_energy_within_energy_grid(&self, energy: f64) -> bool {
        self.engine().is_energy_within_energy_grid(energy)
    }

    fn number_of_emitted_photons(&self, _energy: f64) -> u32 {
        0
    }

    fn number_of_emitted_electrons(&self, _energy: f64) -> u32 {
        0
    }

    fn number_of_emitted_positrons(&self, _energy: f64) -> u32 {
        0
    }

    // Collide the particle. Returns the shell that took part, or
    // `Subshell::Invalid`.
    fn react(
        &self,
        particle: &mut ParticleState,
        bank: &mut ParticleBank,
        rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell>;

    // `count` at or above the threshold, nothing below it
    fn emitted_above_threshold(&self, energy: f64, count: u32) -> u32 {
        if energy >= self.threshold_energy() { count } else { 0 }
    }

    fn check_incoming_energy(&self, particle: &ParticleState) -> Result<()> {
        let energy = particle.energy();
        let threshold = self.threshold_energy();
        if energy < threshold {
            return Err(CollisionError::OutOfBounds {
                value: energy,
                lower: threshold,
                upper: self.max_energy(),
            });
        }
        Ok(())
    }
}
