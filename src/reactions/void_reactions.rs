use crate::error::Result;
use crate::particle::{ParticleBank, ParticleState, Subshell};
use crate::random::RandomNumberStream;
use crate::reactions::{CrossSectionEngine, Reaction, ReactionType};

//=====================================================================
// Placeholder reactions for data that carries a cross section but no
// secondary distribution.
//=====================================================================

// Contributes a cross section but leaves the particle untouched
#[derive(Debug, Clone)]
pub struct VoidReaction {
    reaction_type: ReactionType,
    engine: CrossSectionEngine,
}

impl VoidReaction {
    pub fn new(reaction_type: ReactionType, engine: CrossSectionEngine) -> Self {
        Self { reaction_type, engine }
    }
}

impl Reaction for VoidReaction {
    fn reaction_type(&self) -> ReactionType {
        self.reaction_type
    }

    fn engine(&self) -> &CrossSectionEngine {
        &self.engine
    }

    fn react(
        &self,
        _particle: &mut ParticleState,
        _bank: &mut ParticleBank,
        _rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        Ok(Subshell::Invalid)
    }
}

// Ends the particle's history
#[derive(Debug, Clone)]
pub struct AbsorptionReaction {
    reaction_type: ReactionType,
    engine: CrossSectionEngine,
}

impl AbsorptionReaction {
    pub fn new(reaction_type: ReactionType, engine: CrossSectionEngine) -> Self {
        Self { reaction_type, engine }
    }
}

impl Reaction for AbsorptionReaction {
    fn reaction_type(&self) -> ReactionType {
        self.reaction_type
    }

    fn engine(&self) -> &CrossSectionEngine {
        &self.engine
    }

    fn react(
        &self,
        particle: &mut ParticleState,
        _bank: &mut ParticleBank,
        _rng: &mut dyn RandomNumberStream,
    ) -> Result<Subshell> {
        particle.set_as_gone();
        Ok(Subshell::Invalid)
    }
}
