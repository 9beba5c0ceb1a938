mod cross_section_engine;
mod electroatomic_reactions;
mod photoatomic_reactions;
mod reaction_traits;
mod reaction_type;
mod void_reactions;

pub use cross_section_engine::{CrossSectionEngine, CrossSectionTable};
pub(crate) use electroatomic_reactions::sum_cross_sections;
pub use electroatomic_reactions::{
    AnalogElasticReaction, AtomicExcitationReaction, BremsstrahlungReaction, CutoffElasticReaction,
    ElectroionizationSubshellReaction, ElectronScatteringReaction, JointElasticReaction,
    ScreenedRutherfordElasticReaction,
};
pub use photoatomic_reactions::{
    CoherentReaction, IncoherentReaction, PairProductionReaction, PhotoelectricReaction, PhotonScatteringReaction,
    SubshellIncoherentReaction, TripletProductionReaction,
};
pub use reaction_traits::Reaction;
pub use reaction_type::ReactionType;
pub use void_reactions::{AbsorptionReaction, VoidReaction};
