use std::collections::VecDeque;

use crate::particle::{ParticleState, ParticleType};

//=====================================================================
// Queue of secondaries created while a history is simulated. The bank
// owns every particle pushed into it.
//=====================================================================
#[derive(Debug, Clone, Default)]
pub struct ParticleBank {
    queue: VecDeque<ParticleState>,
}

impl ParticleBank {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    pub fn push(&mut self, particle: ParticleState) {
        self.queue.push_back(particle);
    }

    pub fn pop(&mut self) -> Option<ParticleState> {
        self.queue.pop_front()
    }

    pub fn top(&self) -> Option<&ParticleState> {
        self.queue.front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticleState> {
        self.queue.iter()
    }

    pub fn count_of(&self, particle_type: ParticleType) -> usize {
        self.queue.iter().filter(|p| p.particle_type() == particle_type).count()
    }
}
