use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ParticleType {
    Photon,
    Electron,
    Positron,
    AdjointElectron,
}

//=====================================================================
// The mutable record of a particle being transported. Reactions change
// it in place and spawn secondaries from it.
//=====================================================================
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleState {
    particle_type: ParticleType,
    history_number: u64,
    // MeV
    energy: f64,
    position: [f64; 3],
    direction: [f64; 3],
    cell: Option<u64>,
    collision_number: u32,
    generation_number: u32,
    weight: f64,
    gone: bool,
}

impl ParticleState {
    pub fn new(
        particle_type: ParticleType,
        history_number: u64,
        energy: f64,
        position: [f64; 3],
        direction: [f64; 3],
    ) -> Self {
        debug_assert!(is_unit_vector(&direction), "direction {:?} is not a unit vector", direction);
        Self {
            particle_type,
            history_number,
            energy,
            position,
            direction,
            cell: None,
            collision_number: 0,
            generation_number: 0,
            weight: 1.0,
            gone: false,
        }
    }

    // Create a secondary at this particle's location. It belongs to the same
    // history and is one generation further down.
    pub fn spawn_secondary(&self, particle_type: ParticleType, energy: f64, direction: [f64; 3]) -> Self {
        debug_assert!(is_unit_vector(&direction), "direction {:?} is not a unit vector", direction);
        Self {
            particle_type,
            history_number: self.history_number,
            energy,
            position: self.position,
            direction,
            cell: self.cell,
            collision_number: 0,
            generation_number: self.generation_number + 1,
            weight: self.weight,
            gone: false,
        }
    }

    pub fn particle_type(&self) -> ParticleType {
        self.particle_type
    }

    pub fn history_number(&self) -> u64 {
        self.history_number
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: f64) {
        debug_assert!(energy >= 0.0 && energy.is_finite(), "invalid energy {}", energy);
        self.energy = energy;
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    pub fn set_position(&mut self, position: [f64; 3]) {
        self.position = position;
    }

    pub fn direction(&self) -> [f64; 3] {
        self.direction
    }

    pub fn set_direction(&mut self, direction: [f64; 3]) {
        debug_assert!(is_unit_vector(&direction), "direction {:?} is not a unit vector", direction);
        self.direction = direction;
    }

    pub fn cell(&self) -> Option<u64> {
        self.cell
    }

    pub fn set_cell(&mut self, cell: u64) {
        self.cell = Some(cell);
    }

    pub fn collision_number(&self) -> u32 {
        self.collision_number
    }

    pub fn increment_collision_number(&mut self) {
        self.collision_number += 1;
    }

    pub fn generation_number(&self) -> u32 {
        self.generation_number
    }

    pub fn increment_generation_number(&mut self) {
        self.generation_number += 1;
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn is_gone(&self) -> bool {
        self.gone
    }

    pub fn set_as_gone(&mut self) {
        self.gone = true;
    }
}

fn is_unit_vector(direction: &[f64; 3]) -> bool {
    let norm = direction.iter().map(|c| c * c).sum::<f64>();
    (norm - 1.0).abs() < 1e-10
}
