use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

// Source of random numbers in [0, 1) consumed by every sampling routine.
// Streams are owned by the caller (one per history or thread), never by a
// reaction or distribution.
pub trait RandomNumberStream {
    fn random_number(&mut self) -> f64;
}

// Wraps any `rand` generator
#[derive(Debug, Clone)]
pub struct RngStream<R: RngCore> {
    rng: R,
}

impl<R: RngCore> RngStream<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngStream<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RandomNumberStream for RngStream<R> {
    #[inline]
    fn random_number(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}
