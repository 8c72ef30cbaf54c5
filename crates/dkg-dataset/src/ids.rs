use rand::{RngCore, SeedableRng, rngs::StdRng};
use uuid::Uuid;

/// Source of identifiers for generated nodes.
pub trait IdGenerator: Send {
    fn next_uuid(&mut self) -> Uuid;
}

/// Random v4 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic v4-shaped identifiers from a fixed seed.
pub struct SeededIdGenerator {
    rng: StdRng,
}

impl SeededIdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdGenerator for SeededIdGenerator {
    fn next_uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
