//! Seeded randomness, spec §9 ("Seeded randomness"). The source treats
//! randomness as an ambient global; this port derives a fresh PRNG per call
//! from an explicit seed so tests, reproducibility, and distributed
//! re-computation all work off the same inputs.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Combines an arbitrary tuple of identifying values into one seed. Used to
/// key the random tiebreaker by `(tournament_id, round_number, player_id)`
/// and to key round-1/bye-assignment randomness by `(config.seed, salt)`.
pub fn derive_seed(parts: &[u64]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for part in parts {
        part.hash(&mut hasher);
    }
    hasher.finish()
}

pub fn uuid_parts(id: Uuid) -> (u64, u64) {
    let bits = id.as_u128();
    ((bits >> 64) as u64, bits as u64)
}

pub fn rng_from_seed(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
