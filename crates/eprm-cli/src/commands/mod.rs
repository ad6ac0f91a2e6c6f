pub mod analyze;
pub mod batch;

use rand::SeedableRng;
use rand::rngs::StdRng;

/// The run's random source: seeded for reproducibility when requested,
/// entropy-seeded otherwise.
pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
