use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::*;

/// Picks `target_count` distinct tiles uniformly at random.
///
/// Sampling is without replacement (`rand::seq::index::sample`), so the choice
/// is unbiased and stays cheap even when the target count approaches the tile
/// count. No rejection loop is involved.
#[derive(Clone, Debug)]
pub struct RandomTargetPicker {
    rng: SmallRng,
}

impl RandomTargetPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl TargetPicker for RandomTargetPicker {
    fn pick(&mut self, config: RoundConfig) -> TargetSet {
        let total = config.total_tiles();
        let wanted = config.target_count().min(total);

        let picked = rand::seq::index::sample(&mut self.rng, total as usize, wanted as usize);
        let mut indices: Vec<TileCount> = picked.iter().map(|index| index as TileCount).collect();
        indices.sort_unstable();

        log::debug!("picked {} target tiles out of {}", wanted, total);
        TargetSet::new_unchecked(indices)
    }
}
