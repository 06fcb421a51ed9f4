use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use scheduler::*;
pub use scoring::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod scheduler;
mod scoring;
mod tile;
mod types;

/// Shape of a round: the difficulty drives both the grid side length and the
/// number of hidden targets (`total_tiles = d²`, `target_count = d`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    difficulty: Side,
}

impl RoundConfig {
    pub const MIN_DIFFICULTY: Side = 2;
    pub const MAX_DIFFICULTY: Side = 20;

    pub const fn new_unchecked(difficulty: Side) -> Self {
        Self { difficulty }
    }

    pub fn new(difficulty: Side) -> Self {
        Self::new_unchecked(difficulty.clamp(Self::MIN_DIFFICULTY, Self::MAX_DIFFICULTY))
    }

    pub const fn difficulty(&self) -> Side {
        self.difficulty
    }

    pub const fn total_tiles(&self) -> TileCount {
        square(self.difficulty)
    }

    pub const fn target_count(&self) -> TileCount {
        self.difficulty as TileCount
    }

    /// Config for the next level, one difficulty step up, saturating at the cap.
    pub fn next_level(self) -> Self {
        Self::new(self.difficulty.saturating_add(1))
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::new_unchecked(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_derives_counts_from_difficulty() {
        let config = RoundConfig::new(4);
        assert_eq!(config.total_tiles(), 16);
        assert_eq!(config.target_count(), 4);
    }

    #[test]
    fn config_clamps_difficulty_into_valid_range() {
        assert_eq!(RoundConfig::new(0).difficulty(), RoundConfig::MIN_DIFFICULTY);
        assert_eq!(RoundConfig::new(1).difficulty(), RoundConfig::MIN_DIFFICULTY);
        assert_eq!(RoundConfig::new(200).difficulty(), RoundConfig::MAX_DIFFICULTY);
    }

    #[test]
    fn next_level_saturates_at_the_cap() {
        let top = RoundConfig::new(RoundConfig::MAX_DIFFICULTY);
        assert_eq!(top.next_level(), top);
        assert_eq!(RoundConfig::new(3).next_level().difficulty(), 4);
    }
}
