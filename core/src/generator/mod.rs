use serde::{Deserialize, Serialize};

use crate::*;

pub use random::*;

mod random;

/// Strategy for choosing which tiles hide targets in a fresh round.
pub trait TargetPicker {
    fn pick(&mut self, config: RoundConfig) -> TargetSet;
}

/// Set of distinct positions (indices into the round's tile sequence) that
/// hold targets. Indices are kept sorted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSet {
    indices: Vec<TileCount>,
}

impl TargetSet {
    /// Builds a target set from explicit indices, validating range, uniqueness,
    /// and that the count matches the difficulty.
    pub fn from_indices(config: RoundConfig, indices: &[TileCount]) -> Result<Self> {
        if indices.len() != config.target_count() as usize {
            return Err(GameError::WrongTargetCount);
        }

        let mut indices = indices.to_vec();
        indices.sort_unstable();

        for pair in indices.windows(2) {
            if pair[0] == pair[1] {
                return Err(GameError::DuplicateIndex);
            }
        }
        if let Some(&last) = indices.last() {
            if last >= config.total_tiles() {
                return Err(GameError::InvalidIndex);
            }
        }

        Ok(Self { indices })
    }

    /// Caller guarantees the indices are sorted, distinct and in range.
    pub(crate) fn new_unchecked(indices: Vec<TileCount>) -> Self {
        debug_assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        Self { indices }
    }

    pub fn len(&self) -> TileCount {
        self.indices.len() as TileCount
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: TileCount) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = TileCount> + '_ {
        self.indices.iter().copied()
    }
}

/// Picker with a predetermined answer; used for deterministic rounds in tests
/// and replays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedTargetPicker {
    targets: TargetSet,
}

impl FixedTargetPicker {
    pub fn new(targets: TargetSet) -> Self {
        Self { targets }
    }
}

impl TargetPicker for FixedTargetPicker {
    fn pick(&mut self, config: RoundConfig) -> TargetSet {
        if self.targets.len() != config.target_count() {
            log::warn!(
                "fixed target set has {} targets, config wants {}",
                self.targets.len(),
                config.target_count()
            );
        }
        self.targets.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_indices_accepts_a_valid_set() {
        let config = RoundConfig::new(3);
        let set = TargetSet::from_indices(config, &[8, 0, 4]).unwrap();

        assert_eq!(set.len(), 3);
        assert!(set.contains(0));
        assert!(set.contains(4));
        assert!(set.contains(8));
        assert!(!set.contains(1));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 4, 8]);
    }

    #[test]
    fn from_indices_rejects_out_of_range() {
        let config = RoundConfig::new(2);
        assert_eq!(
            TargetSet::from_indices(config, &[0, 4]),
            Err(GameError::InvalidIndex)
        );
    }

    #[test]
    fn from_indices_rejects_duplicates() {
        let config = RoundConfig::new(2);
        assert_eq!(
            TargetSet::from_indices(config, &[1, 1]),
            Err(GameError::DuplicateIndex)
        );
    }

    #[test]
    fn from_indices_rejects_wrong_count() {
        let config = RoundConfig::new(2);
        assert_eq!(
            TargetSet::from_indices(config, &[0, 1, 2]),
            Err(GameError::WrongTargetCount)
        );
        assert_eq!(
            TargetSet::from_indices(config, &[0]),
            Err(GameError::WrongTargetCount)
        );
    }
}
