use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// Qualitative rating of a finished round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Perfect,
    Great,
    Good,
    NotBad,
    Meh,
    Ouch,
    Yikes,
}

/// Ascending ladder of `(upper bound, grade)` rungs. A score maps to the first
/// rung whose upper bound it stays strictly below; each rung is inclusive at
/// its lower bound and exclusive at its upper one.
const LADDER: [(f64, Grade); 5] = [
    (0.05, Grade::Great),
    (0.10, Grade::Good),
    (0.25, Grade::NotBad),
    (0.50, Grade::Meh),
    (0.75, Grade::Ouch),
];

impl Grade {
    /// Maps a score in `[0, 1]` (lower is better) to its grade. Only an exact
    /// zero rates `Perfect`.
    pub fn from_score(score: f64) -> Self {
        if score <= 0.0 {
            return Self::Perfect;
        }
        LADDER
            .iter()
            .find(|&&(upper, _)| score < upper)
            .map(|&(_, grade)| grade)
            .unwrap_or(Self::Yikes)
    }

    pub const fn label(self) -> &'static str {
        use Grade::*;
        match self {
            Perfect => "Perfect",
            Great => "Great",
            Good => "Good",
            NotBad => "Not bad",
            Meh => "Meh",
            Ouch => "Ouch",
            Yikes => "Yikes",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final tally of a round, fixed the moment the round ends.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub grade: Grade,
    pub hit_count: TileCount,
    pub miss_count: TileCount,
    /// Targets the player never clicked.
    pub missed_targets: TileCount,
    /// `max(missed_targets / target_count, miss_count / total_tiles)`, in `[0, 1]`.
    pub score: f64,
    pub elapsed_secs: u32,
}

impl RoundSummary {
    pub(crate) fn tally(tiles: &[Tile], config: RoundConfig, elapsed_secs: u32) -> Self {
        let hit_count = tiles.iter().filter(|tile| tile.is_hit()).count() as TileCount;
        let miss_count = tiles.iter().filter(|tile| tile.is_miss()).count() as TileCount;
        let missed_targets = config.target_count().saturating_sub(hit_count);

        let not_found_fraction = f64::from(missed_targets) / f64::from(config.target_count());
        let miss_fraction = f64::from(miss_count) / f64::from(config.total_tiles());
        let score = not_found_fraction.max(miss_fraction);

        Self {
            grade: Grade::from_score(score),
            hit_count,
            miss_count,
            missed_targets,
            score,
            elapsed_secs,
        }
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} hits, {} misses in {}s",
            self.grade, self.hit_count, self.miss_count, self.elapsed_secs
        )
    }
}
