use memorito_core::{RoundConfig, Side};
use serde::{Deserialize, Serialize};

use crate::utils::StorageKey;

/// Player choices that survive a reload. Round state itself is ephemeral; only
/// the chosen difficulty is kept.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub difficulty: Side,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: RoundConfig::default().difficulty(),
        }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "memorito:settings";
}
