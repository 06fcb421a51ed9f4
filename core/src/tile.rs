use serde::{Deserialize, Serialize};

/// Opaque tile identifier, stable for the lifetime of a round and never reused
/// across rounds of the same engine. Suited as a rendering list key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One cell of the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    is_target: bool,
    is_clicked: bool,
}

impl Tile {
    pub(crate) const fn new(id: TileId, is_target: bool) -> Self {
        Self {
            id,
            is_target,
            is_clicked: false,
        }
    }

    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Whether this tile hides a target; assigned once per round, immutable after.
    pub const fn is_target(&self) -> bool {
        self.is_target
    }

    pub const fn is_clicked(&self) -> bool {
        self.is_clicked
    }

    pub const fn is_hit(&self) -> bool {
        self.is_clicked && self.is_target
    }

    pub const fn is_miss(&self) -> bool {
        self.is_clicked && !self.is_target
    }

    pub(crate) fn mark_clicked(&mut self) {
        self.is_clicked = true;
    }
}

/// What the presentation layer should draw for a tile right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileFace {
    /// Nothing to show.
    Concealed,
    /// Shown as a target: during the preview window, or for a target the player
    /// never found once the round has ended.
    Exposed,
    /// Clicked and it was a target.
    Hit,
    /// Clicked and it was not a target.
    Miss,
}
