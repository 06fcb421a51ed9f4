/// Grid side length; equal to the chosen difficulty.
pub type Side = u8;

/// Count type used for tile and target counts.
pub type TileCount = u16;

pub const fn square(side: Side) -> TileCount {
    let side = side as TileCount;
    side.saturating_mul(side)
}
