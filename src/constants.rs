pub const TICKS_PER_SECOND: u32 = 60;

pub const TILE_SIZE: i32 = 16;
pub const HALF_TILE: i32 = TILE_SIZE / 2;

/// Movement and turn legality are probed one pixel ahead of the entity's
/// bounding box, so a mover can commit to a turn just before it is
/// tile-aligned.
pub const COLLISION_PROBE_PX: i32 = 1;

pub const AMBUSH_LOOKAHEAD_TILES: i32 = 4;
pub const EVADE_RADIUS_TILES: f64 = 8.0;
