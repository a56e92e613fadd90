//! Per-kind target selection. Every function is pure: the engine resolves
//! any cross-entity references and hands plain values in.

use crate::constants::{AMBUSH_LOOKAHEAD_TILES, EVADE_RADIUS_TILES, HALF_TILE, TILE_SIZE};
use crate::engine::mover::Mover;
use crate::map::Map;
use crate::types::{PursuerKind, Vec2};

/// Home corner steered toward while patrolling. One corner per kind, in
/// padded pixel bounds.
pub fn patrol_target(kind: PursuerKind, map: &Map) -> Vec2 {
    match kind {
        PursuerKind::Chaser => Vec2::new(0, 0),
        PursuerKind::Ambusher => Vec2::new(map.width_px(), 0),
        PursuerKind::Evader => Vec2::new(0, map.height_px()),
        PursuerKind::Mirror => Vec2::new(map.width_px(), map.height_px()),
    }
}

pub fn chase_target(player: &Mover) -> Vec2 {
    player.center()
}

/// Four tiles ahead of the player along its current facing, clamped per
/// axis into the map bounds, then centered.
pub fn ambush_target(player: &Mover, map: &Map) -> Vec2 {
    let (dx, dy) = player.dir.displacement();
    let lookahead = AMBUSH_LOOKAHEAD_TILES * TILE_SIZE;
    let ahead = Vec2::new(
        player.pos.x + dx * lookahead,
        player.pos.y + dy * lookahead,
    );
    let clamped = map.clamp_to_bounds(ahead);
    Vec2::new(clamped.x + HALF_TILE, clamped.y + HALF_TILE)
}

/// Chases the player center only while more than eight tiles away;
/// inside that radius it retreats toward its patrol corner.
pub fn evade_target(pursuer_pos: Vec2, player: &Mover, map: &Map) -> Vec2 {
    let distance_tiles = pursuer_pos.distance(player.pos) / TILE_SIZE as f64;
    if distance_tiles > EVADE_RADIUS_TILES {
        player.center()
    } else {
        patrol_target(PursuerKind::Evader, map)
    }
}

/// Reflection of the reference Chaser's position through the Chaser's own
/// target, clamped into the map bounds.
pub fn mirror_target(chaser_pos: Vec2, chaser_target: Vec2, map: &Map) -> Vec2 {
    let reflected = Vec2::new(
        2 * chaser_target.x - chaser_pos.x,
        2 * chaser_target.y - chaser_pos.y,
    );
    map.clamp_to_bounds(reflected)
}

/// Used while no Chaser is in play.
pub fn mirror_fallback_target(player: &Mover, map: &Map) -> Vec2 {
    map.clamp_to_bounds(player.center())
}
