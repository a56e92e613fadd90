use std::path::Path;

use thiserror::Error;

use crate::constants::{COLLISION_PROBE_PX, TILE_SIZE};
use crate::types::{Direction, PickupKind, PursuerKind, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickupSpawn {
    pub pos: Vec2,
    pub kind: PickupKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuerSpawn {
    pub kind: PursuerKind,
    pub pos: Vec2,
}

/// Static wall grid plus the entity placements read out of the layout text.
/// Immutable once parsed.
#[derive(Clone, Debug)]
pub struct Map {
    walls: Vec<bool>,
    rows: i32,
    cols: i32,
    player_spawn: Vec2,
    pursuer_spawns: Vec<PursuerSpawn>,
    pickup_spawns: Vec<PickupSpawn>,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("map layout is empty")]
    EmptyLayout,
    #[error("map row {row} is empty")]
    EmptyRow { row: usize },
    #[error("map row {row} has {len} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("no player start tile found")]
    NoPlayer,
    #[error("no pickups found")]
    NoPickups,
}

impl Map {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Interprets one character per tile: digits 1-6 are walls (the digit
    /// only matters to the renderer), `7`/`8` are regular/empowering
    /// pickups, `p` the player start, `c`/`a`/`i`/`w` the four pursuer
    /// kinds. Anything else is open floor.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return Err(MapError::EmptyLayout);
        }
        let cols = lines[0].chars().count();

        let rows = lines.len();
        let mut walls = vec![false; rows * cols];
        let mut player_spawn = None;
        let mut pursuer_spawns = Vec::new();
        let mut pickup_spawns = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if len == 0 {
                return Err(MapError::EmptyRow { row });
            }
            if len != cols {
                return Err(MapError::RaggedRow {
                    row,
                    len,
                    expected: cols,
                });
            }
            for (col, tile) in line.chars().enumerate() {
                let pos = Vec2::new(col as i32 * TILE_SIZE, row as i32 * TILE_SIZE);
                match tile {
                    '1'..='6' => walls[row * cols + col] = true,
                    '7' => pickup_spawns.push(PickupSpawn {
                        pos,
                        kind: PickupKind::Regular,
                    }),
                    '8' => pickup_spawns.push(PickupSpawn {
                        pos,
                        kind: PickupKind::Empowering,
                    }),
                    'p' => player_spawn = Some(pos),
                    'c' => pursuer_spawns.push(PursuerSpawn {
                        kind: PursuerKind::Chaser,
                        pos,
                    }),
                    'a' => pursuer_spawns.push(PursuerSpawn {
                        kind: PursuerKind::Ambusher,
                        pos,
                    }),
                    'i' => pursuer_spawns.push(PursuerSpawn {
                        kind: PursuerKind::Evader,
                        pos,
                    }),
                    'w' => pursuer_spawns.push(PursuerSpawn {
                        kind: PursuerKind::Mirror,
                        pos,
                    }),
                    _ => {}
                }
            }
        }

        let player_spawn = player_spawn.ok_or(MapError::NoPlayer)?;
        if pickup_spawns.is_empty() {
            return Err(MapError::NoPickups);
        }

        Ok(Self {
            walls,
            rows: rows as i32,
            cols: cols as i32,
            player_spawn,
            pursuer_spawns,
            pickup_spawns,
        })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn width_px(&self) -> i32 {
        self.cols * TILE_SIZE
    }

    pub fn height_px(&self) -> i32 {
        self.rows * TILE_SIZE
    }

    pub fn player_spawn(&self) -> Vec2 {
        self.player_spawn
    }

    pub fn pursuer_spawns(&self) -> &[PursuerSpawn] {
        &self.pursuer_spawns
    }

    pub fn pickup_spawns(&self) -> &[PickupSpawn] {
        &self.pickup_spawns
    }

    pub fn wall_at(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 || row >= self.rows || col >= self.cols {
            return false;
        }
        self.walls[(row * self.cols + col) as usize]
    }

    /// Translates the tile-sized bounding box at `pos` one pixel along
    /// `probe` and reports whether it would overlap any wall tile. Overlap
    /// is strict on all four sides; boxes that merely touch do not collide.
    pub fn check_collision(&self, pos: Vec2, probe: Direction) -> bool {
        let (dx, dy) = probe.displacement();
        let left = pos.x + dx * COLLISION_PROBE_PX;
        let top = pos.y + dy * COLLISION_PROBE_PX;
        let right = left + TILE_SIZE;
        let bottom = top + TILE_SIZE;

        let row_min = top.div_euclid(TILE_SIZE) - 1;
        let row_max = bottom.div_euclid(TILE_SIZE) + 1;
        let col_min = left.div_euclid(TILE_SIZE) - 1;
        let col_max = right.div_euclid(TILE_SIZE) + 1;

        for row in row_min..=row_max {
            for col in col_min..=col_max {
                if !self.wall_at(row, col) {
                    continue;
                }
                let wall_left = col * TILE_SIZE;
                let wall_top = row * TILE_SIZE;
                if right > wall_left
                    && left < wall_left + TILE_SIZE
                    && bottom > wall_top
                    && top < wall_top + TILE_SIZE
                {
                    return true;
                }
            }
        }
        false
    }

    /// Clamps a target point into the padded pixel bounds used by the
    /// targeting strategies.
    pub fn clamp_to_bounds(&self, target: Vec2) -> Vec2 {
        Vec2::new(
            target.x.clamp(0, self.width_px()),
            target.y.clamp(0, self.height_px()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Map, MapError};
    use crate::types::{Direction, PickupKind, PursuerKind, Vec2};

    const LAYOUT: &str = "\
111111
1p0c71
100081
111111";

    #[test]
    fn parses_dimensions_and_spawns() {
        let map = Map::parse(LAYOUT).expect("layout should parse");
        assert_eq!(map.rows(), 4);
        assert_eq!(map.cols(), 6);
        assert_eq!(map.player_spawn(), Vec2::new(16, 16));

        assert_eq!(map.pursuer_spawns().len(), 1);
        assert_eq!(map.pursuer_spawns()[0].kind, PursuerKind::Chaser);
        assert_eq!(map.pursuer_spawns()[0].pos, Vec2::new(48, 16));

        assert_eq!(map.pickup_spawns().len(), 2);
        assert_eq!(map.pickup_spawns()[0].kind, PickupKind::Regular);
        assert_eq!(map.pickup_spawns()[0].pos, Vec2::new(64, 16));
        assert_eq!(map.pickup_spawns()[1].kind, PickupKind::Empowering);
        assert_eq!(map.pickup_spawns()[1].pos, Vec2::new(64, 32));
    }

    #[test]
    fn wall_lookup_is_false_outside_the_grid() {
        let map = Map::parse(LAYOUT).expect("layout should parse");
        assert!(map.wall_at(0, 0));
        assert!(!map.wall_at(1, 1));
        assert!(!map.wall_at(-1, 0));
        assert!(!map.wall_at(0, 99));
    }

    #[test]
    fn missing_player_is_fatal() {
        let text = LAYOUT.replace('p', "0");
        assert!(matches!(Map::parse(&text), Err(MapError::NoPlayer)));
    }

    #[test]
    fn missing_pickups_are_fatal() {
        let text = LAYOUT.replace('7', "0").replace('8', "0");
        assert!(matches!(Map::parse(&text), Err(MapError::NoPickups)));
    }

    #[test]
    fn ragged_and_empty_rows_are_fatal() {
        assert!(matches!(
            Map::parse("111\n11\n111"),
            Err(MapError::RaggedRow { row: 1, len: 2, .. })
        ));
        assert!(matches!(
            Map::parse("111\n\n111"),
            Err(MapError::EmptyRow { row: 1 })
        ));
        assert!(matches!(Map::parse(""), Err(MapError::EmptyLayout)));
    }

    // Single wall tile at (0,0); the probe area around it is open.
    const CORNER: &str = "\
100
0p7
000";

    #[test]
    fn touching_edges_do_not_collide() {
        let map = Map::parse(CORNER).expect("layout should parse");
        let pos = Vec2::new(16, 16);
        // Probing left or up separates the boxes on the other axis, so the
        // diagonal wall is only ever touched, never overlapped.
        assert!(!map.check_collision(pos, Direction::Left));
        assert!(!map.check_collision(pos, Direction::Up));
    }

    #[test]
    fn one_pixel_probe_detects_adjacent_walls() {
        let map = Map::parse(CORNER).expect("layout should parse");
        // Directly below the wall: probing up closes the 0px gap.
        assert!(map.check_collision(Vec2::new(0, 16), Direction::Up));
        // One pixel of horizontal clearance keeps the probe touching only.
        assert!(!map.check_collision(Vec2::new(17, 0), Direction::Left));
        assert!(map.check_collision(Vec2::new(16, 0), Direction::Left));
    }

    const JUNCTION: &str = "\
11111
1p071
11011
11111";

    #[test]
    fn probe_respects_pixel_alignment_before_a_turn() {
        let map = Map::parse(JUNCTION).expect("layout should parse");
        // The opening below is at column 2. One pixel short of alignment the
        // turned box would clip the wall at column 3; aligned, it does not.
        assert!(map.check_collision(Vec2::new(33, 16), Direction::Down));
        assert!(!map.check_collision(Vec2::new(32, 16), Direction::Down));
    }

    #[test]
    fn clamp_to_bounds_limits_both_axes() {
        let map = Map::parse(LAYOUT).expect("layout should parse");
        assert_eq!(
            map.clamp_to_bounds(Vec2::new(-40, 20)),
            Vec2::new(0, 20)
        );
        assert_eq!(
            map.clamp_to_bounds(Vec2::new(500, -3)),
            Vec2::new(map.width_px(), 0)
        );
    }
}
