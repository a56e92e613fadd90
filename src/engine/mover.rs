use crate::constants::{HALF_TILE, TILE_SIZE};
use crate::map::Map;
use crate::types::{Direction, Vec2};

/// Shared movement state for the player and every pursuer: pixel position,
/// facing, one queued turn and the two wall flags refreshed each tick.
#[derive(Clone, Debug)]
pub struct Mover {
    pub pos: Vec2,
    pub start: Vec2,
    pub dir: Direction,
    pub queued: Option<Direction>,
    pub speed: i32,
    pub can_turn: bool,
    pub will_collide: bool,
}

impl Mover {
    pub fn new(start: Vec2, dir: Direction, speed: i32) -> Self {
        Self {
            pos: start,
            start,
            dir,
            queued: None,
            speed,
            can_turn: true,
            will_collide: false,
        }
    }

    /// Refreshes turn legality (against the queued direction, if any) and
    /// forward legality (against the current facing) ahead of `step`. The
    /// forward verdict deliberately predates any turn taken this tick.
    pub fn update_wall_flags(&mut self, map: &Map) {
        if let Some(queued) = self.queued {
            self.can_turn = !map.check_collision(self.pos, queued);
        }
        self.will_collide = map.check_collision(self.pos, self.dir);
    }

    pub fn step(&mut self) {
        if self.can_turn {
            if let Some(queued) = self.queued.take() {
                self.dir = queued;
            }
        }
        if !self.will_collide {
            let (dx, dy) = self.dir.displacement();
            self.pos.x += dx * self.speed;
            self.pos.y += dy * self.speed;
        }
    }

    /// Sends the mover home. Facing and any queued turn survive the reset.
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.can_turn = true;
        self.will_collide = false;
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + HALF_TILE, self.pos.y + HALF_TILE)
    }

    /// Center-point-inside-box test shared by pickup consumption and
    /// pursuer contact. Bounds are inclusive.
    pub fn center_inside(&self, box_pos: Vec2) -> bool {
        let center = self.center();
        center.x >= box_pos.x
            && center.x <= box_pos.x + TILE_SIZE
            && center.y >= box_pos.y
            && center.y <= box_pos.y + TILE_SIZE
    }
}
