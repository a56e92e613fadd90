use crate::constants::{TICKS_PER_SECOND, TILE_SIZE};
use crate::engine::mover::Mover;
use crate::map::Map;
use crate::types::{Direction, Mode, PursuerKind, Vec2};

/// One pursuer: its mover plus the Patrol/Pursue/Vulnerable state machine.
///
/// `schedule_index` is always a valid index into the schedule; it wraps at
/// the end of each cycle and encodes the resume mode in its parity (even
/// resumes Patrol, odd resumes Pursue).
#[derive(Clone, Debug)]
pub struct Pursuer {
    pub kind: PursuerKind,
    pub mover: Mover,
    pub mode: Mode,
    pub schedule_index: usize,
    pub phase_elapsed: u32,
    pub vulnerable_remaining: u32,
    pub target: Vec2,
}

impl Pursuer {
    pub fn new(kind: PursuerKind, start: Vec2, speed: i32) -> Self {
        let dir = match kind {
            PursuerKind::Ambusher | PursuerKind::Mirror => Direction::Right,
            PursuerKind::Chaser | PursuerKind::Evader => Direction::Left,
        };
        let mut mover = Mover::new(start, dir, speed);
        mover.can_turn = false;
        if kind == PursuerKind::Ambusher {
            mover.queued = Some(Direction::Right);
        }
        Self {
            kind,
            mover,
            mode: Mode::Patrol,
            schedule_index: 0,
            phase_elapsed: 0,
            vulnerable_remaining: 0,
            target: Vec2::new(0, 0),
        }
    }

    /// One tick of the state machine. The phase timer is frozen while
    /// Vulnerable; the interrupted phase resumes where it left off.
    pub fn advance_mode(&mut self, schedule: &[u32]) {
        if self.mode == Mode::Vulnerable {
            self.vulnerable_remaining = self.vulnerable_remaining.saturating_sub(1);
            if self.vulnerable_remaining == 0 {
                self.resume();
            }
            return;
        }
        self.phase_elapsed += 1;
        let phase_ticks = schedule[self.schedule_index] * TICKS_PER_SECOND;
        if self.phase_elapsed >= phase_ticks {
            self.phase_elapsed = 0;
            self.schedule_index = (self.schedule_index + 1) % schedule.len();
            // A switch flips the mode; parity is only consulted on resume.
            self.mode = if self.mode == Mode::Patrol {
                Mode::Pursue
            } else {
                Mode::Patrol
            };
        }
    }

    /// Enters Vulnerable. Re-triggering always restarts the countdown at
    /// the full duration.
    pub fn frighten(&mut self, duration_ticks: u32) {
        self.mode = Mode::Vulnerable;
        self.vulnerable_remaining = duration_ticks;
    }

    /// Restores the mode encoded by the schedule-index parity.
    pub fn resume(&mut self) {
        self.mode = if self.schedule_index % 2 == 0 {
            Mode::Patrol
        } else {
            Mode::Pursue
        };
    }

    /// A legal exit perpendicular to the current facing.
    pub fn at_intersection(&self, map: &Map) -> bool {
        let perpendicular = match self.mover.dir {
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
        };
        perpendicular
            .iter()
            .any(|&dir| !map.check_collision(self.mover.pos, dir))
    }

    pub fn at_dead_end(&self, map: &Map) -> bool {
        map.check_collision(self.mover.pos, self.mover.dir)
    }

    /// Queues the legal non-reversal direction whose full-tile step lands
    /// closest to the target. Ties keep the first candidate in scan order;
    /// the reversal is queued only when every other direction is blocked.
    pub fn choose_direction(&mut self, map: &Map) {
        let reversal = self.mover.dir.opposite();
        let mut best = reversal;
        let mut best_distance = f64::INFINITY;
        for dir in Direction::ALL {
            if dir == reversal {
                continue;
            }
            if map.check_collision(self.mover.pos, dir) {
                continue;
            }
            let (dx, dy) = dir.displacement();
            let landing = Vec2::new(
                self.mover.pos.x + dx * TILE_SIZE,
                self.mover.pos.y + dy * TILE_SIZE,
            );
            let distance = landing.distance(self.target);
            if distance < best_distance {
                best = dir;
                best_distance = distance;
            }
        }
        self.mover.queued = Some(best);
    }
}

#[cfg(test)]
mod tests {
    use super::Pursuer;
    use crate::map::Map;
    use crate::types::{Direction, Mode, PursuerKind, Vec2};

    fn pursuer(kind: PursuerKind) -> Pursuer {
        Pursuer::new(kind, Vec2::new(32, 16), 1)
    }

    #[test]
    fn initial_facing_depends_on_the_kind() {
        assert_eq!(pursuer(PursuerKind::Chaser).mover.dir, Direction::Left);
        assert_eq!(pursuer(PursuerKind::Evader).mover.dir, Direction::Left);
        assert_eq!(pursuer(PursuerKind::Mirror).mover.dir, Direction::Right);

        let ambusher = pursuer(PursuerKind::Ambusher);
        assert_eq!(ambusher.mover.dir, Direction::Right);
        assert_eq!(ambusher.mover.queued, Some(Direction::Right));
        assert!(!ambusher.mover.can_turn);
    }

    #[test]
    fn phases_alternate_on_the_schedule() {
        let schedule = [1, 2];
        let mut pursuer = pursuer(PursuerKind::Chaser);
        assert_eq!(pursuer.mode, Mode::Patrol);

        for _ in 0..60 {
            pursuer.advance_mode(&schedule);
        }
        assert_eq!(pursuer.mode, Mode::Pursue);
        assert_eq!(pursuer.schedule_index, 1);

        for _ in 0..120 {
            pursuer.advance_mode(&schedule);
        }
        assert_eq!(pursuer.mode, Mode::Patrol);
        assert_eq!(pursuer.schedule_index, 0);

        // The wrapped index starts the one-second phase over.
        for _ in 0..60 {
            pursuer.advance_mode(&schedule);
        }
        assert_eq!(pursuer.mode, Mode::Pursue);
        assert_eq!(pursuer.schedule_index, 1);
    }

    #[test]
    fn a_full_cycle_returns_to_the_starting_state() {
        let schedule = [1, 2];
        let mut pursuer = pursuer(PursuerKind::Chaser);
        for _ in 0..180 {
            pursuer.advance_mode(&schedule);
        }
        assert_eq!(pursuer.schedule_index, 0);
        assert_eq!(pursuer.phase_elapsed, 0);
        assert_eq!(pursuer.mode, Mode::Patrol);
    }

    #[test]
    fn odd_schedules_resume_by_wrapped_index_parity() {
        let schedule = [1, 1, 1];
        let mut pursuer = pursuer(PursuerKind::Chaser);
        for _ in 0..180 {
            pursuer.advance_mode(&schedule);
        }
        // Three switches leave the mode flipped while the index wraps home.
        assert_eq!(pursuer.schedule_index, 0);
        assert_eq!(pursuer.mode, Mode::Pursue);

        pursuer.frighten(1);
        pursuer.advance_mode(&schedule);
        assert_eq!(pursuer.mode, Mode::Patrol);
    }

    #[test]
    fn vulnerability_freezes_the_phase_timer() {
        let schedule = [1];
        let mut pursuer = pursuer(PursuerKind::Chaser);
        for _ in 0..30 {
            pursuer.advance_mode(&schedule);
        }
        assert_eq!(pursuer.phase_elapsed, 30);

        pursuer.frighten(120);
        for _ in 0..119 {
            pursuer.advance_mode(&schedule);
        }
        assert_eq!(pursuer.mode, Mode::Vulnerable);
        assert_eq!(pursuer.phase_elapsed, 30);

        pursuer.advance_mode(&schedule);
        assert_eq!(pursuer.mode, Mode::Patrol);
        assert_eq!(pursuer.phase_elapsed, 30);
    }

    #[test]
    fn retriggered_vulnerability_restarts_the_countdown() {
        let schedule = [1];
        let mut pursuer = pursuer(PursuerKind::Chaser);
        pursuer.frighten(120);
        for _ in 0..60 {
            pursuer.advance_mode(&schedule);
        }
        pursuer.frighten(120);
        for _ in 0..119 {
            pursuer.advance_mode(&schedule);
        }
        assert_eq!(pursuer.mode, Mode::Vulnerable);
        pursuer.advance_mode(&schedule);
        assert_eq!(pursuer.mode, Mode::Patrol);
    }

    #[test]
    fn resume_mode_follows_schedule_parity() {
        let mut pursuer = pursuer(PursuerKind::Chaser);
        pursuer.frighten(10);
        pursuer.resume();
        assert_eq!(pursuer.mode, Mode::Patrol);

        pursuer.schedule_index = 3;
        pursuer.frighten(10);
        pursuer.resume();
        assert_eq!(pursuer.mode, Mode::Pursue);
    }

    const JUNCTION: &str = "\
11111
1p071
11011
11111";

    #[test]
    fn intersections_need_an_aligned_perpendicular_exit() {
        let map = Map::parse(JUNCTION).expect("layout should parse");
        let mut pursuer = pursuer(PursuerKind::Chaser);
        pursuer.mover.dir = Direction::Right;

        pursuer.mover.pos = Vec2::new(32, 16);
        assert!(pursuer.at_intersection(&map));

        pursuer.mover.pos = Vec2::new(16, 16);
        assert!(!pursuer.at_intersection(&map));

        // One pixel short of tile alignment the opening is not usable.
        pursuer.mover.pos = Vec2::new(33, 16);
        assert!(!pursuer.at_intersection(&map));
    }

    #[test]
    fn dead_end_means_the_way_ahead_is_blocked() {
        let map = Map::parse(JUNCTION).expect("layout should parse");
        let mut pursuer = pursuer(PursuerKind::Chaser);
        pursuer.mover.pos = Vec2::new(16, 16);
        pursuer.mover.dir = Direction::Left;
        assert!(pursuer.at_dead_end(&map));
        pursuer.mover.dir = Direction::Right;
        assert!(!pursuer.at_dead_end(&map));
    }

    const FORK: &str = "\
111111
1p0071
110111
111111";

    #[test]
    fn chooses_the_direction_closest_to_the_target() {
        let map = Map::parse(FORK).expect("layout should parse");
        let mut pursuer = pursuer(PursuerKind::Chaser);
        pursuer.mover.pos = Vec2::new(32, 16);
        pursuer.mover.dir = Direction::Right;
        pursuer.target = Vec2::new(40, 64);
        pursuer.choose_direction(&map);
        assert_eq!(pursuer.mover.queued, Some(Direction::Down));
    }

    #[test]
    fn ties_keep_the_first_candidate_in_scan_order() {
        let map = Map::parse(FORK).expect("layout should parse");
        let mut pursuer = pursuer(PursuerKind::Chaser);
        pursuer.mover.pos = Vec2::new(32, 16);
        pursuer.mover.dir = Direction::Right;
        // Right (48,16) and Down (32,32) are equidistant; Right scans first.
        pursuer.target = Vec2::new(40, 24);
        pursuer.choose_direction(&map);
        assert_eq!(pursuer.mover.queued, Some(Direction::Right));
    }

    #[test]
    fn never_reverses_while_another_exit_is_legal() {
        let map = Map::parse(FORK).expect("layout should parse");
        let mut pursuer = pursuer(PursuerKind::Chaser);
        pursuer.mover.pos = Vec2::new(32, 16);
        pursuer.mover.dir = Direction::Right;
        // The reversal would be the closest step but is excluded.
        pursuer.target = Vec2::new(0, 16);
        pursuer.choose_direction(&map);
        assert_ne!(pursuer.mover.queued, Some(Direction::Left));
    }

    const POCKET: &str = "\
1111
1p71
1c11
1111";

    #[test]
    fn reversal_is_the_fallback_in_a_pocket() {
        let map = Map::parse(POCKET).expect("layout should parse");
        let mut pursuer = pursuer(PursuerKind::Chaser);
        pursuer.mover.pos = Vec2::new(16, 32);
        pursuer.mover.dir = Direction::Down;
        pursuer.target = Vec2::new(0, 0);
        pursuer.choose_direction(&map);
        assert_eq!(pursuer.mover.queued, Some(Direction::Up));
    }
}
