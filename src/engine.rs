pub mod mover;
pub mod pursuer;
pub mod targeting;

use crate::config::Config;
use crate::constants::TICKS_PER_SECOND;
use crate::engine::mover::Mover;
use crate::engine::pursuer::Pursuer;
use crate::map::{Map, PickupSpawn};
use crate::types::{
    Direction, Mode, PickupKind, PickupView, PlayerView, PursuerKind, PursuerView, RoundEvent,
    Snapshot,
};

/// Single-threaded fixed-tick round simulation. Construct once per round,
/// drive with `tick`, read through `build_snapshot`.
pub struct GameEngine {
    map: Map,
    tick_counter: u64,
    lives: u32,
    running: bool,
    win: bool,
    vulnerable_ticks: u32,
    schedule: Vec<u32>,
    player: Mover,
    pursuers: Vec<Pursuer>,
    removed: Vec<Pursuer>,
    pickups: Vec<PickupSpawn>,
    events: Vec<RoundEvent>,
}

impl GameEngine {
    pub fn new(map: Map, config: &Config) -> Self {
        let player = Mover::new(map.player_spawn(), Direction::Left, config.speed);
        let pursuers = map
            .pursuer_spawns()
            .iter()
            .map(|spawn| Pursuer::new(spawn.kind, spawn.pos, config.speed))
            .collect();
        let pickups = map.pickup_spawns().to_vec();
        Self {
            tick_counter: 0,
            lives: config.lives,
            running: true,
            win: false,
            vulnerable_ticks: config.vulnerable_seconds * TICKS_PER_SECOND,
            schedule: config.mode_schedule.clone(),
            player,
            pursuers,
            removed: Vec::new(),
            pickups,
            events: Vec::new(),
            map,
        }
    }

    /// Advances the round by one tick: contacts first, then the player,
    /// then pickups, then every pursuer in spawn order.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.tick_counter += 1;

        self.resolve_pursuer_contacts();
        if !self.running {
            return;
        }

        self.player.update_wall_flags(&self.map);
        self.player.step();

        self.resolve_pickups();
        if !self.running {
            return;
        }

        for idx in 0..self.pursuers.len() {
            self.pursuers[idx].advance_mode(&self.schedule);
            if self.pursuers[idx].mode != Mode::Vulnerable {
                self.retarget(idx);
            }
            if self.pursuers[idx].at_intersection(&self.map) {
                self.pursuers[idx].choose_direction(&self.map);
            } else if self.pursuers[idx].at_dead_end(&self.map) {
                let reversal = self.pursuers[idx].mover.dir.opposite();
                self.pursuers[idx].mover.queued = Some(reversal);
            }
            self.pursuers[idx].mover.update_wall_flags(&self.map);
            self.pursuers[idx].mover.step();
        }
    }

    /// Queues a turn for the player. The turn is taken at the next tick on
    /// which it is legal.
    pub fn apply_direction_intent(&mut self, dir: Direction) {
        if !self.running {
            return;
        }
        self.player.queued = Some(dir);
    }

    pub fn is_round_over(&self) -> bool {
        !self.running
    }

    pub fn did_player_win(&self) -> bool {
        self.win
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    pub fn pickups_remaining(&self) -> usize {
        self.pickups.len()
    }

    /// Read model for the renderer and the headless driver. Passing
    /// `include_events` drains the accumulated events into the snapshot.
    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let events = if include_events {
            std::mem::take(&mut self.events)
        } else {
            Vec::new()
        };
        Snapshot {
            tick: self.tick_counter,
            lives: self.lives,
            running: self.running,
            win: self.win,
            player: PlayerView {
                x: self.player.pos.x,
                y: self.player.pos.y,
                dir: self.player.dir,
            },
            pursuers: self
                .pursuers
                .iter()
                .map(|pursuer| PursuerView {
                    kind: pursuer.kind,
                    x: pursuer.mover.pos.x,
                    y: pursuer.mover.pos.y,
                    dir: pursuer.mover.dir,
                    mode: pursuer.mode,
                    target_x: pursuer.target.x,
                    target_y: pursuer.target.y,
                })
                .collect(),
            pickups: self
                .pickups
                .iter()
                .map(|pickup| PickupView {
                    x: pickup.pos.x,
                    y: pickup.pos.y,
                    kind: pickup.kind,
                })
                .collect(),
            events,
        }
    }

    fn resolve_pursuer_contacts(&mut self) {
        let mut idx = 0;
        while idx < self.pursuers.len() {
            if !self.player.center_inside(self.pursuers[idx].mover.pos) {
                idx += 1;
                continue;
            }
            if self.pursuers[idx].mode == Mode::Vulnerable {
                let mut captured = self.pursuers.remove(idx);
                captured.resume();
                self.events.push(RoundEvent::PursuerCaptured {
                    kind: captured.kind,
                });
                self.removed.push(captured);
            } else {
                self.lose_life();
                return;
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives -= 1;
        self.events.push(RoundEvent::LifeLost {
            remaining: self.lives,
        });
        if self.lives == 0 {
            self.running = false;
            self.events.push(RoundEvent::RoundLost);
        } else {
            self.round_reset();
        }
    }

    /// Reinstates captured pursuers and sends everyone home. Mode and
    /// timer state carry over unchanged.
    fn round_reset(&mut self) {
        self.pursuers.append(&mut self.removed);
        self.player.reset();
        for pursuer in &mut self.pursuers {
            pursuer.mover.reset();
        }
        self.events.push(RoundEvent::RoundReset);
    }

    fn resolve_pickups(&mut self) {
        let mut idx = 0;
        while idx < self.pickups.len() {
            if !self.player.center_inside(self.pickups[idx].pos) {
                idx += 1;
                continue;
            }
            let pickup = self.pickups.remove(idx);
            self.events.push(RoundEvent::PickupEaten {
                x: pickup.pos.x,
                y: pickup.pos.y,
                kind: pickup.kind,
            });
            // Clearing the board wins outright, even on an empowering pickup.
            if self.pickups.is_empty() {
                self.running = false;
                self.win = true;
                self.events.push(RoundEvent::RoundWon);
                return;
            }
            if pickup.kind == PickupKind::Empowering {
                for pursuer in &mut self.pursuers {
                    pursuer.frighten(self.vulnerable_ticks);
                }
                self.events.push(RoundEvent::EmpowermentTriggered {
                    pursuers: self.pursuers.len(),
                });
            }
        }
    }

    fn retarget(&mut self, idx: usize) {
        let pursuer = &self.pursuers[idx];
        let target = match pursuer.mode {
            Mode::Patrol => targeting::patrol_target(pursuer.kind, &self.map),
            Mode::Pursue => match pursuer.kind {
                PursuerKind::Chaser => targeting::chase_target(&self.player),
                PursuerKind::Ambusher => targeting::ambush_target(&self.player, &self.map),
                PursuerKind::Evader => {
                    targeting::evade_target(pursuer.mover.pos, &self.player, &self.map)
                }
                PursuerKind::Mirror => match self.find_reference_chaser() {
                    Some(chaser) => {
                        targeting::mirror_target(chaser.mover.pos, chaser.target, &self.map)
                    }
                    None => targeting::mirror_fallback_target(&self.player, &self.map),
                },
            },
            Mode::Vulnerable => return,
        };
        self.pursuers[idx].target = target;
    }

    /// The Mirror's reference is whichever Chaser is currently in play,
    /// re-resolved every tick. Captured Chasers do not count.
    fn find_reference_chaser(&self) -> Option<&Pursuer> {
        self.pursuers
            .iter()
            .find(|pursuer| pursuer.kind == PursuerKind::Chaser)
    }
}
