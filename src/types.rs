use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Canonical scan order used everywhere a direction set is traversed.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Unit pixel displacement of one step in this direction.
    pub fn displacement(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Patrol,
    Pursue,
    Vulnerable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PursuerKind {
    Chaser,
    Ambusher,
    Evader,
    Mirror,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Regular,
    Empowering,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PursuerView {
    pub kind: PursuerKind,
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub mode: Mode,
    #[serde(rename = "targetX")]
    pub target_x: i32,
    #[serde(rename = "targetY")]
    pub target_y: i32,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PickupView {
    pub x: i32,
    pub y: i32,
    pub kind: PickupKind,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEvent {
    PickupEaten { x: i32, y: i32, kind: PickupKind },
    EmpowermentTriggered { pursuers: usize },
    PursuerCaptured { kind: PursuerKind },
    LifeLost { remaining: u32 },
    RoundReset,
    RoundWon,
    RoundLost,
}

/// Read model handed to the renderer, debug overlay and headless driver.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub lives: u32,
    pub running: bool,
    pub win: bool,
    pub player: PlayerView,
    pub pursuers: Vec<PursuerView>,
    pub pickups: Vec<PickupView>,
    pub events: Vec<RoundEvent>,
}
