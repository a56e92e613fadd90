//! Deterministic simulation core for a tile-grid chase game: one
//! player-controlled mover hunted by four kinds of pursuers on a fixed wall
//! grid, driven by an external fixed-rate `tick()` loop. Rendering, input
//! and asset concerns live outside this crate; it exposes snapshots and
//! events for them to consume.

pub mod config;
pub mod constants;
pub mod engine;
pub mod map;
pub mod types;
