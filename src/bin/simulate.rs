use clap::Parser;
use grid_chase::config::Config;
use grid_chase::engine::GameEngine;
use grid_chase::map::Map;
use grid_chase::types::{Direction, RoundEvent};
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    /// Overrides the map named by the config file.
    #[arg(long)]
    map: Option<PathBuf>,
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,
    /// Scripted player intents, e.g. "1:right,120:up,300:left".
    #[arg(long)]
    script: Option<String>,
    /// Print a snapshot line to stdout every N ticks.
    #[arg(long)]
    snapshot_every: Option<u64>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Win,
    Loss,
    Timeout,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    outcome: Outcome,
    ticks: u64,
    #[serde(rename = "livesRemaining")]
    lives_remaining: u32,
    #[serde(rename = "pickupsEaten")]
    pickups_eaten: usize,
    #[serde(rename = "pickupsRemaining")]
    pickups_remaining: usize,
    #[serde(rename = "livesLost")]
    lives_lost: usize,
    captures: usize,
    empowerments: usize,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let started_at_ms = now_ms();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(error) => {
            emit_log(
                "error",
                "config_load_failed",
                None,
                json!({
                    "path": cli.config.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    };

    let map_path = cli
        .map
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.map));
    let map = match Map::load(&map_path) {
        Ok(map) => map,
        Err(error) => {
            emit_log(
                "error",
                "map_load_failed",
                None,
                json!({
                    "path": map_path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    };

    let script = match parse_script(cli.script.as_deref().unwrap_or("")) {
        Ok(script) => script,
        Err(message) => {
            emit_log("error", "script_parse_failed", None, json!({ "error": message }));
            std::process::exit(2);
        }
    };

    emit_log(
        "info",
        "round_started",
        None,
        json!({
            "config": cli.config.to_string_lossy(),
            "map": map_path.to_string_lossy(),
            "lives": config.lives,
            "maxTicks": cli.max_ticks,
            "scriptedIntents": script.len(),
        }),
    );

    let mut engine = GameEngine::new(map, &config);
    let mut script_idx = 0;
    let mut pickups_eaten = 0;
    let mut lives_lost = 0;
    let mut captures = 0;
    let mut empowerments = 0;

    while !engine.is_round_over() && engine.tick_count() < cli.max_ticks {
        let next_tick = engine.tick_count() + 1;
        while script_idx < script.len() && script[script_idx].0 <= next_tick {
            engine.apply_direction_intent(script[script_idx].1);
            script_idx += 1;
        }
        engine.tick();

        let snapshot = engine.build_snapshot(true);
        for event in &snapshot.events {
            match event {
                RoundEvent::PickupEaten { .. } => pickups_eaten += 1,
                RoundEvent::EmpowermentTriggered { .. } => empowerments += 1,
                RoundEvent::PursuerCaptured { .. } => captures += 1,
                RoundEvent::LifeLost { remaining } => {
                    lives_lost += 1;
                    emit_log(
                        "info",
                        "life_lost",
                        Some(snapshot.tick),
                        json!({ "remaining": remaining }),
                    );
                }
                _ => {}
            }
        }

        if let Some(cadence) = cli.snapshot_every {
            if cadence > 0 && snapshot.tick % cadence == 0 {
                println!(
                    "{}",
                    serde_json::to_string(&snapshot).expect("snapshot should serialize")
                );
            }
        }
    }

    let finished_at_ms = now_ms();
    let summary = RunSummary {
        outcome: resolve_outcome(&engine),
        ticks: engine.tick_count(),
        lives_remaining: engine.lives(),
        pickups_eaten,
        pickups_remaining: engine.pickups_remaining(),
        lives_lost,
        captures,
        empowerments,
        started_at_ms,
        finished_at_ms,
    };

    println!(
        "{}",
        serde_json::to_string(&summary).expect("run summary should serialize")
    );

    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    }

    emit_log(
        "info",
        "round_finished",
        Some(summary.ticks),
        json!({
            "outcome": summary.outcome,
            "livesRemaining": summary.lives_remaining,
            "pickupsRemaining": summary.pickups_remaining,
        }),
    );
}

fn resolve_outcome(engine: &GameEngine) -> Outcome {
    if engine.did_player_win() {
        Outcome::Win
    } else if engine.is_round_over() {
        Outcome::Loss
    } else {
        Outcome::Timeout
    }
}

/// Parses "tick:direction" pairs separated by commas. Entries must be in
/// ascending tick order so the driver can consume them in one pass.
fn parse_script(script: &str) -> Result<Vec<(u64, Direction)>, String> {
    let mut entries = Vec::new();
    for part in script.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (tick_text, dir_text) = part
            .split_once(':')
            .ok_or_else(|| format!("expected tick:direction, got {part:?}"))?;
        let tick: u64 = tick_text
            .trim()
            .parse()
            .map_err(|_| format!("invalid tick number {tick_text:?}"))?;
        let dir = Direction::parse_move(dir_text.trim())
            .ok_or_else(|| format!("unknown direction {dir_text:?}"))?;
        if let Some(&(last_tick, _)) = entries.last() {
            if tick < last_tick {
                return Err(format!("script ticks out of order at {part:?}"));
            }
        }
        entries.push((tick, dir));
    }
    Ok(entries)
}

fn emit_log(level: &str, event: &str, tick: Option<u64>, details: Value) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        tick,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn parse_script_accepts_ordered_entries() {
        let script = parse_script("1:right, 120:up,300:left").expect("script should parse");
        assert_eq!(
            script,
            vec![
                (1, Direction::Right),
                (120, Direction::Up),
                (300, Direction::Left),
            ]
        );
    }

    #[test]
    fn parse_script_accepts_an_empty_script() {
        assert!(parse_script("").expect("empty script is fine").is_empty());
    }

    #[test]
    fn parse_script_rejects_bad_input() {
        assert!(parse_script("right").is_err());
        assert!(parse_script("x:right").is_err());
        assert!(parse_script("1:north").is_err());
        assert!(parse_script("10:left,5:right").is_err());
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let target = std::env::temp_dir()
            .join(format!("grid-chase-missing-{now}"))
            .join("summary.json");
        let summary = RunSummary {
            outcome: Outcome::Timeout,
            ticks: 10,
            lives_remaining: 3,
            pickups_eaten: 0,
            pickups_remaining: 4,
            lives_lost: 0,
            captures: 0,
            empowerments: 0,
            started_at_ms: 1,
            finished_at_ms: 2,
        };
        assert!(write_summary(&target, &summary).is_err());
    }
}
