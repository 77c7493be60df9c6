//! Tilevault entry point
//!
//! Headless driver: loads a level, runs a scripted input sequence through
//! the fixed-timestep simulation and logs what happens. Useful for soak
//! testing levels without a renderer attached.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tilevault::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use tilevault::{Level, Progress};

const PROGRESS_FILE: &str = "tilevault-progress.json";
const MAX_TICKS: u64 = 60 * 120;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let level_path = args.next().map(PathBuf::from);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xdecafbad);

    let level = match &level_path {
        Some(path) => match Level::load(path) {
            Ok(level) => level,
            Err(e) => {
                log::warn!("{e}; falling back to the builtin level");
                Level::default_flat()
            }
        },
        None => Level::default_flat(),
    };

    let level_num = level_path.as_deref().map(level_number).unwrap_or(1);
    let mut state = GameState::new(&level, seed);
    log::info!(
        "starting level {level_num} (seed {seed}, {} enemies, {} collectibles)",
        state.enemies.len(),
        state.collectibles.len()
    );

    while state.phase == GamePhase::Playing && state.tick_count < MAX_TICKS {
        let input = scripted_input(state.tick_count);
        for event in tick(&mut state, &input) {
            log_event(&event, &state);
        }
    }

    let seconds = state.tick_count as f32 / 60.0;
    match state.phase {
        GamePhase::LevelComplete => {
            log::info!("level complete in {seconds:.1}s, score {}", state.score);
            let mut progress = Progress::load_from(Path::new(PROGRESS_FILE));
            progress.record_completion(level_num, state.score);
            if let Err(e) = progress.save_to(Path::new(PROGRESS_FILE)) {
                log::warn!("failed to save progress: {e}");
            }
            ExitCode::SUCCESS
        }
        GamePhase::GameOver => {
            log::info!("game over after {seconds:.1}s, score {}", state.score);
            ExitCode::FAILURE
        }
        _ => {
            log::info!("run timed out after {seconds:.1}s, score {}", state.score);
            ExitCode::FAILURE
        }
    }
}

/// Level number from the file name (`levels/level2.csv` -> 2), so progress
/// is recorded under the right key. Unnumbered names count as level 1.
fn level_number(path: &Path) -> u32 {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(1)
}

/// Simple soak script: run right, hop every 1.5s, shoot every 0.75s
fn scripted_input(tick_count: u64) -> TickInput {
    TickInput {
        move_dir: 1.0,
        jump: tick_count % 90 == 0,
        fire: tick_count % 45 == 0,
        ..TickInput::default()
    }
}

fn log_event(event: &GameEvent, state: &GameState) {
    match event {
        GameEvent::Jumped => log::debug!("jumped at x={:.0}", state.player.body.pos.x),
        GameEvent::PlayerDamaged { remaining } => {
            log::info!("player hit, {remaining} health left")
        }
        GameEvent::PlayerDied => log::info!("player died"),
        GameEvent::EnemyDied { id } => log::info!("enemy {id} destroyed"),
        GameEvent::BossDefeated => log::info!("boss defeated, planks removed"),
        GameEvent::CollectibleTaken => {
            log::info!("collectible taken, {} remaining", state.collectibles.len())
        }
        GameEvent::ExitOpened => log::info!("exit opened"),
        GameEvent::LevelComplete => log::info!("reached the exit"),
    }
}
