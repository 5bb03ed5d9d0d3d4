pub mod reporter;
pub mod runner;

pub use reporter::JsScoreReporter;
pub use runner::GameRunner;

use std::cell::RefCell;

use fling_engine::GameConfig;
use glam::Vec3;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Calls made before `game_init` are logged and dropped.
fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => Some(f(runner)),
        None => {
            log::warn!("game not initialized, call game_init() first");
            None
        }
    })
}

/// Create the runner. `config_json` may be empty for defaults.
#[wasm_bindgen]
pub fn game_init(config_json: &str) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"fling: logger already installed".into());
    }

    let config = if config_json.trim().is_empty() {
        GameConfig::default()
    } else {
        GameConfig::from_json(config_json).unwrap_or_else(|err| {
            log::warn!("{err}; using default config");
            GameConfig::default()
        })
    };

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(GameRunner::new(config));
    });
    log::info!("fling: initialized");
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Lifecycle ----

/// Start a new game. Without a seed the configured one is used.
#[wasm_bindgen]
pub fn game_new(seed: Option<u32>) {
    with_runner(|r| {
        r.flow_mut().new_game(seed);
        r.refresh();
    });
}

#[wasm_bindgen]
pub fn game_retry_level() {
    with_runner(|r| {
        r.flow_mut().retry_level();
        r.refresh();
    });
}

#[wasm_bindgen]
pub fn game_next_level() {
    with_runner(|r| {
        r.flow_mut().next_level();
        r.refresh();
    });
}

#[wasm_bindgen]
pub fn game_pause() {
    with_runner(|r| r.flow_mut().pause());
}

#[wasm_bindgen]
pub fn game_resume() {
    with_runner(|r| r.flow_mut().resume());
}

#[wasm_bindgen]
pub fn game_menu() {
    with_runner(|r| {
        r.flow_mut().return_to_menu();
        r.refresh();
    });
}

/// Install JS score callbacks. Passing `undefined` for either goes offline.
#[wasm_bindgen]
pub fn game_set_reporter(add_points: Option<js_sys::Function>, save_level: Option<js_sys::Function>) {
    let reporter = match (add_points, save_level) {
        (Some(add), Some(save)) => {
            Some(Box::new(JsScoreReporter::new(add, save)) as Box<dyn fling_engine::ScoreReporter>)
        }
        _ => None,
    };
    with_runner(|r| r.flow_mut().set_reporter(reporter));
}

// ---- Input ----

/// Aim gesture. `kind`: 0 start, 1 update, 2 release, 3 cancel.
#[wasm_bindgen]
pub fn game_aim(kind: u32, px: f32, py: f32, pz: f32, vx: f32, vy: f32, vz: f32) {
    with_runner(|r| r.aim(kind, Vec3::new(px, py, pz), Vec3::new(vx, vy, vz)));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.events_len()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_trajectory_ptr() -> *const f32 {
    with_runner(|r| r.trajectory_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_trajectory_len() -> u32 {
    with_runner(|r| r.trajectory_len()).unwrap_or_default()
}

// ---- Progress accessors ----

#[wasm_bindgen]
pub fn get_level() -> u32 {
    with_runner(|r| r.flow().progress().level).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_score() -> u32 {
    with_runner(|r| r.flow().progress().score).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_total_score() -> u32 {
    with_runner(|r| r.flow().progress().running_total()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_ammo() -> u32 {
    with_runner(|r| r.flow().progress().ammo).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_targets_remaining() -> u32 {
    with_runner(|r| r.flow().progress().targets_remaining).unwrap_or_default()
}

/// 0 menu, 1 aiming, 2 launched, 3 settling, 4 level complete, 5 game over.
#[wasm_bindgen]
pub fn get_phase() -> u32 {
    use fling_engine::Phase;
    with_runner(|r| match r.flow().phase() {
        Phase::Menu => 0,
        Phase::Aiming => 1,
        Phase::Launched => 2,
        Phase::Settling => 3,
        Phase::LevelComplete => 4,
        Phase::GameOver => 5,
    })
    .unwrap_or_default()
}
