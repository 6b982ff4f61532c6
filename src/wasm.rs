//! Browser bindings. One game lives behind a global lock that every entry
//! point takes without waiting. On native targets a call racing another
//! thread is dropped with "game is busy". Single-threaded wasm never contends
//! for the lock; there the read-only `Diagon::render` is what keeps a frame
//! export from mutating the game.

use std::sync::{Mutex, TryLockError};

use once_cell::sync::Lazy;
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::Diagon;
use crate::position::Placement;
use crate::types::{Cursor, StoneId};

static GAME: Lazy<Mutex<Option<Diagon>>> = Lazy::new(|| Mutex::new(None));

fn with_game<T>(f: impl FnOnce(&mut Diagon) -> T) -> Result<T, JsError> {
    let mut guard = match GAME.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::WouldBlock) => return Err(JsError::new("game is busy")),
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
    };
    let game = guard
        .as_mut()
        .ok_or_else(|| JsError::new("no game has been started"))?;
    Ok(f(game))
}

/// Pointer handlers report the cursor to show; a dropped event keeps the default.
fn cursor_of(result: Result<Cursor, JsError>) -> String {
    result.unwrap_or(Cursor::Default).as_css().to_string()
}

/// Starts a new game, replacing any previous one. `config` may be `undefined`
/// or a partial config object.
#[wasm_bindgen]
pub fn new_game(config: JsValue) -> Result<(), JsError> {
    let config: GameConfig = if config.is_undefined() || config.is_null() {
        GameConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    let game = Diagon::new(&config)?;

    let mut guard = GAME
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(game);
    Ok(())
}

#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64) -> String {
    cursor_of(with_game(|game| game.pointer_down(x, y)))
}

#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) -> String {
    cursor_of(with_game(|game| game.pointer_move(x, y)))
}

#[wasm_bindgen]
pub fn pointer_up(x: f64, y: f64) -> String {
    cursor_of(with_game(|game| game.pointer_up(x, y)))
}

/// Accepts an array of `{ row, col, stone }`.
#[wasm_bindgen]
pub fn set_positions(placements: JsValue) -> Result<(), JsError> {
    let placements: Vec<Placement> = serde_wasm_bindgen::from_value(placements)?;
    with_game(|game| game.set_positions(&placements))??;
    Ok(())
}

#[wasm_bindgen]
pub fn remove_from_board(stone: usize) -> Result<(), JsError> {
    with_game(|game| game.remove_from_board(StoneId(stone)))??;
    Ok(())
}

#[wasm_bindgen]
pub fn resize(width: f64, height: f64) -> Result<(), JsError> {
    with_game(|game| game.resize(width, height))??;
    Ok(())
}

/// Draw commands for the current frame.
#[wasm_bindgen]
pub fn frame() -> Result<JsValue, JsError> {
    let frame = with_game(|game| game.to_frame())?;
    Ok(serde_wasm_bindgen::to_value(&frame)?)
}

#[wasm_bindgen]
pub fn game_state() -> Result<JsValue, JsError> {
    let state = with_game(|game| game.to_game_state())?;
    Ok(serde_wasm_bindgen::to_value(&state)?)
}
