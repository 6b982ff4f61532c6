use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod interaction;
pub mod position;
pub mod registry;
pub mod render;
pub mod types;
pub mod wasm;

pub use config::{GameConfig, Palette, PlayerConfig};
pub use error::{ConfigurationError, PositionError};
pub use game::Diagon;
pub use position::Placement;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
