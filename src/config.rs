use serde::{Deserialize, Serialize};

use crate::geometry::DEFAULT_NUM_TILES;

pub const MAX_PLAYERS: usize = 4;
pub const DEFAULT_STONES_PER_PLAYER: usize = 4;
pub const DEFAULT_CANVAS_SIDE: f64 = 800.0;

/// Board colours handed to the painter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
    pub highlight: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#964b00".to_string(),
            secondary: "#875e2f".to_string(),
            tertiary: "hotpink".to_string(),
            highlight: "#fff8".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Asset identifier of the stone image, resolved by the host.
    pub stone_image: u32,
    /// Normal stones, not counting the capstone every player also gets.
    pub num_stones: usize,
}

impl PlayerConfig {
    pub fn new(stone_image: u32) -> Self {
        Self {
            stone_image,
            num_stones: DEFAULT_STONES_PER_PLAYER,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Setup parameters for a game. Every field may be omitted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub num_tiles: usize,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub board_width: Option<f64>,
    pub board_height: Option<f64>,
    pub palette: Palette,
    pub players: Vec<PlayerConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_tiles: DEFAULT_NUM_TILES,
            canvas_width: DEFAULT_CANVAS_SIDE,
            canvas_height: DEFAULT_CANVAS_SIDE,
            board_width: None,
            board_height: None,
            palette: Palette::default(),
            players: (0..MAX_PLAYERS as u32).map(PlayerConfig::new).collect(),
        }
    }
}
