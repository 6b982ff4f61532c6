use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Palette;
use crate::geometry::Point;

/// A board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Index of a stone in the registry. Stable for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoneId(pub usize);

impl fmt::Display for StoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoneVariant {
    Normal,
    /// One per player, drawn with an extra ring.
    Capstone,
}

/// Pointer affordance the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value.
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub cell: Cell,
    pub center: Point,
    pub is_wall: bool,
    pub is_win_square: bool,
}

/// Everything the painter needs for the board itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub num_tiles: usize,
    /// Diagonal length of one tile.
    pub tile_size: f64,
    /// Edge length of one tile.
    pub tile_length: f64,
    /// Top-left corner of the board box.
    pub origin: Point,
    pub board_width: f64,
    pub board_height: f64,
    pub palette: Palette,
    pub tiles: Vec<TileView>,
    pub highlighted: Vec<TileView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoneView {
    pub id: StoneId,
    pub owner: u8,
    pub image_id: u32,
    pub variant: StoneVariant,
    pub position: Point,
    pub size: f64,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub num_tiles: usize,
    /// Row-major occupant of every cell.
    pub board: Vec<Option<StoneId>>,
    /// Score per seat.
    pub scores: Vec<u32>,
    /// Off-board stones per seat, in rail order.
    pub side_stones: Vec<Vec<StoneId>>,
    pub dragging: Option<StoneId>,
}
