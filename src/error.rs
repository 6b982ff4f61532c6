use crate::types::{Cell, StoneId};

/// Fatal problems detected while setting up a game.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("num_tiles must be an even number, was {0}")]
    OddTileCount(usize),
    #[error("num_tiles must be between {min} and {max}, was {num_tiles}")]
    TileCountOutOfRange {
        num_tiles: usize,
        min: usize,
        max: usize,
    },
    #[error("maximum of 4 players, given {0}")]
    TooManyPlayers(usize),
    #[error("at least one player is required")]
    NoPlayers,
    #[error("dimensions must be positive and finite, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
}

/// Rejected `set_positions` input. The board is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("cell ({row}, {col}) is outside a {num_tiles}x{num_tiles} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        num_tiles: usize,
    },
    #[error("cell {0} is a wall")]
    Wall(Cell),
    #[error("no stone with id {0}")]
    UnknownStone(StoneId),
    #[error("stone {0} is being dragged")]
    StoneInHand(StoneId),
}
