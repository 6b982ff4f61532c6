use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI};
use std::ops::{Add, Sub};

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::types::Cell;

pub const DEFAULT_NUM_TILES: usize = 10;
pub const MIN_NUM_TILES: usize = 2;
pub const MAX_NUM_TILES: usize = 24;

/// Rotation applied to each seat's side rail: bottom, top, left, right.
const SEAT_ROTATIONS: [f64; 4] = [0.0, PI, FRAC_PI_2, 3.0 * FRAC_PI_2];

/// A screen-space point, canvas-relative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Fractional board coordinates. The integer part names the cell, the
/// fractional part says where inside the cell the point lies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardCoord {
    pub row: f64,
    pub col: f64,
}

impl BoardCoord {
    /// The cell containing this coordinate, or `None` when it falls outside the grid.
    pub fn cell(self, num_tiles: usize) -> Option<Cell> {
        let range = 0.0..num_tiles as f64;
        if !range.contains(&self.row) || !range.contains(&self.col) {
            return None;
        }
        Some(Cell::new(self.row.floor() as u8, self.col.floor() as u8))
    }

    /// Distance to the centre of the containing cell, in tile lengths.
    pub fn distance_from_cell_center(self) -> f64 {
        let dr = self.row - (self.row.floor() + 0.5);
        let dc = self.col - (self.col.floor() + 0.5);
        dr.hypot(dc)
    }
}

/// Pixel measurements of a board, derived once from explicit canvas dimensions.
///
/// The board is a square grid of `num_tiles` cells rotated 45 degrees about the
/// canvas centre, clipped by an axis-aligned box that leaves a margin of one
/// tile diagonal on every side for the side rails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    num_tiles: usize,
    canvas_side: f64,
    tile_size: f64,
    tile_length: f64,
    board_width: f64,
    board_height: f64,
    center: Point,
    offset: Point,
}

impl BoardGeometry {
    /// The canvas is squared to `min(canvas_width, canvas_height)`. Board box
    /// dimensions default to the canvas side minus a tile diagonal on each side.
    pub fn new(
        num_tiles: usize,
        canvas_width: f64,
        canvas_height: f64,
        board_width: Option<f64>,
        board_height: Option<f64>,
    ) -> Result<Self, ConfigurationError> {
        if num_tiles % 2 != 0 {
            return Err(ConfigurationError::OddTileCount(num_tiles));
        }
        if !(MIN_NUM_TILES..=MAX_NUM_TILES).contains(&num_tiles) {
            return Err(ConfigurationError::TileCountOutOfRange {
                num_tiles,
                min: MIN_NUM_TILES,
                max: MAX_NUM_TILES,
            });
        }
        check_dimensions(canvas_width, canvas_height)?;

        let canvas_side = canvas_width.min(canvas_height);
        let tile_size = canvas_side / ((num_tiles as f64 + 6.0) / 2.0);
        let tile_length = tile_size * FRAC_1_SQRT_2;
        let board_width = board_width.unwrap_or(canvas_side - 2.0 * tile_size);
        let board_height = board_height.unwrap_or(canvas_side - 2.0 * tile_size);
        check_dimensions(board_width, board_height)?;

        let center = Point::new(canvas_side / 2.0, canvas_side / 2.0);
        let half_extent = tile_length * (num_tiles / 2) as f64;
        let offset = Point::new(center.x - half_extent, center.y - half_extent);

        Ok(Self {
            num_tiles,
            canvas_side,
            tile_size,
            tile_length,
            board_width,
            board_height,
            center,
            offset,
        })
    }

    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    pub fn canvas_side(&self) -> f64 {
        self.canvas_side
    }

    /// Diagonal length of a tile, i.e. its on-screen width.
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn half_tile_size(&self) -> f64 {
        self.tile_size / 2.0
    }

    /// Edge length of a tile.
    pub fn tile_length(&self) -> f64 {
        self.tile_length
    }

    pub fn board_width(&self) -> f64 {
        self.board_width
    }

    pub fn board_height(&self) -> f64 {
        self.board_height
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Top-left corner of the board box.
    pub fn origin(&self) -> Point {
        Point::new(self.tile_size, self.tile_size)
    }

    /// Rotates `point` clockwise (screen y grows downward) about the canvas centre.
    pub fn rotate(&self, point: Point, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        let rel = point - self.center;
        Point::new(rel.x * cos - rel.y * sin, rel.x * sin + rel.y * cos) + self.center
    }

    pub fn screen_to_board(&self, point: Point) -> BoardCoord {
        let rotated = self.rotate(point, FRAC_PI_4);
        BoardCoord {
            row: (rotated.x - self.offset.x) / self.tile_length,
            col: (rotated.y - self.offset.y) / self.tile_length,
        }
    }

    /// Continuous inverse of [`screen_to_board`](Self::screen_to_board).
    pub fn board_coord_to_screen(&self, coord: BoardCoord) -> Point {
        let unrotated = Point::new(
            coord.row * self.tile_length + self.offset.x,
            coord.col * self.tile_length + self.offset.y,
        );
        self.rotate(unrotated, -FRAC_PI_4)
    }

    /// Screen-space centre of `cell`.
    pub fn board_to_screen(&self, cell: Cell) -> Point {
        self.board_coord_to_screen(BoardCoord {
            row: cell.row as f64 + 0.5,
            col: cell.col as f64 + 0.5,
        })
    }

    /// Whether `point` is inside the board box and inside the rotated grid.
    ///
    /// Points exactly on an edge may disagree with a tile lookup.
    pub fn is_on_board(&self, point: Point) -> bool {
        let ts = self.tile_size;
        if point.x < ts
            || point.x > self.board_width + ts
            || point.y < ts
            || point.y > self.board_height + ts
        {
            return false;
        }

        let rotated = self.rotate(point, FRAC_PI_4);
        let extent = self.num_tiles as f64 * self.tile_length;
        rotated.x > self.offset.x
            && rotated.x < extent + self.offset.x
            && rotated.y > self.offset.y
            && rotated.y < extent + self.offset.y
    }

    /// Gap between neighbouring stones on a side rail.
    pub fn stone_gap(&self) -> f64 {
        0.1 * self.board_width / self.num_tiles as f64
    }

    /// Diameter of every stone.
    pub fn stone_size(&self) -> f64 {
        self.board_width / self.num_tiles as f64 - self.stone_gap()
    }

    /// Centre of the `index`th slot on `seat`'s side rail.
    ///
    /// Slots run left to right below the bottom edge of the box and the whole
    /// line is then turned to the seat's side.
    pub fn rail_slot(&self, seat: u8, index: usize) -> Point {
        let size = self.stone_size();
        let gap = self.stone_gap();
        let slot = Point::new(
            (index as f64 + 0.5) * (size + gap) - gap / 2.0 + self.tile_size,
            self.board_height + self.tile_size * 3.0 / 2.0,
        );
        self.rotate(slot, SEAT_ROTATIONS[seat as usize % SEAT_ROTATIONS.len()])
    }
}

fn check_dimensions(width: f64, height: f64) -> Result<(), ConfigurationError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidDimensions { width, height })
    }
}
