use crate::config::Palette;
use crate::geometry::{BoardCoord, BoardGeometry, Point};
use crate::types::{BoardView, Cell, StoneId, TileView};

/// One square of the grid. Wall and win-square flags are fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    is_wall: bool,
    is_win_square: bool,
    occupant: Option<StoneId>,
}

impl Tile {
    pub fn is_wall(&self) -> bool {
        self.is_wall
    }

    pub fn is_win_square(&self) -> bool {
        self.is_win_square
    }

    pub fn occupant(&self) -> Option<StoneId> {
        self.occupant
    }
}

/// The Diagon board: an `N x N` grid drawn as a diamond, with walls filling
/// the four outer corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    geometry: BoardGeometry,
    palette: Palette,
    tiles: Vec<Tile>,
    highlighted: Vec<Cell>,
}

impl Board {
    /// Creates an empty board. Walls and win squares follow from the geometry's tile count.
    pub fn new(geometry: BoardGeometry, palette: Palette) -> Self {
        let n = geometry.num_tiles();
        let tiles = (0..n * n)
            .map(|idx| {
                let cell = Cell::new((idx / n) as u8, (idx % n) as u8);
                Tile {
                    is_wall: is_wall(n, cell),
                    is_win_square: is_win_square(n, cell),
                    occupant: None,
                }
            })
            .collect();

        Self {
            geometry,
            palette,
            tiles,
            highlighted: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Swaps in geometry for a resized canvas. The tile count must not change.
    pub(crate) fn set_geometry(&mut self, geometry: BoardGeometry) {
        debug_assert_eq!(geometry.num_tiles(), self.num_tiles());
        self.geometry = geometry;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn num_tiles(&self) -> usize {
        self.geometry.num_tiles()
    }

    /// Returns `None` for cells outside the grid.
    pub fn tile_at(&self, cell: Cell) -> Option<&Tile> {
        self.index(cell).map(|idx| &self.tiles[idx])
    }

    pub fn screen_to_board(&self, point: Point) -> BoardCoord {
        self.geometry.screen_to_board(point)
    }

    pub fn board_to_screen(&self, cell: Cell) -> Point {
        self.geometry.board_to_screen(cell)
    }

    /// The cell under a screen point, if any.
    pub fn cell_at(&self, point: Point) -> Option<Cell> {
        self.screen_to_board(point).cell(self.num_tiles())
    }

    pub fn is_on_board(&self, point: Point) -> bool {
        self.geometry.is_on_board(point)
    }

    /// A stone may be dropped on an existing, empty, non-wall tile.
    pub fn is_drop_target(&self, cell: Cell) -> bool {
        self.tile_at(cell)
            .is_some_and(|tile| !tile.is_wall && tile.occupant.is_none())
    }

    pub fn occupant(&self, cell: Cell) -> Option<StoneId> {
        self.tile_at(cell).and_then(Tile::occupant)
    }

    /// Sets the occupant of `cell` and returns the one it replaced.
    ///
    /// Callers must pass an in-range cell.
    pub(crate) fn place(&mut self, cell: Cell, stone: StoneId) -> Option<StoneId> {
        let idx = self.expect_index(cell);
        self.tiles[idx].occupant.replace(stone)
    }

    /// Clears `cell` and returns whatever sat there.
    pub(crate) fn vacate(&mut self, cell: Cell) -> Option<StoneId> {
        let idx = self.index(cell)?;
        self.tiles[idx].occupant.take()
    }

    /// Every occupied cell in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, StoneId)> + '_ {
        let n = self.num_tiles();
        self.tiles.iter().enumerate().filter_map(move |(idx, tile)| {
            tile.occupant
                .map(|stone| (Cell::new((idx / n) as u8, (idx % n) as u8), stone))
        })
    }

    /// Row-major occupant of every cell.
    pub fn occupants(&self) -> Vec<Option<StoneId>> {
        self.tiles.iter().map(Tile::occupant).collect()
    }

    pub fn highlighted(&self) -> &[Cell] {
        &self.highlighted
    }

    /// Replaces the highlighted cells. Purely presentational.
    pub fn set_highlighted(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.highlighted = cells.into_iter().collect();
    }

    pub fn clear_highlighted(&mut self) {
        self.highlighted.clear();
    }

    pub fn to_view(&self) -> BoardView {
        let n = self.num_tiles();
        let tile_view = |cell: Cell| {
            let tile = &self.tiles[cell.row as usize * n + cell.col as usize];
            TileView {
                cell,
                center: self.board_to_screen(cell),
                is_wall: tile.is_wall,
                is_win_square: tile.is_win_square,
            }
        };

        BoardView {
            num_tiles: n,
            tile_size: self.geometry.tile_size(),
            tile_length: self.geometry.tile_length(),
            origin: self.geometry.origin(),
            board_width: self.geometry.board_width(),
            board_height: self.geometry.board_height(),
            palette: self.palette.clone(),
            tiles: (0..n * n)
                .map(|idx| tile_view(Cell::new((idx / n) as u8, (idx % n) as u8)))
                .collect(),
            highlighted: self
                .highlighted
                .iter()
                .copied()
                .filter(|&cell| self.index(cell).is_some())
                .map(tile_view)
                .collect(),
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let n = self.num_tiles();
        let (row, col) = (cell.row as usize, cell.col as usize);
        if row >= n || col >= n {
            return None;
        }
        Some(row * n + col)
    }

    fn expect_index(&self, cell: Cell) -> usize {
        match self.index(cell) {
            Some(idx) => idx,
            None => unreachable!("cell {} outside a {} board", cell, self.num_tiles()),
        }
    }
}

/// A cell is a wall when it lies in one of the four corner triangles:
/// folded into the top-left quadrant, `col < N/2 - 2 - row`.
fn is_wall(num_tiles: usize, cell: Cell) -> bool {
    let half = num_tiles / 2;
    let (row, col) = (cell.row as usize, cell.col as usize);
    let i = row.min(num_tiles - 1 - row);
    let j = col.min(num_tiles - 1 - col);
    i + j + 2 < half
}

/// The two cells directly above and below the board centre.
fn is_win_square(num_tiles: usize, cell: Cell) -> bool {
    let half = (num_tiles / 2) as u8;
    cell == Cell::new(half, half - 1) || cell == Cell::new(half - 1, half)
}
