use tracing::{info, warn};

use crate::board::Board;
use crate::config::{GameConfig, MAX_PLAYERS};
use crate::error::{ConfigurationError, PositionError};
use crate::geometry::{BoardGeometry, Point};
use crate::interaction::{DragState, InteractionController};
use crate::position::{Placement, PositionState, Scores};
use crate::registry::StoneRegistry;
use crate::render::{Frame, Renderer, draw_stone};
use crate::types::{Cursor, GameState, StoneId};

/// A game of Diagon: the board, its stones and the pointer driving them.
pub struct Diagon {
    position: PositionState,
    controller: InteractionController,
    board_width: Option<f64>,
    board_height: Option<f64>,
}

impl Diagon {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigurationError> {
        Self::build(config).inspect_err(|err| warn!(%err, "invalid game configuration"))
    }

    fn build(config: &GameConfig) -> Result<Self, ConfigurationError> {
        if config.players.len() > MAX_PLAYERS {
            return Err(ConfigurationError::TooManyPlayers(config.players.len()));
        }
        let geometry = BoardGeometry::new(
            config.num_tiles,
            config.canvas_width,
            config.canvas_height,
            config.board_width,
            config.board_height,
        )?;
        let registry = StoneRegistry::register_players(&config.players, &geometry)?;
        let board = Board::new(geometry, config.palette.clone());

        info!(
            num_tiles = config.num_tiles,
            players = config.players.len(),
            canvas = geometry.canvas_side(),
            "game created"
        );
        Ok(Self {
            position: PositionState::new(board, registry),
            controller: InteractionController::new(),
            board_width: config.board_width,
            board_height: config.board_height,
        })
    }

    pub fn position(&self) -> &PositionState {
        &self.position
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn registry(&self) -> &StoneRegistry {
        self.position.registry()
    }

    /// The `index`th stone of the player at `seat`; the capstone is last.
    pub fn stone(&self, seat: u8, index: usize) -> Option<StoneId> {
        self.registry().stone_of(seat, index)
    }

    pub fn set_positions(&mut self, placements: &[Placement]) -> Result<(), PositionError> {
        self.position.set_positions(placements)
    }

    pub fn remove_from_board(&mut self, stone: StoneId) -> Result<(), PositionError> {
        self.position.remove_from_board(stone)
    }

    pub fn score_snapshot(&self) -> &Scores {
        self.position.score_snapshot()
    }

    pub fn drag_state(&self) -> DragState {
        self.controller.state()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Cursor {
        self.controller.pointer_down(&mut self.position, Point::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Cursor {
        self.controller.pointer_move(&mut self.position, Point::new(x, y))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Cursor {
        self.controller.pointer_up(&mut self.position, Point::new(x, y))
    }

    /// Re-derives all geometry for a new canvas size, keeping the tile count.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), ConfigurationError> {
        let geometry = BoardGeometry::new(
            self.board().num_tiles(),
            width,
            height,
            self.board_width,
            self.board_height,
        )?;
        self.position.reconfigure(geometry);
        info!(canvas = geometry.canvas_side(), "board resized");
        Ok(())
    }

    /// Paints the board, every resting stone by seat, then the held stone on top.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        let registry = self.registry();
        let held = self.controller.held_stone();

        renderer.board(&self.board().to_view());
        for player in registry.players() {
            for &id in player.stones() {
                if Some(id) != held {
                    draw_stone(renderer, &registry.view(id));
                }
            }
        }
        if let Some(id) = held {
            draw_stone(renderer, &registry.view(id));
        }
    }

    pub fn to_frame(&self) -> Frame {
        let mut frame = Frame::default();
        self.render(&mut frame);
        frame
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            num_tiles: self.board().num_tiles(),
            board: self.board().occupants(),
            scores: self.score_snapshot().as_slice().to_vec(),
            side_stones: self
                .registry()
                .players()
                .iter()
                .map(|p| p.side_stones().to_vec())
                .collect(),
            dragging: self.controller.held_stone(),
        }
    }
}
