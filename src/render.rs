use serde::Serialize;

use crate::types::{BoardView, StoneView, StoneVariant};

/// The painter. Receives everything it draws by reference and never feeds
/// anything back into the game.
pub trait Renderer {
    fn board(&mut self, board: &BoardView);
    fn stone(&mut self, stone: &StoneView);
    /// Extra ring drawn over a capstone.
    fn capstone_ring(&mut self, stone: &StoneView);
}

/// Draws one stone, dispatching on its variant.
pub fn draw_stone<R: Renderer + ?Sized>(renderer: &mut R, stone: &StoneView) {
    renderer.stone(stone);
    match stone.variant {
        StoneVariant::Normal => {}
        StoneVariant::Capstone => renderer.capstone_ring(stone),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Board(BoardView),
    Stone(StoneView),
    CapstoneRing(StoneView),
}

/// Records draw calls so a JS painter can replay them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Renderer for Frame {
    fn board(&mut self, board: &BoardView) {
        self.commands.push(DrawCommand::Board(board.clone()));
    }

    fn stone(&mut self, stone: &StoneView) {
        self.commands.push(DrawCommand::Stone(stone.clone()));
    }

    fn capstone_ring(&mut self, stone: &StoneView) {
        self.commands.push(DrawCommand::CapstoneRing(stone.clone()));
    }
}
