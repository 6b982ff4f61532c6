use tracing::debug;

use crate::geometry::Point;
use crate::position::PositionState;
use crate::registry::Location;
use crate::types::{Cursor, StoneId};

/// A stone held by the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub stone: StoneId,
    /// Stone centre minus pointer at the moment of the grab.
    pub offset: Point,
    /// Where the stone goes back to if the drop is not valid.
    pub origin: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Grab),
}

/// Pointer drag-and-drop of stones. Only one stone can be held at a time.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: DragState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn held_stone(&self) -> Option<StoneId> {
        match self.state {
            DragState::Dragging(grab) => Some(grab.stone),
            DragState::Idle => None,
        }
    }

    pub fn pointer_down(&mut self, position: &mut PositionState, point: Point) -> Cursor {
        if let DragState::Dragging(_) = self.state {
            return Cursor::Grabbing;
        }
        let Some(stone) = position.stone_at(point) else {
            return Cursor::Default;
        };
        let Some(centre) = position.registry().stone(stone).map(|s| s.position()) else {
            return Cursor::Default;
        };
        let Some(origin) = position.pick_up(stone) else {
            return Cursor::Default;
        };

        debug!(%stone, ?origin, "stone grabbed");
        self.state = DragState::Dragging(Grab {
            stone,
            offset: centre - point,
            origin,
        });
        Cursor::Grabbing
    }

    pub fn pointer_move(&mut self, position: &mut PositionState, point: Point) -> Cursor {
        let DragState::Dragging(grab) = self.state else {
            return hover_cursor(position, point);
        };

        position.move_held(grab.stone, point + grab.offset);
        let target = position
            .board()
            .cell_at(point)
            .filter(|&cell| position.board().is_drop_target(cell));
        let board = position.board_mut();
        match target {
            Some(cell) => board.set_highlighted([cell]),
            None => board.clear_highlighted(),
        }
        Cursor::Grabbing
    }

    pub fn pointer_up(&mut self, position: &mut PositionState, point: Point) -> Cursor {
        if let DragState::Dragging(grab) = std::mem::take(&mut self.state) {
            let target = position
                .board()
                .cell_at(point)
                .filter(|&cell| position.board().is_drop_target(cell));
            match target {
                Some(cell) => {
                    debug!(stone = %grab.stone, %cell, "move committed");
                    position.drop_on(grab.stone, cell);
                }
                None => {
                    debug!(stone = %grab.stone, origin = ?grab.origin, "move reverted");
                    position.put_back(grab.stone, grab.origin);
                }
            }
        }

        position.board_mut().clear_highlighted();
        hover_cursor(position, point)
    }
}

fn hover_cursor(position: &PositionState, point: Point) -> Cursor {
    if position.stone_at(point).is_some() {
        Cursor::Grab
    } else {
        Cursor::Default
    }
}
