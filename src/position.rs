use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::Board;
use crate::error::PositionError;
use crate::geometry::{BoardGeometry, Point};
use crate::registry::{Location, StoneRegistry};
use crate::types::{Cell, StoneId};

/// One entry of a [`PositionState::set_positions`] batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub stone: StoneId,
}

impl Placement {
    pub fn new(row: usize, col: usize, stone: StoneId) -> Self {
        Self { row, col, stone }
    }
}

/// Score per seat.
///
/// Every occupied tile counts once for the row scan and once for the column
/// scan, so each stone on the board is worth 2 to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Scores(Vec<u32>);

impl Scores {
    pub fn tally(board: &Board, registry: &StoneRegistry) -> Self {
        let n = board.num_tiles() as u8;
        let mut scores = vec![0u32; registry.players().len()];
        let mut count = |cell: Cell| {
            if let Some(stone) = board.occupant(cell).and_then(|id| registry.stone(id)) {
                scores[stone.owner() as usize] += 1;
            }
        };

        for row in 0..n {
            for col in 0..n {
                count(Cell::new(row, col));
            }
        }
        for col in 0..n {
            for row in 0..n {
                count(Cell::new(row, col));
            }
        }

        Self(scores)
    }

    pub fn get(&self, seat: u8) -> u32 {
        self.0.get(seat as usize).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Occupancy of the board plus the stones and players it refers to.
///
/// Every stone is in exactly one place: a tile, its owner's rail, or the
/// pointer's grip.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionState {
    board: Board,
    registry: StoneRegistry,
    scores: Scores,
}

impl PositionState {
    pub fn new(board: Board, registry: StoneRegistry) -> Self {
        let scores = Scores::tally(&board, &registry);
        Self {
            board,
            registry,
            scores,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn registry(&self) -> &StoneRegistry {
        &self.registry
    }

    pub fn score_snapshot(&self) -> &Scores {
        &self.scores
    }

    /// Places stones in the given order. A stone already sitting on a target
    /// tile is sent to its owner's rail, so a later entry for the same tile
    /// wins. The whole batch is checked first; on error nothing changes.
    pub fn set_positions(&mut self, placements: &[Placement]) -> Result<(), PositionError> {
        let checked = placements
            .iter()
            .map(|placement| self.check(placement))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| warn!(%err, "rejected placement batch"))?;

        for (cell, stone) in checked {
            self.lift(stone);
            if let Some(previous) = self.board.occupant(cell) {
                self.displace(previous);
            }
            self.settle(stone, cell);
        }
        debug!(count = placements.len(), "placed stones");

        self.rescore();
        Ok(())
    }

    /// Moves an on-board stone to its owner's rail. Rail stones stay put.
    pub fn remove_from_board(&mut self, stone: StoneId) -> Result<(), PositionError> {
        match self.location(stone)? {
            Location::Board(cell) => {
                self.board.vacate(cell);
                self.displace(stone);
                self.rescore();
                Ok(())
            }
            Location::Rail => Ok(()),
            Location::Held => Err(PositionError::StoneInHand(stone)),
        }
    }

    /// Re-derives every screen position for new geometry.
    pub(crate) fn reconfigure(&mut self, geometry: BoardGeometry) {
        self.board.set_geometry(geometry);
        self.registry.configure(&geometry);
        let on_board: Vec<_> = self.board.occupied().collect();
        for (cell, stone) in on_board {
            self.registry.set_position(stone, geometry.board_to_screen(cell));
        }
    }

    /// The stone whose visual footprint contains `point`: an on-board stone
    /// when the pointer is within half a stone of its tile centre, otherwise
    /// a rail stone under the pointer.
    pub fn stone_at(&self, point: Point) -> Option<StoneId> {
        let coord = self.board.screen_to_board(point);
        let tile_length = self.board.geometry().tile_length();
        if let Some(cell) = coord.cell(self.board.num_tiles())
            && let Some(stone) = self.board.occupant(cell).and_then(|id| self.registry.stone(id))
            && coord.distance_from_cell_center() < stone.size() / tile_length / 2.0
        {
            return Some(stone.id());
        }
        if self.board.is_on_board(point) {
            return None;
        }
        self.registry.rail_stone_at(point)
    }

    /// Takes a stone into the pointer's grip and returns where it came from.
    pub(crate) fn pick_up(&mut self, stone: StoneId) -> Option<Location> {
        let origin = self.registry.stone(stone)?.location();
        match origin {
            Location::Board(cell) => {
                self.board.vacate(cell);
                self.rescore();
            }
            Location::Rail => {
                self.registry.take_from_rail(stone, self.board.geometry());
            }
            Location::Held => return None,
        }
        self.registry.set_location(stone, Location::Held);
        Some(origin)
    }

    pub(crate) fn move_held(&mut self, stone: StoneId, position: Point) {
        self.registry.set_position(stone, position);
    }

    /// Drops a held stone on `cell`. The caller has checked the drop target.
    pub(crate) fn drop_on(&mut self, stone: StoneId, cell: Cell) {
        self.settle(stone, cell);
        self.rescore();
    }

    /// Puts a held stone back where [`pick_up`](Self::pick_up) found it. If
    /// its tile was filled in the meantime the stone goes to its owner's rail.
    pub(crate) fn put_back(&mut self, stone: StoneId, origin: Location) {
        match origin {
            Location::Board(cell) if self.board.occupant(cell).is_none() => {
                self.drop_on(stone, cell)
            }
            Location::Board(_) | Location::Rail | Location::Held => self.displace(stone),
        }
    }

    fn check(&self, placement: &Placement) -> Result<(Cell, StoneId), PositionError> {
        let n = self.board.num_tiles();
        if placement.row >= n || placement.col >= n {
            return Err(PositionError::OutOfBounds {
                row: placement.row,
                col: placement.col,
                num_tiles: n,
            });
        }
        let cell = Cell::new(placement.row as u8, placement.col as u8);
        if self.board.tile_at(cell).is_some_and(|tile| tile.is_wall()) {
            return Err(PositionError::Wall(cell));
        }
        if self.location(placement.stone)? == Location::Held {
            return Err(PositionError::StoneInHand(placement.stone));
        }
        Ok((cell, placement.stone))
    }

    fn location(&self, stone: StoneId) -> Result<Location, PositionError> {
        self.registry
            .stone(stone)
            .map(|s| s.location())
            .ok_or(PositionError::UnknownStone(stone))
    }

    /// Detaches a stone from wherever it rests.
    fn lift(&mut self, stone: StoneId) {
        match self.registry.stone(stone).map(|s| s.location()) {
            Some(Location::Board(cell)) => {
                self.board.vacate(cell);
            }
            Some(Location::Rail) => {
                self.registry.take_from_rail(stone, self.board.geometry());
            }
            Some(Location::Held) | None => {}
        }
    }

    fn displace(&mut self, stone: StoneId) {
        debug!(%stone, "stone sent to side rail");
        self.registry.send_to_rail(stone, self.board.geometry());
    }

    fn settle(&mut self, stone: StoneId, cell: Cell) {
        self.board.place(cell, stone);
        self.registry.set_location(stone, Location::Board(cell));
        self.registry
            .set_position(stone, self.board.board_to_screen(cell));
    }

    fn rescore(&mut self) {
        self.scores = Scores::tally(&self.board, &self.registry);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{Palette, PlayerConfig};

    fn state() -> PositionState {
        let geometry = BoardGeometry::new(10, 800.0, 800.0, None, None).unwrap();
        let configs: Vec<_> = (0..4).map(PlayerConfig::new).collect();
        let registry = StoneRegistry::register_players(&configs, &geometry).unwrap();
        PositionState::new(Board::new(geometry, Palette::default()), registry)
    }

    fn stone(state: &PositionState, seat: u8, index: usize) -> StoneId {
        state.registry().stone_of(seat, index).unwrap()
    }

    pub(crate) fn assert_single_home(state: &PositionState) {
        for s in state.registry().stones() {
            let on_tiles = state.board().occupied().filter(|&(_, id)| id == s.id()).count();
            let on_rail = state
                .registry()
                .player(s.owner())
                .unwrap()
                .side_stones()
                .contains(&s.id());
            match s.location() {
                Location::Board(cell) => {
                    assert_eq!(on_tiles, 1);
                    assert_eq!(state.board().occupant(cell), Some(s.id()));
                    assert!(!on_rail);
                }
                Location::Rail => {
                    assert_eq!(on_tiles, 0);
                    assert!(on_rail);
                }
                Location::Held => {
                    assert_eq!(on_tiles, 0);
                    assert!(!on_rail);
                }
            }
        }
    }

    #[test]
    fn placing_moves_stone_to_cell_centre_and_off_the_rail() {
        let mut state = state();
        let s = stone(&state, 0, 0);

        state.set_positions(&[Placement::new(3, 5, s)]).unwrap();

        assert_eq!(state.board().occupant(Cell::new(3, 5)), Some(s));
        assert_eq!(
            state.registry().stone(s).unwrap().position(),
            state.board().board_to_screen(Cell::new(3, 5))
        );
        assert_eq!(state.registry().player(0).unwrap().side_stones().len(), 4);
        assert_single_home(&state);
    }

    #[test]
    fn single_stone_scores_two_for_its_owner_only() {
        let mut state = state();
        let s = stone(&state, 2, 0);

        state.set_positions(&[Placement::new(3, 5, s)]).unwrap();

        let scores = state.score_snapshot();
        assert_eq!(scores.as_slice(), &[0, 0, 2, 0]);
        assert_eq!(scores.get(2), 2);
        assert_eq!(scores.get(7), 0);
    }

    #[test]
    fn scores_add_up_per_owner() {
        let mut state = state();
        let placements = [
            Placement::new(3, 5, stone(&state, 0, 0)),
            Placement::new(3, 6, stone(&state, 0, 1)),
            Placement::new(6, 6, stone(&state, 1, 4)),
        ];

        state.set_positions(&placements).unwrap();

        assert_eq!(state.score_snapshot().as_slice(), &[4, 2, 0, 0]);
    }

    #[test]
    fn later_placement_on_same_tile_wins_and_displaces_earlier() {
        let mut state = state();
        let first = stone(&state, 0, 0);
        let second = stone(&state, 1, 0);

        state
            .set_positions(&[Placement::new(4, 4, first), Placement::new(4, 4, second)])
            .unwrap();

        assert_eq!(state.board().occupant(Cell::new(4, 4)), Some(second));
        let rail = state.registry().player(0).unwrap().side_stones();
        assert_eq!(rail.len(), 5);
        assert_eq!(rail.last(), Some(&first));
        assert_eq!(state.score_snapshot().as_slice(), &[0, 2, 0, 0]);
        assert_single_home(&state);
    }

    #[test]
    fn replacing_an_occupant_across_calls_displaces_it() {
        let mut state = state();
        let first = stone(&state, 3, 4);
        let second = stone(&state, 1, 2);

        state.set_positions(&[Placement::new(5, 5, first)]).unwrap();
        state.set_positions(&[Placement::new(5, 5, second)]).unwrap();

        assert_eq!(
            state.registry().stone(first).unwrap().location(),
            Location::Rail
        );
        assert_single_home(&state);
    }

    #[test]
    fn moving_a_placed_stone_vacates_its_old_tile() {
        let mut state = state();
        let s = stone(&state, 0, 0);

        state.set_positions(&[Placement::new(3, 5, s)]).unwrap();
        state.set_positions(&[Placement::new(6, 2, s)]).unwrap();

        assert_eq!(state.board().occupant(Cell::new(3, 5)), None);
        assert_eq!(state.board().occupant(Cell::new(6, 2)), Some(s));
        assert_eq!(state.score_snapshot().get(0), 2);
        assert_single_home(&state);
    }

    #[test]
    fn re_placing_a_stone_on_its_own_tile_keeps_it_there() {
        let mut state = state();
        let s = stone(&state, 0, 0);

        state.set_positions(&[Placement::new(3, 5, s)]).unwrap();
        state.set_positions(&[Placement::new(3, 5, s)]).unwrap();

        assert_eq!(state.board().occupant(Cell::new(3, 5)), Some(s));
        assert_single_home(&state);
    }

    #[test]
    fn malformed_batches_are_rejected_without_side_effects() {
        let mut state = state();
        let s = stone(&state, 0, 0);
        let before = state.clone();

        let out_of_range = [Placement::new(3, 5, s), Placement::new(10, 0, s)];
        assert_eq!(
            state.set_positions(&out_of_range).unwrap_err(),
            PositionError::OutOfBounds { row: 10, col: 0, num_tiles: 10 }
        );
        assert_eq!(
            state.set_positions(&[Placement::new(0, 0, s)]).unwrap_err(),
            PositionError::Wall(Cell::new(0, 0))
        );
        assert_eq!(
            state.set_positions(&[Placement::new(3, 5, StoneId(99))]).unwrap_err(),
            PositionError::UnknownStone(StoneId(99))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn removed_stone_lands_on_rail_and_leaves_no_tile() {
        let mut state = state();
        let s = stone(&state, 1, 1);
        state.set_positions(&[Placement::new(3, 5, s)]).unwrap();

        state.remove_from_board(s).unwrap();

        let rail = state.registry().player(1).unwrap().side_stones();
        assert!(rail.contains(&s));
        assert!(state.board().occupied().all(|(_, id)| id != s));
        assert_eq!(
            state.registry().stone(s).unwrap().position(),
            state.board().geometry().rail_slot(1, rail.len() - 1)
        );
        assert_eq!(state.score_snapshot().get(1), 0);
        // Removing a rail stone again is a no-op.
        state.remove_from_board(s).unwrap();
        assert_single_home(&state);
    }

    #[test]
    fn hitbox_is_half_a_stone_around_the_tile_centre() {
        let mut state = state();
        let s = stone(&state, 0, 0);
        state.set_positions(&[Placement::new(3, 5, s)]).unwrap();
        let centre = state.board().board_to_screen(Cell::new(3, 5));

        assert_eq!(state.stone_at(centre), Some(s));
        assert_eq!(state.stone_at(centre + Point::new(20.0, 0.0)), Some(s));
        // Inside the tile diamond but outside the 27px stone radius.
        assert_eq!(state.stone_at(centre + Point::new(40.0, 0.0)), None);
        assert_eq!(state.stone_at(state.board().board_to_screen(Cell::new(3, 6))), None);
    }

    #[test]
    fn rail_stones_can_be_hit_off_the_board() {
        let state = state();
        let slot = state.board().geometry().rail_slot(0, 0);

        assert_eq!(state.stone_at(slot), Some(stone(&state, 0, 0)));
    }

    #[test]
    fn pick_up_and_put_back_restore_the_position() {
        let mut state = state();
        let s = stone(&state, 0, 0);
        state.set_positions(&[Placement::new(2, 5, s)]).unwrap();
        let before = state.clone();

        let origin = state.pick_up(s).unwrap();
        assert_eq!(origin, Location::Board(Cell::new(2, 5)));
        assert_eq!(state.board().occupant(Cell::new(2, 5)), None);
        assert_eq!(state.score_snapshot().get(0), 0);
        assert_eq!(state.pick_up(s), None);
        assert_eq!(
            state.set_positions(&[Placement::new(3, 5, s)]).unwrap_err(),
            PositionError::StoneInHand(s)
        );
        assert_single_home(&state);

        state.move_held(s, Point::new(1.0, 2.0));
        state.put_back(s, origin);
        assert_eq!(state, before);
    }

    #[test]
    fn put_back_onto_a_refilled_tile_sends_stone_to_rail() {
        let mut state = state();
        let held = stone(&state, 0, 0);
        let other = stone(&state, 1, 0);
        state.set_positions(&[Placement::new(2, 5, held)]).unwrap();

        let origin = state.pick_up(held).unwrap();
        state.set_positions(&[Placement::new(2, 5, other)]).unwrap();
        state.put_back(held, origin);

        assert_eq!(state.board().occupant(Cell::new(2, 5)), Some(other));
        assert_eq!(state.registry().stone(held).unwrap().location(), Location::Rail);
        assert_eq!(
            state.registry().player(0).unwrap().side_stones().last(),
            Some(&held)
        );
        assert_eq!(state.score_snapshot().as_slice(), &[0, 2, 0, 0]);
        assert_single_home(&state);
    }

    #[test]
    fn reconfigure_recentres_stones_on_board() {
        let mut state = state();
        let s = stone(&state, 0, 0);
        state.set_positions(&[Placement::new(3, 5, s)]).unwrap();
        let smaller = BoardGeometry::new(10, 400.0, 400.0, None, None).unwrap();

        state.reconfigure(smaller);

        assert_eq!(
            state.registry().stone(s).unwrap().position(),
            smaller.board_to_screen(Cell::new(3, 5))
        );
        assert_eq!(
            state.registry().stone(stone(&state, 0, 1)).unwrap().position(),
            smaller.rail_slot(0, 0)
        );
    }
}
