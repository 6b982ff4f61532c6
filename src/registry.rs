use tracing::trace;

use crate::config::{MAX_PLAYERS, PlayerConfig};
use crate::error::ConfigurationError;
use crate::geometry::{BoardGeometry, Point};
use crate::types::{Cell, StoneId, StoneVariant, StoneView};

/// Where a stone currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Board(Cell),
    /// On its owner's side rail.
    Rail,
    /// Picked up by the pointer.
    Held,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stone {
    id: StoneId,
    owner: u8,
    variant: StoneVariant,
    position: Point,
    size: f64,
    location: Location,
}

impl Stone {
    pub fn id(&self) -> StoneId {
        self.id
    }

    /// Seat of the owning player.
    pub fn owner(&self) -> u8 {
        self.owner
    }

    pub fn variant(&self) -> StoneVariant {
        self.variant
    }

    /// Screen-space centre.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Diameter.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    seat: u8,
    stone_image: u32,
    stones: Vec<StoneId>,
    side_stones: Vec<StoneId>,
}

impl Player {
    /// Seat index, 0..4, in registration order.
    pub fn seat(&self) -> u8 {
        self.seat
    }

    pub fn stone_image(&self) -> u32 {
        self.stone_image
    }

    /// All stones of this player; the capstone comes last.
    pub fn stones(&self) -> &[StoneId] {
        &self.stones
    }

    /// Stones currently off the board, in rail order.
    pub fn side_stones(&self) -> &[StoneId] {
        &self.side_stones
    }
}

/// Owns every player and every stone for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct StoneRegistry {
    players: Vec<Player>,
    stones: Vec<Stone>,
}

impl StoneRegistry {
    /// Seats players in the given order and gives each of them `num_stones`
    /// normal stones plus one capstone, all starting on the side rail.
    pub fn register_players(
        configs: &[PlayerConfig],
        geometry: &BoardGeometry,
    ) -> Result<Self, ConfigurationError> {
        if configs.len() > MAX_PLAYERS {
            return Err(ConfigurationError::TooManyPlayers(configs.len()));
        }
        if configs.is_empty() {
            return Err(ConfigurationError::NoPlayers);
        }

        let mut registry = Self {
            players: Vec::with_capacity(configs.len()),
            stones: Vec::new(),
        };

        for (seat, config) in configs.iter().enumerate() {
            let seat = seat as u8;
            let variants = std::iter::repeat_n(StoneVariant::Normal, config.num_stones)
                .chain(std::iter::once(StoneVariant::Capstone));

            let mut stones = Vec::with_capacity(config.num_stones + 1);
            for variant in variants {
                let id = StoneId(registry.stones.len());
                registry.stones.push(Stone {
                    id,
                    owner: seat,
                    variant,
                    position: Point::default(),
                    size: geometry.stone_size(),
                    location: Location::Rail,
                });
                stones.push(id);
            }

            registry.players.push(Player {
                seat,
                stone_image: config.stone_image,
                side_stones: stones.clone(),
                stones,
            });
            registry.relayout_side_rail(seat, geometry);
        }

        Ok(registry)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: u8) -> Option<&Player> {
        self.players.get(seat as usize)
    }

    pub fn stones(&self) -> &[Stone] {
        &self.stones
    }

    pub fn stone(&self, id: StoneId) -> Option<&Stone> {
        self.stones.get(id.0)
    }

    /// The `index`th stone of the player at `seat`.
    pub fn stone_of(&self, seat: u8, index: usize) -> Option<StoneId> {
        self.player(seat)?.stones.get(index).copied()
    }

    /// Applies a new stone size and re-lays every rail.
    pub fn configure(&mut self, geometry: &BoardGeometry) {
        let size = geometry.stone_size();
        for stone in &mut self.stones {
            stone.size = size;
        }
        for seat in 0..self.players.len() as u8 {
            self.relayout_side_rail(seat, geometry);
        }
    }

    /// Packs `seat`'s off-board stones into consecutive rail slots.
    pub fn relayout_side_rail(&mut self, seat: u8, geometry: &BoardGeometry) {
        let Some(player) = self.players.get(seat as usize) else {
            return;
        };
        for (index, id) in player.side_stones.iter().enumerate() {
            self.stones[id.0].position = geometry.rail_slot(seat, index);
        }
        trace!(seat, count = player.side_stones.len(), "side rail laid out");
    }

    /// Puts a stone on its owner's rail, at the end, and re-lays that rail.
    pub(crate) fn send_to_rail(&mut self, id: StoneId, geometry: &BoardGeometry) {
        let stone = &mut self.stones[id.0];
        stone.location = Location::Rail;
        let seat = stone.owner;
        let rail = &mut self.players[seat as usize].side_stones;
        if !rail.contains(&id) {
            rail.push(id);
        }
        self.relayout_side_rail(seat, geometry);
    }

    /// Takes a stone off its owner's rail and closes the gap it leaves.
    /// Returns whether the stone was on the rail.
    pub(crate) fn take_from_rail(&mut self, id: StoneId, geometry: &BoardGeometry) -> bool {
        let seat = self.stones[id.0].owner;
        let rail = &mut self.players[seat as usize].side_stones;
        let Some(index) = rail.iter().position(|&s| s == id) else {
            return false;
        };
        rail.remove(index);
        self.relayout_side_rail(seat, geometry);
        true
    }

    pub(crate) fn set_location(&mut self, id: StoneId, location: Location) {
        self.stones[id.0].location = location;
    }

    pub(crate) fn set_position(&mut self, id: StoneId, position: Point) {
        self.stones[id.0].position = position;
    }

    /// The topmost rail stone whose disc contains `point`.
    pub fn rail_stone_at(&self, point: Point) -> Option<StoneId> {
        self.players
            .iter()
            .rev()
            .flat_map(|player| player.side_stones.iter().rev())
            .copied()
            .find(|id| {
                let stone = &self.stones[id.0];
                stone.position.distance(point) < stone.size / 2.0
            })
    }

    pub fn view(&self, id: StoneId) -> StoneView {
        let stone = &self.stones[id.0];
        StoneView {
            id,
            owner: stone.owner,
            image_id: self.players[stone.owner as usize].stone_image,
            variant: stone.variant,
            position: stone.position,
            size: stone.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    fn geometry() -> BoardGeometry {
        BoardGeometry::new(10, 800.0, 800.0, None, None).unwrap()
    }

    fn four_players() -> StoneRegistry {
        let configs: Vec<_> = (0..4).map(PlayerConfig::new).collect();
        StoneRegistry::register_players(&configs, &geometry()).unwrap()
    }

    #[test]
    fn more_than_four_players_is_a_configuration_error() {
        let configs: Vec<_> = (0..5).map(PlayerConfig::new).collect();

        assert_eq!(
            StoneRegistry::register_players(&configs, &geometry()).unwrap_err(),
            ConfigurationError::TooManyPlayers(5)
        );
        assert_eq!(
            StoneRegistry::register_players(&[], &geometry()).unwrap_err(),
            ConfigurationError::NoPlayers
        );
    }

    #[test]
    fn seats_follow_registration_order_and_capstone_is_last() {
        let registry = four_players();

        for (seat, player) in registry.players().iter().enumerate() {
            assert_eq!(player.seat(), seat as u8);
            assert_eq!(player.stone_image(), seat as u32);
            assert_eq!(player.stones().len(), 5);

            let variants: Vec<_> = player
                .stones()
                .iter()
                .map(|&id| registry.stone(id).unwrap().variant())
                .collect();
            assert_eq!(variants.iter().filter(|&&v| v == StoneVariant::Capstone).count(), 1);
            assert_eq!(variants.last(), Some(&StoneVariant::Capstone));
        }
        assert_eq!(registry.stone_of(1, 0), Some(StoneId(5)));
        assert_eq!(registry.stone_of(1, 5), None);
        assert_eq!(registry.stone_of(4, 0), None);
    }

    #[test]
    fn every_stone_starts_packed_on_its_rail() {
        let registry = four_players();
        let g = geometry();

        for player in registry.players() {
            assert_eq!(player.side_stones(), player.stones());
            for (index, &id) in player.side_stones().iter().enumerate() {
                let stone = registry.stone(id).unwrap();
                assert_eq!(stone.location(), Location::Rail);
                assert_eq!(stone.position(), g.rail_slot(player.seat(), index));
                assert!((stone.size() - 54.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn taking_a_stone_closes_the_gap() {
        let mut registry = four_players();
        let g = geometry();
        let removed = registry.stone_of(0, 1).unwrap();

        assert!(registry.take_from_rail(removed, &g));
        assert!(!registry.take_from_rail(removed, &g));

        let rail = registry.player(0).unwrap().side_stones().to_vec();
        assert_eq!(rail, vec![StoneId(0), StoneId(2), StoneId(3), StoneId(4)]);
        assert_eq!(registry.stone(StoneId(2)).unwrap().position(), g.rail_slot(0, 1));
        // Other seats are untouched.
        assert_eq!(registry.stone(StoneId(6)).unwrap().position(), g.rail_slot(1, 1));
    }

    #[test]
    fn returning_a_stone_appends_it_to_the_rail() {
        let mut registry = four_players();
        let g = geometry();
        let id = registry.stone_of(2, 0).unwrap();

        registry.take_from_rail(id, &g);
        registry.set_location(id, Location::Board(Cell::new(3, 5)));
        registry.send_to_rail(id, &g);
        registry.send_to_rail(id, &g);

        let rail = registry.player(2).unwrap().side_stones();
        assert_eq!(rail.len(), 5);
        assert_eq!(rail.last(), Some(&id));
        assert_eq!(registry.stone(id).unwrap().location(), Location::Rail);
        assert_eq!(registry.stone(id).unwrap().position(), g.rail_slot(2, 4));
    }

    #[test]
    fn rail_stone_hit_test() {
        let registry = four_players();
        let g = geometry();
        let slot = g.rail_slot(1, 2);

        assert_eq!(registry.rail_stone_at(slot), Some(StoneId(7)));
        assert_eq!(registry.rail_stone_at(Point::new(slot.x + 26.0, slot.y)), Some(StoneId(7)));
        assert_eq!(registry.rail_stone_at(Point::new(400.0, 400.0)), None);
    }

    #[test]
    fn configure_resizes_every_stone() {
        let mut registry = four_players();
        let smaller = BoardGeometry::new(10, 400.0, 400.0, None, None).unwrap();

        registry.configure(&smaller);

        assert!(registry.stones().iter().all(|s| (s.size() - 27.0).abs() < 1e-9));
        assert_eq!(registry.stone(StoneId(0)).unwrap().position(), smaller.rail_slot(0, 0));
    }

    quickcheck! {
        fn rail_stays_contiguous_after_removals(mask: u8) -> bool {
            let mut registry = four_players();
            let g = geometry();
            for index in 0..5 {
                if mask & (1 << index) != 0 {
                    let id = registry.stone_of(3, index).unwrap();
                    registry.take_from_rail(id, &g);
                }
            }
            registry
                .player(3)
                .unwrap()
                .side_stones()
                .iter()
                .enumerate()
                .all(|(index, &id)| registry.stone(id).unwrap().position() == g.rail_slot(3, index))
        }
    }
}
