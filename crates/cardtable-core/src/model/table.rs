use crate::game::definition::GameDefinition;
use crate::game::match_state::Match;
use crate::model::pile::DrawPile;
use crate::model::player::{Player, Seat};
use crate::model::score::ScoreSheet;
use crate::model::trick::PlayArea;
use tracing::{Level, event};

/// Where players meet: their seats, the play area, the draw pile and the
/// score sheet of the match being played.
#[derive(Debug, Default)]
pub struct Table {
    players: Vec<Player>,
    play_area: PlayArea,
    draw_pile: DrawPile,
    score_sheet: ScoreSheet,
}

impl Table {
    pub fn new() -> Self {
        event!(target: "cardtable::table", Level::INFO, "table initialised");
        Self::default()
    }

    /// Seats the given players in order, replacing anyone already seated.
    pub fn seat<I: IntoIterator<Item = Player>>(&mut self, players: I) {
        self.players = players
            .into_iter()
            .enumerate()
            .map(|(index, mut player)| {
                player.set_seat(Seat::new(index));
                player
            })
            .collect();
        event!(
            target: "cardtable::table",
            Level::INFO,
            players = self.players.len(),
            "players seated"
        );
    }

    /// Prepares a match of `definition` on this table.
    pub fn dedicate<'d>(&self, definition: &'d GameDefinition, seed: u64) -> Match<'d> {
        event!(
            target: "cardtable::table",
            Level::INFO,
            game = %definition.name(),
            seed,
            "table dedicated to game"
        );
        Match::new(definition, seed)
    }

    /// One match per session for now.
    pub fn wants_to_stop(&self) -> bool {
        true
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn play_area(&self) -> &PlayArea {
        &self.play_area
    }

    pub fn play_area_mut(&mut self) -> &mut PlayArea {
        &mut self.play_area
    }

    pub fn draw_pile(&self) -> &DrawPile {
        &self.draw_pile
    }

    pub fn draw_pile_mut(&mut self) -> &mut DrawPile {
        &mut self.draw_pile
    }

    pub fn score_sheet(&self) -> &ScoreSheet {
        &self.score_sheet
    }

    pub fn score_sheet_mut(&mut self) -> &mut ScoreSheet {
        &mut self.score_sheet
    }

    /// Borrows players, draw pile and play area at once.
    pub fn split_mut(&mut self) -> (&mut [Player], &mut DrawPile, &mut PlayArea) {
        (&mut self.players, &mut self.draw_pile, &mut self.play_area)
    }

    /// Cards in hands, in the draw pile and on the play area.
    pub fn cards_in_play(&self) -> usize {
        let in_hands: usize = self.players.iter().map(|p| p.hand().len()).sum();
        in_hands + self.draw_pile.len() + self.play_area.len()
    }

    pub fn clear_hands(&mut self) {
        for player in &mut self.players {
            player.clear_hand();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Table;
    use crate::model::card::Card;
    use crate::model::player::{Player, Seat};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn seating_assigns_positions_in_order() {
        let mut table = Table::new();
        table.seat([
            Player::automated("north"),
            Player::automated("east"),
            Player::automated("south"),
        ]);
        assert_eq!(table.player_count(), 3);
        assert_eq!(table.player(Seat::new(1)).unwrap().name(), "east");
        assert_eq!(table.players()[2].seat(), Seat::new(2));
        assert!(table.player(Seat::new(3)).is_none());
    }

    #[test]
    fn cards_in_play_counts_every_zone() {
        let mut table = Table::new();
        table.seat([Player::automated("a"), Player::automated("b")]);
        table.players_mut()[0]
            .receive([Card::new(Suit::Clubs, Rank::Ace)])
            .unwrap();
        table
            .draw_pile_mut()
            .refill([Card::new(Suit::Hearts, Rank::Two)])
            .unwrap();
        table
            .play_area_mut()
            .lay(Seat::new(1), Card::new(Suit::Spades, Rank::King))
            .unwrap();
        assert_eq!(table.cards_in_play(), 3);

        table.clear_hands();
        assert_eq!(table.cards_in_play(), 2);
    }
}
