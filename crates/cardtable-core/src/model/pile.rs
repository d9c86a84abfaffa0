use crate::model::card::Card;
use crate::notify::{ChangeNotifier, NotifyError};
use rand::RngCore;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PileChange {
    Filled,
    Shuffled,
    Drawn(Card),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PileEvent {
    pub remaining: usize,
    pub change: PileChange,
}

/// The undealt cards of the current round.
#[derive(Debug, Default)]
pub struct DrawPile {
    cards: Vec<Card>,
    notifier: ChangeNotifier<PileEvent>,
}

impl DrawPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&PileEvent) -> Result<(), NotifyError> + 'static,
    {
        self.notifier.subscribe(callback);
    }

    /// Adds a fresh set of cards on top of whatever is left.
    pub fn refill<I: IntoIterator<Item = Card>>(&mut self, cards: I) -> Result<(), NotifyError> {
        self.cards.extend(cards);
        self.publish(PileChange::Filled)
    }

    pub fn shuffle(&mut self, rng: &mut dyn RngCore) -> Result<(), NotifyError> {
        self.cards.shuffle(rng);
        self.publish(PileChange::Shuffled)
    }

    /// Takes the top (last) card.
    pub fn draw(&mut self) -> Result<Option<Card>, NotifyError> {
        let Some(card) = self.cards.pop() else {
            return Ok(None);
        };
        self.publish(PileChange::Drawn(card))?;
        Ok(Some(card))
    }

    /// Drops whatever is left without notifying.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn publish(&mut self, change: PileChange) -> Result<(), NotifyError> {
        let event = PileEvent {
            remaining: self.cards.len(),
            change,
        };
        self.notifier.notify(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawPile, PileChange};
    use crate::model::card::Card;
    use crate::model::deck::{DeckSize, generate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sorted(cards: &[Card]) -> Vec<Card> {
        let mut cards = cards.to_vec();
        cards.sort_by_key(|card| (card.suit, card.rank));
        cards
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pile = DrawPile::new();
        pile.refill(generate(DeckSize::Full54)).unwrap();
        let before = pile.cards().to_vec();

        pile.shuffle(&mut rng).unwrap();

        assert_eq!(pile.len(), before.len());
        assert_ne!(pile.cards(), before.as_slice());
        assert_eq!(sorted(pile.cards()), sorted(&before));
    }

    #[test]
    fn shuffle_with_same_seed_is_deterministic() {
        let mut a = DrawPile::new();
        let mut b = DrawPile::new();
        a.refill(generate(DeckSize::Short32)).unwrap();
        b.refill(generate(DeckSize::Short32)).unwrap();
        a.shuffle(&mut StdRng::seed_from_u64(5)).unwrap();
        b.shuffle(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn draw_takes_last_card_and_reports_remaining() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut pile = DrawPile::new();
        let sink = Rc::clone(&events);
        pile.subscribe(move |event| {
            sink.borrow_mut().push(*event);
            Ok(())
        });
        pile.refill(generate(DeckSize::Short32)).unwrap();
        let top = *pile.cards().last().unwrap();

        assert_eq!(pile.draw().unwrap(), Some(top));

        let events = events.borrow();
        assert_eq!(events[0].change, PileChange::Filled);
        assert_eq!(events[0].remaining, 32);
        assert_eq!(events[1].change, PileChange::Drawn(top));
        assert_eq!(events[1].remaining, 31);
    }

    #[test]
    fn draw_from_empty_pile_returns_none() {
        let mut pile = DrawPile::new();
        assert_eq!(pile.draw().unwrap(), None);
    }
}
