use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Supported deck compositions, named by their configured size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeckSize {
    /// Ace plus seven through king in every suit.
    #[default]
    Short32,
    /// Every rank from ace to king. Configured as 54 but holds 52 cards:
    /// the model has no jokers.
    Full54,
}

impl DeckSize {
    pub const fn from_count(count: u32) -> Option<Self> {
        match count {
            32 => Some(DeckSize::Short32),
            54 => Some(DeckSize::Full54),
            _ => None,
        }
    }

    /// The size this deck is configured with.
    pub const fn label(self) -> u32 {
        match self {
            DeckSize::Short32 => 32,
            DeckSize::Full54 => 54,
        }
    }

    /// Number of cards `generate` yields.
    pub const fn card_count(self) -> usize {
        self.ranks().len() * Suit::ALL.len()
    }

    pub const fn ranks(self) -> &'static [Rank] {
        match self {
            DeckSize::Short32 => &Rank::SHORT,
            DeckSize::Full54 => &Rank::ORDERED,
        }
    }
}

impl fmt::Display for DeckSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lazily yields a fresh deck, suit by suit. Call again for a new deck.
pub fn generate(size: DeckSize) -> impl Iterator<Item = Card> {
    let ranks = size.ranks();
    Suit::ALL
        .into_iter()
        .flat_map(move |suit| ranks.iter().map(move |&rank| Card::new(suit, rank)))
}
