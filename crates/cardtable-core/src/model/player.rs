use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::notify::{ChangeNotifier, NotifyError};
use core::fmt;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Zero-based position of a player around the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat(usize);

impl Seat {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    pub const fn next(self, player_count: usize) -> Seat {
        Seat((self.0 + 1) % player_count)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0 + 1)
    }
}

/// How a player's cards get chosen, fixed when the player is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Automated,
    Interactive,
}

/// What a chooser sees when asked for a card.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceRequest<'a> {
    pub seat: Seat,
    pub player: &'a str,
    pub choices: &'a [Card],
}

#[derive(Debug, Error)]
pub enum ChoiceError {
    #[error("choice {index} is outside of the {len} available cards")]
    OutOfRange { index: usize, len: usize },
    #[error("input closed before a card was chosen")]
    InputClosed,
    #[error("failed to read the choice: {0}")]
    Io(#[from] std::io::Error),
}

/// Strategy deciding which card of the hand a player gives next.
pub trait CardChooser {
    /// Returns the zero-based index into `request.choices`.
    fn choose(
        &mut self,
        request: &ChoiceRequest<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<usize, ChoiceError>;
}

/// Picks uniformly among the cards in hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChooser;

impl CardChooser for RandomChooser {
    fn choose(
        &mut self,
        request: &ChoiceRequest<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<usize, ChoiceError> {
        match request.choices.len() {
            0 => Err(ChoiceError::OutOfRange { index: 0, len: 0 }),
            1 => Ok(0),
            len => Ok(rng.gen_range(0..len)),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlayError {
    #[error("{player} has no card left to play")]
    EmptyHand { player: String },
    #[error("{player} could not choose a card: {source}")]
    Choice {
        player: String,
        #[source]
        source: ChoiceError,
    },
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerChange {
    Received { count: usize },
    Played { card: Card },
}

/// Snapshot of a player published after every change to its hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEvent {
    pub seat: Seat,
    pub name: String,
    pub visible: bool,
    pub hand: Vec<Card>,
    pub change: PlayerChange,
}

pub struct Player {
    name: String,
    seat: Seat,
    hand: Hand,
    visible: bool,
    kind: PlayerKind,
    chooser: Box<dyn CardChooser>,
    notifier: ChangeNotifier<PlayerEvent>,
}

impl Player {
    /// A hidden player choosing its cards at random.
    pub fn automated(name: impl Into<String>) -> Self {
        Self::with_chooser(name, PlayerKind::Automated, Box::new(RandomChooser))
    }

    /// A visible player whose choices come from outside the engine.
    pub fn interactive(name: impl Into<String>, chooser: impl CardChooser + 'static) -> Self {
        Self::with_chooser(name, PlayerKind::Interactive, Box::new(chooser)).with_visibility(true)
    }

    pub fn with_chooser(
        name: impl Into<String>,
        kind: PlayerKind,
        chooser: Box<dyn CardChooser>,
    ) -> Self {
        Self {
            name: name.into(),
            seat: Seat::new(0),
            hand: Hand::new(),
            visible: false,
            kind,
            chooser,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub(crate) fn set_seat(&mut self, seat: Seat) {
        self.seat = seat;
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&PlayerEvent) -> Result<(), NotifyError> + 'static,
    {
        self.notifier.subscribe(callback);
    }

    /// Adds one or several cards to the hand.
    pub fn receive<I: IntoIterator<Item = Card>>(&mut self, cards: I) -> Result<(), NotifyError> {
        let before = self.hand.len();
        self.hand.extend(cards);
        let count = self.hand.len() - before;
        self.publish(PlayerChange::Received { count })
    }

    /// Lets the chooser pick a card, then removes it from the hand.
    pub fn give_card(&mut self, rng: &mut dyn RngCore) -> Result<Card, PlayError> {
        if self.hand.is_empty() {
            return Err(PlayError::EmptyHand {
                player: self.name.clone(),
            });
        }

        let request = ChoiceRequest {
            seat: self.seat,
            player: &self.name,
            choices: self.hand.cards(),
        };
        let len = request.choices.len();
        let index = self
            .chooser
            .choose(&request, rng)
            .map_err(|source| PlayError::Choice {
                player: self.name.clone(),
                source,
            })?;
        let card = self.hand.take(index).ok_or_else(|| PlayError::Choice {
            player: self.name.clone(),
            source: ChoiceError::OutOfRange { index, len },
        })?;

        self.publish(PlayerChange::Played { card })?;
        Ok(card)
    }

    pub fn clear_hand(&mut self) {
        self.hand.clear();
    }

    fn publish(&mut self, change: PlayerChange) -> Result<(), NotifyError> {
        let event = PlayerEvent {
            seat: self.seat,
            name: self.name.clone(),
            visible: self.visible,
            hand: self.hand.cards().to_vec(),
            change,
        };
        self.notifier.notify(&event)
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("seat", &self.seat)
            .field("hand", &self.hand)
            .field("visible", &self.visible)
            .field("kind", &self.kind)
            .finish()
    }
}
