use crate::model::card::Card;
use crate::model::player::Seat;
use crate::notify::{ChangeNotifier, NotifyError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

/// A completed trick, archived by the round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trick {
    plays: Vec<Play>,
}

impl Trick {
    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAreaChange {
    Played(Play),
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayAreaEvent {
    pub plays: Vec<Play>,
    pub change: PlayAreaChange,
}

/// Shared surface holding the cards of the trick being played.
#[derive(Debug, Default)]
pub struct PlayArea {
    plays: Vec<Play>,
    notifier: ChangeNotifier<PlayAreaEvent>,
}

impl PlayArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&PlayAreaEvent) -> Result<(), NotifyError> + 'static,
    {
        self.notifier.subscribe(callback);
    }

    pub fn lay(&mut self, seat: Seat, card: Card) -> Result<(), NotifyError> {
        let play = Play { seat, card };
        self.plays.push(play);
        self.publish(PlayAreaChange::Played(play))
    }

    /// Moves the current plays into a [`Trick`] and empties the surface.
    pub fn collect(&mut self) -> Result<Trick, NotifyError> {
        let trick = Trick {
            plays: std::mem::take(&mut self.plays),
        };
        self.publish(PlayAreaChange::Cleared)?;
        Ok(trick)
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    fn publish(&mut self, change: PlayAreaChange) -> Result<(), NotifyError> {
        let event = PlayAreaEvent {
            plays: self.plays.clone(),
            change,
        };
        self.notifier.notify(&event)
    }
}
