//! One round ("deal"): the pipeline of steps run between refilling the draw
//! pile and recording the scores.

use crate::game::definition::GameDefinition;
use crate::model::player::{PlayError, Seat};
use crate::model::score::RoundScores;
use crate::model::table::Table;
use crate::model::trick::Trick;
use crate::notify::NotifyError;
use rand::RngCore;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("no players are seated at the table")]
    NoPlayers,
    #[error("{cards} cards cannot be dealt evenly to {players} players")]
    UnevenDeal { cards: usize, players: usize },
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("round step '{step}' failed: {message}")]
    Step { step: &'static str, message: String },
}

/// Record of a round: its number, the tricks played and the points awarded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Round {
    number: u32,
    tricks: Vec<Trick>,
    scores: RoundScores,
}

impl Round {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            tricks: Vec::new(),
            scores: RoundScores::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn push_trick(&mut self, trick: Trick) {
        self.tricks.push(trick);
    }

    pub fn scores(&self) -> &RoundScores {
        &self.scores
    }

    pub fn award(&mut self, seat: Seat, points: u32) {
        self.scores.insert(seat, points);
    }
}

/// Everything a step may touch while the round runs.
pub struct RoundContext<'a> {
    pub definition: &'a GameDefinition,
    pub table: &'a mut Table,
    pub round: &'a mut Round,
    pub rng: &'a mut dyn RngCore,
}

/// One stage of a round. Games customise a round by swapping steps.
pub trait RoundStep {
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &mut RoundContext<'_>) -> Result<(), RoundError>;
}

/// Shuffle, deal, play every trick, then give each player `points`.
pub fn standard_steps(points: u32) -> Vec<Box<dyn RoundStep>> {
    vec![
        Box::new(Shuffle),
        Box::new(Deal),
        Box::new(PlayTricks),
        Box::new(FlatScore { points }),
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Shuffle;

impl RoundStep for Shuffle {
    fn name(&self) -> &'static str {
        "shuffle"
    }

    fn run(&self, ctx: &mut RoundContext<'_>) -> Result<(), RoundError> {
        ctx.table.draw_pile_mut().shuffle(&mut *ctx.rng)?;
        event!(
            target: "cardtable::round",
            Level::INFO,
            round = ctx.round.number(),
            cards = ctx.table.draw_pile().len(),
            "deck shuffled"
        );
        Ok(())
    }
}

/// Gives the top card of the pile to each seat in turn until it is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deal;

impl RoundStep for Deal {
    fn name(&self) -> &'static str {
        "deal"
    }

    fn run(&self, ctx: &mut RoundContext<'_>) -> Result<(), RoundError> {
        let (players, pile, _) = ctx.table.split_mut();
        if players.is_empty() {
            return Err(RoundError::NoPlayers);
        }

        let mut seat = Seat::new(0);
        while let Some(card) = pile.draw()? {
            players[seat.index()].receive([card])?;
            seat = seat.next(players.len());
        }
        Ok(())
    }
}

/// Plays `card_count / player_count` tricks, every player in seat order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayTricks;

impl RoundStep for PlayTricks {
    fn name(&self) -> &'static str {
        "play"
    }

    fn run(&self, ctx: &mut RoundContext<'_>) -> Result<(), RoundError> {
        let player_count = ctx.table.player_count();
        if player_count == 0 {
            return Err(RoundError::NoPlayers);
        }
        let total = ctx.definition.tricks_per_round(player_count);

        while ctx.round.tricks().len() < total {
            let (players, _, area) = ctx.table.split_mut();
            for player in players.iter_mut() {
                let card = player.give_card(&mut *ctx.rng)?;
                event!(
                    target: "cardtable::play",
                    Level::DEBUG,
                    player = %player.name(),
                    card = %card,
                    "card played"
                );
                area.lay(player.seat(), card)?;
            }
            let trick = area.collect()?;
            ctx.round.push_trick(trick);
        }
        Ok(())
    }
}

/// Placeholder scoring: every player gets the same points each round.
#[derive(Debug, Clone, Copy)]
pub struct FlatScore {
    pub points: u32,
}

impl RoundStep for FlatScore {
    fn name(&self) -> &'static str {
        "score"
    }

    fn run(&self, ctx: &mut RoundContext<'_>) -> Result<(), RoundError> {
        for player in ctx.table.players() {
            ctx.round.award(player.seat(), self.points);
        }
        Ok(())
    }
}
