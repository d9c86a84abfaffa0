use crate::game::definition::{GameDefinition, Termination};
use crate::game::round::{Round, RoundContext, RoundError};
use crate::model::deck;
use crate::model::player::Seat;
use crate::model::table::Table;
use crate::notify::NotifyError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    NotStarted,
    RoundInProgress { round: u32 },
    Finished,
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("the match is already finished")]
    AlreadyFinished,
    #[error("round {round} failed: {source}")]
    Round {
        round: u32,
        #[source]
        source: RoundError,
    },
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub rounds_played: u32,
    pub termination: Termination,
    pub winners: Vec<Seat>,
}

/// A sequence of rounds of one game, played until the game's end rule fires.
#[derive(Debug)]
pub struct Match<'d> {
    definition: &'d GameDefinition,
    rounds: Vec<Round>,
    phase: MatchPhase,
    outcome: Option<MatchOutcome>,
    rng: StdRng,
    seed: u64,
}

impl<'d> Match<'d> {
    pub fn new(definition: &'d GameDefinition, seed: u64) -> Self {
        Self {
            definition,
            rounds: Vec::new(),
            phase: MatchPhase::NotStarted,
            outcome: None,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn definition(&self) -> &'d GameDefinition {
        self.definition
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    /// Plays rounds until the end rule fires, then declares the winners.
    pub fn run(&mut self, table: &mut Table) -> Result<MatchOutcome, MatchError> {
        if self.phase == MatchPhase::Finished {
            return Err(MatchError::AlreadyFinished);
        }

        event!(
            target: "cardtable::match",
            Level::INFO,
            game = %self.definition.name(),
            seed = self.seed,
            players = table.player_count(),
            "match started"
        );

        let sheet = table.score_sheet_mut();
        sheet.reset();
        sheet.publish()?;

        loop {
            let round = self.run_round(table)?;
            table.score_sheet_mut().record_round(round.scores());
            self.rounds.push(round);
            table.score_sheet_mut().publish()?;

            let rounds_played = self.rounds_played();
            if let Some(termination) = self
                .definition
                .should_stop(table.score_sheet(), rounds_played)
            {
                return self.finish(table, termination);
            }
        }
    }

    fn run_round(&mut self, table: &mut Table) -> Result<Round, MatchError> {
        if self.phase == MatchPhase::Finished {
            return Err(MatchError::AlreadyFinished);
        }

        let number = self.rounds_played() + 1;
        self.phase = MatchPhase::RoundInProgress { round: number };
        self.check_table(table)
            .map_err(|source| MatchError::Round {
                round: number,
                source,
            })?;

        event!(
            target: "cardtable::round",
            Level::INFO,
            round = number,
            "round started"
        );

        table.clear_hands();
        let pile = table.draw_pile_mut();
        pile.clear();
        pile.refill(deck::generate(self.definition.deck_size()))?;

        let mut round = Round::new(number);
        let definition = self.definition;
        let mut ctx = RoundContext {
            definition,
            table,
            round: &mut round,
            rng: &mut self.rng,
        };
        for step in definition.steps() {
            step.run(&mut ctx).map_err(|source| MatchError::Round {
                round: number,
                source,
            })?;
        }

        event!(
            target: "cardtable::round",
            Level::INFO,
            round = number,
            tricks = round.tricks().len(),
            "round finished"
        );
        Ok(round)
    }

    fn check_table(&self, table: &Table) -> Result<(), RoundError> {
        let players = table.player_count();
        if players == 0 {
            return Err(RoundError::NoPlayers);
        }
        let cards = self.definition.card_count();
        if cards % players != 0 {
            return Err(RoundError::UnevenDeal { cards, players });
        }
        Ok(())
    }

    fn finish(
        &mut self,
        table: &mut Table,
        termination: Termination,
    ) -> Result<MatchOutcome, MatchError> {
        let winners: Vec<Seat> = table
            .score_sheet_mut()
            .declare_winners()
            .iter()
            .copied()
            .collect();
        table.score_sheet_mut().publish()?;
        self.phase = MatchPhase::Finished;

        let names: Vec<&str> = winners
            .iter()
            .filter_map(|&seat| table.player(seat).map(|player| player.name()))
            .collect();
        event!(
            target: "cardtable::match",
            Level::INFO,
            rounds = self.rounds_played(),
            termination = %termination,
            winners = ?names,
            "match finished"
        );

        let outcome = MatchOutcome {
            rounds_played: self.rounds_played(),
            termination,
            winners,
        };
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }
}
