use std::io::Write;

use cardtable_core::game::definition::GameDefinition;
use cardtable_core::game::match_state::{MatchError, MatchOutcome};
use cardtable_core::game::serialization::MatchSummary;
use cardtable_core::model::player::Player;
use cardtable_core::model::table::Table;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{TableConfig, ValidationError};
use crate::view::ConsoleView;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Config(#[from] ValidationError),
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// What a finished session reports back to the caller.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: MatchOutcome,
    pub summary: MatchSummary,
}

/// Wires a configured table to a console view and plays it.
pub struct Controller<W> {
    table: Table,
    definition: GameDefinition,
    seed: u64,
    view: ConsoleView<W>,
}

impl<W: Write + 'static> Controller<W> {
    /// Seats the configured players, reading interactive choices from stdin.
    pub fn new(config: &TableConfig, out: W) -> Result<Self, ControllerError> {
        Self::with_players(config, config.players(), out)
    }

    pub fn with_players(
        config: &TableConfig,
        players: Vec<Player>,
        out: W,
    ) -> Result<Self, ControllerError> {
        let definition = config.definition()?;
        let seed = config.seed.unwrap_or_else(|| {
            let seed: u64 = rand::random();
            event!(
                target: "cardtable::controller",
                Level::INFO,
                seed,
                "no seed configured, drew a random one"
            );
            seed
        });

        let mut table = Table::new();
        table.seat(players);
        let view = ConsoleView::new(out);
        view.attach(&mut table);

        Ok(Self {
            table,
            definition,
            seed,
            view,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn view(&self) -> &ConsoleView<W> {
        &self.view
    }

    /// Plays matches until the table wants to stop and reports the last one.
    pub fn run(&mut self) -> Result<SessionReport, ControllerError> {
        loop {
            let mut game = self.table.dedicate(&self.definition, self.seed);
            let outcome = game.run(&mut self.table)?;
            let summary = MatchSummary::capture(&game, &self.table);
            if self.table.wants_to_stop() {
                return Ok(SessionReport { outcome, summary });
            }
        }
    }
}
