use super::definition::Termination;
use super::match_state::Match;
use crate::model::player::Seat;
use crate::model::score::RoundScores;
use crate::model::table::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedScore {
    pub player: String,
    pub points: u32,
}

/// Read-only report of a match, written out by the CLI after play.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchSummary {
    pub game: String,
    pub seed: u64,
    pub rounds_played: u32,
    #[serde(default)]
    pub termination: Option<Termination>,
    pub totals: Vec<NamedScore>,
    #[serde(default)]
    pub partials: Vec<Vec<NamedScore>>,
    #[serde(default)]
    pub winners: Vec<String>,
}

impl MatchSummary {
    pub fn capture(game: &Match<'_>, table: &Table) -> Self {
        let name_of = |seat: Seat| {
            table
                .player(seat)
                .map(|player| player.name().to_string())
                .unwrap_or_else(|| seat.to_string())
        };
        let named = |scores: &RoundScores| -> Vec<NamedScore> {
            scores
                .iter()
                .map(|(&seat, &points)| NamedScore {
                    player: name_of(seat),
                    points,
                })
                .collect()
        };

        let sheet = table.score_sheet();
        MatchSummary {
            game: game.definition().name().to_string(),
            seed: game.seed(),
            rounds_played: game.rounds_played(),
            termination: game.outcome().map(|outcome| outcome.termination),
            totals: named(sheet.totals()),
            partials: sheet.partials().iter().map(named).collect(),
            winners: sheet.winners().iter().map(|&seat| name_of(seat)).collect(),
        }
    }

    pub fn total_of(&self, player: &str) -> Option<u32> {
        self.totals
            .iter()
            .find(|score| score.player == player)
            .map(|score| score.points)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
