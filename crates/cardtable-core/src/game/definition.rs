//! Static description of a card game: deck, limits, round pipeline and the
//! rule deciding when a match is over.

use crate::game::round::{RoundStep, standard_steps};
use crate::model::deck::DeckSize;
use crate::model::score::ScoreSheet;
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

pub const DEFAULT_GAME_NAME: &str = "Basic";
pub const DEFAULT_MAX_ROUNDS: u32 = 2;
pub const DEFAULT_ROUND_POINTS: u32 = 100;

/// Which end-of-match limit is consulted first.
///
/// The limits are exclusive: the first one that is configured (non-zero)
/// decides alone, the other is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndPrecedence {
    #[default]
    ScoreFirst,
    RoundsFirst,
}

impl EndPrecedence {
    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "score_first" | "score" => Some(EndPrecedence::ScoreFirst),
            "rounds_first" | "rounds" => Some(EndPrecedence::RoundsFirst),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EndPrecedence::ScoreFirst => "score_first",
            EndPrecedence::RoundsFirst => "rounds_first",
        }
    }

    const fn order(self) -> [EndCriterion; 2] {
        match self {
            EndPrecedence::ScoreFirst => [EndCriterion::MaxScore, EndCriterion::MaxRounds],
            EndPrecedence::RoundsFirst => [EndCriterion::MaxRounds, EndCriterion::MaxScore],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCriterion {
    MaxScore,
    MaxRounds,
}

/// Why a match stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    MaxScore { limit: u32 },
    MaxRounds { limit: u32 },
    /// Neither limit was set; the match was stopped after one round.
    Unconfigured,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::MaxScore { limit } => write!(f, "score limit {limit} reached"),
            Termination::MaxRounds { limit } => write!(f, "round limit {limit} reached"),
            Termination::Unconfigured => f.write_str("no end-of-match limit configured"),
        }
    }
}

pub struct GameDefinition {
    name: String,
    deck_size: DeckSize,
    max_rounds: u32,
    max_score: u32,
    precedence: EndPrecedence,
    steps: Vec<Box<dyn RoundStep>>,
}

impl GameDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deck_size: DeckSize::Short32,
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_score: 0,
            precedence: EndPrecedence::default(),
            steps: standard_steps(DEFAULT_ROUND_POINTS),
        }
    }

    pub fn with_deck_size(mut self, deck_size: DeckSize) -> Self {
        self.deck_size = deck_size;
        self
    }

    /// Zero leaves the round limit unset.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Zero leaves the score limit unset.
    pub fn with_max_score(mut self, max_score: u32) -> Self {
        self.max_score = max_score;
        self
    }

    pub fn with_precedence(mut self, precedence: EndPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Replaces the whole round pipeline.
    pub fn with_steps(mut self, steps: Vec<Box<dyn RoundStep>>) -> Self {
        self.steps = steps;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deck_size(&self) -> DeckSize {
        self.deck_size
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn precedence(&self) -> EndPrecedence {
        self.precedence
    }

    pub fn steps(&self) -> &[Box<dyn RoundStep>] {
        &self.steps
    }

    pub fn card_count(&self) -> usize {
        self.deck_size.card_count()
    }

    pub fn tricks_per_round(&self, player_count: usize) -> usize {
        if player_count == 0 {
            0
        } else {
            self.card_count() / player_count
        }
    }

    /// The first configured limit in precedence order, the only one consulted.
    fn deciding_criterion(&self) -> Option<EndCriterion> {
        self.precedence
            .order()
            .into_iter()
            .find(|criterion| match criterion {
                EndCriterion::MaxScore => self.max_score > 0,
                EndCriterion::MaxRounds => self.max_rounds > 0,
            })
    }

    pub fn has_end_limit(&self) -> bool {
        self.deciding_criterion().is_some()
    }

    /// Whether only the score limit can end a match of this game.
    pub fn score_limit_decides(&self) -> bool {
        self.deciding_criterion() == Some(EndCriterion::MaxScore)
    }

    /// Decides, after a round has been recorded, whether the match is over.
    pub fn should_stop(&self, sheet: &ScoreSheet, rounds_played: u32) -> Option<Termination> {
        match self.deciding_criterion() {
            Some(EndCriterion::MaxScore) => {
                let limit = self.max_score;
                return sheet
                    .any_reached(limit)
                    .then_some(Termination::MaxScore { limit });
            }
            Some(EndCriterion::MaxRounds) => {
                let limit = self.max_rounds;
                return (rounds_played >= limit).then_some(Termination::MaxRounds { limit });
            }
            None => {}
        }

        event!(
            target: "cardtable::match",
            Level::ERROR,
            game = %self.name,
            max_score = self.max_score,
            max_rounds = self.max_rounds,
            "no end-of-match limit configured; stopping the match"
        );
        Some(Termination::Unconfigured)
    }
}

impl Default for GameDefinition {
    fn default() -> Self {
        Self::new(DEFAULT_GAME_NAME)
    }
}

impl fmt::Debug for GameDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<&str> = self.steps.iter().map(|step| step.name()).collect();
        f.debug_struct("GameDefinition")
            .field("name", &self.name)
            .field("deck_size", &self.deck_size)
            .field("max_rounds", &self.max_rounds)
            .field("max_score", &self.max_score)
            .field("precedence", &self.precedence)
            .field("steps", &steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{EndPrecedence, GameDefinition, Termination};
    use crate::model::deck::DeckSize;
    use crate::model::player::Seat;
    use crate::model::score::{RoundScores, ScoreSheet};

    fn sheet_with(totals: &[u32]) -> ScoreSheet {
        let mut sheet = ScoreSheet::new();
        let round: RoundScores = totals
            .iter()
            .enumerate()
            .map(|(i, &points)| (Seat::new(i), points))
            .collect();
        sheet.record_round(&round);
        sheet
    }

    #[test]
    fn defaults_describe_basic_game() {
        let definition = GameDefinition::default();
        assert_eq!(definition.name(), "Basic");
        assert_eq!(definition.deck_size(), DeckSize::Short32);
        assert_eq!(definition.max_rounds(), 2);
        assert_eq!(definition.max_score(), 0);
        assert_eq!(definition.steps().len(), 4);
        assert_eq!(definition.tricks_per_round(4), 8);
    }

    #[test]
    fn round_limit_ignores_scores() {
        let definition = GameDefinition::default()
            .with_max_rounds(2)
            .with_max_score(0);
        let sheet = sheet_with(&[5000, 0]);
        assert_eq!(definition.should_stop(&sheet, 1), None);
        assert_eq!(
            definition.should_stop(&sheet, 2),
            Some(Termination::MaxRounds { limit: 2 })
        );
    }

    #[test]
    fn score_limit_fires_on_any_player() {
        let definition = GameDefinition::default()
            .with_max_rounds(0)
            .with_max_score(100);
        assert_eq!(definition.should_stop(&sheet_with(&[99, 40]), 7), None);
        assert_eq!(
            definition.should_stop(&sheet_with(&[10, 100]), 1),
            Some(Termination::MaxScore { limit: 100 })
        );
    }

    #[test]
    fn precedence_picks_the_deciding_limit() {
        let sheet = sheet_with(&[10, 20]);
        let score_first = GameDefinition::default()
            .with_max_rounds(1)
            .with_max_score(1000);
        assert_eq!(score_first.should_stop(&sheet, 5), None);
        assert!(score_first.score_limit_decides());

        let rounds_first = score_first.with_precedence(EndPrecedence::RoundsFirst);
        assert_eq!(
            rounds_first.should_stop(&sheet, 5),
            Some(Termination::MaxRounds { limit: 1 })
        );
        assert!(!rounds_first.score_limit_decides());
        assert!(rounds_first.with_max_rounds(0).score_limit_decides());
    }

    #[test]
    fn missing_limits_force_a_stop() {
        let definition = GameDefinition::default()
            .with_max_rounds(0)
            .with_max_score(0);
        assert!(!definition.has_end_limit());
        assert_eq!(
            definition.should_stop(&sheet_with(&[0]), 1),
            Some(Termination::Unconfigured)
        );
    }

    #[test]
    fn precedence_names_parse() {
        assert_eq!(
            EndPrecedence::from_name("Rounds-First"),
            Some(EndPrecedence::RoundsFirst)
        );
        assert_eq!(
            EndPrecedence::from_name("score"),
            Some(EndPrecedence::ScoreFirst)
        );
        assert_eq!(EndPrecedence::from_name("never"), None);
        assert_eq!(EndPrecedence::RoundsFirst.as_str(), "rounds_first");
    }
}
