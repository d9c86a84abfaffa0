use cardtable_core::model::card::Card;
use cardtable_core::model::player::{PlayerEvent, Seat};
use cardtable_core::model::score::ScoreEvent;
use cardtable_core::model::trick::Play;

use super::Presenter;

const DEFAULT_MASK: char = 'X';
const DEFAULT_SCORE_WIDTH: usize = 40;

fn name_of(names: &[String], seat: Seat) -> String {
    names
        .get(seat.index())
        .cloned()
        .unwrap_or_else(|| seat.to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CardFace;

impl Presenter<Card> for CardFace {
    fn render(&self, card: &Card) -> String {
        card.to_string()
    }
}

/// A player's hand, face up when visible and masked otherwise.
#[derive(Debug, Clone, Copy)]
pub struct HandPresenter {
    mask: char,
    faces: CardFace,
}

impl HandPresenter {
    pub fn with_mask(mask: char) -> Self {
        Self {
            mask,
            faces: CardFace,
        }
    }
}

impl Default for HandPresenter {
    fn default() -> Self {
        Self::with_mask(DEFAULT_MASK)
    }
}

impl Presenter<PlayerEvent> for HandPresenter {
    fn render(&self, player: &PlayerEvent) -> String {
        let cards: Vec<String> = if player.visible {
            player
                .hand
                .iter()
                .map(|card| self.faces.render(card))
                .collect()
        } else {
            player.hand.iter().map(|_| self.mask.to_string()).collect()
        };
        if cards.is_empty() {
            format!("- {}", player.name)
        } else {
            format!("{} {}", cards.join(" "), player.name)
        }
    }
}

/// One line per card on the play area: the card, then who laid it.
#[derive(Debug, Clone, Default)]
pub struct PlayAreaPresenter {
    names: Vec<String>,
    faces: CardFace,
}

impl PlayAreaPresenter {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            faces: CardFace,
        }
    }
}

impl Presenter<Play> for PlayAreaPresenter {
    fn render(&self, play: &Play) -> String {
        format!(
            "{:>3} {}",
            self.faces.render(&play.card),
            name_of(&self.names, play.seat)
        )
    }
}

impl Presenter<[Play]> for PlayAreaPresenter {
    fn render(&self, plays: &[Play]) -> String {
        plays
            .iter()
            .map(|play| Presenter::<Play>::render(self, play))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Running totals, followed by the winners once they are known.
#[derive(Debug, Clone)]
pub struct ScoreSheetPresenter {
    names: Vec<String>,
    width: usize,
}

impl ScoreSheetPresenter {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            width: DEFAULT_SCORE_WIDTH,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

impl Presenter<ScoreEvent> for ScoreSheetPresenter {
    fn render(&self, sheet: &ScoreEvent) -> String {
        let mut lines: Vec<String> = sheet
            .totals
            .iter()
            .map(|&(seat, total)| format!("{}: {total}", name_of(&self.names, seat)))
            .collect();

        if sheet.winners_ready {
            let winners: Vec<String> = sheet
                .winners
                .iter()
                .map(|&seat| name_of(&self.names, seat))
                .collect();
            let label = if winners.len() == 1 { "Winner" } else { "Winners" };
            let banner = format!("{label}: {}", winners.join(", "));
            lines.push(format!("{banner:^width$}", width = self.width));
        }
        lines.join("\n")
    }
}
