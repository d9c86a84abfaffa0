use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;

use cardtable_core::model::pile::{PileChange, PileEvent};
use cardtable_core::model::player::{PlayerChange, PlayerEvent, Seat};
use cardtable_core::model::score::ScoreEvent;
use cardtable_core::model::table::Table;
use cardtable_core::model::trick::{Play, PlayAreaChange, PlayAreaEvent};
use cardtable_core::notify::NotifyError;
use parking_lot::Mutex;

use super::{HandPresenter, PlayAreaPresenter, Presenter, ScoreSheetPresenter};

/// Last known hand of every seat, fed by player events.
#[derive(Debug, Default)]
struct HandCache {
    hands: BTreeMap<Seat, PlayerEvent>,
    deal_finished: bool,
}

impl HandCache {
    fn write_table<W: Write>(&self, out: &mut W, presenter: &HandPresenter) -> io::Result<()> {
        writeln!(out)?;
        for player in self.hands.values() {
            writeln!(out, "{}", presenter.render(player))?;
        }
        writeln!(out)
    }
}

/// Writes the table to a terminal as its entities change.
pub struct ConsoleView<W> {
    out: Arc<Mutex<W>>,
    hands: HandPresenter,
}

impl<W: Write + 'static> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self::shared(Arc::new(Mutex::new(out)))
    }

    pub fn shared(out: Arc<Mutex<W>>) -> Self {
        Self {
            out,
            hands: HandPresenter::default(),
        }
    }

    pub fn writer(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.out)
    }

    /// Subscribes to the players, draw pile, play area and score sheet of `table`.
    pub fn attach(&self, table: &mut Table) {
        let names: Vec<String> = table
            .players()
            .iter()
            .map(|player| player.name().to_string())
            .collect();
        let cache = Arc::new(Mutex::new(HandCache::default()));

        for player in table.players_mut() {
            let out = Arc::clone(&self.out);
            let cache = Arc::clone(&cache);
            let presenter = self.hands;
            player.subscribe(move |event: &PlayerEvent| {
                let mut cache = cache.lock();
                cache.hands.insert(event.seat, event.clone());
                if matches!(event.change, PlayerChange::Received { .. }) && cache.deal_finished {
                    cache.deal_finished = false;
                    cache.write_table(&mut *out.lock(), &presenter)?;
                }
                Ok(())
            });
        }

        let out = Arc::clone(&self.out);
        let pile_cache = Arc::clone(&cache);
        table
            .draw_pile_mut()
            .subscribe(move |event: &PileEvent| -> Result<(), NotifyError> {
                match event.change {
                    PileChange::Filled => {
                        writeln!(out.lock(), "New deck of {} cards.", event.remaining)?;
                    }
                    PileChange::Shuffled => writeln!(out.lock(), "Cards shuffled.")?,
                    PileChange::Drawn(_) if event.remaining == 0 => {
                        pile_cache.lock().deal_finished = true;
                    }
                    PileChange::Drawn(_) => {}
                }
                Ok(())
            });

        let out = Arc::clone(&self.out);
        let area_cache = Arc::clone(&cache);
        let area = PlayAreaPresenter::new(names.clone());
        let presenter = self.hands;
        table
            .play_area_mut()
            .subscribe(move |event: &PlayAreaEvent| -> Result<(), NotifyError> {
                let mut out = out.lock();
                match event.change {
                    PlayAreaChange::Played(play) => {
                        writeln!(out, "{}", Presenter::<Play>::render(&area, &play))?;
                    }
                    PlayAreaChange::Cleared => area_cache.lock().write_table(&mut *out, &presenter)?,
                }
                Ok(())
            });

        let out = Arc::clone(&self.out);
        let scores = ScoreSheetPresenter::new(names);
        table
            .score_sheet_mut()
            .subscribe(move |event: &ScoreEvent| -> Result<(), NotifyError> {
                if event.rounds_recorded == 0 && !event.winners_ready {
                    return Ok(());
                }
                let mut out = out.lock();
                writeln!(out, "Scores after {} round(s):", event.rounds_recorded)?;
                writeln!(out, "{}", scores.render(event))?;
                Ok(())
            });
    }
}
