use crate::model::player::Seat;
use crate::notify::{ChangeNotifier, NotifyError};
use std::collections::{BTreeMap, BTreeSet};

pub type RoundScores = BTreeMap<Seat, u32>;

/// Snapshot of the sheet published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEvent {
    pub totals: Vec<(Seat, u32)>,
    pub rounds_recorded: usize,
    pub winners: Vec<Seat>,
    pub winners_ready: bool,
}

/// Cumulative and per-round scores plus the declared winners.
#[derive(Debug, Default)]
pub struct ScoreSheet {
    totals: BTreeMap<Seat, u32>,
    partials: Vec<RoundScores>,
    winners: BTreeSet<Seat>,
    winners_ready: bool,
    notifier: ChangeNotifier<ScoreEvent>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ScoreEvent) -> Result<(), NotifyError> + 'static,
    {
        self.notifier.subscribe(callback);
    }

    pub fn reset(&mut self) {
        self.totals.clear();
        self.partials.clear();
        self.winners.clear();
        self.winners_ready = false;
    }

    /// Archives one round's scores and adds them to the running totals.
    pub fn record_round(&mut self, scores: &RoundScores) {
        for (&seat, &points) in scores {
            let total = self.totals.entry(seat).or_insert(0);
            *total = total.saturating_add(points);
        }
        self.partials.push(scores.clone());
    }

    pub fn total(&self, seat: Seat) -> Option<u32> {
        self.totals.get(&seat).copied()
    }

    pub fn totals(&self) -> &BTreeMap<Seat, u32> {
        &self.totals
    }

    pub fn partials(&self) -> &[RoundScores] {
        &self.partials
    }

    pub fn rounds_recorded(&self) -> usize {
        self.partials.len()
    }

    pub fn leading_score(&self) -> Option<u32> {
        self.totals.values().copied().max()
    }

    /// Whether any player's total has reached `limit`.
    pub fn any_reached(&self, limit: u32) -> bool {
        self.leading_score().is_some_and(|best| best >= limit)
    }

    /// Every seat sharing the best total wins; ties are all kept.
    pub fn declare_winners(&mut self) -> &BTreeSet<Seat> {
        self.winners = leaders(&self.totals);
        self.winners_ready = true;
        &self.winners
    }

    pub fn winners(&self) -> &BTreeSet<Seat> {
        &self.winners
    }

    pub fn winners_ready(&self) -> bool {
        self.winners_ready
    }

    pub fn publish(&mut self) -> Result<(), NotifyError> {
        let event = ScoreEvent {
            totals: self.totals.iter().map(|(&seat, &points)| (seat, points)).collect(),
            rounds_recorded: self.partials.len(),
            winners: self.winners.iter().copied().collect(),
            winners_ready: self.winners_ready,
        };
        self.notifier.notify(&event)
    }
}

/// Seats whose total is at least the highest total on the sheet.
pub fn leaders(totals: &BTreeMap<Seat, u32>) -> BTreeSet<Seat> {
    let Some(best) = totals.values().copied().max() else {
        return BTreeSet::new();
    };
    totals
        .iter()
        .filter(|&(_, &points)| points >= best)
        .map(|(&seat, _)| seat)
        .collect()
}
