//! Text rendering of the table for a terminal.
//!
//! Presenters turn model snapshots into strings; [`ConsoleView`] subscribes to
//! a [`Table`](cardtable_core::model::table::Table) and writes what they
//! produce.

mod console;
mod presenters;

pub use console::ConsoleView;
pub use presenters::{CardFace, HandPresenter, PlayAreaPresenter, ScoreSheetPresenter};

/// Renders one kind of model item as display text.
pub trait Presenter<T: ?Sized> {
    fn render(&self, item: &T) -> String;
}
