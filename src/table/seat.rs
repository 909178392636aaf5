/// Who supplies decisions for a seat in live modes.
/// Replay mode never consults this: every action is pre-recorded.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Human,
    #[default]
    Source,
}

/// Per-seat snapshot inside the Model.
///
/// `committed` is a per-round display marker: chips enter `pot` the moment
/// an action is recorded, and the marker is zeroed at street boundaries
/// without moving anything. Conservation is therefore `sum(stack) + pot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub position: Position,
    pub stack: Chips,
    pub committed: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub acting: bool,
    pub cards: Vec<Card>,
    pub controller: Controller,
}

impl SeatView {
    pub fn new(position: Position, stack: Chips) -> Self {
        Self {
            position,
            stack,
            committed: 0,
            folded: false,
            all_in: false,
            acting: false,
            cards: Vec::new(),
            controller: Controller::Source,
        }
    }
    /// Still eligible to act this hand.
    pub fn live(&self) -> bool {
        !self.folded && !self.all_in
    }
}

impl Display for SeatView {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let status = match (self.folded, self.all_in) {
            (true, _) => "F".red().to_string(),
            (_, true) => "S".magenta().to_string(),
            _ => "P".to_string(),
        };
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "{:<3}{}  {:<5} {:>5} ({:>3})",
            self.position, status, cards, self.stack, self.committed
        )
    }
}

use crate::Chips;
use crate::Position;
use crate::table::card::Card;
use colored::Colorize;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_seat_is_live() {
        let seat = SeatView::new(2, 100);
        assert!(seat.live());
        assert_eq!(seat.committed, 0);
    }

    #[test]
    fn folded_seat_is_not_live() {
        let mut seat = SeatView::new(0, 100);
        seat.folded = true;
        assert!(!seat.live());
    }
}
