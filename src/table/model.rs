/// What the session is blocked on, if anything.
///
/// `Effect` carries the transaction id of the command that opened it; a
/// completion for any other id is stale and ignored by the reducer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waiting {
    #[default]
    Nobody,
    Human,
    Source,
    Effect(Tx),
}

/// Replay-mode bookkeeping. Present iff the session was loaded from a
/// finite pre-recorded event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Next event to apply; `cursor == length` means the log is exhausted.
    pub cursor: usize,
    pub length: usize,
    pub paused: bool,
}

/// The immutable snapshot of session state.
///
/// Replaced wholesale by every reducer call, never mutated in place, and
/// compared structurally by the Store to decide whether subscribers hear
/// about it. Every container here compares by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub hand: String,
    pub theme: String,
    pub street: Street,
    pub actor: Option<Position>,
    pub seats: BTreeMap<Position, SeatView>,
    pub pot: Chips,
    pub board: Vec<Card>,
    pub legal: Vec<Action>,
    pub tx: Tx,
    pub waiting: Waiting,
    pub review: Option<Review>,
    pub banners: Vec<Banner>,
    pub(crate) banner_seq: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self::initial()
    }
}

impl Model {
    /// The empty pre-load snapshot.
    pub fn initial() -> Self {
        Self {
            hand: String::new(),
            theme: String::from("default"),
            street: Street::Pref,
            actor: None,
            seats: BTreeMap::new(),
            pot: 0,
            board: Vec::new(),
            legal: Vec::new(),
            tx: 0,
            waiting: Waiting::Nobody,
            review: None,
            banners: Vec::new(),
            banner_seq: 0,
        }
    }

    pub fn seat(&self, position: Position) -> Option<&SeatView> {
        self.seats.get(&position)
    }
    pub fn is_replay(&self) -> bool {
        self.review.is_some()
    }
    pub fn is_loaded(&self) -> bool {
        !self.seats.is_empty()
    }
    /// The seat currently required to act, if any.
    pub fn acting(&self) -> Option<&SeatView> {
        self.actor.and_then(|position| self.seat(position))
    }
    pub fn controller(&self, position: Position) -> Controller {
        self.seat(position)
            .map(|seat| seat.controller)
            .unwrap_or_default()
    }

    /// Total chips on the table. Constant across any single reducer call.
    pub fn chips(&self) -> Chips {
        self.seats.values().map(|seat| seat.stack).sum::<Chips>() + self.pot
    }

    /// Structural sanity of the snapshot. Checked by the Store after every
    /// reducer call in debug builds.
    pub fn coherent(&self) -> bool {
        let actor_ok = match self.actor {
            None => true,
            Some(position) => self.seat(position).map(|seat| !seat.folded).unwrap_or(false),
        };
        let review_ok = match self.review {
            None => true,
            Some(review) => review.cursor <= review.length,
        };
        let waiting_ok = match self.waiting {
            Waiting::Effect(tx) => tx == self.tx,
            _ => true,
        };
        actor_ok && review_ok && waiting_ok && self.banners.len() <= crate::MAX_BANNERS
    }

    /// Push a banner, dropping the oldest past the cap.
    /// Returns the id the caller pairs with an expiry timer.
    pub(crate) fn push_banner(&mut self, text: impl Into<String>) -> u64 {
        self.banner_seq += 1;
        let id = self.banner_seq;
        self.banners.push(Banner::new(id, text));
        while self.banners.len() > crate::MAX_BANNERS {
            self.banners.remove(0);
        }
        id
    }

    /// Move the acting flag from the old actor to `next`.
    pub(crate) fn point(&mut self, next: Option<Position>) {
        for seat in self.seats.values_mut() {
            seat.acting = false;
        }
        if let Some(position) = next {
            if let Some(seat) = self.seats.get_mut(&position) {
                seat.acting = true;
            }
        }
        self.actor = next;
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(
            f,
            "{} {}  pot {}  [{}]",
            self.hand,
            self.street,
            self.pot,
            self.board
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )?;
        for seat in self.seats.values() {
            writeln!(f, "  {}", seat)?;
        }
        Ok(())
    }
}

use crate::Chips;
use crate::Position;
use crate::Tx;
use crate::table::action::Action;
use crate::table::banner::Banner;
use crate::table::card::Card;
use crate::table::seat::Controller;
use crate::table::seat::SeatView;
use crate::table::street::Street;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
