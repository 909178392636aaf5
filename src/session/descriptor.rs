/// How decisions are produced for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every action is pre-recorded; sources are never consulted.
    Replay,
    /// Bot seats follow the scripted priority rule.
    Scripted,
    /// Bot seats delegate to a strategy engine.
    Strategy,
}

/// One seat as loaded: who sits there, with what, run by whom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatSpec {
    pub position: Position,
    pub stack: Chips,
    #[serde(default)]
    pub controller: Controller,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Live-mode opening state: the host consults its rules engine once at
/// load time and ships the first actor and their legal set here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub actor: Position,
    pub legal: Vec<Action>,
}

fn default_theme() -> String {
    String::from("default")
}

/// Everything needed to (re)start a session: the only sanctioned way to
/// reset the Model wholesale. Malformed descriptors are fatal to the load
/// and leave the running Model untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: String,
    pub mode: Mode,
    pub seats: Vec<SeatSpec>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub opening: Option<Opening>,
    #[serde(default)]
    pub record: Option<HandRecord>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("session has no seats")]
    NoSeats,
    #[error("seat {0} appears twice")]
    DuplicateSeat(Position),
    #[error("seat {0} has negative stack {1}")]
    NegativeStack(Position, Chips),
    #[error("replay session carries no record")]
    MissingRecord,
    #[error("record references seat {0} which is not seated")]
    UnknownSeat(Position),
    #[error("opening actor {0} is not seated")]
    UnknownActor(Position),
}

impl Descriptor {
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.seats.is_empty() {
            return Err(LoadError::NoSeats);
        }
        let mut seen = BTreeSet::new();
        for seat in &self.seats {
            if !seen.insert(seat.position) {
                return Err(LoadError::DuplicateSeat(seat.position));
            }
            if seat.stack < 0 {
                return Err(LoadError::NegativeStack(seat.position, seat.stack));
            }
        }
        if self.mode == Mode::Replay {
            let record = self.record.as_ref().ok_or(LoadError::MissingRecord)?;
            if let Some(unknown) = record.seats().find(|seat| !seen.contains(seat)) {
                return Err(LoadError::UnknownSeat(unknown));
            }
        }
        if let Some(opening) = &self.opening {
            if !seen.contains(&opening.actor) {
                return Err(LoadError::UnknownActor(opening.actor));
            }
        }
        Ok(())
    }

    /// The compiled replay event log; empty outside replay mode.
    pub fn events(&self) -> Vec<Message> {
        match (self.mode, &self.record) {
            (Mode::Replay, Some(record)) => record.compile(),
            _ => Vec::new(),
        }
    }
}

/// Build the freshly loaded snapshot. Assumes a validated descriptor.
impl From<&Descriptor> for Model {
    fn from(descriptor: &Descriptor) -> Self {
        let mut model = Model::initial();
        model.hand = descriptor.id.clone();
        model.theme = descriptor.theme.clone();
        for spec in &descriptor.seats {
            let mut seat = SeatView::new(spec.position, spec.stack);
            seat.controller = spec.controller;
            seat.cards = spec.cards.clone();
            model.seats.insert(spec.position, seat);
        }
        match descriptor.mode {
            Mode::Replay => {
                model.review = Some(Review {
                    cursor: 0,
                    length: descriptor.events().len(),
                    paused: true,
                });
            }
            Mode::Scripted | Mode::Strategy => {
                if let Some(opening) = &descriptor.opening {
                    model.point(Some(opening.actor));
                    model.legal = opening.legal.clone();
                    model.waiting = model.route();
                }
            }
        }
        model
    }
}

use crate::Chips;
use crate::Position;
use crate::session::record::HandRecord;
use crate::table::Action;
use crate::table::Card;
use crate::table::Controller;
use crate::table::Model;
use crate::table::Review;
use crate::table::SeatView;
use crate::update::Message;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
