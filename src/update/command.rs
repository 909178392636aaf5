/// Sound effects the host may map to clips. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    Deal,
    Chips,
    Check,
    Fold,
    Win,
    Alert,
}

impl From<Action> for Clip {
    fn from(action: Action) -> Self {
        match action {
            Action::Fold => Clip::Fold,
            Action::Check => Clip::Check,
            _ => Clip::Chips,
        }
    }
}

/// A visual effect the host animates. Data only; the matching
/// `Message::Completed` carries the transaction id issued alongside.
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    Chips(Position, Chips),
    Check(Position),
    Fold(Position),
    Board(Street, Vec<Card>),
    Payout(Vec<(Position, Chips)>),
}

impl Animation {
    pub fn name(&self) -> &'static str {
        match self {
            Animation::Chips(..) => "chips",
            Animation::Check(..) => "check",
            Animation::Fold(..) => "fold",
            Animation::Board(..) => "board",
            Animation::Payout(..) => "payout",
        }
    }
}

impl From<(Position, Action)> for Animation {
    fn from((seat, action): (Position, Action)) -> Self {
        match action {
            Action::Fold => Animation::Fold(seat),
            Action::Check => Animation::Check(seat),
            action => Animation::Chips(seat, action.amount()),
        }
    }
}

/// A side effect requested by the reducer and carried out by the Store.
///
/// Commands are plain data, never closures: the reducer stays testable
/// without mocking timers, audio, or rendering. Each command is consumed
/// exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Sound(Clip),
    Speak(String),
    Animate(Animation, Tx),
    /// Request a decision for this seat from the session's source.
    Ask(Position),
    /// Apply an action through the external rules engine.
    Apply(Position, Action),
    /// Deliver a message after a delay, through the Director.
    Timer(Millis, Message),
    /// Pull event `i` from the replay log and dispatch it.
    Fetch(usize),
    /// Drive the Director's playback state machine.
    Playback(Playback),
    /// Wipe the Director and rebuild state at event index `i`.
    Rewind(usize),
    /// Hand an event to the host's pub/sub seam.
    Publish(&'static str, serde_json::Value),
    /// Force a subscriber notification even without structural change.
    Render,
}

use crate::Chips;
use crate::Millis;
use crate::Position;
use crate::Tx;
use crate::director::Playback;
use crate::table::Action;
use crate::table::Card;
use crate::table::Street;
use crate::update::message::Message;
