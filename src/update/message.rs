/// A recorded action application: who acted, what the rules engine (or the
/// historical record) says follows. The reducer does its own chip
/// bookkeeping from `action`; `next` and `legal` are recorded as told.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applied {
    pub seat: Position,
    pub action: Action,
    pub next: Option<Position>,
    #[serde(default)]
    pub legal: Vec<Action>,
}

/// Terminal settlement of a hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finish {
    pub winners: Vec<Position>,
    pub payouts: Vec<(Position, Chips)>,
}

/// The closed set of facts and intents that can transform the Model.
///
/// Replay logs are literally `Vec<Message>` restricted to the engine
/// deliveries (`Applied`, `Advanced`, `Finished`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    // user intents
    /// Step the session forward one logical unit.
    Advance,
    /// Toggle automatic advancement (replay mode).
    Autoplay,
    /// A human decision for the seat currently required to act.
    Choose(Action),
    /// Jump the review cursor to an absolute event index.
    Seek(usize),

    // source deliveries
    /// A decision source proposes an action for a seat.
    Decided(Position, Action),

    // engine deliveries
    Applied(Applied),
    Advanced(Street, Vec<Card>),
    Finished(Finish),

    // timer deliveries
    /// An asynchronous effect with this transaction id concluded.
    Completed(Tx),
    /// A banner outlived its welcome.
    Expire(u64),
    /// Generic housekeeping tick; carries the host timeline.
    Tick(Millis),

    // session control
    Load(Descriptor),
    /// Presentation theme, opaque to this core.
    Theme(String),
}

use crate::Chips;
use crate::Millis;
use crate::Position;
use crate::Tx;
use crate::session::Descriptor;
use crate::table::Action;
use crate::table::Card;
use crate::table::Street;
use serde::Deserialize;
use serde::Serialize;
