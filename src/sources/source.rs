/// A decision and how long the table should appear to think about it.
/// The Store schedules the delivery through the Director; no source ever
/// touches a timing primitive itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub think: Millis,
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// The core mis-routed control: replay actions are pre-determined and
    /// a replay source must never be asked to decide.
    #[error("decision requested from a replay source")]
    ReplayDecide,
    /// The provider could not produce an action.
    #[error("source failed to decide: {0}")]
    Failed(String),
}

/// One protocol for three structurally different providers: a pre-recorded
/// log, a scripted bot, and a strategy engine. The Store holds exactly one
/// of these per session, selected at load time and never switched.
pub trait DecisionSource: Debug {
    /// Propose an action for `seat` given the current snapshot.
    fn decide(&mut self, model: &Model, seat: Position) -> Result<Decision, SourceError>;

    /// Replay-only: the event at position `index` of the finite log.
    fn event_at(&self, index: usize) -> Option<Message> {
        let _ = index;
        None
    }
    /// Replay-only: total log length.
    fn length(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str;
}

/// Seat-staggered think time shared by the live sources: bounded and
/// deterministic, so two bots never deliver simultaneously.
pub(crate) fn think(seat: Position) -> Millis {
    crate::THINK_BASE + crate::THINK_STEP * seat as Millis
}

use crate::Millis;
use crate::Position;
use crate::table::Action;
use crate::table::Model;
use crate::update::Message;
use std::fmt::Debug;
use thiserror::Error;
