/// Replay-log decision source: a finite, pre-built, order-preserving
/// sequence of engine-delivery messages compiled from a historical record.
///
/// `event_at` is a pure bounds-checked lookup. `decide` satisfies the
/// protocol but is an error path: every replay action is pre-determined,
/// so being asked to decide means the core mis-routed control.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    events: Vec<Message>,
}

impl ReplaySource {
    pub fn new(events: Vec<Message>) -> Self {
        Self { events }
    }
}

impl From<&Descriptor> for ReplaySource {
    fn from(descriptor: &Descriptor) -> Self {
        Self::new(descriptor.events())
    }
}

impl DecisionSource for ReplaySource {
    fn decide(&mut self, _: &Model, seat: Position) -> Result<Decision, SourceError> {
        log::error!("replay source asked to decide for seat {}", seat);
        Err(SourceError::ReplayDecide)
    }
    fn event_at(&self, index: usize) -> Option<Message> {
        self.events.get(index).cloned()
    }
    fn length(&self) -> usize {
        self.events.len()
    }
    fn name(&self) -> &'static str {
        "replay"
    }
}

use crate::Position;
use crate::session::Descriptor;
use crate::sources::source::Decision;
use crate::sources::source::DecisionSource;
use crate::sources::source::SourceError;
use crate::table::Model;
use crate::update::Message;
