/// Scripted decision source: a fixed priority rule over the legal-action
/// set (prefer check, else call, else fold), delivered after a bounded,
/// seat-staggered think time. The dumbest opponent that never stalls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedSource;

impl ScriptedSource {
    /// The priority rule, shared with the strategy source's fallback path.
    pub(crate) fn preference(legal: &[Action]) -> Option<Action> {
        legal
            .iter()
            .copied()
            .find(|action| matches!(action, Action::Check))
            .or_else(|| {
                legal
                    .iter()
                    .copied()
                    .find(|action| matches!(action, Action::Call(_)))
            })
            .or_else(|| {
                legal
                    .iter()
                    .copied()
                    .find(|action| matches!(action, Action::Fold))
            })
    }
}

impl DecisionSource for ScriptedSource {
    fn decide(&mut self, model: &Model, seat: Position) -> Result<Decision, SourceError> {
        match Self::preference(&model.legal) {
            Some(action) => Ok(Decision {
                action,
                think: think(seat),
            }),
            None => Err(SourceError::Failed(format!(
                "no scripted action among {:?}",
                model.legal
            ))),
        }
    }
    fn name(&self) -> &'static str {
        "scripted"
    }
}

use crate::Position;
use crate::sources::source::Decision;
use crate::sources::source::DecisionSource;
use crate::sources::source::SourceError;
use crate::sources::source::think;
use crate::table::Action;
use crate::table::Model;
