/// What the external rules engine reports after applying an action.
/// The Store folds this into follow-up engine deliveries; the reducer
/// records the numbers it is told and defers all legality to the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub accepted: bool,
    pub next: Option<Position>,
    pub legal: Vec<Action>,
    pub street_changed: Option<(Street, Vec<Card>)>,
    pub finished: bool,
    pub winners: Vec<Position>,
    pub payouts: Vec<(Position, Chips)>,
}

/// The poker rules engine, an external collaborator. Consulted
/// synchronously by the Store's apply command in live modes; replay
/// sessions never touch it.
pub trait RulesEngine: Debug {
    fn apply(&mut self, seat: Position, action: Action) -> anyhow::Result<Outcome>;
}

use crate::Chips;
use crate::Position;
use crate::table::Action;
use crate::table::Card;
use crate::table::Street;
use std::fmt::Debug;
