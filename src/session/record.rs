/// One recorded play: who, what. `action` flattens into the play object,
/// so the wire form reads `{"seat": 0, "action": "raise", "amount": 30}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Position,
    #[serde(flatten)]
    pub action: Action,
}

/// One street of a recorded hand: the cards revealed entering it and the
/// plays made on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetRecord {
    pub street: Street,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub plays: Vec<Play>,
}

/// Final settlement line of a recorded hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub seat: Position,
    pub amount: Chips,
}

/// A historical hand, as parsed from a session descriptor. Flattened into
/// the ordered replay event log by [`HandRecord::compile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    #[serde(default)]
    pub streets: Vec<StreetRecord>,
    #[serde(default)]
    pub payouts: Vec<PayoutRecord>,
}

impl HandRecord {
    /// Every seat any play or payout references.
    pub fn seats(&self) -> impl Iterator<Item = Position> + '_ {
        self.streets
            .iter()
            .flat_map(|street| street.plays.iter().map(|play| play.seat))
            .chain(self.payouts.iter().map(|payout| payout.seat))
    }

    /// Total number of replay events this record compiles to.
    pub fn length(&self) -> usize {
        self.compile().len()
    }

    /// Flatten the record into the finite, order-preserving event log:
    /// a street marker (except preflop), then its plays, and one terminal
    /// settlement. `next` on each play is the seat of the following play,
    /// which is all a replay needs to move the acting highlight.
    pub fn compile(&self) -> Vec<Message> {
        let turns = self
            .streets
            .iter()
            .flat_map(|street| street.plays.iter().map(|play| play.seat))
            .skip(1)
            .map(Some)
            .chain(std::iter::once(None))
            .collect::<Vec<_>>();
        let mut follows = turns.into_iter();
        let mut events = Vec::new();
        for street in &self.streets {
            if street.street != Street::Pref {
                events.push(Message::Advanced(street.street, street.cards.clone()));
            }
            for play in &street.plays {
                events.push(Message::Applied(Applied {
                    seat: play.seat,
                    action: play.action,
                    next: follows.next().flatten(),
                    legal: Vec::new(),
                }));
            }
        }
        let mut winners = self
            .payouts
            .iter()
            .map(|payout| payout.seat)
            .collect::<Vec<_>>();
        winners.dedup();
        events.push(Message::Finished(Finish {
            winners,
            payouts: self
                .payouts
                .iter()
                .map(|payout| (payout.seat, payout.amount))
                .collect(),
        }));
        events
    }
}

use crate::Chips;
use crate::Position;
use crate::table::Action;
use crate::table::Card;
use crate::table::Street;
use crate::update::Applied;
use crate::update::Finish;
use crate::update::Message;
use serde::Deserialize;
use serde::Serialize;
