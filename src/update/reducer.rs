//! The pure reducer: `(Model, Message) -> (Model, Vec<Command>)`.
//!
//! Total over the Message union. Never blocks, never performs IO, never
//! reads the clock; time values arrive only as message payloads. Invalid
//! decisions and stale effect completions fall through unchanged, which is
//! the single defensive rejection point of the whole core.

impl Model {
    pub fn update(&self, message: &Message) -> (Model, Vec<Command>) {
        match message {
            Message::Advance => self.advance(),
            Message::Autoplay => self.autoplay(),
            Message::Choose(action) => self.choose(*action),
            Message::Seek(index) => self.seek(*index),
            Message::Decided(seat, action) => self.decided(*seat, *action),
            Message::Applied(applied) => self.applied(applied),
            Message::Advanced(street, cards) => self.advanced(*street, cards),
            Message::Finished(finish) => self.finished(finish),
            Message::Completed(tx) => self.completed(*tx),
            Message::Expire(id) => self.expire(*id),
            Message::Tick(_) => self.unchanged(),
            Message::Load(descriptor) => self.loaded(descriptor),
            Message::Theme(theme) => self.themed(theme),
        }
    }
}

impl Model {
    fn unchanged(&self) -> (Model, Vec<Command>) {
        (self.clone(), Vec::new())
    }

    /// Step intent. Dispatches entirely on what the session is waiting for.
    fn advance(&self) -> (Model, Vec<Command>) {
        match self.waiting {
            Waiting::Human => self.unchanged(),
            Waiting::Effect(_) => self.unchanged(),
            Waiting::Source => match self.actor {
                Some(seat) => (self.clone(), vec![Command::Ask(seat)]),
                None => self.unchanged(),
            },
            Waiting::Nobody => match self.review {
                Some(review) if review.cursor < review.length => {
                    (self.clone(), vec![Command::Fetch(review.cursor)])
                }
                Some(review) if !review.paused => {
                    // log exhausted while autoplaying
                    let mut next = self.clone();
                    if let Some(review) = next.review.as_mut() {
                        review.paused = true;
                    }
                    (next, vec![Command::Playback(Playback::Paused)])
                }
                Some(_) => self.unchanged(),
                None => {
                    log::debug!("advance with nothing to do in live mode");
                    self.unchanged()
                }
            },
        }
    }

    fn autoplay(&self) -> (Model, Vec<Command>) {
        match self.review {
            None => {
                log::debug!("autoplay toggle outside replay mode");
                self.unchanged()
            }
            Some(review) => {
                let mut next = self.clone();
                if let Some(review) = next.review.as_mut() {
                    review.paused = !review.paused;
                }
                let playback = match review.paused {
                    true => Playback::Playing,
                    false => Playback::Paused,
                };
                (next, vec![Command::Playback(playback)])
            }
        }
    }

    /// Human decision for the current actor.
    fn choose(&self, action: Action) -> (Model, Vec<Command>) {
        match (self.waiting, self.actor) {
            (Waiting::Human, Some(seat))
                if action.is_choice() && self.legal.contains(&action) =>
            {
                (self.clone(), vec![Command::Apply(seat, action)])
            }
            _ => self.unchanged(),
        }
    }

    /// Source decision for a seat. Duplicate or superseded deliveries find
    /// `waiting` moved on and fall through.
    fn decided(&self, seat: Position, action: Action) -> (Model, Vec<Command>) {
        match self.waiting {
            Waiting::Source
                if self.actor == Some(seat)
                    && action.is_choice()
                    && self.legal.contains(&action) =>
            {
                (self.clone(), vec![Command::Apply(seat, action)])
            }
            _ => self.unchanged(),
        }
    }

    /// An action was applied, by the rules engine or by the record. The
    /// reducer moves the chips it is told about and opens an effect wait.
    fn applied(&self, applied: &Applied) -> (Model, Vec<Command>) {
        if self.seat(applied.seat).is_none() {
            log::debug!("applied action for unknown seat {}", applied.seat);
            return self.unchanged();
        }
        let mut next = self.clone();
        let amount = applied.action.amount();
        if let Some(seat) = next.seats.get_mut(&applied.seat) {
            seat.stack -= amount;
            seat.committed += amount;
            match applied.action {
                Action::Fold => seat.folded = true,
                Action::Shove(_) => seat.all_in = true,
                _ => (),
            }
        }
        next.pot += amount;
        next.point(applied.next);
        next.legal = applied.legal.clone();
        next.step();
        let banner = next.push_banner(format!("P{} {}", applied.seat, applied.action.label()));
        let commands = vec![
            Command::Sound(Clip::from(applied.action)),
            Command::Animate(Animation::from((applied.seat, applied.action)), next.tx),
            Command::Timer(crate::BANNER_TTL, Message::Expire(banner)),
        ];
        (next, commands)
    }

    /// The street changed. Board cards append, round markers reset.
    fn advanced(&self, street: Street, cards: &[Card]) -> (Model, Vec<Command>) {
        let mut next = self.clone();
        next.street = street;
        next.board.extend(cards.iter().copied());
        for seat in next.seats.values_mut() {
            seat.committed = 0;
        }
        next.step();
        let mut commands = vec![
            Command::Sound(Clip::Deal),
            Command::Animate(Animation::Board(street, cards.to_vec()), next.tx),
        ];
        if next.is_replay() {
            // replay does not wait on real-time pacing for street turnover
            commands.push(Command::Timer(0, Message::Completed(next.tx)));
        }
        (next, commands)
    }

    /// Terminal settlement. Payouts drain the pot back into stacks.
    fn finished(&self, finish: &Finish) -> (Model, Vec<Command>) {
        let mut next = self.clone();
        let mut commands = vec![Command::Sound(Clip::Win)];
        for (position, payout) in &finish.payouts {
            if let Some(seat) = next.seats.get_mut(position) {
                seat.stack += payout;
            }
            next.pot -= payout;
        }
        for seat in next.seats.values_mut() {
            seat.committed = 0;
        }
        next.point(None);
        next.legal.clear();
        next.street = Street::Show;
        next.step();
        for (position, payout) in &finish.payouts {
            let banner = next.push_banner(format!("P{} wins {}", position, payout));
            commands.push(Command::Timer(crate::BANNER_TTL, Message::Expire(banner)));
            commands.push(Command::Speak(format!("Seat {} wins {}", position, payout)));
        }
        commands.push(Command::Animate(
            Animation::Payout(finish.payouts.clone()),
            next.tx,
        ));
        if next.is_replay() {
            commands.push(Command::Timer(0, Message::Completed(next.tx)));
        }
        commands.push(Command::Publish(
            "hand/finished",
            serde_json::json!({
                "hand": next.hand,
                "winners": finish.winners,
                "payouts": finish.payouts,
            }),
        ));
        (next, commands)
    }

    /// Effect completion. Only the completion matching the current
    /// transaction id is honored; anything else belongs to a superseded
    /// effect and is dropped.
    fn completed(&self, tx: Tx) -> (Model, Vec<Command>) {
        if tx != self.tx {
            log::debug!("stale completion {} (current {})", tx, self.tx);
            return self.unchanged();
        }
        if !matches!(self.waiting, Waiting::Effect(_)) {
            return self.unchanged();
        }
        let mut next = self.clone();
        next.waiting = next.route();
        (next, Vec::new())
    }

    fn expire(&self, id: u64) -> (Model, Vec<Command>) {
        let mut next = self.clone();
        next.banners.retain(|banner| banner.id != id);
        (next, Vec::new())
    }

    fn seek(&self, index: usize) -> (Model, Vec<Command>) {
        match self.review {
            None => self.unchanged(),
            Some(review) => {
                let target = index.min(review.length);
                (self.clone(), vec![Command::Rewind(target)])
            }
        }
    }

    fn loaded(&self, descriptor: &Descriptor) -> (Model, Vec<Command>) {
        match descriptor.validate() {
            Err(error) => {
                log::error!("refusing malformed session {}: {}", descriptor.id, error);
                self.unchanged()
            }
            Ok(()) => {
                let next = Model::from(descriptor);
                let commands = vec![
                    Command::Playback(Playback::Stopped),
                    Command::Publish(
                        "session/loaded",
                        serde_json::json!({ "hand": next.hand, "replay": next.is_replay() }),
                    ),
                    Command::Render,
                ];
                (next, commands)
            }
        }
    }

    fn themed(&self, theme: &str) -> (Model, Vec<Command>) {
        let mut next = self.clone();
        next.theme = theme.to_string();
        (next, Vec::new())
    }
}

impl Model {
    /// Open a fresh effect wait and, in replay mode, consume one log event.
    fn step(&mut self) {
        self.tx += 1;
        self.waiting = Waiting::Effect(self.tx);
        if let Some(review) = self.review.as_mut() {
            review.cursor += 1;
        }
    }

    /// Where the session waits once the current effect settles.
    pub(crate) fn route(&self) -> Waiting {
        match (self.is_replay(), self.actor) {
            (true, _) => Waiting::Nobody,
            (false, None) => Waiting::Nobody,
            (false, Some(position)) => match self.controller(position) {
                Controller::Human => Waiting::Human,
                Controller::Source => Waiting::Source,
            },
        }
    }
}

use crate::Position;
use crate::Tx;
use crate::director::Playback;
use crate::session::Descriptor;
use crate::table::Action;
use crate::table::Card;
use crate::table::Controller;
use crate::table::Model;
use crate::table::Street;
use crate::table::Waiting;
use crate::update::command::Animation;
use crate::update::command::Clip;
use crate::update::command::Command;
use crate::update::message::Applied;
use crate::update::message::Finish;
use crate::update::message::Message;
