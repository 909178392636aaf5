//! Single-threaded cooperative scheduler.
//!
//! Owns a min-heap of timed entries, the playback state machine, and the
//! gate counter that blocks automatic advancement while asynchronous
//! effects are outstanding. Driven exclusively by `tick(now)`; it never
//! reads the clock itself.

/// Cancellation handle for a pending entry.
pub type Token = u64;

/// What a timed entry does when it fires.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    /// Deliver a message.
    Deliver(Message),
    /// Release one gate hold, then deliver a message.
    Gated(Message),
    /// Release one gate hold and nothing else (fire-and-forget effects).
    Release,
}

#[derive(Debug, Clone)]
struct Entry {
    due: Millis,
    seq: u64,
    token: Token,
    slot: Slot,
}

/// Heap order is `(due, seq)`; `seq` breaks time ties deterministically.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// A fired entry, as handed back to the Store by `tick`.
#[derive(Debug, PartialEq)]
pub struct Due {
    /// This entry holds a gate reference the Store must release.
    pub gated: bool,
    /// Absent for bare gate releases.
    pub message: Option<Message>,
}

#[derive(Debug)]
pub struct Director {
    now: Millis,
    seq: u64,
    tokens: Token,
    heap: BinaryHeap<Reverse<Entry>>,
    dead: BTreeSet<Token>,
    gate: u32,
    state: Playback,
    speed: f32,
    auto: Option<Token>,
    interval: Millis,
}

impl Default for Director {
    fn default() -> Self {
        Self {
            now: 0,
            seq: 0,
            tokens: 0,
            heap: BinaryHeap::new(),
            dead: BTreeSet::new(),
            gate: 0,
            state: Playback::Stopped,
            speed: 1.0,
            auto: None,
            interval: crate::AUTO_STEP,
        }
    }
}

impl Director {
    pub fn now(&self) -> Millis {
        self.now
    }
    pub fn state(&self) -> Playback {
        self.state
    }
    pub fn gate(&self) -> u32 {
        self.gate
    }
    /// Entries still waiting to fire, cancelled ones excluded.
    pub fn pending(&self) -> usize {
        self.heap.len() - self.dead.len()
    }

    /// Schedule a message after `delay`, scaled by the speed multiplier.
    pub fn schedule(&mut self, delay: Millis, message: Message) -> Token {
        self.insert(delay, Slot::Deliver(message))
    }
    /// Schedule a message whose delivery also releases one gate hold.
    /// The caller must have called `gate_begin` for this entry.
    pub fn gated(&mut self, delay: Millis, message: Message) -> Token {
        self.insert(delay, Slot::Gated(message))
    }
    /// Schedule a bare gate release (fire-and-forget effect conclusion).
    pub fn release(&mut self, delay: Millis) -> Token {
        self.insert(delay, Slot::Release)
    }
    /// Remove a still-pending entry. Unknown or fired tokens are ignored.
    pub fn cancel(&mut self, token: Token) {
        if self.heap.iter().any(|entry| entry.0.token == token) {
            self.dead.insert(token);
        }
        if self.auto == Some(token) {
            self.auto = None;
        }
    }

    pub fn gate_begin(&mut self) {
        self.gate += 1;
    }
    pub fn gate_end(&mut self) {
        match self.gate.checked_sub(1) {
            Some(gate) => self.gate = gate,
            None => log::warn!("gate released below zero; ignoring"),
        }
    }

    pub fn play(&mut self) {
        self.state = Playback::Playing;
    }
    pub fn pause(&mut self) {
        match self.state {
            Playback::Playing => self.state = Playback::Paused,
            state => log::debug!("pause ignored while {}", state),
        }
    }
    /// Stop playback and abandon the whole timeline.
    pub fn stop(&mut self) {
        self.state = Playback::Stopped;
        self.wipe();
    }
    /// Abandon every pending entry and reset the gate; the only sanctioned
    /// way to walk away from in-flight effects. Playback state survives.
    pub fn seek(&mut self) {
        self.wipe();
    }

    /// Speed changes apply to future schedules only.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(crate::MIN_SPEED, crate::MAX_SPEED);
    }
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Fire every entry due at or before `now`, in `(due, seq)` order.
    pub fn tick(&mut self, now: Millis) -> Vec<Due> {
        self.now = self.now.max(now);
        let mut fired = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.due > self.now {
                break;
            }
            let Reverse(entry) = self.heap.pop().expect("peeked");
            if self.dead.remove(&entry.token) {
                continue;
            }
            if self.auto == Some(entry.token) {
                self.auto = None;
            }
            fired.push(match entry.slot {
                Slot::Deliver(message) => Due {
                    gated: false,
                    message: Some(message),
                },
                Slot::Gated(message) => Due {
                    gated: true,
                    message: Some(message),
                },
                Slot::Release => Due {
                    gated: true,
                    message: None,
                },
            });
        }
        fired
    }

    /// (Re)arm the auto-advance entry. Only while Playing, only with the
    /// gate closed to zero, and only one armed at a time. Call after
    /// draining a tick and after entering Playing.
    pub fn pump(&mut self) {
        if self.state == Playback::Playing && self.gate == 0 && self.auto.is_none() {
            let token = self.schedule(self.interval, Message::Advance);
            self.auto = Some(token);
        }
    }

    fn insert(&mut self, delay: Millis, slot: Slot) -> Token {
        self.seq += 1;
        self.tokens += 1;
        let entry = Entry {
            due: self.now + self.scaled(delay),
            seq: self.seq,
            token: self.tokens,
            slot,
        };
        self.heap.push(Reverse(entry));
        self.tokens
    }

    fn scaled(&self, delay: Millis) -> Millis {
        (delay as f32 / self.speed).round() as Millis
    }

    fn wipe(&mut self) {
        self.heap.clear();
        self.dead.clear();
        self.gate = 0;
        self.auto = None;
    }
}

use crate::Millis;
use crate::director::playback::Playback;
use crate::update::message::Message;
use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::collections::BinaryHeap;

#[cfg(test)]
mod tests {
    use super::*;

    fn message(n: u64) -> Message {
        Message::Expire(n)
    }

    #[test]
    fn fires_in_delay_order_regardless_of_insertion() {
        let mut director = Director::default();
        director.schedule(200, message(2));
        director.schedule(100, message(1));
        director.schedule(300, message(3));
        let fired = director.tick(1_000);
        let order = fired
            .into_iter()
            .filter_map(|due| due.message)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![message(1), message(2), message(3)]);
    }

    #[test]
    fn sequence_breaks_time_ties() {
        let mut director = Director::default();
        director.schedule(100, message(1));
        director.schedule(100, message(2));
        director.schedule(100, message(3));
        let order = director
            .tick(100)
            .into_iter()
            .filter_map(|due| due.message)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![message(1), message(2), message(3)]);
    }

    #[test]
    fn nothing_fires_early() {
        let mut director = Director::default();
        director.schedule(100, message(1));
        assert!(director.tick(99).is_empty());
        assert_eq!(director.tick(100).len(), 1);
    }

    #[test]
    fn cancelled_entries_never_fire() {
        let mut director = Director::default();
        let token = director.schedule(100, message(1));
        director.schedule(100, message(2));
        director.cancel(token);
        let order = director
            .tick(100)
            .into_iter()
            .filter_map(|due| due.message)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![message(2)]);
        assert_eq!(director.pending(), 0);
    }

    #[test]
    fn seek_discards_timers_and_resets_gate() {
        let mut director = Director::default();
        director.gate_begin();
        director.gate_begin();
        director.schedule(100, message(1));
        director.release(50);
        director.seek();
        assert_eq!(director.gate(), 0);
        assert_eq!(director.pending(), 0);
        assert!(director.tick(10_000).is_empty());
    }

    #[test]
    fn stop_wipes_and_stops() {
        let mut director = Director::default();
        director.play();
        director.gate_begin();
        director.schedule(100, message(1));
        director.stop();
        assert_eq!(director.state(), Playback::Stopped);
        assert_eq!(director.gate(), 0);
        assert!(director.tick(10_000).is_empty());
    }

    #[test]
    fn playback_transitions() {
        let mut director = Director::default();
        assert_eq!(director.state(), Playback::Stopped);
        director.pause(); // no-op from Stopped
        assert_eq!(director.state(), Playback::Stopped);
        director.play();
        assert_eq!(director.state(), Playback::Playing);
        director.pause();
        assert_eq!(director.state(), Playback::Paused);
        director.play();
        assert_eq!(director.state(), Playback::Playing);
        director.stop();
        assert_eq!(director.state(), Playback::Stopped);
    }

    #[test]
    fn speed_scales_future_schedules_only() {
        let mut director = Director::default();
        director.schedule(400, message(1));
        director.set_speed(4.0);
        director.schedule(400, message(2));
        // at 4x the second entry fires at t=100, the first still at t=400
        let order = director
            .tick(100)
            .into_iter()
            .filter_map(|due| due.message)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![message(2)]);
        let order = director
            .tick(400)
            .into_iter()
            .filter_map(|due| due.message)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![message(1)]);
    }

    #[test]
    fn speed_is_clamped() {
        let mut director = Director::default();
        director.set_speed(0.0);
        assert_eq!(director.speed(), crate::MIN_SPEED);
        director.set_speed(1_000.0);
        assert_eq!(director.speed(), crate::MAX_SPEED);
    }

    #[test]
    fn pump_arms_only_when_playing_and_ungated() {
        let mut director = Director::default();
        director.pump();
        assert_eq!(director.pending(), 0);
        director.play();
        director.gate_begin();
        director.pump();
        assert_eq!(director.pending(), 0);
        director.gate_end();
        director.pump();
        assert_eq!(director.pending(), 1);
        // one at a time
        director.pump();
        assert_eq!(director.pending(), 1);
    }

    #[test]
    fn auto_advance_delivers_advance_and_rearms_via_pump() {
        let mut director = Director::default();
        director.play();
        director.pump();
        let fired = director.tick(crate::AUTO_STEP);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].message, Some(Message::Advance));
        director.pump();
        assert_eq!(director.pending(), 1);
    }

    #[test]
    fn gated_entries_report_their_hold() {
        let mut director = Director::default();
        director.gate_begin();
        director.gated(10, message(1));
        director.gate_begin();
        director.release(5);
        let fired = director.tick(10);
        assert_eq!(fired.len(), 2);
        assert!(fired[0].gated && fired[0].message.is_none());
        assert!(fired[1].gated && fired[1].message == Some(message(1)));
    }

    #[test]
    fn gate_never_underflows() {
        let mut director = Director::default();
        director.gate_end();
        assert_eq!(director.gate(), 0);
    }

    #[test]
    fn late_ticks_fire_everything_in_order() {
        let mut director = Director::default();
        director.schedule(10, message(1));
        director.schedule(500, message(2));
        let order = director
            .tick(2_000)
            .into_iter()
            .filter_map(|due| due.message)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![message(1), message(2)]);
    }
}
