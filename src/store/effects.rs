/// Host-provided effect handlers.
///
/// Sounds, speech, and animations return their nominal duration so the
/// Store can schedule the paired gate release and completion through the
/// Director; no effect handler touches a timing primitive itself.
pub trait EffectRunner: Debug {
    fn sound(&mut self, clip: Clip) -> Millis;
    fn speak(&mut self, text: &str) -> Millis;
    fn animate(&mut self, animation: &Animation) -> Millis;
    fn publish(&mut self, topic: &str, payload: &serde_json::Value);
}

/// No-op runner with zero durations: headless hosts and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl EffectRunner for Silent {
    fn sound(&mut self, _: Clip) -> Millis {
        0
    }
    fn speak(&mut self, _: &str) -> Millis {
        0
    }
    fn animate(&mut self, _: &Animation) -> Millis {
        0
    }
    fn publish(&mut self, _: &str, _: &serde_json::Value) {}
}

/// Log-backed runner with plausible durations: the console reviewer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl EffectRunner for Console {
    fn sound(&mut self, clip: Clip) -> Millis {
        log::debug!("sound {:?}", clip);
        250
    }
    fn speak(&mut self, text: &str) -> Millis {
        log::info!("» {}", text);
        40 * text.len() as Millis
    }
    fn animate(&mut self, animation: &Animation) -> Millis {
        log::debug!("animate {}", animation.name());
        match animation {
            Animation::Chips(..) => 400,
            Animation::Check(..) => 200,
            Animation::Fold(..) => 250,
            Animation::Board(..) => 600,
            Animation::Payout(..) => 900,
        }
    }
    fn publish(&mut self, topic: &str, payload: &serde_json::Value) {
        log::info!("publish {} {}", topic, payload);
    }
}

use crate::Millis;
use crate::update::Animation;
use crate::update::Clip;
use std::fmt::Debug;
