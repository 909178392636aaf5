/// Playback state machine: Stopped -> Playing <-> Paused, with Stopped
/// reachable from anywhere. Stopped is the initial state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Playback {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl Display for Playback {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Playback::Stopped => write!(f, "stopped"),
            Playback::Playing => write!(f, "playing"),
            Playback::Paused => write!(f, "paused"),
        }
    }
}

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
