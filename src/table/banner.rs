/// A transient UI notice ("P2 raises 30", "P0 wins 110").
///
/// The reducer never reads the clock, so expiry is not a timestamp here:
/// whoever pushes a banner also emits `Command::Timer(BANNER_TTL,
/// Message::Expire(id))` and the matching `Expire` removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: u64,
    pub text: String,
}

impl Banner {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

use serde::Deserialize;
use serde::Serialize;
