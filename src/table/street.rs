#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    #[default]
    Pref = 0isize,
    Flop = 1isize,
    Turn = 2isize,
    Rive = 3isize,
    /// Terminal phase: the hand is settled and no further action exists.
    Show = 4isize,
}

impl Street {
    pub const fn all() -> &'static [Self] {
        &[Self::Pref, Self::Flop, Self::Turn, Self::Rive, Self::Show]
    }
    pub const fn next(&self) -> Self {
        match self {
            Self::Pref => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::Rive,
            Self::Rive => Self::Show,
            Self::Show => panic!("terminal"),
        }
    }
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Show)
    }
    /// Community cards revealed entering this street.
    pub const fn n_revealed(&self) -> usize {
        match self {
            Self::Pref => 0,
            Self::Flop => 3,
            Self::Turn => 1,
            Self::Rive => 1,
            Self::Show => 0,
        }
    }
}

impl Display for Street {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Pref => write!(f, "{}", "Preflop".white()),
            Self::Flop => write!(f, "{}", "Flop".white()),
            Self::Turn => write!(f, "{}", "Turn".white()),
            Self::Rive => write!(f, "{}", "River".white()),
            Self::Show => write!(f, "{}", "Showdown".yellow()),
        }
    }
}

use colored::Colorize;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
