/// A betting action as it appears in records, legal-action sets, and
/// decisions. Amounts are chips added to the pot by the action.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(tag = "action", content = "amount", rename_all = "lowercase")]
pub enum Action {
    Blind(Chips),
    Fold,
    Check,
    Call(Chips),
    Raise(Chips),
    Shove(Chips),
}

impl Action {
    /// Chips this action moves into the pot.
    pub fn amount(&self) -> Chips {
        match self {
            Action::Fold | Action::Check => 0,
            Action::Blind(amount)
            | Action::Call(amount)
            | Action::Raise(amount)
            | Action::Shove(amount) => *amount,
        }
    }
    /// Uncolored label for banners and logs.
    pub fn label(&self) -> String {
        match self {
            Action::Fold => "folds".to_string(),
            Action::Check => "checks".to_string(),
            Action::Blind(amount) => format!("posts {}", amount),
            Action::Call(amount) => format!("calls {}", amount),
            Action::Raise(amount) => format!("raises {}", amount),
            Action::Shove(amount) => format!("shoves {}", amount),
        }
    }
    /// True for the variants a decision source may legally propose.
    /// Blinds are forced and only ever arrive from records.
    pub fn is_choice(&self) -> bool {
        !matches!(self, Action::Blind(_))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Action::Check => write!(f, "{}", "CHECK".cyan()),
            Action::Fold => write!(f, "{}", "FOLD".red()),
            Action::Blind(amount) => write!(f, "{}", format!("BLIND {}", amount).white()),
            Action::Call(amount) => write!(f, "{}", format!("CALL  {}", amount).yellow()),
            Action::Raise(amount) => write!(f, "{}", format!("RAISE {}", amount).green()),
            Action::Shove(amount) => write!(f, "{}", format!("SHOVE {}", amount).magenta()),
        }
    }
}

use crate::Chips;
use colored::Colorize;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts() {
        assert_eq!(Action::Fold.amount(), 0);
        assert_eq!(Action::Check.amount(), 0);
        assert_eq!(Action::Raise(30).amount(), 30);
        assert_eq!(Action::Blind(2).amount(), 2);
    }

    #[test]
    fn wire_form() {
        let json = serde_json::to_string(&Action::Raise(30)).unwrap();
        assert_eq!(json, r#"{"action":"raise","amount":30}"#);
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Action::Raise(30));
        let fold: Action = serde_json::from_str(r#"{"action":"fold"}"#).unwrap();
        assert_eq!(fold, Action::Fold);
    }
}
