/// External strategy component consulted by `StrategySource`. Anything
/// that can rank actions plugs in here: a solver blueprint, a neural
/// policy, a heuristic.
pub trait Strategy: Debug {
    fn choose(&mut self, model: &Model, seat: Position) -> anyhow::Result<Action>;
    fn name(&self) -> &'static str;
}

/// Strategy-engine decision source. Identical shape to the scripted
/// source, but the action comes from the strategy. Any failure or illegal
/// suggestion degrades to the scripted rule: an unreleased gate stalls the
/// whole session, so this path must always produce a decision.
#[derive(Debug)]
pub struct StrategySource {
    strategy: Box<dyn Strategy>,
}

impl StrategySource {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self { strategy }
    }

    fn fallback(&self, model: &Model, seat: Position) -> Result<Decision, SourceError> {
        ScriptedSource::preference(&model.legal)
            .map(|action| Decision {
                action,
                think: think(seat),
            })
            .ok_or_else(|| SourceError::Failed("no fallback action".to_string()))
    }
}

impl DecisionSource for StrategySource {
    fn decide(&mut self, model: &Model, seat: Position) -> Result<Decision, SourceError> {
        match self.strategy.choose(model, seat) {
            Ok(action) if model.legal.contains(&action) => Ok(Decision {
                action,
                think: think(seat),
            }),
            Ok(action) => {
                log::warn!(
                    "{} suggested illegal {:?}; falling back to script",
                    self.strategy.name(),
                    action
                );
                self.fallback(model, seat)
            }
            Err(error) => {
                log::warn!(
                    "{} failed ({}); falling back to script",
                    self.strategy.name(),
                    error
                );
                self.fallback(model, seat)
            }
        }
    }
    fn name(&self) -> &'static str {
        "strategy"
    }
}

/// Default strategy: weighted sampling over the legal set, seeded from the
/// session descriptor so runs are reproducible. Call-heavy, rarely shoves.
#[derive(Debug)]
pub struct Weighted {
    rng: SmallRng,
}

impl Weighted {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn weight(action: &Action) -> u32 {
        match action {
            Action::Fold => 1_500,
            Action::Check => 1_000,
            Action::Call(..) => 4_000,
            Action::Raise(..) => 500,
            Action::Shove(..) => 1,
            Action::Blind(..) => 0,
        }
    }
}

impl Strategy for Weighted {
    fn choose(&mut self, model: &Model, _: Position) -> anyhow::Result<Action> {
        let choices = model
            .legal
            .iter()
            .copied()
            .map(|action| (action, Self::weight(&action)))
            .filter(|(_, weight)| *weight > 0)
            .collect::<Vec<_>>();
        let total = choices.iter().map(|(_, weight)| weight).sum::<u32>();
        if total == 0 {
            anyhow::bail!("no weighted action among {:?}", model.legal);
        }
        let mut roll = self.rng.random_range(0..total);
        for (action, weight) in choices {
            if roll < weight {
                return Ok(action);
            }
            roll -= weight;
        }
        unreachable!("roll bounded by total weight")
    }
    fn name(&self) -> &'static str {
        "weighted"
    }
}

use crate::Position;
use crate::sources::scripted::ScriptedSource;
use crate::sources::source::Decision;
use crate::sources::source::DecisionSource;
use crate::sources::source::SourceError;
use crate::sources::source::think;
use crate::table::Action;
use crate::table::Model;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::fmt::Debug;
