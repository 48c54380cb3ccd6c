use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::{
    strategy::{Strategy, StrategyKind},
    AgentError,
};

/// Draws one strategy per turn, uniformly and independently of earlier turns.
///
/// Strategies are stateless, so clones of a selector share the same instances.
#[derive(Clone)]
pub struct StrategySelector {
    roster: Vec<Arc<dyn Strategy>>,
}

impl StrategySelector {
    pub fn new(roster: Vec<Arc<dyn Strategy>>) -> Result<Self, AgentError> {
        if roster.is_empty() {
            return Err(AgentError::EmptyRoster);
        }
        Ok(StrategySelector { roster })
    }

    pub fn from_kinds(kinds: &[StrategyKind]) -> Result<Self, AgentError> {
        Self::new(kinds.iter().map(StrategyKind::strategy).collect())
    }

    pub fn pick(&self, rng: &mut dyn RngCore) -> &dyn Strategy {
        self.roster[rng.random_range(0..self.roster.len())].as_ref()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.roster.iter().map(|strategy| strategy.name()).collect()
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        StrategySelector {
            roster: StrategyKind::ALL.iter().map(StrategyKind::strategy).collect(),
        }
    }
}
