use std::collections::VecDeque;

use common::model::game::{Move, RoundOutcome, SessionTally};
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use crate::{
    history::MoveHistory,
    selector::StrategySelector,
    strategy::StrategyKind,
    AgentError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seeds each session's generator. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub strategies: Vec<StrategyKind>,
    /// Keep only the newest rounds in the log. `None` keeps every round.
    pub log_capacity: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            seed: None,
            strategies: StrategyKind::ALL.to_vec(),
            log_capacity: None,
        }
    }
}

impl SessionConfig {
    pub fn selector(&self) -> Result<StrategySelector, AgentError> {
        StrategySelector::from_kinds(&self.strategies)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// One player's game against the computer: the move history that feeds the
/// strategies, the running tally and the round log.
pub struct Session {
    selector: StrategySelector,
    rng: StdRng,
    history: MoveHistory,
    last_move: Option<Move>,
    tally: SessionTally,
    log: VecDeque<RoundOutcome>,
    log_capacity: Option<usize>,
}

impl Session {
    pub fn new(selector: StrategySelector, rng: StdRng) -> Self {
        Session {
            selector,
            rng,
            history: MoveHistory::new(),
            last_move: None,
            tally: SessionTally::default(),
            log: VecDeque::new(),
            log_capacity: None,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, AgentError> {
        Ok(Self::new(config.selector()?, config.rng()).with_log_capacity(config.log_capacity))
    }

    pub fn with_log_capacity(mut self, log_capacity: Option<usize>) -> Self {
        self.log_capacity = log_capacity;
        self.trim_log();
        self
    }

    pub fn play_turn(&mut self, player_move: Move) -> RoundOutcome {
        self.history.record(player_move);
        self.last_move = Some(player_move);

        let strategy = self.selector.pick(&mut self.rng);
        let computer_move = strategy.determine_move(&self.history, self.last_move, &mut self.rng);
        let outcome = RoundOutcome::new(player_move, computer_move, strategy.name());
        self.apply(outcome.clone());
        debug!(
            round = self.tally.rounds(),
            strategy = outcome.strategy.as_str(),
            "{} vs {}: {:?}", player_move, computer_move, outcome.result
        );
        outcome
    }

    fn apply(&mut self, outcome: RoundOutcome) {
        self.tally.record(outcome.result);
        self.log.push_back(outcome);
        self.trim_log();
    }

    fn trim_log(&mut self) {
        if let Some(capacity) = self.log_capacity {
            while self.log.len() > capacity {
                self.log.pop_front();
            }
        }
    }

    pub fn current_tally(&self) -> SessionTally {
        self.tally
    }

    /// Rounds oldest first.
    pub fn log(&self) -> impl Iterator<Item = &RoundOutcome> {
        self.log.iter()
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }
}
