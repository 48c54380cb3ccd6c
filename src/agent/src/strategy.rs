use std::{fmt, str::FromStr, sync::Arc};

use common::model::game::Move;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{history::MoveHistory, AgentError};

/// Chance, in tenths, that [`Cheat`] peeks at the history.
const CHEAT_TENTHS: u32 = 1;

pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `last_move` is the player's most recent move, `None` before the first turn.
    fn determine_move(
        &self,
        history: &MoveHistory,
        last_move: Option<Move>,
        rng: &mut dyn RngCore,
    ) -> Move;
}

// Random
pub struct RandomMove {}
impl Strategy for RandomMove {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn determine_move(&self, _: &MoveHistory, _: Option<Move>, rng: &mut dyn RngCore) -> Move {
        Move::ALL[rng.random_range(0..Move::ALL.len())]
    }
}

pub struct LeastUsed {}
impl Strategy for LeastUsed {
    fn name(&self) -> &'static str {
        "LeastUsed"
    }

    fn determine_move(&self, history: &MoveHistory, _: Option<Move>, _: &mut dyn RngCore) -> Move {
        history.least_used().unwrap_or(Move::Rock)
    }
}

pub struct MostUsed {}
impl Strategy for MostUsed {
    fn name(&self) -> &'static str {
        "MostUsed"
    }

    fn determine_move(&self, history: &MoveHistory, _: Option<Move>, _: &mut dyn RngCore) -> Move {
        history.most_used().unwrap_or(Move::Rock)
    }
}

pub struct LastUsed {}
impl Strategy for LastUsed {
    fn name(&self) -> &'static str {
        "LastUsed"
    }

    fn determine_move(&self, _: &MoveHistory, last_move: Option<Move>, _: &mut dyn RngCore) -> Move {
        last_move.unwrap_or(Move::Rock)
    }
}

/// One time in ten, counter the first move (in vocabulary order) the player has ever
/// used. Otherwise play like [`RandomMove`].
pub struct Cheat {}
impl Strategy for Cheat {
    fn name(&self) -> &'static str {
        "Cheat"
    }

    fn determine_move(
        &self,
        history: &MoveHistory,
        last_move: Option<Move>,
        rng: &mut dyn RngCore,
    ) -> Move {
        if rng.random_range(0..10) < CHEAT_TENTHS {
            if let Some(seen) = Move::ALL.into_iter().find(|m| history.contains(*m)) {
                return seen.counter();
            }
        }
        RandomMove {}.determine_move(history, last_move, rng)
    }
}

/// Names the built-in strategies, e.g. for configuring a roster.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Random,
    LeastUsed,
    MostUsed,
    LastUsed,
    Cheat,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Random,
        StrategyKind::LeastUsed,
        StrategyKind::MostUsed,
        StrategyKind::LastUsed,
        StrategyKind::Cheat,
    ];

    pub fn strategy(&self) -> Arc<dyn Strategy> {
        match self {
            StrategyKind::Random => Arc::new(RandomMove {}),
            StrategyKind::LeastUsed => Arc::new(LeastUsed {}),
            StrategyKind::MostUsed => Arc::new(MostUsed {}),
            StrategyKind::LastUsed => Arc::new(LastUsed {}),
            StrategyKind::Cheat => Arc::new(Cheat {}),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Random => "Random",
            StrategyKind::LeastUsed => "LeastUsed",
            StrategyKind::MostUsed => "MostUsed",
            StrategyKind::LastUsed => "LastUsed",
            StrategyKind::Cheat => "Cheat",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AgentError::UnknownStrategy(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn played(moves: &[Move]) -> MoveHistory {
        let mut history = MoveHistory::new();
        for m in moves {
            history.record(*m);
        }
        history
    }

    #[test]
    fn random_covers_all_moves_evenly() {
        let mut rng = rng();
        let trials = 30_000;
        let mut counts = [0u32; 3];
        for _ in 0..trials {
            let m = RandomMove {}.determine_move(&MoveHistory::new(), None, &mut rng);
            counts[Move::ALL.iter().position(|x| *x == m).unwrap()] += 1;
        }
        for count in counts {
            let share = count as f64 / trials as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.02, "share {share}");
        }
    }

    #[test]
    fn least_and_most_used() {
        let mut rng = rng();
        let history = played(&[Move::Rock, Move::Paper, Move::Rock, Move::Paper]);
        assert_eq!(
            LeastUsed {}.determine_move(&history, None, &mut rng),
            Move::Scissors
        );
        let history = played(&[Move::Scissors, Move::Paper, Move::Rock]);
        assert_eq!(MostUsed {}.determine_move(&history, None, &mut rng), Move::Rock);
        let history = played(&[Move::Scissors, Move::Rock, Move::Scissors]);
        assert_eq!(
            MostUsed {}.determine_move(&history, None, &mut rng),
            Move::Scissors
        );
    }

    #[test]
    fn empty_history_defaults_to_rock() {
        let mut rng = rng();
        let empty = MoveHistory::new();
        assert_eq!(LeastUsed {}.determine_move(&empty, None, &mut rng), Move::Rock);
        assert_eq!(MostUsed {}.determine_move(&empty, None, &mut rng), Move::Rock);
        assert_eq!(LastUsed {}.determine_move(&empty, None, &mut rng), Move::Rock);
    }

    #[test]
    fn last_used_echoes() {
        let mut rng = rng();
        let history = MoveHistory::new();
        for m in Move::ALL {
            assert_eq!(LastUsed {}.determine_move(&history, Some(m), &mut rng), m);
        }
    }

    #[test]
    fn cheat_counters_rock_one_time_in_ten() {
        let mut rng = rng();
        let mut history = MoveHistory::new();
        history.record(Move::Rock);
        let trials = 20_000;
        let mut counts = [0u32; 3];
        for _ in 0..trials {
            let m = Cheat {}.determine_move(&history, Some(Move::Rock), &mut rng);
            counts[Move::ALL.iter().position(|x| *x == m).unwrap()] += 1;
        }
        let share = |i: usize| counts[i] as f64 / trials as f64;
        // 10% cheating plus a third of the 90% random fallback
        assert!((share(1) - 0.40).abs() < 0.02, "paper {}", share(1));
        assert!((share(0) - 0.30).abs() < 0.02, "rock {}", share(0));
        assert!((share(2) - 0.30).abs() < 0.02, "scissors {}", share(2));
    }

    #[test]
    fn cheat_checks_rock_before_paper_before_scissors() {
        let mut rng = rng();
        let history = played(&[Move::Scissors, Move::Scissors, Move::Paper]);
        let trials = 20_000;
        let scissors = (0..trials)
            .filter(|_| Cheat {}.determine_move(&history, None, &mut rng) == Move::Scissors)
            .count();
        let share = scissors as f64 / trials as f64;
        assert!((share - 0.40).abs() < 0.02, "scissors {share}");
    }

    #[test]
    fn cheat_without_history_is_uniform() {
        let mut rng = rng();
        let trials = 30_000;
        let papers = (0..trials)
            .filter(|_| Cheat {}.determine_move(&MoveHistory::new(), None, &mut rng) == Move::Paper)
            .count();
        let share = papers as f64 / trials as f64;
        assert!((share - 1.0 / 3.0).abs() < 0.02, "paper {share}");
    }

    #[test]
    fn kinds_parse_and_name_their_strategy() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.strategy().name(), kind.name());
            assert_eq!(kind.name().parse::<StrategyKind>(), Ok(kind));
        }
        assert_eq!(" cheat ".parse::<StrategyKind>(), Ok(StrategyKind::Cheat));
        assert_eq!(
            "Oracle".parse::<StrategyKind>(),
            Err(AgentError::UnknownStrategy("Oracle".to_owned()))
        );
    }
}
