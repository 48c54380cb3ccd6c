use std::collections::BTreeMap;

use common::model::game::Move;

/// How often the player has chosen each move during a session.
///
/// A move that was never played counts as 0. The min/max queries look at every move
/// and break ties by [`Move::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    counts: BTreeMap<Move, u32>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, player_move: Move) {
        *self.counts.entry(player_move).or_insert(0) += 1;
    }

    pub fn count(&self, player_move: Move) -> u32 {
        self.counts.get(&player_move).copied().unwrap_or(0)
    }

    /// Whether the player has ever chosen `player_move`.
    pub fn contains(&self, player_move: Move) -> bool {
        self.count(player_move) > 0
    }

    pub fn counts(&self) -> BTreeMap<Move, u32> {
        self.counts.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[cfg(test)]
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn least_used(&self) -> Option<Move> {
        self.first_by(|candidate, best| candidate < best)
    }

    pub fn most_used(&self) -> Option<Move> {
        self.first_by(|candidate, best| candidate > best)
    }

    // Strict comparison keeps the earliest move among equals
    fn first_by(&self, replaces: impl Fn(u32, u32) -> bool) -> Option<Move> {
        if self.is_empty() {
            return None;
        }
        let mut best: Option<(Move, u32)> = None;
        for m in Move::ALL {
            let count = self.count(m);
            match best {
                Some((_, best_count)) if !replaces(count, best_count) => {}
                _ => best = Some((m, count)),
            }
        }
        best.map(|(m, _)| m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(counts: &[(Move, u32)]) -> MoveHistory {
        let mut history = MoveHistory::new();
        for &(m, n) in counts {
            for _ in 0..n {
                history.record(m);
            }
        }
        history
    }

    #[test]
    fn record_creates_then_increments() {
        let mut history = MoveHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.count(Move::Paper), 0);
        history.record(Move::Paper);
        history.record(Move::Paper);
        history.record(Move::Rock);
        assert_eq!(history.count(Move::Paper), 2);
        assert_eq!(history.count(Move::Rock), 1);
        assert!(!history.contains(Move::Scissors));
        assert_eq!(history.total(), 3);
        assert_eq!(
            history.counts(),
            BTreeMap::from([(Move::Rock, 1), (Move::Paper, 2)])
        );
    }

    #[test]
    fn empty_history_has_no_extremes() {
        let history = MoveHistory::new();
        assert_eq!(history.least_used(), None);
        assert_eq!(history.most_used(), None);
    }

    #[test]
    fn ties_resolve_in_vocabulary_order() {
        let history = played(&[(Move::Rock, 2), (Move::Paper, 2)]);
        assert_eq!(history.least_used(), Some(Move::Scissors));
        assert_eq!(history.most_used(), Some(Move::Rock));

        let history = played(&[(Move::Scissors, 2), (Move::Paper, 2), (Move::Rock, 2)]);
        assert_eq!(history.least_used(), Some(Move::Rock));
        assert_eq!(history.most_used(), Some(Move::Rock));

        let history = played(&[(Move::Scissors, 1), (Move::Paper, 1)]);
        assert_eq!(history.least_used(), Some(Move::Rock));
        assert_eq!(history.most_used(), Some(Move::Paper));
    }

    #[test]
    fn unplayed_moves_count_as_zero() {
        let history = played(&[(Move::Scissors, 1)]);
        assert_eq!(history.count(Move::Rock), 0);
        assert_eq!(history.least_used(), Some(Move::Rock));
        assert_eq!(history.most_used(), Some(Move::Scissors));
    }
}
