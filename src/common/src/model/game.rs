use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Every move, in the fixed order used for tie-breaking.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// The move that beats `self`.
    pub fn counter(&self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }

    /// `None` when both moves are equal, otherwise whether `self` wins.
    pub fn beats(&self, other: &Move) -> Option<bool> {
        if self == other {
            None
        } else {
            Some(other.counter() == *self)
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PlayerWin,
    ComputerWin,
    Tie,
}

impl Outcome {
    pub fn resolve(player_move: Move, computer_move: Move) -> Outcome {
        match player_move.beats(&computer_move) {
            None => Outcome::Tie,
            Some(true) => Outcome::PlayerWin,
            Some(false) => Outcome::ComputerWin,
        }
    }
}

/// A single adjudicated round, tagged with the strategy that produced the computer's move.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub player_move: Move,
    pub computer_move: Move,
    pub result: Outcome,
    pub strategy: String,
}

impl RoundOutcome {
    pub fn new(player_move: Move, computer_move: Move, strategy: impl Into<String>) -> Self {
        RoundOutcome {
            player_move,
            computer_move,
            result: Outcome::resolve(player_move, computer_move),
            strategy: strategy.into(),
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.result {
            Outcome::Tie => write!(
                f,
                "{} vs {}. It's a Tie!",
                self.player_move, self.computer_move
            )?,
            Outcome::PlayerWin => write!(
                f,
                "{} beats {}. Player Wins!",
                self.player_move, self.computer_move
            )?,
            Outcome::ComputerWin => write!(
                f,
                "{} beats {}. Computer Wins!",
                self.computer_move, self.player_move
            )?,
        }
        write!(f, " ({})", self.strategy)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub player_wins: u32,
    pub computer_wins: u32,
    pub ties: u32,
}

impl SessionTally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWin => self.player_wins += 1,
            Outcome::ComputerWin => self.computer_wins += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.player_wins + self.computer_wins + self.ties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beats_is_total_and_irreflexive() {
        for a in Move::ALL {
            assert_eq!(a.beats(&a), None);
            for b in Move::ALL.into_iter().filter(|b| *b != a) {
                let a_wins = a.beats(&b).unwrap();
                let b_wins = b.beats(&a).unwrap();
                assert!(a_wins ^ b_wins, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn canonical_cycle() {
        assert_eq!(Move::Rock.beats(&Move::Scissors), Some(true));
        assert_eq!(Move::Scissors.beats(&Move::Paper), Some(true));
        assert_eq!(Move::Paper.beats(&Move::Rock), Some(true));
        assert_eq!(Move::Rock.beats(&Move::Paper), Some(false));
    }

    #[test]
    fn counter_beats_its_target() {
        for m in Move::ALL {
            assert_eq!(m.counter().beats(&m), Some(true));
        }
    }

    #[test]
    fn resolve() {
        assert_eq!(Outcome::resolve(Move::Rock, Move::Rock), Outcome::Tie);
        assert_eq!(
            Outcome::resolve(Move::Rock, Move::Scissors),
            Outcome::PlayerWin
        );
        assert_eq!(
            Outcome::resolve(Move::Rock, Move::Paper),
            Outcome::ComputerWin
        );
    }

    #[test]
    fn describe_rounds() {
        let win = RoundOutcome::new(Move::Rock, Move::Scissors, "LeastUsed");
        assert_eq!(win.to_string(), "Rock beats Scissors. Player Wins! (LeastUsed)");
        let tie = RoundOutcome::new(Move::Paper, Move::Paper, "Random");
        assert_eq!(tie.to_string(), "Paper vs Paper. It's a Tie! (Random)");
        let loss = RoundOutcome::new(Move::Rock, Move::Paper, "Cheat");
        assert_eq!(loss.to_string(), "Paper beats Rock. Computer Wins! (Cheat)");
    }

    #[test]
    fn tally_counts_each_result_once() {
        let mut tally = SessionTally::default();
        tally.record(Outcome::PlayerWin);
        tally.record(Outcome::Tie);
        tally.record(Outcome::Tie);
        assert_eq!(
            tally,
            SessionTally {
                player_wins: 1,
                computer_wins: 0,
                ties: 2
            }
        );
        assert_eq!(tally.rounds(), 3);
    }

    #[test]
    fn wire_format() {
        let round = RoundOutcome::new(Move::Scissors, Move::Rock, "MostUsed");
        let json = serde_json::to_value(&round).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "player_move": "Scissors",
                "computer_move": "Rock",
                "result": "ComputerWin",
                "strategy": "MostUsed"
            })
        );
    }
}
