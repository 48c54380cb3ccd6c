use common::model::game::RoundOutcome;
use serde::{Deserialize, Serialize};

// REST types
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StrategiesResponse {
    pub strategies: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggedRound {
    pub outcome: RoundOutcome,
    pub description: String,
}

impl From<&RoundOutcome> for LoggedRound {
    fn from(outcome: &RoundOutcome) -> Self {
        LoggedRound {
            description: outcome.to_string(),
            outcome: outcome.clone(),
        }
    }
}
