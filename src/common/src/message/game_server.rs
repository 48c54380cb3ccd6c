use crate::model::game::{Move, RoundOutcome, SessionTally};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoundResultResponse {
    pub outcome: RoundOutcome,
    pub tally: SessionTally,
}

// Client types
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ClientRequest {
    Move { value: Move },
    GetTally,
    Quit,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ClientResponse {
    RoundResult(RoundResultResponse),
    Tally(SessionTally),
    Goodbye { tally: SessionTally },
}
