pub mod history;
pub mod selector;
pub mod session;
pub mod strategy;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("strategy roster is empty")]
    EmptyRoster,
    #[error("unknown strategy {0:?}")]
    UnknownStrategy(String),
}
