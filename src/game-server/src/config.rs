use std::num::ParseIntError;

use agent::{session::SessionConfig, strategy::StrategyKind, AgentError};
use thiserror::Error;

pub const SOCKET_ADDRESS_VAR: &str = "RPS_SOCKET_ADDRESS";
pub const REST_ADDRESS_VAR: &str = "RPS_REST_ADDRESS";
pub const SEED_VAR: &str = "RPS_SEED";
pub const STRATEGIES_VAR: &str = "RPS_STRATEGIES";
pub const LOG_CAPACITY_VAR: &str = "RPS_LOG_CAPACITY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        key: &'static str,
        value: String,
        source: ParseIntError,
    },
    #[error(transparent)]
    Agent(#[from] AgentError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameServerConfig {
    pub socket_address: String,
    pub rest_address: String,
    pub session: SessionConfig,
}

impl Default for GameServerConfig {
    fn default() -> Self {
        GameServerConfig {
            socket_address: "0.0.0.0:3002".to_owned(),
            rest_address: "0.0.0.0:8082".to_owned(),
            session: SessionConfig::default(),
        }
    }
}

impl GameServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` finds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(address) = lookup(SOCKET_ADDRESS_VAR) {
            config.socket_address = address;
        }
        if let Some(address) = lookup(REST_ADDRESS_VAR) {
            config.rest_address = address;
        }
        if let Some(seed) = lookup(SEED_VAR) {
            config.session.seed = Some(parse_number(SEED_VAR, &seed)?);
        }
        if let Some(strategies) = lookup(STRATEGIES_VAR) {
            config.session.strategies = strategies
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(str::parse::<StrategyKind>)
                .collect::<Result<_, _>>()?;
        }
        if let Some(capacity) = lookup(LOG_CAPACITY_VAR) {
            config.session.log_capacity = Some(parse_number(LOG_CAPACITY_VAR, &capacity)?);
        }
        // Reject an empty roster here rather than on the first move
        config.session.selector()?;
        Ok(config)
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidNumber {
            key,
            value: value.to_owned(),
            source,
        })
}
