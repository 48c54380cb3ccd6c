use std::collections::HashMap;

use agent::{
    selector::StrategySelector,
    session::{Session, SessionConfig},
    AgentError,
};
use common::model::{game::SessionTally, messages::Id};
use tracing::info;

/// Every live session, one per user. Sessions are created on a user's first move and
/// dropped when they quit.
pub struct SessionStore {
    config: SessionConfig,
    selector: StrategySelector,
    sessions: HashMap<Id, Session>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Result<Self, AgentError> {
        Ok(SessionStore {
            selector: config.selector()?,
            config,
            sessions: HashMap::new(),
        })
    }

    pub fn session_mut(&mut self, user_id: Id) -> &mut Session {
        let SessionStore {
            config,
            selector,
            sessions,
        } = self;
        sessions.entry(user_id).or_insert_with(|| {
            info!("Starting session for {}", user_id);
            Session::new(selector.clone(), config.rng()).with_log_capacity(config.log_capacity)
        })
    }

    pub fn get(&self, user_id: &Id) -> Option<&Session> {
        self.sessions.get(user_id)
    }

    /// Zero for users without a session.
    pub fn tally(&self, user_id: &Id) -> SessionTally {
        self.get(user_id)
            .map(Session::current_tally)
            .unwrap_or_default()
    }

    pub fn remove(&mut self, user_id: &Id) -> Option<Session> {
        let session = self.sessions.remove(user_id);
        if session.is_some() {
            info!("Ended session for {}", user_id);
        }
        session
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.selector.names()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
